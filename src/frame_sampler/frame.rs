use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// One JPEG-encoded still captured during a sampling run.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    index: usize,
    width: u32,
    height: u32,
    jpeg: Vec<u8>,
}

impl Frame {
    pub fn new(index: usize, width: u32, height: u32, jpeg: Vec<u8>) -> Self {
        Self {
            index,
            width,
            height,
            jpeg,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    #[allow(dead_code)]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[allow(dead_code)]
    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn to_data_url(&self) -> String {
        let mut url = String::with_capacity(DATA_URL_PREFIX.len() + self.jpeg.len() * 4 / 3 + 4);
        url.push_str(DATA_URL_PREFIX);
        STANDARD.encode_string(&self.jpeg, &mut url);
        url
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("index", &self.index)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("jpeg_bytes", &self.jpeg.len())
            .finish()
    }
}
