use image::RgbImage;

#[derive(Debug, thiserror::Error)]
pub enum VideoSourceError {
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("camera unavailable: {0}")]
    #[cfg_attr(not(feature = "webcam"), allow(dead_code))]
    Unavailable(String),

    #[error("frame capture failed: {0}")]
    Capture(String),
}

/// A camera that can be acquired for the duration of one sampling run.
pub trait VideoSource: Send + Sync {
    /// Asks for access and opens the stream. Dropping the returned stream
    /// releases the device.
    fn acquire(&self) -> Result<Box<dyn VideoStream>, VideoSourceError>;
}

pub trait VideoStream {
    /// The image currently shown by the stream, at its native resolution.
    fn current_image(&mut self) -> Result<RgbImage, VideoSourceError>;
}
