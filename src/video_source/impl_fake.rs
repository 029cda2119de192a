use crate::library::logger::interface::Logger;
use crate::video_source::interface::{VideoSource, VideoSourceError, VideoStream};
use image::{Rgb, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Behavior {
    Grant,
    Deny,
    FailAfter(usize),
}

/// Synthetic camera. Each image is a gradient shifted by the image count so
/// consecutive frames differ.
pub struct VideoSourceFake {
    width: u32,
    height: u32,
    behavior: Behavior,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl VideoSourceFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            width: 1280,
            height: 720,
            behavior: Behavior::Grant,
            acquired: Arc::default(),
            released: Arc::default(),
            logger: logger.with_namespace("video_source").with_namespace("fake"),
        }
    }

    /// Every acquisition is refused as if the user declined camera access.
    pub fn denied(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            behavior: Behavior::Deny,
            ..Self::new(logger)
        }
    }

    /// Acquisition succeeds but the stream errors once `images` images were read.
    #[allow(dead_code)]
    pub fn failing_after(logger: Arc<dyn Logger + Send + Sync>, images: usize) -> Self {
        Self {
            behavior: Behavior::FailAfter(images),
            ..Self::new(logger)
        }
    }

    #[allow(dead_code)]
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[allow(dead_code)]
    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl VideoSource for VideoSourceFake {
    fn acquire(&self) -> Result<Box<dyn VideoStream>, VideoSourceError> {
        if let Behavior::Deny = self.behavior {
            let _ = self.logger.info("Camera access denied");
            return Err(VideoSourceError::PermissionDenied(
                "user declined camera access".to_string(),
            ));
        }

        self.acquired.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info("Camera acquired");

        Ok(Box::new(VideoStreamFake {
            width: self.width,
            height: self.height,
            fail_after: match self.behavior {
                Behavior::FailAfter(images) => Some(images),
                _ => None,
            },
            images_read: 0,
            released: self.released.clone(),
            logger: self.logger.clone(),
        }))
    }
}

struct VideoStreamFake {
    width: u32,
    height: u32,
    fail_after: Option<usize>,
    images_read: usize,
    released: Arc<AtomicUsize>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl VideoStream for VideoStreamFake {
    fn current_image(&mut self) -> Result<RgbImage, VideoSourceError> {
        if self.fail_after == Some(self.images_read) {
            return Err(VideoSourceError::Capture("camera disconnected".to_string()));
        }

        let shift = (self.images_read % 256) as u32;
        self.images_read += 1;

        let (width, height) = (self.width, self.height);
        Ok(RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 255 / width.max(1) + shift) % 256) as u8,
                ((y * 255 / height.max(1)) % 256) as u8,
                (shift * 7 % 256) as u8,
            ])
        }))
    }
}

impl Drop for VideoStreamFake {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
        let _ = self.logger.info("Camera released");
    }
}
