use crate::library::logger::interface::Logger;
use crate::video_source::interface::{VideoSource, VideoSourceError, VideoStream};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};
use std::sync::Arc;

pub struct VideoSourceWebcam {
    index: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl VideoSourceWebcam {
    pub fn new(index: u32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            index,
            logger: logger.with_namespace("video_source").with_namespace("webcam"),
        }
    }
}

fn to_source_error(error: NokhwaError) -> VideoSourceError {
    match error {
        NokhwaError::OpenDeviceError(device, reason) => {
            VideoSourceError::PermissionDenied(format!("{}: {}", device, reason))
        }
        other => VideoSourceError::Unavailable(other.to_string()),
    }
}

impl VideoSource for VideoSourceWebcam {
    fn acquire(&self) -> Result<Box<dyn VideoStream>, VideoSourceError> {
        let _ = self
            .logger
            .info(&format!("Opening camera {}", self.index));

        let format =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera =
            Camera::new(CameraIndex::Index(self.index), format).map_err(to_source_error)?;
        camera.open_stream().map_err(to_source_error)?;

        let _ = self.logger.info("Camera stream open");

        Ok(Box::new(VideoStreamWebcam {
            camera,
            logger: self.logger.clone(),
        }))
    }
}

struct VideoStreamWebcam {
    camera: Camera,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl VideoStream for VideoStreamWebcam {
    fn current_image(&mut self) -> Result<RgbImage, VideoSourceError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| VideoSourceError::Capture(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| VideoSourceError::Capture(e.to_string()))?;
        let (width, height) = (decoded.width(), decoded.height());

        RgbImage::from_raw(width, height, decoded.into_raw()).ok_or_else(|| {
            VideoSourceError::Capture("decoded frame has unexpected length".to_string())
        })
    }
}

impl Drop for VideoStreamWebcam {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            let _ = self
                .logger
                .error(&format!("Failed to stop camera stream: {}", e));
        } else {
            let _ = self.logger.info("Camera stream stopped");
        }
    }
}
