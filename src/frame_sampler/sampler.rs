use crate::frame_sampler::frame::Frame;
use crate::library::cancel_token::CancelToken;
use crate::library::clock::interface::Clock;
use crate::library::logger::interface::Logger;
use crate::video_source::interface::{VideoSourceError, VideoStream};
use image::codecs::jpeg::JpegEncoder;
use image::imageops;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerSettings {
    pub frame_count: usize,
    pub interval: Duration,
    pub width: u32,
    pub height: u32,
    pub jpeg_quality: u8,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            frame_count: 50,
            interval: Duration::from_millis(3000),
            width: 640,
            height: 480,
            jpeg_quality: 92,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    Acquire(VideoSourceError),

    #[error("capturing frame {index} failed: {source}")]
    Capture {
        index: usize,
        #[source]
        source: VideoSourceError,
    },

    #[error("encoding frame {index} failed: {source}")]
    Encode {
        index: usize,
        #[source]
        source: image::ImageError,
    },

    #[error("sampling cancelled after {captured} frames")]
    Cancelled { captured: usize },
}

/// Takes `frame_count` stills from a stream, one every `interval`, strictly in
/// sequence. Each still is drawn at its native size onto a `width`×`height`
/// raster and JPEG encoded.
pub struct FrameSampler {
    settings: SamplerSettings,
    clock: Arc<dyn Clock + Send + Sync>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSampler {
    pub fn new(
        settings: SamplerSettings,
        clock: Arc<dyn Clock + Send + Sync>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            settings,
            clock,
            logger: logger.with_namespace("frame_sampler"),
        }
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    /// All-or-nothing: any capture error or cancellation discards the frames
    /// taken so far. `on_frame` is called after each frame is encoded.
    pub fn sample<F>(
        &self,
        stream: &mut dyn VideoStream,
        cancel: &CancelToken,
        mut on_frame: F,
    ) -> Result<Vec<Frame>, SampleError>
    where
        F: FnMut(&Frame),
    {
        let mut frames = Vec::with_capacity(self.settings.frame_count);

        for index in 0..self.settings.frame_count {
            if cancel.is_cancelled() {
                return Err(SampleError::Cancelled { captured: index });
            }

            let image = stream
                .current_image()
                .map_err(|source| SampleError::Capture { index, source })?;
            let frame = self.encode(index, &image)?;

            on_frame(&frame);
            frames.push(frame);

            if self.clock.sleep(self.settings.interval, cancel) {
                return Err(SampleError::Cancelled {
                    captured: frames.len(),
                });
            }
        }

        let _ = self
            .logger
            .info(&format!("Sampled {} frames", frames.len()));

        Ok(frames)
    }

    fn encode(&self, index: usize, image: &image::RgbImage) -> Result<Frame, SampleError> {
        let (width, height) = (self.settings.width, self.settings.height);
        let raster = if image.dimensions() == (width, height) {
            image.clone()
        } else {
            // Drawn unscaled from the top-left: larger images are cropped,
            // smaller ones leave the rest of the raster black.
            let mut raster = image::RgbImage::new(width, height);
            imageops::replace(&mut raster, image, 0, 0);
            raster
        };

        let mut jpeg = Vec::new();
        raster
            .write_with_encoder(JpegEncoder::new_with_quality(
                &mut jpeg,
                self.settings.jpeg_quality,
            ))
            .map_err(|source| SampleError::Encode { index, source })?;

        Ok(Frame::new(index, width, height, jpeg))
    }
}
