pub mod impl_fake;
#[cfg(feature = "webcam")]
pub mod impl_webcam;
pub mod interface;
