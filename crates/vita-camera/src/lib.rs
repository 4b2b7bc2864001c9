mod device;
mod error;
mod session;

pub use device::{
    CaptureDevice, DeviceNodeCamera, FacingMode, MediaStream, MediaTrack, StreamConstraints,
};
pub use error::CameraError;
pub use session::{CameraSession, NullSurface, VideoSurface};
