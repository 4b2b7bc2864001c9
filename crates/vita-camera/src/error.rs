#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera capture not supported")]
    Unsupported,
}

impl CameraError {
    /// Fixed text shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => {
                "Camera access denied. Please allow camera permissions in your browser settings to use the AR feature."
            }
            CameraError::Unsupported => "Your browser does not support camera access.",
        }
    }
}

impl From<std::io::Error> for CameraError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::Unsupported => {
                CameraError::Unsupported
            }
            _ => CameraError::PermissionDenied,
        }
    }
}
