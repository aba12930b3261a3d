use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Signal string emitted upstream when the selected API key lacks the paid
/// scope required for maps grounding.
const ENTITLEMENT_SIGNAL: &str = "Requested entity was not found";

/// Browser/device permission that a `Permission` error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Camera,
    Microphone,
    Geolocation,
}

impl Device {
    pub fn permission_message(&self) -> &'static str {
        match self {
            Device::Camera => "Camera access denied. Please allow camera access in your browser settings.",
            Device::Microphone => "Microphone access denied. Please allow microphone access in your browser settings.",
            Device::Geolocation => "Location access denied. Please enable GPS to find nearby help.",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.permission_message())
    }
}

/// The closed error taxonomy every request path collapses into. External
/// failures are classified into one of these variants at the catch boundary
/// so downstream code only branches on this set.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local pre-request failure; never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// Model response text failed to parse against its declared schema.
    #[error("{0}")]
    MalformedResponse(String),

    /// Upstream signal for a missing paid-tier/key scope; recoverable by
    /// reselecting credentials.
    #[error("This feature requires a paid API key for Google Maps data.")]
    UpstreamEntitlement(String),

    /// A named browser permission was denied or unavailable.
    #[error("{0}")]
    Permission(Device),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Unknown(String),
}

impl AppError {
    /// Classify an arbitrary upstream failure message into the taxonomy.
    /// Call this immediately at the boundary, before any further logic.
    pub fn classify_upstream(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(ENTITLEMENT_SIGNAL) {
            AppError::UpstreamEntitlement(message)
        } else if message.trim().is_empty() {
            AppError::Unknown("An unexpected error occurred. Please try again.".to_string())
        } else {
            AppError::Transport(message)
        }
    }

    /// True when the error calls for the credential-reselection remediation
    /// flow in addition to the generic banner.
    pub fn needs_key_reselection(&self) -> bool {
        matches!(self, AppError::UpstreamEntitlement(_))
    }
}
