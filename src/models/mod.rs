pub mod report;

pub use report::{
    AdditionalContext, CauseItem, CostEstimate, DiagnosticReport, DiyAssessment, HistoryEntry,
    ServiceKind, ServiceResult, ServiceSearchReport, Severity, TireAnalysisReport, TireCondition,
    TreadBand, Urgency,
};

use serde::{Deserialize, Serialize};

/// Vehicle context attached to a diagnostic request and persisted with its
/// report. All fields are free text; no cross-field validation is enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub year: String,
    pub mileage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
}

/// Coarse media classification derived from the MIME type prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Unknown prefixes default to image.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("audio/") {
            MediaKind::Audio
        } else if mime_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// One encoded media payload attached to a diagnostic request. Owned by the
/// `DiagnosticInput` that references it; its lifetime ends when the request
/// is sent or the user removes it before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Base64 data URI (`data:<mime>;base64,<payload>`).
    pub data: String,
    pub mime_type: String,
    pub name: String,
    pub kind: MediaKind,
}

/// Ephemeral per-request user input; never persisted independently.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticInput {
    pub description: String,
    pub obd_codes: Option<String>,
    pub files: Vec<MediaAttachment>,
}
