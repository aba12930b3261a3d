pub mod capabilities;
pub mod contracts;
pub mod dictation;
pub mod endpoint;
pub mod error;
pub mod history;
pub mod media;
pub mod models;
pub mod request;
pub mod session;

// Re-export commonly used types for convenience.
pub use error::{AppError, Result};
pub use history::HistoryStore;
pub use models::{
    DiagnosticInput, DiagnosticReport, HistoryEntry, MediaAttachment, ServiceKind,
    ServiceSearchReport, TireAnalysisReport, VehicleInfo,
};
pub use session::{ActiveView, Session, SessionState};
