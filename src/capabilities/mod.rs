//! Narrow trait seams for every external collaborator (model endpoint,
//! devices, geolocation, persistent storage). Core logic only ever talks to
//! these traits, so it can run against fakes without real hardware or
//! network.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde_json::Value;

use crate::error::AppError;

/// One part of a multimodal request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    /// Raw base64 payload (data-URI prefix already stripped) plus MIME type.
    InlineData { data: String, mime_type: String },
}

/// A fully-assembled model call: content parts plus the declared response
/// schema or grounding configuration it is paired with.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub parts: Vec<RequestPart>,
    /// Declared JSON response schema; the response text must conform.
    pub response_schema: Option<Value>,
    /// Latitude/longitude for the maps-grounded variant.
    pub location: Option<(f64, f64)>,
    pub maps_grounding: bool,
}

/// What comes back from the endpoint: primary text plus the grounding
/// side-channel (raw chunks; the contract layer interprets them).
#[derive(Debug, Clone, Default)]
pub struct ModelResponse {
    pub text: String,
    pub grounding_chunks: Vec<Value>,
}

/// Hosted multimodal model endpoint. Transport details live behind this
/// trait; failures arrive already classified into the closed taxonomy.
pub trait ModelEndpoint {
    fn generate(&self, request: &ModelRequest) -> std::result::Result<ModelResponse, AppError>;
}

/// An acquired device stream. `stop` releases the underlying hardware and
/// must be called as soon as the stream's purpose is served.
pub trait MediaStream {
    fn stop(&mut self);
}

/// One captured still frame.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

pub trait VideoFrameSource: MediaStream {
    fn grab_frame(&mut self) -> std::result::Result<CapturedFrame, AppError>;
}

pub trait CameraDevice {
    fn open(&mut self) -> std::result::Result<Box<dyn VideoFrameSource>, AppError>;
}

/// Microphone acquisition, used both for the dictation permission probe and
/// by the recognizer itself.
pub trait Microphone {
    fn open(&mut self) -> std::result::Result<Box<dyn MediaStream>, AppError>;
}

/// Continuous speech-recognition session handle. Events (results, errors,
/// end-of-session) are delivered to the dictation bridge by the caller.
pub trait SpeechRecognizer {
    fn start(&mut self) -> std::result::Result<(), AppError>;
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    Unsupported,
    Denied,
    Timeout,
}

/// One-shot position fix with a bounded wait.
pub trait Geolocator {
    fn locate(&self, timeout: Duration) -> std::result::Result<Position, GeoError>;
}

/// Local persistent key-value storage; the History Store is its only
/// consumer.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// File-backed key-value store rooted in the platform data directory, one
/// file per key.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "popthehood")
            .context("Could not determine a data directory for history storage")?;
        Ok(Self {
            root: dirs.data_dir().to_path_buf(),
        })
    }

    pub fn at(root: PathBuf) -> Self {
        Self { root }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read stored value {}", path.display()))?;
        Ok(Some(data))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, value)
            .with_context(|| format!("Failed to write stored value {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove stored value {}", path.display()))?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
