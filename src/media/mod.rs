//! Media Encoder: turns raw files and camera captures into transportable
//! data-URI payloads tagged with a coarse media kind.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::capabilities::CameraDevice;
use crate::error::{AppError, Result};
use crate::models::{MediaAttachment, MediaKind};

/// A raw file as selected by the user, before encoding.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Lossless transport encoding preserving the original MIME type.
pub fn encode_file(file: &RawFile) -> MediaAttachment {
    let encoded = BASE64.encode(&file.bytes);
    MediaAttachment {
        data: format!("data:{};base64,{}", file.mime_type, encoded),
        mime_type: file.mime_type.clone(),
        name: file.name.clone(),
        kind: MediaKind::from_mime(&file.mime_type),
    }
}

/// Encode a batch of files. The returned list is in input order regardless
/// of per-file completion order; callers append it to the attachment list in
/// a single update so re-display is deterministic.
pub fn encode_batch(files: &[RawFile]) -> Vec<MediaAttachment> {
    files.iter().map(encode_file).collect()
}

/// Remove an attachment by index without disturbing the order of the rest.
/// Out-of-range indexes are ignored.
pub fn remove_attachment(attachments: &mut Vec<MediaAttachment>, index: usize) {
    if index < attachments.len() {
        attachments.remove(index);
    }
}

/// Strip the `data:<mime>;base64,` prefix, yielding the raw payload the
/// model endpoint expects. Payloads without a prefix pass through unchanged.
pub fn strip_data_uri(data: &str) -> &str {
    match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    }
}

/// Capture exactly one photo from the camera. The stream is stopped before
/// this returns, on success and failure alike; the hardware device is never
/// held open past the capture.
pub fn capture_photo(camera: &mut dyn CameraDevice, name: &str) -> Result<MediaAttachment> {
    let mut stream = camera.open()?;
    let frame = stream.grab_frame();
    stream.stop();
    let frame = frame?;
    if !frame.mime_type.starts_with("image/") {
        return Err(AppError::Unknown(format!(
            "Camera produced a non-image frame ({})",
            frame.mime_type
        )));
    }
    Ok(encode_file(&RawFile {
        name: name.to_string(),
        mime_type: frame.mime_type,
        bytes: frame.bytes,
    }))
}
