//! Diagnostic Request Builder: assembles vehicle metadata, symptoms, OBD
//! codes, and encoded media into a single multimodal request paired with its
//! declared response schema. Purely a transformation; the validation gate
//! runs before anything touches the network.

pub mod schema;

use crate::capabilities::{ModelRequest, Position, RequestPart};
use crate::error::{AppError, Result};
use crate::media::strip_data_uri;
use crate::models::{DiagnosticInput, MediaAttachment, MediaKind, ServiceKind, VehicleInfo};

pub const DIAGNOSTIC_MODEL: &str = "gemini-2.0-flash";
pub const TIRE_MODEL: &str = "gemini-3-pro-preview";
/// Maps grounding is only available on this model.
pub const SERVICE_MODEL: &str = "gemini-2.5-flash";

const DIAGNOSTIC_SYSTEM_INSTRUCTION: &str = "You are an ASE-certified master automotive technician with 25+ years of diagnostic experience. \
Analyze vehicle symptoms, audio of sounds (knocking, grinding, etc.), photos/videos of leaks or damage, and OBD-II codes.\n\
Provide a structured, professional, and honest diagnostic report. \
Prioritize safety above all else. Use the provided JSON schema for your response.";

const TIRE_SYSTEM_INSTRUCTION: &str = "You are a tire specialist and ASE mechanic. \
Analyze the provided tire image to estimate tread depth (in 32nds of an inch), check for wear patterns (inner/outer wear, feathering), and inspect for sidewall damage, cracks, or bulges.\n\
Provide an honest safety assessment. Use the provided JSON schema.";

const TIRE_PROMPT: &str = "Perform a high-precision tire health scan on the attached image. \
Estimate the remaining life and identify any safety hazards.";

const MECHANIC_PROMPT: &str = "Find highly-rated local mechanic shops and auto repair services near me. Provide a brief summary of their reputations.";

const TOWING_PROMPT: &str = "Find immediate 24/7 towing services and roadside assistance near me. Prioritize services with quick response times.";

/// Validation gate for a diagnostic submission: make, model, and a non-empty
/// (trimmed) symptom description are required. Fails locally, before any
/// request is built.
pub fn validate_diagnostic(vehicle: &VehicleInfo, input: &DiagnosticInput) -> Result<()> {
    if vehicle.make.trim().is_empty() || vehicle.model.trim().is_empty() {
        return Err(AppError::Validation(
            "Vehicle make and model are required.".to_string(),
        ));
    }
    if input.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please describe the symptoms before requesting a diagnosis.".to_string(),
        ));
    }
    Ok(())
}

/// Build the multimodal diagnostic request: one text block with vehicle
/// context, symptoms, and OBD codes, followed by one inline data part per
/// attachment (data-URI prefix stripped, original MIME type preserved).
pub fn build_diagnostic(vehicle: &VehicleInfo, input: &DiagnosticInput) -> Result<ModelRequest> {
    validate_diagnostic(vehicle, input)?;

    let prompt = format!(
        "\nVEHICLE CONTEXT:\n\
         Make: {}\n\
         Model: {}\n\
         Year: {}\n\
         Mileage: {}\n\
         Engine Type: {}\n\n\
         USER SYMPTOM DESCRIPTION:\n{}\n\n\
         OBD-II CODES:\n{}\n\n\
         DIAGNOSTIC INPUTS:\n\
         User has provided {} media files (images/audio/video). \n\
         Please analyze them carefully to identify abnormal sounds, visual leaks, smoke patterns, or mechanical wear.\n",
        vehicle.make,
        vehicle.model,
        vehicle.year,
        vehicle.mileage,
        vehicle.engine.as_deref().unwrap_or("Unknown"),
        input.description,
        input.obd_codes.as_deref().unwrap_or("None provided"),
        input.files.len()
    );

    let mut parts = vec![RequestPart::Text(prompt)];
    parts.extend(input.files.iter().map(inline_part));

    Ok(ModelRequest {
        model: DIAGNOSTIC_MODEL.to_string(),
        system_instruction: Some(DIAGNOSTIC_SYSTEM_INSTRUCTION.to_string()),
        parts,
        response_schema: Some(schema::diagnostic_schema()),
        location: None,
        maps_grounding: false,
    })
}

/// Tire-scan variant: exactly one image attachment with a fixed prompt.
pub fn build_tire_scan(image: &MediaAttachment) -> Result<ModelRequest> {
    if image.kind != MediaKind::Image {
        return Err(AppError::Validation(
            "Tire scan requires a photo of the tire tread.".to_string(),
        ));
    }
    Ok(ModelRequest {
        model: TIRE_MODEL.to_string(),
        system_instruction: Some(TIRE_SYSTEM_INSTRUCTION.to_string()),
        parts: vec![RequestPart::Text(TIRE_PROMPT.to_string()), inline_part(image)],
        response_schema: Some(schema::tire_schema()),
        location: None,
        maps_grounding: false,
    })
}

/// Nearby-service variant: a fixed prompt per service type plus the resolved
/// position. No free-text user input is forwarded.
pub fn build_service_search(kind: ServiceKind, position: Position) -> ModelRequest {
    let prompt = match kind {
        ServiceKind::Mechanic => MECHANIC_PROMPT,
        ServiceKind::Towing => TOWING_PROMPT,
    };
    ModelRequest {
        model: SERVICE_MODEL.to_string(),
        system_instruction: None,
        parts: vec![RequestPart::Text(prompt.to_string())],
        response_schema: None,
        location: Some((position.latitude, position.longitude)),
        maps_grounding: true,
    }
}

fn inline_part(attachment: &MediaAttachment) -> RequestPart {
    RequestPart::InlineData {
        data: strip_data_uri(&attachment.data).to_string(),
        mime_type: attachment.mime_type.clone(),
    }
}
