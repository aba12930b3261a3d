//! Response Schema Contracts: parse and validate the model's response text
//! against the declared shape, then synthesize the fields the model does not
//! provide (`id`, `timestamp`, echoed `vehicle`). A failed parse yields
//! `MalformedResponse` carrying no partial data.

pub mod grounding;

pub use grounding::{build_service_report, extract_places};

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::report::now_millis;
use crate::models::{
    AdditionalContext, CauseItem, CostEstimate, DiagnosticReport, DiyAssessment, Severity,
    TireAnalysisReport, TireCondition, Urgency, VehicleInfo,
};

const DIAGNOSTIC_PARSE_FAILURE: &str = "Diagnosis failed. Please try again with clearer inputs.";
const TIRE_PARSE_FAILURE: &str =
    "Tire scan failed. Ensure the photo is clear and shows the tread detail.";

/// Wire shape of the diagnostic response body: exactly the fields the model
/// must provide. Missing required fields fail the deserialization, so a
/// partially-populated report can never be produced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticBody {
    severity: Severity,
    analysis_summary: String,
    most_likely_causes: Vec<CauseItem>,
    mechanical_explanation: String,
    recommended_actions: Vec<String>,
    cost_estimate: CostEstimate,
    diy_vs_pro: DiyAssessment,
    urgency: Urgency,
    follow_up_questions: Vec<String>,
    additional_context: AdditionalContext,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TireBody {
    health_score: f64,
    estimated_tread_depth: String,
    condition: TireCondition,
    findings: Vec<String>,
    recommendation: String,
    #[serde(default)]
    safety_warning: Option<String>,
    visual_anomalies: Vec<String>,
}

/// Parse a diagnostic response, echoing the vehicle context the request was
/// built from and stamping a fresh id and arrival timestamp.
pub fn parse_diagnostic(text: &str, vehicle: &VehicleInfo) -> Result<DiagnosticReport> {
    let body: DiagnosticBody = serde_json::from_str(text)
        .map_err(|_| AppError::MalformedResponse(DIAGNOSTIC_PARSE_FAILURE.to_string()))?;
    Ok(DiagnosticReport {
        id: Uuid::new_v4(),
        timestamp: now_millis(),
        vehicle: vehicle.clone(),
        severity: body.severity,
        analysis_summary: body.analysis_summary,
        most_likely_causes: body.most_likely_causes,
        mechanical_explanation: body.mechanical_explanation,
        recommended_actions: body.recommended_actions,
        cost_estimate: body.cost_estimate,
        diy_vs_pro: body.diy_vs_pro,
        urgency: body.urgency,
        follow_up_questions: body.follow_up_questions,
        additional_context: body.additional_context,
    })
}

pub fn parse_tire_analysis(text: &str) -> Result<TireAnalysisReport> {
    let body: TireBody = serde_json::from_str(text)
        .map_err(|_| AppError::MalformedResponse(TIRE_PARSE_FAILURE.to_string()))?;
    Ok(TireAnalysisReport {
        id: Uuid::new_v4(),
        timestamp: now_millis(),
        health_score: body.health_score,
        estimated_tread_depth: body.estimated_tread_depth,
        condition: body.condition,
        findings: body.findings,
        recommendation: body.recommendation,
        safety_warning: body.safety_warning,
        visual_anomalies: body.visual_anomalies,
    })
}
