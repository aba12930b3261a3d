use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::VehicleInfo;

/// Overall severity band of a diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseItem {
    pub issue: String,
    pub probability: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    pub parts: String,
    pub labor: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiyAssessment {
    pub can_diy: bool,
    pub explanation: String,
    pub safety_warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Urgency {
    pub timeline: String,
    pub risks_of_delay: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workarounds: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalContext {
    pub common_model_issues: String,
    pub recall_potential: String,
    pub prevention: String,
}

/// Fully-typed diagnostic report. `id`, `timestamp`, and `vehicle` are
/// synthesized by the contract layer at response arrival; every other field
/// must come from the model or the parse fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub id: Uuid,
    /// Epoch milliseconds at response arrival.
    pub timestamp: i64,
    pub vehicle: VehicleInfo,
    pub severity: Severity,
    pub analysis_summary: String,
    pub most_likely_causes: Vec<CauseItem>,
    pub mechanical_explanation: String,
    pub recommended_actions: Vec<String>,
    pub cost_estimate: CostEstimate,
    pub diy_vs_pro: DiyAssessment,
    pub urgency: Urgency,
    pub follow_up_questions: Vec<String>,
    pub additional_context: AdditionalContext,
}

/// Condition label the model assigns to a scanned tire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TireCondition {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Replace Soon")]
    ReplaceSoon,
    Dangerous,
}

/// Color/severity band derived from the numeric health score alone,
/// independent of the model's condition label. Drives the proportional
/// gauge in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreadBand {
    Healthy,
    Caution,
    Replace,
}

impl TreadBand {
    pub fn from_score(health_score: f64) -> Self {
        if health_score >= 80.0 {
            TreadBand::Healthy
        } else if health_score >= 50.0 {
            TreadBand::Caution
        } else {
            TreadBand::Replace
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TireAnalysisReport {
    pub id: Uuid,
    pub timestamp: i64,
    /// 0-100 inclusive.
    pub health_score: f64,
    pub estimated_tread_depth: String,
    pub condition: TireCondition,
    pub findings: Vec<String>,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_warning: Option<String>,
    pub visual_anomalies: Vec<String>,
}

impl TireAnalysisReport {
    pub fn band(&self) -> TreadBand {
        TreadBand::from_score(self.health_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Mechanic,
    Towing,
}

/// A single place extracted from maps-grounding metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResult {
    pub title: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Location-bound search result; ephemeral, never persisted to history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSearchReport {
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub text: String,
    pub places: Vec<ServiceResult>,
    pub timestamp: i64,
}

/// Persisted history entry. The `kind` tag is attached at creation time so
/// rehydration never has to guess the variant from field presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    Diagnostic(DiagnosticReport),
    Tire(TireAnalysisReport),
}

impl HistoryEntry {
    pub fn id(&self) -> Uuid {
        match self {
            HistoryEntry::Diagnostic(r) => r.id,
            HistoryEntry::Tire(r) => r.id,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            HistoryEntry::Diagnostic(r) => r.timestamp,
            HistoryEntry::Tire(r) => r.timestamp,
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
