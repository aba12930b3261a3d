//! Declared response schemas paired with each request. The model's output
//! text must parse as JSON conforming to these shapes.

use serde_json::{json, Value};

pub fn diagnostic_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "severity": { "type": "STRING", "enum": ["GREEN", "YELLOW", "RED"] },
            "analysisSummary": { "type": "STRING" },
            "mostLikelyCauses": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "issue": { "type": "STRING" },
                        "probability": { "type": "STRING" },
                        "reasoning": { "type": "STRING" }
                    },
                    "required": ["issue", "probability", "reasoning"]
                }
            },
            "mechanicalExplanation": { "type": "STRING" },
            "recommendedActions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "costEstimate": {
                "type": "OBJECT",
                "properties": {
                    "parts": { "type": "STRING" },
                    "labor": { "type": "STRING" },
                    "total": { "type": "STRING" }
                },
                "required": ["parts", "labor", "total"]
            },
            "diyVsPro": {
                "type": "OBJECT",
                "properties": {
                    "canDiy": { "type": "BOOLEAN" },
                    "explanation": { "type": "STRING" },
                    "safetyWarnings": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["canDiy", "explanation", "safetyWarnings"]
            },
            "urgency": {
                "type": "OBJECT",
                "properties": {
                    "timeline": { "type": "STRING" },
                    "risksOfDelay": { "type": "STRING" },
                    "workarounds": { "type": "STRING" }
                },
                "required": ["timeline", "risksOfDelay"]
            },
            "followUpQuestions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "additionalContext": {
                "type": "OBJECT",
                "properties": {
                    "commonModelIssues": { "type": "STRING" },
                    "recallPotential": { "type": "STRING" },
                    "prevention": { "type": "STRING" }
                },
                "required": ["commonModelIssues", "recallPotential", "prevention"]
            }
        },
        "required": [
            "severity", "analysisSummary", "mostLikelyCauses",
            "mechanicalExplanation", "recommendedActions",
            "costEstimate", "diyVsPro", "urgency",
            "followUpQuestions", "additionalContext"
        ]
    })
}

pub fn tire_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "healthScore": { "type": "NUMBER" },
            "estimatedTreadDepth": { "type": "STRING" },
            "condition": {
                "type": "STRING",
                "enum": ["Excellent", "Good", "Fair", "Replace Soon", "Dangerous"]
            },
            "findings": { "type": "ARRAY", "items": { "type": "STRING" } },
            "recommendation": { "type": "STRING" },
            "safetyWarning": { "type": "STRING" },
            "visualAnomalies": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": [
            "healthScore", "estimatedTreadDepth", "condition",
            "findings", "recommendation", "visualAnomalies"
        ]
    })
}
