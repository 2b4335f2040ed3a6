use serde::{Deserialize, Serialize};

/// A compliance control submitted for analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlAnalysisInput {
    pub control_code: String,
    pub title: String,
    pub description: String,
    pub guidance: String,
    pub status: String,
    pub current_practice: String,
    #[serde(default)]
    pub evidence_description: Option<String>,
    #[serde(default)]
    pub user_context: Option<String>,
    /// Reference material for the prompt; always emptied until retrieval exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<String>,
    /// Send the lightweight echo prompt instead of the full analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_mode: Option<bool>,
}

impl ControlAnalysisInput {
    pub fn is_test_mode(&self) -> bool {
        self.test_mode.unwrap_or(false)
    }
}

/// Outcome of an analysis or connectivity check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlAnalysisResult {
    pub ai_suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_accepts_null_and_missing_optionals() {
        let input: ControlAnalysisInput = serde_json::from_value(json!({
            "controlCode": "A.5.1",
            "title": "Policies for information security",
            "description": "d",
            "guidance": "g",
            "status": "partial",
            "currentPractice": "draft policy exists",
            "evidenceDescription": null
        }))
        .unwrap();

        assert_eq!(input.control_code, "A.5.1");
        assert_eq!(input.evidence_description, None);
        assert_eq!(input.user_context, None);
        assert!(!input.is_test_mode());
    }

    #[test]
    fn test_input_requires_control_fields() {
        let result = serde_json::from_value::<ControlAnalysisInput>(json!({
            "controlCode": "A.5.1",
            "title": "Policies"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_omits_unset_fields() {
        let result = ControlAnalysisResult {
            ai_suggestion: "GAP: none".to_string(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"aiSuggestion": "GAP: none"}));

        let result = ControlAnalysisResult {
            ai_suggestion: "hi".to_string(),
            test_mode: Some(true),
            connection_status: Some("ok".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"aiSuggestion": "hi", "testMode": true, "connectionStatus": "ok"})
        );
    }
}
