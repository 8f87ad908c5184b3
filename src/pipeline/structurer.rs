//! Structured resume extraction through the oracle.

use crate::error::ScreenError;
use crate::oracle::Oracle;
use serde::{Deserialize, Serialize};

/// The fixed six-field record the oracle is asked to produce. All keys are
/// required; a reply missing any of them fails deserialization and with it
/// the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredResume {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
}

const STRUCTURING_ROLE: &str =
    "You are an expert resume parser. Extract key details and return valid JSON only.";

fn structuring_prompt(text: &str) -> String {
    format!(
        r#"Extract structured information from the following resume text:

{}

Respond strictly in this JSON format:
{{
  "name": "Full Name",
  "email": "Email Address",
  "phone": "Phone Number",
  "skills": ["Skill1", "Skill2", "Skill3"],
  "experience": ["Job1 Description", "Job2 Description"],
  "education": ["Degree1", "Degree2"]
}}

Only provide the JSON. No markdown, no explanation, no extra text."#,
        text
    )
}

/// Ask the oracle for the structured record. One call, one outcome: any
/// transport failure, parse failure, or missing field fails the document.
/// Empty input is a precondition violation and fails it as well.
pub async fn structure_resume(
    oracle: &dyn Oracle,
    text: &str,
) -> Result<StructuredResume, ScreenError> {
    if text.trim().is_empty() {
        return Err(ScreenError::EmptyInput);
    }

    let reply = oracle
        .complete(STRUCTURING_ROLE, &structuring_prompt(text))
        .await
        .map_err(|e| ScreenError::StructuringFailed(e.to_string()))?;

    serde_json::from_str(strip_code_fence(&reply))
        .map_err(|e| ScreenError::StructuringFailed(e.to_string()))
}

// Models occasionally wrap the object in a Markdown fence despite the
// instruction not to; tolerate that one deviation.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct FixedOracle(String);

    #[async_trait]
    impl Oracle for FixedOracle {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingOracle;

    #[async_trait]
    impl Oracle for FailingOracle {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            anyhow::bail!("timed out")
        }
    }

    const GOOD_REPLY: &str = r#"{
        "name": "Jane Doe",
        "email": "jane@x.com",
        "phone": "555-0100",
        "skills": ["Python"],
        "experience": ["5 yrs"],
        "education": ["BSc"]
    }"#;

    #[tokio::test]
    async fn parses_strict_json_reply() {
        let oracle = FixedOracle(GOOD_REPLY.to_string());
        let resume = structure_resume(&oracle, "Jane Doe, jane@x.com").await.unwrap();
        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(resume.skills, vec!["Python".to_string()]);
    }

    #[tokio::test]
    async fn tolerates_markdown_fence() {
        let oracle = FixedOracle(format!("```json\n{}\n```", GOOD_REPLY));
        let resume = structure_resume(&oracle, "Jane Doe").await.unwrap();
        assert_eq!(resume.email, "jane@x.com");
    }

    #[tokio::test]
    async fn missing_field_fails_structuring() {
        let oracle = FixedOracle(r#"{"name": "Jane", "email": "j@x.com"}"#.to_string());
        assert!(matches!(
            structure_resume(&oracle, "Jane").await,
            Err(ScreenError::StructuringFailed(_))
        ));
    }

    #[tokio::test]
    async fn non_json_reply_fails_structuring() {
        let oracle = FixedOracle("Sure! Here is the resume summary...".to_string());
        assert!(matches!(
            structure_resume(&oracle, "Jane").await,
            Err(ScreenError::StructuringFailed(_))
        ));
    }

    #[tokio::test]
    async fn oracle_failure_fails_structuring() {
        assert!(matches!(
            structure_resume(&FailingOracle, "Jane").await,
            Err(ScreenError::StructuringFailed(_))
        ));
    }

    #[tokio::test]
    async fn empty_input_is_a_precondition_violation() {
        let oracle = FixedOracle(GOOD_REPLY.to_string());
        assert!(matches!(
            structure_resume(&oracle, "   \n ").await,
            Err(ScreenError::EmptyInput)
        ));
    }
}
