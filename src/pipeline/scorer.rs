//! Resume/job match scoring through the oracle.
//!
//! This stage never fails the document: every transport or parse problem
//! degrades to the sentinel score, which the categorizer treats as
//! ordinary low input.

use crate::oracle::Oracle;
use crate::pipeline::structurer::StructuredResume;
use regex::Regex;
use tracing::warn;

pub const SCORE_MIN: u32 = 10;
pub const SCORE_MAX: u32 = 100;

/// Reserved for "scoring could not be completed". A successful parse can
/// never produce it since the valid range excludes 0.
pub const SCORE_FAILED: u32 = 0;

const SCORING_ROLE: &str = "You are a resume screening assistant. Based on the job description \
     and resume provided, output ONLY a numeric score between 10 and 100 indicating how well \
     the resume matches the job. Do not add any explanation or text. Only return the score.";

/// Render the structured resume back into a `key: value` text block.
/// Empty fields are omitted, sequences joined with commas.
pub fn flatten_resume(resume: &StructuredResume) -> String {
    let mut lines: Vec<String> = Vec::new();
    push_field(&mut lines, "name", &resume.name);
    push_field(&mut lines, "email", &resume.email);
    push_field(&mut lines, "phone", &resume.phone);
    push_list(&mut lines, "skills", &resume.skills);
    push_list(&mut lines, "experience", &resume.experience);
    push_list(&mut lines, "education", &resume.education);
    lines.join("\n")
}

fn push_field(lines: &mut Vec<String>, key: &str, value: &str) {
    if !value.trim().is_empty() {
        lines.push(format!("{}: {}", key, value.trim()));
    }
}

fn push_list(lines: &mut Vec<String>, key: &str, values: &[String]) {
    if !values.is_empty() {
        lines.push(format!("{}: {}", key, values.join(", ")));
    }
}

fn scoring_prompt(job_description: &str, resume_block: &str) -> String {
    format!(
        "Job Description:\n{}\n\nResume:\n{}\n\nGive a score between 10 and 100. Only the number. No explanation.",
        job_description.trim(),
        resume_block
    )
}

/// Pull the first standalone 2-3 digit run out of the oracle's reply and
/// clamp it into [10, 100]. Single digits and digit runs embedded in
/// longer numbers do not count.
pub fn parse_score(reply: &str) -> Option<u32> {
    let token = Regex::new(r"\b(\d{2,3})\b")
        .expect("score token pattern is valid")
        .captures(reply)?
        .get(1)?
        .as_str();
    let value: u32 = token.parse().ok()?;
    Some(value.clamp(SCORE_MIN, SCORE_MAX))
}

/// Score the resume against the job description. Returns the sentinel on
/// any failure instead of raising.
pub async fn score_match(
    oracle: &dyn Oracle,
    resume: &StructuredResume,
    job_description: &str,
) -> u32 {
    let resume_block = flatten_resume(resume);

    let reply = match oracle
        .complete(SCORING_ROLE, &scoring_prompt(job_description, &resume_block))
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!("Oracle scoring call failed, using sentinel score: {}", e);
            return SCORE_FAILED;
        }
    };

    match parse_score(&reply) {
        Some(score) => score,
        None => {
            warn!("No score token in oracle reply, using sentinel score");
            SCORE_FAILED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    struct FailingOracle;

    #[async_trait]
    impl Oracle for FailingOracle {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    struct FixedOracle(&'static str);

    #[async_trait]
    impl Oracle for FixedOracle {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn resume() -> StructuredResume {
        StructuredResume {
            name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            phone: String::new(),
            skills: vec!["Python".into(), "SQL".into()],
            experience: vec!["5 yrs backend".into()],
            education: vec![],
        }
    }

    #[test]
    fn parses_plain_and_labelled_scores() {
        assert_eq!(parse_score("85"), Some(85));
        assert_eq!(parse_score("Score: 85"), Some(85));
        assert_eq!(parse_score("I'd rate it 92 out of 100"), Some(92));
    }

    #[test]
    fn clamps_into_valid_range() {
        assert_eq!(parse_score("150"), Some(100));
        assert_eq!(parse_score("999"), Some(100));
    }

    #[test]
    fn rejects_single_digits_and_embedded_runs() {
        assert_eq!(parse_score("7"), None);
        assert_eq!(parse_score("1234"), None);
        assert_eq!(parse_score("no number here"), None);
    }

    #[test]
    fn flatten_omits_empty_fields() {
        let block = flatten_resume(&resume());
        assert_eq!(
            block,
            "name: Jane Doe\nemail: jane@x.com\nskills: Python, SQL\nexperience: 5 yrs backend"
        );
        assert!(!block.contains("phone"));
        assert!(!block.contains("education"));
    }

    #[tokio::test]
    async fn oracle_failure_degrades_to_sentinel() {
        let score = score_match(&FailingOracle, &resume(), "Backend role").await;
        assert_eq!(score, SCORE_FAILED);
    }

    #[tokio::test]
    async fn unparseable_reply_degrades_to_sentinel() {
        let score = score_match(&FixedOracle("a solid nine"), &resume(), "Backend role").await;
        assert_eq!(score, SCORE_FAILED);
    }

    #[tokio::test]
    async fn successful_reply_is_clamped() {
        let score = score_match(&FixedOracle("Score: 150"), &resume(), "Backend role").await;
        assert_eq!(score, 100);
    }
}
