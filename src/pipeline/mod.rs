//! The screening pipeline: extract -> structure -> score -> categorize ->
//! decide, run strictly sequentially over a batch of documents.
//!
//! A failure in extraction or structuring is terminal for that document
//! only; scoring degrades to the sentinel instead of failing; persistence
//! problems are collected as warnings and never unseat a result.

pub mod categorize;
pub mod decide;
pub mod scorer;
pub mod structurer;

use crate::extract::{self, RawDocument};
use crate::oracle::Oracle;
use crate::store::{ResultRow, ResultStore};
use chrono::Utc;
use tracing::{info, warn};

/// Cap on the raw-text preview attached to failure reports.
const PREVIEW_CAP: usize = 1000;

/// Terminal state of one document's trip through the pipeline.
#[derive(Debug, Clone)]
pub enum DocumentOutcome {
    Completed(ResultRow),
    Failed(FailureReport),
}

/// Human-readable diagnostic for a failed document, surfaced inline so the
/// operator can see which document failed and why.
#[derive(Debug, Clone)]
pub struct FailureReport {
    pub resume_name: String,
    pub stage: &'static str,
    pub reason: String,
    /// Truncated raw extracted text, for debugging extraction problems.
    pub raw_text_preview: Option<String>,
}

/// Aggregate outcome of a batch. `rows` holds only completed documents;
/// failures and persistence warnings are reported alongside.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub rows: Vec<ResultRow>,
    pub failures: Vec<FailureReport>,
    pub persistence_warnings: Vec<String>,
}

/// Run one document through every stage. Never returns an error: both
/// terminal states are ordinary values.
pub async fn screen_document(
    oracle: &dyn Oracle,
    document: &RawDocument,
    job_description: &str,
) -> DocumentOutcome {
    info!("Processing {}", document.name);

    let text = match extract::extract_text(document) {
        Ok(text) => text,
        Err(e) => {
            return DocumentOutcome::Failed(FailureReport {
                resume_name: document.name.clone(),
                stage: e.stage(),
                reason: e.to_string(),
                raw_text_preview: None,
            });
        }
    };

    info!("Extracting structured resume data for {}", document.name);
    let resume = match structurer::structure_resume(oracle, &text).await {
        Ok(resume) => resume,
        Err(e) => {
            return DocumentOutcome::Failed(FailureReport {
                resume_name: document.name.clone(),
                stage: e.stage(),
                reason: e.to_string(),
                raw_text_preview: Some(preview(&text)),
            });
        }
    };

    info!("Scoring {} against the job description", document.name);
    let score = scorer::score_match(oracle, &resume, job_description).await;

    let category = categorize::categorize(&score.to_string());
    info!("Categorized {} as {}", document.name, category);

    let decision = decide::decide(&category);
    info!("Decision for {}: {}", document.name, decision);

    DocumentOutcome::Completed(ResultRow {
        resume_name: document.name.clone(),
        job_match_score: score,
        category,
        decision: decision.to_string(),
        timestamp: Utc::now(),
    })
}

/// Screen a batch of documents, each to full completion before the next
/// begins. Completed rows are persisted best-effort: a store failure is
/// reported but the row stays in the in-session summary.
pub async fn run_batch(
    oracle: &dyn Oracle,
    store: &ResultStore,
    documents: &[RawDocument],
    job_description: &str,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for document in documents {
        match screen_document(oracle, document, job_description).await {
            DocumentOutcome::Completed(row) => {
                if let Err(e) = store.insert_row(&row).await {
                    warn!("Failed to persist result for {}: {}", row.resume_name, e);
                    summary.persistence_warnings.push(format!(
                        "Failed to save result for {}: {}",
                        row.resume_name, e
                    ));
                }
                summary.rows.push(row);
            }
            DocumentOutcome::Failed(report) => {
                warn!(
                    "{} failed during {}: {}",
                    report.resume_name, report.stage, report.reason
                );
                summary.failures.push(report);
            }
        }
    }

    summary
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CAP {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CAP).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DocumentKind;
    use anyhow::Result;
    use async_trait::async_trait;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    /// Deterministic oracle: structured JSON for parsing requests, a fixed
    /// score reply for everything else.
    struct StubOracle {
        score_reply: &'static str,
    }

    #[async_trait]
    impl Oracle for StubOracle {
        async fn complete(&self, system: &str, _user: &str) -> Result<String> {
            if system.contains("resume parser") {
                Ok(r#"{
                    "name": "Jane Doe",
                    "email": "jane@x.com",
                    "phone": "",
                    "skills": ["Python"],
                    "experience": ["5 yrs"],
                    "education": []
                }"#
                .to_string())
            } else {
                Ok(self.score_reply.to_string())
            }
        }
    }

    fn docx_document(name: &str, paragraphs: &[&str]) -> RawDocument {
        let mut docx = Docx::new();
        for paragraph in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*paragraph)));
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).expect("pack docx");
        RawDocument::new(name.to_string(), DocumentKind::Docx, cursor.into_inner())
    }

    fn jane_doc() -> RawDocument {
        docx_document("jane.docx", &["Jane Doe, jane@x.com, Python, 5 yrs"])
    }

    #[tokio::test]
    async fn end_to_end_high_fit() {
        let oracle = StubOracle {
            score_reply: "Score: 85",
        };

        let outcome = screen_document(&oracle, &jane_doc(), "Python backend role").await;
        let DocumentOutcome::Completed(row) = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(row.resume_name, "jane.docx");
        assert_eq!(row.job_match_score, 85);
        assert_eq!(row.category, "High Fit (Selected for Interview)");
        assert_eq!(row.decision, "Send Interview Invite");
    }

    #[tokio::test]
    async fn pipeline_is_deterministic_under_a_fixed_oracle() {
        let oracle = StubOracle {
            score_reply: "Score: 85",
        };
        let document = jane_doc();

        let first = screen_document(&oracle, &document, "Python backend role").await;
        let second = screen_document(&oracle, &document, "Python backend role").await;
        let (DocumentOutcome::Completed(a), DocumentOutcome::Completed(b)) = (first, second) else {
            panic!("expected completed outcomes");
        };
        assert_eq!(a.resume_name, b.resume_name);
        assert_eq!(a.job_match_score, b.job_match_score);
        assert_eq!(a.category, b.category);
        assert_eq!(a.decision, b.decision);
    }

    #[tokio::test]
    async fn empty_document_fails_without_stopping_the_batch() {
        let oracle = StubOracle {
            score_reply: "Score: 85",
        };
        let store = ResultStore::connect("sqlite::memory:").await.unwrap();

        let documents = vec![docx_document("blank.docx", &[]), jane_doc()];
        let summary = run_batch(&oracle, &store, &documents, "Python backend role").await;

        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].resume_name, "blank.docx");
        assert_eq!(summary.failures[0].stage, "structuring");

        assert_eq!(summary.rows.len(), 1);
        assert_eq!(summary.rows[0].resume_name, "jane.docx");

        let stored = store.list_rows().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].resume_name, "jane.docx");
    }

    #[tokio::test]
    async fn scoring_failure_still_completes_the_document() {
        let oracle = StubOracle {
            score_reply: "no idea",
        };

        let outcome = screen_document(&oracle, &jane_doc(), "Python backend role").await;
        let DocumentOutcome::Completed(row) = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(row.job_match_score, scorer::SCORE_FAILED);
        assert_eq!(row.category, "Underfit (Not Suitable)");
        assert_eq!(row.decision, "Send Rejection Email");
    }

    #[test]
    fn preview_is_capped_at_1000_chars() {
        let long = "x".repeat(1500);
        let clipped = preview(&long);
        assert_eq!(clipped.chars().count(), 1003);
        assert!(clipped.ends_with("..."));

        let short = "short text";
        assert_eq!(preview(short), short);
    }
}
