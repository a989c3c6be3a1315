//! Batch evaluation of validation records through the response workflow.

use crate::workflow::{InferenceRequest, ResponseWorkflow};
use fintune_training::{first_user_message, RawRecord, ACCOUNT_INFO_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Start marker of the account-context span inside a legacy user message.
pub const ACCOUNT_START_MARKER: &str = "用户账户情况：";
/// End marker (start of the question section) inside a legacy user message.
pub const ACCOUNT_END_MARKER: &str = "\n\n用户的查询问题：";

/// Placeholder output recorded when the model call fails for one record.
pub const ERROR_OUTPUT: &str = "Error generating response";

/// How one record fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// No user message could be extracted; the record was not run.
    Skipped,
    /// The workflow produced a response.
    Evaluated,
    /// The model call failed; the failure is captured in `error`.
    Failed,
}

/// Per-example evaluation outcome. One of these is emitted for every input
/// record, in input order, so the result sequence length always equals the
/// input length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub input: InferenceRequest,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub outcome: EvaluationOutcome,
}

/// Runs validation records through a [`ResponseWorkflow`] one at a time.
pub struct EvaluationDriver {
    workflow: ResponseWorkflow,
    /// When set, fall back to scraping account context out of the user
    /// message text via the legacy markers if the record carries no
    /// structured `account_info` field. The scrape is best-effort: any
    /// upstream phrasing drift silently degrades it to an empty string.
    legacy_marker_fallback: bool,
}

impl EvaluationDriver {
    /// Creates a driver with the legacy marker fallback enabled, which is
    /// what existing datasets need.
    #[must_use]
    pub fn new(workflow: ResponseWorkflow) -> Self {
        Self { workflow, legacy_marker_fallback: true }
    }

    /// Disables the legacy marker scrape; only the structured
    /// `account_info` record field is honored.
    #[must_use]
    pub fn without_marker_fallback(mut self) -> Self {
        self.legacy_marker_fallback = false;
        self
    }

    /// Evaluates every record, strictly sequentially and in input order.
    ///
    /// One `EvaluationResult` per input record: a record whose model call
    /// fails contributes a `Failed` entry and never aborts the rest of the
    /// batch; a record with no user message contributes a `Skipped` entry.
    pub async fn evaluate(&self, records: &[RawRecord]) -> Vec<EvaluationResult> {
        let total = records.len();
        info!(examples = total, "Starting evaluation batch");

        let mut results = Vec::with_capacity(total);

        for (idx, record) in records.iter().enumerate() {
            debug!("Evaluating example {}/{}", idx + 1, total);

            let Some(request) = self.extract_request(record) else {
                warn!(index = idx, "Record has no user message; emitting skipped result");
                results.push(EvaluationResult {
                    input: InferenceRequest {
                        user_question: String::new(),
                        account_info: String::new(),
                    },
                    output: String::new(),
                    error: None,
                    outcome: EvaluationOutcome::Skipped,
                });
                continue;
            };

            match self.workflow.invoke(request.clone()).await {
                Ok(output) => results.push(EvaluationResult {
                    input: request,
                    output,
                    error: None,
                    outcome: EvaluationOutcome::Evaluated,
                }),
                Err(e) => {
                    warn!(index = idx, error = %e, "Evaluation example failed");
                    results.push(EvaluationResult {
                        input: request,
                        output: ERROR_OUTPUT.to_string(),
                        error: Some(e.to_string()),
                        outcome: EvaluationOutcome::Failed,
                    });
                }
            }
        }

        info!(examples = results.len(), "Evaluation batch completed");
        results
    }

    /// Builds the inference request for one record: the full content of the
    /// first user message as the question, and account context from the
    /// structured field or (optionally) the legacy marker scrape.
    fn extract_request(&self, record: &RawRecord) -> Option<InferenceRequest> {
        let user_question = first_user_message(record)?.to_string();

        let structured = record
            .get(ACCOUNT_INFO_KEY)
            .and_then(Value::as_str)
            .map(ToString::to_string);

        let account_info = match structured {
            Some(info) => info,
            None if self.legacy_marker_fallback => scrape_account_info(&user_question),
            None => String::new(),
        };

        Some(InferenceRequest { user_question, account_info })
    }
}

/// Scrapes the account-context span out of a legacy user message.
///
/// The span runs from the start marker (inclusive) up to the end marker
/// (exclusive). Absent or out-of-order markers yield the empty string; this
/// is text scraping, not parsing, and it degrades silently by design of the
/// legacy format.
fn scrape_account_info(content: &str) -> String {
    match (content.find(ACCOUNT_START_MARKER), content.find(ACCOUNT_END_MARKER)) {
        (Some(start), Some(end)) if start <= end => content[start..end].to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{ResponseWorkflow, WorkflowOptions};
    use fintune_models::MockModel;
    use serde_json::json;
    use std::sync::Arc;

    fn driver(model: MockModel) -> EvaluationDriver {
        EvaluationDriver::new(ResponseWorkflow::new(Arc::new(model), WorkflowOptions::default()))
    }

    fn legacy_record(user_content: &str) -> Value {
        json!({
            "messages": [
                {"role": "user", "content": user_content},
                {"role": "assistant", "content": "好的"}
            ]
        })
    }

    #[tokio::test]
    async fn test_evaluate_empty_batch() {
        let d = driver(MockModel::new("mock".to_string()));
        assert!(d.evaluate(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_marker_extraction_is_exact() {
        let content = "用户账户情况：余额1万\n\n用户的查询问题：如何理财？";
        let d = driver(MockModel::new("mock".to_string()));
        let request = d.extract_request(&legacy_record(content)).unwrap();

        assert_eq!(request.account_info, "用户账户情况：余额1万");
        assert_eq!(request.user_question, content);
    }

    #[tokio::test]
    async fn test_missing_markers_yield_empty_account_info() {
        let d = driver(MockModel::new("mock".to_string()));
        let request = d.extract_request(&legacy_record("自由提问，没有结构")).unwrap();
        assert_eq!(request.account_info, "");
    }

    #[tokio::test]
    async fn test_structured_account_info_wins_over_markers() {
        let mut record = legacy_record("用户账户情况：余额1万\n\n用户的查询问题：如何理财？");
        record["account_info"] = json!("余额2万");

        let d = driver(MockModel::new("mock".to_string()));
        let request = d.extract_request(&record).unwrap();
        assert_eq!(request.account_info, "余额2万");
    }

    #[tokio::test]
    async fn test_marker_fallback_can_be_disabled() {
        let content = "用户账户情况：余额1万\n\n用户的查询问题：如何理财？";
        let d = driver(MockModel::new("mock".to_string())).without_marker_fallback();
        let request = d.extract_request(&legacy_record(content)).unwrap();
        assert_eq!(request.account_info, "");
    }

    #[tokio::test]
    async fn test_one_failure_is_isolated() {
        let records = vec![
            legacy_record("问题一"),
            legacy_record("问题二 boom"),
            legacy_record("问题三"),
        ];
        let d = driver(MockModel::new("mock".to_string()).failing_on("boom"));
        let results = d.evaluate(&records).await;

        assert_eq!(results.len(), 3);

        let failed: Vec<&EvaluationResult> =
            results.iter().filter(|r| r.outcome == EvaluationOutcome::Failed).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].output, ERROR_OUTPUT);
        assert!(failed[0].error.as_deref().unwrap_or("").contains("boom"));

        for result in results.iter().filter(|r| r.outcome == EvaluationOutcome::Evaluated) {
            assert!(result.error.is_none());
            assert_ne!(result.output, ERROR_OUTPUT);
        }
    }

    #[tokio::test]
    async fn test_record_without_user_message_is_tagged_skipped() {
        let records = vec![
            json!({
                "messages": [
                    {"role": "system", "content": "s"},
                    {"role": "assistant", "content": "a"}
                ]
            }),
            legacy_record("正常问题"),
        ];
        let d = driver(MockModel::new("mock".to_string()));
        let results = d.evaluate(&records).await;

        // One result per input record, in input order.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].outcome, EvaluationOutcome::Skipped);
        assert_eq!(results[1].outcome, EvaluationOutcome::Evaluated);
    }
}
