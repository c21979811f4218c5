//! Comment classifier
//!
//! Turns one comment into one classification through the LLM oracle: compose
//! the request, call, clean and parse the answer, validate it against the
//! taxonomy, and retry transient failures under the configured policy.
//! A well-formed but taxonomically invalid answer degrades to the empty
//! classification immediately; re-asking with identical input is not
//! expected to improve it.

use crate::application::use_cases::validator;
use crate::domain::classification::{Classification, Comment};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::retry::RetryPolicy;
use crate::domain::taxonomy::TaxonomyIndex;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::{clean_llm_response, extract_json_payload};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ClassifyUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    config: LLMConfig,
    retry_policy: RetryPolicy,
    segmentation: bool,
}

impl ClassifyUseCase {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        config: LLMConfig,
        retry_policy: RetryPolicy,
        segmentation: bool,
    ) -> Self {
        Self {
            llm_client,
            config,
            retry_policy,
            segmentation,
        }
    }

    /// Classify one comment. Always returns a classification; exhausted
    /// retries and taxonomy mismatches degrade to the empty value with a
    /// warning, never an error.
    pub async fn execute(
        &self,
        comment: &Comment,
        system_prompt: &str,
        taxonomy: &TaxonomyIndex,
    ) -> Classification {
        let user_prompt = self.build_user_prompt(comment);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.ask_oracle(system_prompt, &user_prompt).await {
                Ok(candidate) => {
                    if validator::validate_scoped(
                        &candidate,
                        taxonomy,
                        comment.segment,
                        self.segmentation,
                    ) {
                        debug!(attempt, "Classification accepted");
                        return candidate;
                    }
                    // Terminal: syntactically fine, taxonomically nonexistent.
                    warn!(
                        categoria = %candidate.categoria,
                        subcategoria = %candidate.subcategoria,
                        detalle = %candidate.detalle,
                        "Oracle answer not in the permitted taxonomy, degrading to empty"
                    );
                    return Classification::empty();
                }
                Err(err) => {
                    if attempt >= self.retry_policy.max_attempts || !err.is_transient() {
                        warn!(
                            error = %err,
                            attempt,
                            "Classification failed, degrading to empty"
                        );
                        return Classification::empty();
                    }
                    debug!(error = %err, attempt, "Transient oracle failure, retrying");
                    tokio::time::sleep(self.retry_policy.backoff()).await;
                }
            }
        }
    }

    fn build_user_prompt(&self, comment: &Comment) -> String {
        if self.segmentation {
            format!(
                "Classify this {} comment: {}",
                comment.segment.as_tipo_nps(),
                comment.text
            )
        } else {
            format!("Classify this comment: {}", comment.text)
        }
    }

    async fn ask_oracle(&self, system: &str, user: &str) -> Result<Classification> {
        let raw = self.llm_client.generate(&self.config, system, user).await?;
        let cleaned = clean_llm_response(&raw);
        let payload = extract_json_payload(&cleaned);
        serde_json::from_str::<Classification>(&payload).map_err(|err| {
            AppError::ParseError(format!("Malformed classification output: {}", err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::taxonomy::{AudienceSegment, TaxonomyEntry};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted oracle: pops responses front-to-back and counts calls.
    struct ScriptedClient {
        responses: Mutex<Vec<Result<String>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate(&self, _: &LLMConfig, _: &str, _: &str) -> Result<String> {
            *self.calls.lock().unwrap() += 1;
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Err(AppError::LLMError("script exhausted".to_string()))
            } else {
                responses.remove(0)
            }
        }
    }

    fn taxonomy() -> TaxonomyIndex {
        TaxonomyIndex::build(vec![
            TaxonomyEntry::new(
                "Velocidad".into(),
                "Navegación".into(),
                "-".into(),
                "desc".into(),
                AudienceSegment::Promoter,
            ),
            TaxonomyEntry::new(
                "Atención".into(),
                "Soporte".into(),
                "-".into(),
                "desc".into(),
                AudienceSegment::DetractorOrPassive,
            ),
        ])
    }

    fn use_case(client: Arc<ScriptedClient>, max_attempts: u32) -> ClassifyUseCase {
        ClassifyUseCase::new(
            client,
            LLMConfig::default(),
            RetryPolicy::new(max_attempts, 1),
            true,
        )
    }

    fn promoter_comment() -> Comment {
        Comment::new("La velocidad es excelente", AudienceSegment::Promoter)
    }

    #[tokio::test]
    async fn test_valid_answer_returned_as_is() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(
            r#"{"categoria": "Velocidad", "subcategoria": "Navegación", "detalle": "N/A"}"#
                .to_string(),
        )]));
        let result = use_case(client.clone(), 3)
            .execute(&promoter_comment(), "system", &taxonomy())
            .await;
        assert_eq!(result, Classification::new("Velocidad", "Navegación", "N/A"));
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fenced_answer_is_parsed() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(
            "```json\n{\"categoria\": \"Velocidad\", \"subcategoria\": \"Navegación\", \"detalle\": \"N/A\"}\n```"
                .to_string(),
        )]));
        let result = use_case(client, 3)
            .execute(&promoter_comment(), "system", &taxonomy())
            .await;
        assert!(!result.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_retry_calls_oracle_exactly_max_times() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(AppError::LLMError("boom".to_string())),
            Err(AppError::LLMError("boom".to_string())),
            Err(AppError::LLMError("boom".to_string())),
            Err(AppError::LLMError("boom".to_string())),
        ]));
        let result = use_case(client.clone(), 3)
            .execute(&promoter_comment(), "system", &taxonomy())
            .await;
        assert!(result.is_empty());
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_json_is_retried() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("not json at all".to_string()),
            Ok(
                r#"{"categoria": "Velocidad", "subcategoria": "Navegación", "detalle": "N/A"}"#
                    .to_string(),
            ),
        ]));
        let result = use_case(client.clone(), 3)
            .execute(&promoter_comment(), "system", &taxonomy())
            .await;
        assert!(!result.is_empty());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extra_key_is_a_parse_failure() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(
                r#"{"categoria": "Velocidad", "subcategoria": "Navegación", "detalle": "N/A", "confianza": 0.9}"#
                    .to_string(),
            ),
            Ok(
                r#"{"categoria": "Velocidad", "subcategoria": "Navegación", "detalle": "N/A"}"#
                    .to_string(),
            ),
        ]));
        let result = use_case(client.clone(), 3)
            .execute(&promoter_comment(), "system", &taxonomy())
            .await;
        assert!(!result.is_empty());
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_taxonomy_answer_not_retried() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(
            r#"{"categoria": "Inventada", "subcategoria": "Nada", "detalle": "N/A"}"#.to_string(),
        )]));
        let result = use_case(client.clone(), 3)
            .execute(&promoter_comment(), "system", &taxonomy())
            .await;
        assert!(result.is_empty());
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_segment_hallucination_rejected() {
        // Oracle answers with a Detractor-only category for a Promoter comment.
        let client = Arc::new(ScriptedClient::new(vec![Ok(
            r#"{"categoria": "Atención", "subcategoria": "Soporte", "detalle": "N/A"}"#.to_string(),
        )]));
        let result = use_case(client, 3)
            .execute(&promoter_comment(), "system", &taxonomy())
            .await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_user_prompt_carries_segment_when_enabled() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let segmented = use_case(client.clone(), 1);
        assert_eq!(
            segmented.build_user_prompt(&promoter_comment()),
            "Classify this Promotor comment: La velocidad es excelente"
        );

        let flat = ClassifyUseCase::new(client, LLMConfig::default(), RetryPolicy::default(), false);
        assert_eq!(
            flat.build_user_prompt(&promoter_comment()),
            "Classify this comment: La velocidad es excelente"
        );
    }
}
