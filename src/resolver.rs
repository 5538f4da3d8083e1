//! Model resolution: turn an optional model hint into one usable identifier.
//!
//! Resolution order:
//!
//! ```text
//! explicit --model-id ──┐
//!                       ├─> must appear in the filtered listing, else ModelNotFound
//! LLAMA_STACK_MODEL ────┘
//!
//! neither set ──> Selection::FirstChatCapable    first listed model passing the chat probe
//!             └─> Selection::FirstLanguageModel  first listed non-embedding model
//! ```
//!
//! A named model that is missing is an error; it never silently falls back to
//! another model.

use crate::client::{ProbeOutcome, StackClient};
use crate::config::DemoConfig;
use crate::models::{ModelRecord, language_model_ids, non_embedding_model_ids};
use crate::{Error, Result};
use async_trait::async_trait;

/// The server operations model resolution depends on.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// List every registered model.
    async fn list_models(&self) -> Result<Vec<ModelRecord>>;

    /// Probe whether `model` answers a chat request.
    async fn probe_chat(&self, model: &str) -> ProbeOutcome;
}

#[async_trait]
impl ModelService for StackClient {
    async fn list_models(&self) -> Result<Vec<ModelRecord>> {
        StackClient::list_models(self).await
    }

    async fn probe_chat(&self, model: &str) -> ProbeOutcome {
        StackClient::probe_chat(self, model).await
    }
}

/// How to pick a model when none is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// First language model that passes the chat probe
    FirstChatCapable,
    /// First language model that is not an embedding model, without probing
    FirstLanguageModel,
}

/// Check that `model` is one of the listed language models.
pub async fn check_model_is_available<S>(service: &S, model: &str) -> Result<()>
where
    S: ModelService + ?Sized,
{
    let available = language_model_ids(&service.list_models().await?);
    if available.iter().any(|id| id == model) {
        Ok(())
    } else {
        Err(Error::model_not_found(model, available))
    }
}

/// The first listed language model that is not an embedding model.
pub async fn any_available_model<S>(service: &S) -> Result<String>
where
    S: ModelService + ?Sized,
{
    non_embedding_model_ids(&service.list_models().await?)
        .into_iter()
        .next()
        .ok_or(Error::NoModelsAvailable)
}

/// The first listed language model that answers the chat probe.
///
/// Candidates are probed one at a time, in listing order, and probing stops
/// at the first success.
pub async fn any_chat_capable_model<S>(service: &S) -> Result<String>
where
    S: ModelService + ?Sized,
{
    let candidates = language_model_ids(&service.list_models().await?);
    if candidates.is_empty() {
        return Err(Error::NoModelsAvailable);
    }

    for model in candidates {
        if service.probe_chat(&model).await.is_capable() {
            return Ok(model);
        }
    }

    Err(Error::NoChatCapableModel)
}

/// Fail with [`Error::NotChatCapable`] unless `model` answers the chat probe.
pub async fn ensure_chat_capable<S>(service: &S, model: &str) -> Result<()>
where
    S: ModelService + ?Sized,
{
    match service.probe_chat(model).await {
        ProbeOutcome::Capable => Ok(()),
        outcome => {
            log::debug!("{} failed the chat probe: {:?}", model, outcome);
            Err(Error::NotChatCapable(model.to_string()))
        }
    }
}

/// Resolve the model a demo should use.
///
/// `explicit` (usually `--model-id`) wins over the configured fallback; an
/// empty string counts as unset. A named model is validated against the
/// listing, otherwise `selection` picks one.
pub async fn resolve_model<S>(
    service: &S,
    explicit: Option<&str>,
    config: &DemoConfig,
    selection: Selection,
) -> Result<String>
where
    S: ModelService + ?Sized,
{
    let named = explicit
        .filter(|m| !m.is_empty())
        .or(config.fallback_model.as_deref());

    match named {
        Some(model) => {
            check_model_is_available(service, model).await?;
            Ok(model.to_string())
        }
        None => match selection {
            Selection::FirstChatCapable => any_chat_capable_model(service).await,
            Selection::FirstLanguageModel => any_available_model(service).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory server: a fixed listing and a set of models that pass the probe.
    struct FakeService {
        records: Vec<ModelRecord>,
        chat_capable: HashSet<String>,
        probed: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn new(ids: &[&str], chat_capable: &[&str]) -> Self {
            Self {
                records: ids.iter().map(|id| ModelRecord::with_id(*id)).collect(),
                chat_capable: chat_capable.iter().map(|s| s.to_string()).collect(),
                probed: Mutex::new(Vec::new()),
            }
        }

        fn probed(&self) -> Vec<String> {
            self.probed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelService for FakeService {
        async fn list_models(&self) -> Result<Vec<ModelRecord>> {
            Ok(self.records.clone())
        }

        async fn probe_chat(&self, model: &str) -> ProbeOutcome {
            self.probed.lock().unwrap().push(model.to_string());
            if self.chat_capable.contains(model) {
                ProbeOutcome::Capable
            } else {
                ProbeOutcome::Rejected { status: 400 }
            }
        }
    }

    #[tokio::test]
    async fn test_explicit_model_returned_unchanged() {
        let service = FakeService::new(&["a", "b"], &[]);
        let model = resolve_model(&service, Some("b"), &DemoConfig::default(), Selection::FirstChatCapable)
            .await
            .unwrap();
        assert_eq!(model, "b");
        assert!(service.probed().is_empty());
    }

    #[tokio::test]
    async fn test_missing_explicit_model_never_falls_back() {
        let service = FakeService::new(&["a", "b"], &["a"]);
        let err = resolve_model(&service, Some("c"), &DemoConfig::default(), Selection::FirstChatCapable)
            .await
            .unwrap_err();
        match err {
            Error::ModelNotFound { model, available } => {
                assert_eq!(model, "c");
                assert_eq!(available, vec!["a", "b"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_guard_model_is_not_available() {
        let service = FakeService::new(&["llama-guard-3", "a"], &[]);
        let err = check_model_is_available(&service, "llama-guard-3")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn test_config_fallback_used_and_validated() {
        let service = FakeService::new(&["a", "b"], &[]);
        let config = DemoConfig::builder().fallback_model("b").build().unwrap();
        let model = resolve_model(&service, None, &config, Selection::FirstChatCapable)
            .await
            .unwrap();
        assert_eq!(model, "b");

        let config = DemoConfig::builder().fallback_model("zzz").build().unwrap();
        assert!(
            resolve_model(&service, None, &config, Selection::FirstChatCapable)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_explicit_beats_fallback_and_empty_counts_as_unset() {
        let service = FakeService::new(&["a", "b"], &[]);
        let config = DemoConfig::builder().fallback_model("b").build().unwrap();

        let model = resolve_model(&service, Some("a"), &config, Selection::FirstLanguageModel)
            .await
            .unwrap();
        assert_eq!(model, "a");

        let model = resolve_model(&service, Some(""), &config, Selection::FirstLanguageModel)
            .await
            .unwrap();
        assert_eq!(model, "b");
    }

    #[tokio::test]
    async fn test_empty_listing_means_no_models() {
        let service = FakeService::new(&[], &[]);
        for selection in [Selection::FirstChatCapable, Selection::FirstLanguageModel] {
            let err = resolve_model(&service, None, &DemoConfig::default(), selection)
                .await
                .unwrap_err();
            assert!(matches!(err, Error::NoModelsAvailable));
        }
    }

    #[tokio::test]
    async fn test_first_chat_capable_probes_in_order() {
        let service = FakeService::new(&["embed", "llama-guard", "x", "y", "z"], &["y", "z"]);
        let model = any_chat_capable_model(&service).await.unwrap();
        assert_eq!(model, "y");
        assert_eq!(service.probed(), vec!["embed", "x", "y"]);
    }

    #[tokio::test]
    async fn test_no_chat_capable_model() {
        let service = FakeService::new(&["x"], &[]);
        let err = any_chat_capable_model(&service).await.unwrap_err();
        assert!(matches!(err, Error::NoChatCapableModel));
    }

    #[tokio::test]
    async fn test_first_language_model_skips_embeddings() {
        let service = FakeService::new(&["all-MiniLM-L6-v2", "llama3.2:3b"], &[]);
        let model = resolve_model(&service, None, &DemoConfig::default(), Selection::FirstLanguageModel)
            .await
            .unwrap();
        assert_eq!(model, "llama3.2:3b");
    }

    #[test]
    fn test_ensure_chat_capable() {
        let service = FakeService::new(&["a", "b"], &["a"]);
        tokio_test::block_on(async {
            assert!(ensure_chat_capable(&service, "a").await.is_ok());
            let err = ensure_chat_capable(&service, "b").await.unwrap_err();
            assert!(matches!(err, Error::NotChatCapable(ref m) if m == "b"));
        });
    }
}
