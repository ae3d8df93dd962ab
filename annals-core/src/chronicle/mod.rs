//! Annals Chronicler - AI-generated narratives for historical eras
//!
//! Given an era's name and localized name, the chronicler issues exactly one
//! request to the content provider and returns a validated
//! [`DetailedRecord`], or fails. There is no caching and no retry: asking
//! twice means two provider calls.
//!
//! ## Configuration
//!
//! Settings in `.annals/config.json`:
//! ```json
//! {"model": "gemini-2.5-flash", "api_key_env": "GEMINI_API_KEY", "language": "简体中文"}
//! ```
//!
//! Custom prompts: `system.txt` and `user.txt` (with `{{name}}`,
//! `{{localized_name}}` and `{{language}}` placeholders).

pub mod backend;
pub mod config;
pub mod gemini;
pub mod prompts;
pub mod record;
pub mod schema;

pub use backend::{ChronicleBackend, DetailRequest};
pub use config::{global_config_dir, validate_model, ApiKey, ChronicleConfig};
pub use gemini::GeminiBackend;
pub use prompts::ChroniclePrompts;
pub use record::{parse_record, DetailedRecord, MajorEvent};

use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, FetchError};

/// Detail fetcher - turns an era into one provider request
pub struct Chronicler {
    config: ChronicleConfig,
    prompts: ChroniclePrompts,
    backend: Box<dyn ChronicleBackend>,
}

impl std::fmt::Debug for Chronicler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chronicler")
            .field("config", &self.config)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl Chronicler {
    /// Create a chronicler with default prompts
    ///
    /// Fails fast when the API key is absent; no request is ever attempted
    /// without credentials.
    pub fn new(config: ChronicleConfig) -> Result<Self, ConfigError> {
        Self::with_prompts(config, ChroniclePrompts::default())
    }

    /// Create a chronicler with custom prompts
    pub fn with_prompts(config: ChronicleConfig, prompts: ChroniclePrompts) -> Result<Self, ConfigError> {
        config.validate()?;
        let api_key = config.resolve_api_key()?;
        let backend = GeminiBackend::new(&config, api_key)?;

        info!(
            "Initializing chronicler with Gemini backend (model: {}, language: {})",
            config.model, config.language
        );

        Ok(Self::with_backend(config, prompts, Box::new(backend)))
    }

    /// Create a chronicler around an explicit backend
    pub fn with_backend(
        config: ChronicleConfig,
        prompts: ChroniclePrompts,
        backend: Box<dyn ChronicleBackend>,
    ) -> Self {
        Self {
            config,
            prompts,
            backend,
        }
    }

    /// Create a chronicler from directory-based configuration
    ///
    /// Loads config and prompts from the project directory with fallback to
    /// the global directory, then defaults.
    pub fn from_directories(project_dir: Option<&Path>, global_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let config = ChronicleConfig::load_from_directories(project_dir, global_dir)?;
        let prompts = ChroniclePrompts::load(project_dir, global_dir);

        debug!(
            "Chronicler config: model={}, base_url={}, api_key_env={}, timeout={:?}",
            config.model, config.base_url, config.api_key_env, config.timeout_seconds
        );

        Self::with_prompts(config, prompts)
    }

    pub fn config(&self) -> &ChronicleConfig {
        &self.config
    }

    pub fn prompts(&self) -> &ChroniclePrompts {
        &self.prompts
    }

    /// Override the model at runtime (useful for CLI --model flag)
    ///
    /// The model is checked before anything changes; a rejected id leaves the
    /// chronicler as it was.
    pub fn override_model(&mut self, model: String) -> Result<(), ConfigError> {
        validate_model(&model)?;
        self.backend.override_model(model.clone());
        self.config.model = model;
        Ok(())
    }

    /// Build the provider request for an era
    pub fn build_request(&self, era_name: &str, localized_name: &str) -> Result<DetailRequest, FetchError> {
        if era_name.trim().is_empty() {
            return Err(FetchError::InvalidRequest("era name must not be empty".to_string()));
        }
        if localized_name.trim().is_empty() {
            return Err(FetchError::InvalidRequest(
                "localized name must not be empty".to_string(),
            ));
        }

        Ok(DetailRequest {
            prompt: self.prompts.render_user_message(
                era_name.trim(),
                localized_name.trim(),
                &self.config.language,
            ),
            system_instruction: self.prompts.system_instruction.clone(),
        })
    }

    /// Fetch the detailed narrative for an era
    ///
    /// Single attempt. Every failure, from transport to an incomplete payload,
    /// comes back as a [`FetchError`].
    pub async fn fetch_details(&self, era_name: &str, localized_name: &str) -> Result<DetailedRecord, FetchError> {
        let request = self.build_request(era_name, localized_name)?;

        debug!(
            "Fetching details for {} ({}) via {}",
            era_name,
            localized_name,
            self.backend.name()
        );

        let result = self
            .backend
            .generate(&request)
            .await
            .and_then(|text| parse_record(&text));

        match &result {
            Ok(record) => debug!(
                "Fetched {}: {} events, {} achievements",
                era_name,
                record.major_events.len(),
                record.cultural_achievements.len()
            ),
            Err(e) => warn!("Error fetching details for {}: {}", era_name, e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::backend::testing::ScriptedBackend;
    use super::record::fixtures::TANG_PAYLOAD;
    use super::*;
    use serial_test::serial;

    fn chronicler(backend: ScriptedBackend) -> Chronicler {
        Chronicler::with_backend(
            ChronicleConfig::default(),
            ChroniclePrompts::default(),
            Box::new(backend),
        )
    }

    #[tokio::test]
    async fn test_fetch_returns_validated_record() {
        let chronicler = chronicler(ScriptedBackend::text(TANG_PAYLOAD));
        let record = chronicler.fetch_details("Tang Dynasty", "唐朝").await.unwrap();

        assert!(!record.introduction.is_empty());
        assert!(!record.leader.is_empty());
        assert!(!record.capital.is_empty());
        assert!(!record.dominant_philosophy.is_empty());
        assert!(!record.decline_narrative.is_empty());
        assert!(!record.major_events.is_empty());
        for event in &record.major_events {
            assert!(!event.year.is_empty());
            assert!(!event.event.is_empty());
            assert!(!event.description.is_empty());
        }
    }

    #[tokio::test]
    async fn test_request_carries_era_and_language() {
        let backend = ScriptedBackend::text(TANG_PAYLOAD);
        let requests = backend.requests.clone();
        let chronicler = chronicler(backend);

        chronicler.fetch_details("Tang Dynasty", "唐朝").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("唐朝（Tang Dynasty）"));
        assert!(requests[0].prompt.contains("简体中文"));
        assert_eq!(requests[0].system_instruction, prompts::DEFAULT_SYSTEM_INSTRUCTION);
    }

    #[tokio::test]
    async fn test_empty_inputs_rejected_before_request() {
        let backend = ScriptedBackend::text(TANG_PAYLOAD);
        let requests = backend.requests.clone();
        let chronicler = chronicler(backend);

        let err = chronicler.fetch_details("", "唐朝").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
        let err = chronicler.fetch_details("Tang Dynasty", "  ").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidRequest(_)));

        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_text_is_fetch_failure() {
        let chronicler = chronicler(ScriptedBackend::text(""));
        let err = chronicler.fetch_details("Tang Dynasty", "唐朝").await.unwrap_err();
        assert!(matches!(err, FetchError::NoContent));
    }

    #[tokio::test]
    async fn test_unparseable_text_is_fetch_failure() {
        let chronicler = chronicler(ScriptedBackend::text("Sorry, I cannot help with that."));
        let err = chronicler.fetch_details("Tang Dynasty", "唐朝").await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_backend_error_is_propagated() {
        let chronicler = chronicler(ScriptedBackend::new(vec![Err(FetchError::Status {
            status: 401,
            body: "unauthorized".to_string(),
        })]));
        let err = chronicler.fetch_details("Tang Dynasty", "唐朝").await.unwrap_err();
        assert!(err.is_auth_rejection());
    }

    #[tokio::test]
    async fn test_sequential_fetches_are_independent() {
        let second = TANG_PAYLOAD.replace("长安", "洛阳");
        let backend = ScriptedBackend::new(vec![Ok(TANG_PAYLOAD.to_string()), Ok(second)]);
        let requests = backend.requests.clone();
        let chronicler = chronicler(backend);

        let first = chronicler.fetch_details("Tang Dynasty", "唐朝").await.unwrap();
        let again = chronicler.fetch_details("Tang Dynasty", "唐朝").await.unwrap();

        assert_eq!(requests.lock().unwrap().len(), 2);
        assert_eq!(first.capital, "长安");
        assert_eq!(again.capital, "洛阳");
    }

    #[test]
    fn test_override_model() {
        let mut chronicler = chronicler(ScriptedBackend::new(vec![]));
        chronicler.override_model("gemini-2.5-pro".to_string()).unwrap();
        assert_eq!(chronicler.config().model, "gemini-2.5-pro");
    }

    #[test]
    fn test_override_model_rejects_unusable_ids() {
        let mut chronicler = chronicler(ScriptedBackend::new(vec![]));

        assert!(matches!(
            chronicler.override_model("   ".to_string()),
            Err(ConfigError::EmptyModel)
        ));
        assert!(matches!(
            chronicler.override_model("../../v1/files".to_string()),
            Err(ConfigError::InvalidModel { .. })
        ));
        assert_eq!(chronicler.config().model, "gemini-2.5-flash");
    }

    #[test]
    fn test_from_directories_reports_broken_config() {
        let project = tempfile::TempDir::new().unwrap();
        std::fs::write(project.path().join("config.json"), "{ \"model\": 42 }").unwrap();

        let err = Chronicler::from_directories(Some(project.path()), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfigFile { .. }));
    }

    #[test]
    #[serial]
    fn test_new_fails_fast_without_api_key() {
        let config = ChronicleConfig {
            api_key_env: "ANNALS_TEST_MISSING_KEY".to_string(),
            ..Default::default()
        };
        std::env::remove_var("ANNALS_TEST_MISSING_KEY");

        let err = Chronicler::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { env } if env == "ANNALS_TEST_MISSING_KEY"));
    }

    #[test]
    #[serial]
    fn test_new_with_api_key() {
        let config = ChronicleConfig {
            api_key_env: "ANNALS_TEST_PRESENT_KEY".to_string(),
            ..Default::default()
        };
        std::env::set_var("ANNALS_TEST_PRESENT_KEY", "abc123");

        let chronicler = Chronicler::new(config).unwrap();
        assert_eq!(chronicler.config().api_key_env, "ANNALS_TEST_PRESENT_KEY");

        std::env::remove_var("ANNALS_TEST_PRESENT_KEY");
    }
}
