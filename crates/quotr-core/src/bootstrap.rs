//! Application bootstrap: config resolution, provider and pipeline construction.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use quotr_document::{PdfLoader, TextSplitter};
use quotr_llm::any::AnyProvider;
use quotr_llm::compatible::CompatibleProvider;
use quotr_llm::openai::OpenAiProvider;
use quotr_llm::provider::LlmProvider;

use crate::config::{Config, ProviderKind};
use crate::pipeline::{RecommendPipeline, recommend_pipeline};
use crate::vault::{EnvVaultProvider, VaultProvider};

pub struct AppBuilder {
    config: Config,
    config_path: PathBuf,
}

impl AppBuilder {
    /// Load and validate config from `config_path`, then resolve secrets from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be parsed or is invalid.
    pub async fn from_path(config_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Self::with_vault(config_path, &EnvVaultProvider).await
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be parsed, is invalid, or the vault fails.
    pub async fn with_vault(
        config_path: impl Into<PathBuf>,
        vault: &dyn VaultProvider,
    ) -> anyhow::Result<Self> {
        let config_path = config_path.into();
        let mut config = Config::load(&config_path)?;
        config.validate()?;
        config.resolve_secrets(vault).await?;
        tracing::debug!(path = %config_path.display(), "configuration loaded");

        Ok(Self {
            config,
            config_path,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build_provider(&self) -> anyhow::Result<AnyProvider> {
        create_provider(&self.config)
    }

    /// # Errors
    ///
    /// Returns an error if the configured prompt template is invalid.
    pub fn build_pipeline(
        &self,
        provider: AnyProvider,
    ) -> anyhow::Result<RecommendPipeline<PdfLoader, AnyProvider>> {
        build_pipeline(&self.config, Arc::new(provider))
    }
}

/// Build the configured chat-completion backend.
///
/// A missing API key is not an error here; the provider reports it on first use.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn create_provider(config: &Config) -> anyhow::Result<AnyProvider> {
    let llm = &config.llm;
    let api_key = config
        .secrets
        .api_key
        .as_ref()
        .map_or_else(String::new, |k| k.expose().to_owned());
    if api_key.is_empty() {
        tracing::warn!("no API key found in QUOTR_API_KEY or GROQ_API_KEY");
    }

    let timeout = Duration::from_secs(config.timeouts.llm_seconds);

    let provider = match llm.provider {
        ProviderKind::OpenAi => AnyProvider::OpenAi(
            OpenAiProvider::new(
                api_key,
                llm.base_url.clone(),
                llm.model.clone(),
                llm.max_tokens,
                timeout,
            )
            .context("failed to build HTTP client")?,
        ),
        ProviderKind::Compatible => AnyProvider::Compatible(
            CompatibleProvider::new(
                llm.name.clone(),
                api_key,
                llm.base_url.clone(),
                llm.model.clone(),
                llm.max_tokens,
                timeout,
            )
            .context("failed to build HTTP client")?,
        ),
    };

    tracing::info!(
        provider = %llm.provider,
        name = %llm.name,
        model = %llm.model,
        "model provider configured"
    );
    Ok(provider)
}

/// Assemble the ingest → aggregate → prompt → model pipeline for `provider`.
///
/// # Errors
///
/// Returns an error if the configured prompt template is invalid.
pub fn build_pipeline<P: LlmProvider>(
    config: &Config,
    provider: Arc<P>,
) -> anyhow::Result<RecommendPipeline<PdfLoader, P>> {
    let loader = PdfLoader {
        max_file_size: config.documents.max_file_size,
    };
    let splitter = TextSplitter::new(config.splitter.to_splitter_config());
    let template = config.prompt_template()?;
    Ok(recommend_pipeline(
        loader,
        splitter,
        template,
        provider,
        Duration::from_secs(config.timeouts.llm_seconds),
    ))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;
    use crate::vault::Secret;
    use crate::vault::tests::MapVault;

    #[test]
    fn compatible_provider_by_default() {
        let mut config = Config::default();
        config.secrets.api_key = Some(Secret::new("gsk_test"));
        let provider = create_provider(&config).unwrap();
        assert!(matches!(provider, AnyProvider::Compatible(_)));
        assert_eq!(provider.name(), "groq");
        assert_eq!(provider.model(), "openai/gpt-oss-120b");
    }

    #[test]
    fn openai_provider_when_configured() {
        let mut config = Config::default();
        config.llm.provider = ProviderKind::OpenAi;
        config.llm.model = "gpt-4o-mini".into();
        let provider = create_provider(&config).unwrap();
        assert!(matches!(provider, AnyProvider::OpenAi(_)));
        assert_eq!(provider.model(), "gpt-4o-mini");
    }

    #[test]
    fn missing_key_still_builds_provider() {
        let config = Config::default();
        assert!(create_provider(&config).is_ok());
    }

    #[test]
    fn pipeline_rejects_bad_template() {
        let mut config = Config::default();
        config.prompt.template = Some("no placeholders".into());
        let provider = Arc::new(create_provider(&config).unwrap());
        assert!(build_pipeline(&config, provider).is_err());
    }

    #[tokio::test]
    #[serial]
    async fn app_builder_resolves_secret_from_vault() {
        unsafe { std::env::remove_var("QUOTR_CHUNK_SIZE") };
        let vault = MapVault(HashMap::from([(
            "GROQ_API_KEY".to_owned(),
            "gsk_live".to_owned(),
        )]));
        let app = AppBuilder::with_vault("/nonexistent/quotr.toml", &vault)
            .await
            .unwrap();
        assert_eq!(
            app.config().secrets.api_key.as_ref().map(Secret::expose),
            Some("gsk_live")
        );
        assert_eq!(app.config_path(), Path::new("/nonexistent/quotr.toml"));
        let provider = app.build_provider().unwrap();
        assert!(app.build_pipeline(provider).is_ok());
    }

    #[tokio::test]
    #[serial]
    async fn app_builder_rejects_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[splitter]\nchunk_size = 10\nchunk_overlap = 10\n")
            .unwrap();
        unsafe {
            std::env::remove_var("QUOTR_CHUNK_SIZE");
            std::env::remove_var("QUOTR_CHUNK_OVERLAP");
        }
        let vault = MapVault(HashMap::new());
        assert!(AppBuilder::with_vault(file.path(), &vault).await.is_err());
    }
}
