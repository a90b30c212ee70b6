mod env;
mod types;


pub use types::*;

use std::path::Path;

use anyhow::{Context, bail};

use crate::prompt::PromptTemplate;
use crate::vault::{Secret, VaultProvider};

/// Vault keys checked for the model service credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["QUOTR_API_KEY", "GROQ_API_KEY"];

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.splitter.chunk_size == 0 {
            bail!("splitter.chunk_size must be greater than 0");
        }
        if self.splitter.chunk_overlap >= self.splitter.chunk_size {
            bail!(
                "splitter.chunk_overlap ({}) must be smaller than splitter.chunk_size ({})",
                self.splitter.chunk_overlap,
                self.splitter.chunk_size
            );
        }
        if self.timeouts.llm_seconds == 0 {
            bail!("timeouts.llm_seconds must be greater than 0");
        }
        if self.llm.base_url.trim().is_empty() {
            bail!("llm.base_url must not be empty");
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        self.prompt_template()?;
        Ok(())
    }

    /// The configured template, or the built-in one.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured template lacks a required placeholder.
    pub fn prompt_template(&self) -> anyhow::Result<PromptTemplate> {
        match self.prompt.template.as_deref() {
            Some(template) => {
                PromptTemplate::new(template).context("invalid prompt.template in config")
            }
            None => Ok(PromptTemplate::default()),
        }
    }

    /// Resolve the model service credential through the vault.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault backend fails.
    pub async fn resolve_secrets(&mut self, vault: &dyn VaultProvider) -> anyhow::Result<()> {
        for key in API_KEY_VARS {
            if let Some(val) = vault.get_secret(key).await? {
                tracing::debug!("using API key from {key}");
                self.secrets.api_key = Some(Secret::new(val));
                break;
            }
        }
        Ok(())
    }
}
