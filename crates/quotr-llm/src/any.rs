use crate::compatible::CompatibleProvider;
#[cfg(feature = "mock")]
use crate::mock::MockProvider;
use crate::openai::OpenAiProvider;
use crate::provider::{LlmProvider, Message};

/// Generates a match over all `AnyProvider` variants, binding the inner provider
/// and evaluating the given expression for each arm.
macro_rules! delegate_provider {
    ($self:expr, |$p:ident| $expr:expr) => {
        match $self {
            AnyProvider::OpenAi($p) => $expr,
            AnyProvider::Compatible($p) => $expr,
            #[cfg(feature = "mock")]
            AnyProvider::Mock($p) => $expr,
        }
    };
}

#[derive(Debug, Clone)]
pub enum AnyProvider {
    OpenAi(OpenAiProvider),
    Compatible(CompatibleProvider),
    #[cfg(feature = "mock")]
    Mock(MockProvider),
}

impl LlmProvider for AnyProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, crate::LlmError> {
        delegate_provider!(self, |p| p.chat(messages).await)
    }

    fn name(&self) -> &str {
        delegate_provider!(self, |p| p.name())
    }

    fn model(&self) -> &str {
        delegate_provider!(self, |p| p.model())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn openai_variant_delegates_name() {
        let p = AnyProvider::OpenAi(OpenAiProvider::new(
            "k".into(),
            "http://x".into(),
            "gpt-4o".into(),
            10,
            Duration::from_secs(5),
        )
        .unwrap());
        assert_eq!(p.name(), "openai");
        assert_eq!(p.model(), "gpt-4o");
    }

    #[test]
    fn compatible_variant_delegates_name() {
        let p = AnyProvider::Compatible(CompatibleProvider::new(
            "groq".into(),
            "k".into(),
            "http://x".into(),
            "m".into(),
            10,
            Duration::from_secs(5),
        )
        .unwrap());
        assert_eq!(p.name(), "groq");
    }
}
