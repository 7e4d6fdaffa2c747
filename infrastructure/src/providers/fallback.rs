//! Primary/secondary gateway pair

use async_trait::async_trait;
use interview_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use std::sync::Arc;
use tracing::warn;

/// Tries the primary gateway, then the secondary once on a retryable failure
pub struct FallbackGateway {
    primary: Arc<dyn LlmGateway>,
    secondary: Arc<dyn LlmGateway>,
    name: String,
}

impl FallbackGateway {
    pub fn new(primary: Arc<dyn LlmGateway>, secondary: Arc<dyn LlmGateway>) -> Self {
        let name = format!("{}+{}", primary.name(), secondary.name());
        Self {
            primary,
            secondary,
            name,
        }
    }
}

#[async_trait]
impl LlmGateway for FallbackGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        match self.primary.generate(request).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_retryable() => {
                warn!(
                    "{} failed ({}), falling back to {}",
                    self.primary.name(),
                    e,
                    self.secondary.name()
                );
                self.secondary.generate(request).await
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        name: &'static str,
        result: Result<String, GatewayError>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, result: Result<String, GatewayError>) -> Arc<Self> {
            Arc::new(Self {
                name,
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmGateway for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("system", "canned", vec![])
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let primary = Fixed::new("a", Ok("hello".to_string()));
        let secondary = Fixed::new("b", Ok("other".to_string()));
        let gateway = FallbackGateway::new(primary.clone(), secondary.clone());

        assert_eq!(gateway.generate(&request()).await.unwrap(), "hello");
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.name(), "a+b");
    }

    #[tokio::test]
    async fn test_retryable_failure_uses_secondary_once() {
        let primary = Fixed::new("a", Err(GatewayError::RateLimited("429".to_string())));
        let secondary = Fixed::new("b", Err(GatewayError::Timeout));
        let gateway = FallbackGateway::new(primary.clone(), secondary.clone());

        assert_eq!(
            gateway.generate(&request()).await,
            Err(GatewayError::Timeout)
        );
        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials_do_not_fall_back() {
        let primary = Fixed::new(
            "a",
            Err(GatewayError::MissingCredentials("OPENAI_API_KEY".to_string())),
        );
        let secondary = Fixed::new("b", Ok("other".to_string()));
        let gateway = FallbackGateway::new(primary, secondary.clone());

        assert!(gateway.generate(&request()).await.is_err());
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }
}
