#[cfg(test)]
mod providers_tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::IdentificationConfig;
    use crate::error::{LLMError, Result};
    use crate::identifier::VehicleIdentifier;
    use crate::providers::google::{build_request_body, extract_reply_text, IDENTIFICATION_PROMPT};
    use crate::providers::*;

    struct FailingProvider;

    #[async_trait]
    impl IdentificationProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn has_api_key(&self) -> bool {
            true
        }

        async fn identify(&self, _image: &[u8], _mime_type: &str) -> Result<String> {
            Err(LLMError::Provider("upstream unreachable".to_string()))
        }
    }

    #[test]
    fn test_google_provider_creation() {
        let config = IdentificationConfig::default();
        let provider = GoogleProvider::new(&config).unwrap();
        assert_eq!(provider.name(), "google");
        assert!(!provider.has_api_key());
    }

    #[test]
    fn test_google_provider_with_key() {
        let config = IdentificationConfig::default();
        let provider = GoogleProvider::with_api_key(&config, "test-key".to_string()).unwrap();
        assert!(provider.has_api_key());
    }

    #[tokio::test]
    async fn test_google_identify_without_key() {
        let config = IdentificationConfig::default();
        let provider = GoogleProvider::new(&config).unwrap();
        let result = provider.identify(b"bytes", "image/jpeg").await;
        match result.unwrap_err() {
            LLMError::MissingApiKey(name) => assert_eq!(name, "google"),
            other => panic!("Expected MissingApiKey error, got {:?}", other),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = build_request_body(b"\x01\x02\x03", "image/png");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[0]["inline_data"]["data"], "AQID");
        assert_eq!(parts[1]["text"], IDENTIFICATION_PROMPT);
    }

    #[test]
    fn test_prompt_requests_raw_json() {
        assert!(IDENTIFICATION_PROMPT.contains("\"brand\""));
        assert!(IDENTIFICATION_PROMPT.contains("\"model\""));
        assert!(IDENTIFICATION_PROMPT.contains("Do not use markdown formatting"));
    }

    #[test]
    fn test_extract_reply_text() {
        let response = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "{\"brand\": \"Kia\"}"}]
                }
            }]
        });
        assert_eq!(extract_reply_text(&response).unwrap(), "{\"brand\": \"Kia\"}");
    }

    #[test]
    fn test_extract_reply_text_missing() {
        let response = serde_json::json!({"candidates": []});
        match extract_reply_text(&response).unwrap_err() {
            LLMError::InvalidResponse(msg) => assert!(msg.contains("no text content")),
            other => panic!("Expected InvalidResponse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_static_provider_reply() {
        let provider = StaticProvider::new(r#"{"brand": "Mazda", "model": "3"}"#);
        assert_eq!(provider.name(), "static");
        let reply = provider.identify(b"ignored", "image/jpeg").await.unwrap();
        assert!(reply.contains("Mazda"));
    }

    #[tokio::test]
    async fn test_identifier_parses_reply() {
        let provider = Arc::new(StaticProvider::new(r#"{"brand": "Mazda", "model": "3"}"#));
        let identifier = VehicleIdentifier::new(provider);
        let (identity, raw) = identifier.identify(b"ignored", "image/jpeg").await.unwrap();
        assert_eq!(identity.brand, "Mazda");
        assert_eq!(identity.model, "3");
        assert_eq!(raw["model"], "3");
    }

    #[tokio::test]
    async fn test_identifier_strips_fences() {
        let provider = Arc::new(StaticProvider::new(
            "```json\n{\"brand\": \"Audi\", \"model\": \"A4\"}\n```",
        ));
        let identifier = VehicleIdentifier::new(provider);
        let (identity, _) = identifier.identify(b"ignored", "image/jpeg").await.unwrap();
        assert_eq!(identity.brand, "Audi");
    }

    #[tokio::test]
    async fn test_identifier_propagates_provider_error() {
        let identifier = VehicleIdentifier::new(Arc::new(FailingProvider));
        let result = identifier.identify(b"ignored", "image/jpeg").await;
        match result.unwrap_err() {
            LLMError::Provider(msg) => assert!(msg.contains("unreachable")),
            other => panic!("Expected Provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_identifier_rejects_prose_reply() {
        let provider = Arc::new(StaticProvider::new("It looks like a sedan."));
        let identifier = VehicleIdentifier::new(provider);
        let result = identifier.identify(b"ignored", "image/jpeg").await;
        match result.unwrap_err() {
            LLMError::Json(_) => {}
            other => panic!("Expected Json error, got {:?}", other),
        }
    }
}
