// Identification reply handling: fence tolerance, defaults, fail-loud parsing

use std::sync::Arc;

use async_trait::async_trait;

use autovision_llm::{
    parse_identity_reply, strip_code_fences, IdentificationProvider, LLMError, StaticProvider,
    VehicleIdentifier,
};

struct FlakyProvider;

#[async_trait]
impl IdentificationProvider for FlakyProvider {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn has_api_key(&self) -> bool {
        true
    }

    async fn identify(&self, _image: &[u8], _mime_type: &str) -> Result<String, LLMError> {
        Err(LLMError::InvalidResponse("HTTP 503: overloaded".to_string()))
    }
}

#[test]
fn test_fence_stripping_variants() {
    let payload = r#"{"brand": "Tesla", "model": "Model 3"}"#;
    let wrapped = [
        payload.to_string(),
        format!("```json\n{}\n```", payload),
        format!("```\n{}\n```", payload),
        format!("  ```json\n{}\n```  ", payload),
    ];

    for reply in &wrapped {
        assert_eq!(strip_code_fences(reply), payload, "failed on {:?}", reply);
    }
}

#[test]
fn test_partial_keys_default_to_unknown() {
    let (identity, _) = parse_identity_reply(r#"{"brand": "Subaru"}"#).unwrap();
    assert_eq!(identity.brand, "Subaru");
    assert_eq!(identity.model, "Unknown");

    let (identity, _) = parse_identity_reply(r#"{"model": "Outback"}"#).unwrap();
    assert_eq!(identity.brand, "Unknown");
    assert_eq!(identity.model, "Outback");
}

#[test]
fn test_extra_keys_survive_in_raw_value() {
    let (identity, raw) =
        parse_identity_reply(r#"{"brand": "BMW", "model": "i3", "color": "blue"}"#).unwrap();
    assert_eq!(identity.brand, "BMW");
    assert_eq!(raw["color"], "blue");
}

#[test]
fn test_malformed_reply_is_an_error_not_a_default() {
    assert!(parse_identity_reply("the vehicle appears to be a BMW").is_err());
    assert!(parse_identity_reply("```json\nnot json\n```").is_err());
    assert!(parse_identity_reply("[1, 2, 3]").is_err());
    assert!(parse_identity_reply("null").is_err());
    assert!(parse_identity_reply("").is_err());
}

#[tokio::test]
async fn test_identifier_end_to_end_with_fenced_reply() {
    let provider = Arc::new(StaticProvider::new(
        "```json\n{\"brand\": \"Nissan\", \"model\": \"Leaf\"}\n```",
    ));
    let identifier = VehicleIdentifier::new(provider);

    let (identity, raw) = identifier.identify(b"jpeg bytes", "image/jpeg").await.unwrap();
    assert_eq!(identity.brand, "Nissan");
    assert_eq!(identity.model, "Leaf");
    assert_eq!(raw["brand"], "Nissan");
}

#[tokio::test]
async fn test_identifier_surfaces_provider_errors() {
    let identifier = VehicleIdentifier::new(Arc::new(FlakyProvider));
    let result = identifier.identify(b"jpeg bytes", "image/jpeg").await;

    match result.unwrap_err() {
        LLMError::InvalidResponse(msg) => assert!(msg.contains("503")),
        other => panic!("Expected InvalidResponse error, got {:?}", other),
    }
}
