//! Reply parsing for the identification collaborator.
//!
//! The collaborator is instructed to answer with bare JSON, but replies are
//! routinely wrapped in fenced code blocks anyway. This stage strips the
//! known wrappers, parses, and validates the shape. A reply that does not
//! contain a JSON object is a hard error: substituting a placeholder
//! identity here would silently misreport the vehicle.

use serde_json::Value;

use autovision_core::VehicleIdentity;

use crate::error::{LLMError, Result};

const UNKNOWN: &str = "Unknown";

/// Strip a fenced code-block wrapper from a reply, if present.
///
/// Handles ```` ```json ```` and bare ```` ``` ```` fences plus surrounding
/// whitespace. Anything else passes through untouched.
pub fn strip_code_fences(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Parse a collaborator reply into a vehicle identity plus the raw value.
///
/// Missing or non-string `brand`/`model` keys fall back to "Unknown";
/// a reply that is not a JSON object at all fails.
pub fn parse_identity_reply(reply: &str) -> Result<(VehicleIdentity, Value)> {
    let cleaned = strip_code_fences(reply);
    let value: Value = serde_json::from_str(cleaned)?;

    let object = value.as_object().ok_or_else(|| {
        LLMError::InvalidResponse(format!("expected a JSON object, got: {}", value))
    })?;

    let brand = object
        .get("brand")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN)
        .to_string();
    let model = object
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN)
        .to_string();

    Ok((VehicleIdentity { brand, model }, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_no_fences() {
        assert_eq!(strip_code_fences(r#"{"brand": "Kia"}"#), r#"{"brand": "Kia"}"#);
    }

    #[test]
    fn test_strip_json_fence() {
        let reply = "```json\n{\"brand\": \"Kia\"}\n```";
        assert_eq!(strip_code_fences(reply), "{\"brand\": \"Kia\"}");
    }

    #[test]
    fn test_strip_bare_fence() {
        let reply = "```\n{\"brand\": \"Kia\"}\n```";
        assert_eq!(strip_code_fences(reply), "{\"brand\": \"Kia\"}");
    }

    #[test]
    fn test_strip_surrounding_whitespace() {
        let reply = "  \n```json\n{}\n```  \n";
        assert_eq!(strip_code_fences(reply), "{}");
    }

    #[test]
    fn test_parse_plain_reply() {
        let (identity, raw) =
            parse_identity_reply(r#"{"brand": "Toyota", "model": "Corolla"}"#).unwrap();
        assert_eq!(identity.brand, "Toyota");
        assert_eq!(identity.model, "Corolla");
        assert_eq!(raw["brand"], "Toyota");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let reply = "```json\n{\"brand\": \"Honda\", \"model\": \"Civic\"}\n```";
        let (identity, _) = parse_identity_reply(reply).unwrap();
        assert_eq!(identity.brand, "Honda");
        assert_eq!(identity.model, "Civic");
    }

    #[test]
    fn test_parse_missing_brand_defaults_unknown() {
        let (identity, raw) = parse_identity_reply(r#"{"model": "Civic"}"#).unwrap();
        assert_eq!(identity.brand, "Unknown");
        assert_eq!(identity.model, "Civic");
        // The raw value keeps whatever the collaborator said, defaults and all
        assert!(raw.get("brand").is_none());
    }

    #[test]
    fn test_parse_non_string_model_defaults_unknown() {
        let (identity, _) = parse_identity_reply(r#"{"brand": "Ford", "model": 42}"#).unwrap();
        assert_eq!(identity.brand, "Ford");
        assert_eq!(identity.model, "Unknown");
    }

    #[test]
    fn test_parse_empty_object() {
        let (identity, _) = parse_identity_reply("{}").unwrap();
        assert_eq!(identity, VehicleIdentity::unknown());
    }

    #[test]
    fn test_parse_prose_reply_fails() {
        let result = parse_identity_reply("I believe this is a Toyota Corolla.");
        match result.unwrap_err() {
            LLMError::Json(_) => {}
            other => panic!("Expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_array_fails() {
        let result = parse_identity_reply(r#"["Toyota", "Corolla"]"#);
        match result.unwrap_err() {
            LLMError::InvalidResponse(msg) => assert!(msg.contains("expected a JSON object")),
            other => panic!("Expected InvalidResponse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_string_fails() {
        let result = parse_identity_reply(r#""Toyota Corolla""#);
        match result.unwrap_err() {
            LLMError::InvalidResponse(_) => {}
            other => panic!("Expected InvalidResponse error, got {:?}", other),
        }
    }
}
