//! Signed response envelope.

use crate::constants::envelope;
use platform_core::canonical::ParameterValue;
use platform_core::error::{Error, ParseError, Result};
use platform_core::http_client::HttpResponse;
use platform_core::sign;
use serde_json::Value;

/// `{"body": ..., "sign": "..."}` as returned by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// Signed payload
    pub body: Value,
    /// Signature the gateway computed over `body`
    pub sign: String,
}

impl GatewayResponse {
    /// Parses the envelope from a response entity.
    pub fn from_http(response: &HttpResponse) -> Result<Self> {
        Self::from_slice(response.body())
    }

    /// Parses the envelope from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the bytes are not a JSON object, or if
    /// `body` or a string `sign` is missing.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Splits an already decoded envelope.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::from(ParseError::invalid_value(
                "envelope",
                "expected a JSON object",
            )));
        };

        let sign = match fields.remove(envelope::SIGN) {
            Some(Value::String(sign)) => sign,
            Some(Value::Null) | None => {
                return Err(ParseError::missing_field(envelope::SIGN).into());
            }
            Some(_) => {
                return Err(ParseError::invalid_value(envelope::SIGN, "expected a string").into());
            }
        };
        let body = fields
            .remove(envelope::BODY)
            .ok_or_else(|| ParseError::missing_field(envelope::BODY))?;

        Ok(Self { body, sign })
    }

    /// Checks `sign` against `body` under `secret`.
    pub fn verify(&self, secret: &str) -> bool {
        sign::verify(&ParameterValue::from(&self.body), &self.sign, secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_core::sign::create_sign;
    use serde_json::json;

    #[test]
    fn test_from_slice_splits_envelope() {
        let bytes = br#"{"body":{"rows":[]},"sign":"abc","code":0}"#;
        let response = GatewayResponse::from_slice(bytes).unwrap();
        assert_eq!(response.body, json!({"rows": []}));
        assert_eq!(response.sign, "abc");
    }

    #[test]
    fn test_missing_sign_is_parse_error() {
        let err = GatewayResponse::from_slice(br#"{"body":{}}"#).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("sign"));

        let null_sign = GatewayResponse::from_slice(br#"{"body":{},"sign":null}"#).unwrap_err();
        assert!(matches!(null_sign, Error::Parse(_)));
    }

    #[test]
    fn test_malformed_envelopes() {
        assert!(matches!(
            GatewayResponse::from_slice(b"not json"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            GatewayResponse::from_slice(b"[1,2]"),
            Err(Error::Parse(_))
        ));
        assert!(matches!(
            GatewayResponse::from_slice(br#"{"body":{},"sign":5}"#),
            Err(Error::Parse(_))
        ));
        let no_body = GatewayResponse::from_slice(br#"{"sign":"abc"}"#).unwrap_err();
        assert!(no_body.to_string().contains("body"));
    }

    #[test]
    fn test_verify_object_and_array_bodies() {
        let body = json!({"dbCode": "hgjd", "total": 2});
        let sign = create_sign(&ParameterValue::from(&body), "secret");
        let response = GatewayResponse {
            body,
            sign: sign.into_string(),
        };
        assert!(response.verify("secret"));
        assert!(!response.verify("other"));

        let rows = GatewayResponse {
            body: json!(["a", "b"]),
            sign: "b1144d6264b3c92ab5322cb651617208".to_string(),
        };
        assert!(rows.verify("secret"));
    }

    #[test]
    fn test_verify_nested_typed_body() {
        let bytes = br#"{"body":{"rows":[{"id":1}],"page":{"total":2,"ok":true}},"sign":"a846109d7a1d6f70a1f4d2453efa659b"}"#;
        let response = GatewayResponse::from_slice(bytes).unwrap();
        assert!(response.verify("EAUJ6CIKPBMCNW36"));
    }

    #[test]
    fn test_verify_rejects_tampered_body() {
        let body = json!({"dbCode": "hgjd"});
        let sign = create_sign(&ParameterValue::from(&body), "secret").into_string();
        let tampered = GatewayResponse {
            body: json!({"dbCode": "hgjd2"}),
            sign,
        };
        assert!(!tampered.verify("secret"));
    }
}
