//! The request shape forwarded by the upstream authentication gateway.

use axum::{body::Bytes, http::HeaderMap};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

use crate::error::CategoryError;

/// Header carrying the verified token claims as a JSON object.
pub const CLAIMS_HEADER: &str = "x-authorizer-claims";

const CLAIMS_PATH: [&str; 3] = ["requestContext", "authorizer", "claims"];

/// A proxy-integration event: the raw body plus the gateway's request context.
///
/// The body is kept as bytes and only decoded while the name is validated, so
/// an undecodable body never pre-empts the authorizer.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default, deserialize_with = "string_body")]
    #[schema(value_type = Option<String>)]
    pub body: Option<Bytes>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub request_context: Option<Value>,
}

impl GatewayEvent {
    /// Builds an event from a direct request whose claims were placed in
    /// [`CLAIMS_HEADER`]. A missing or unreadable header leaves the claims out
    /// of the context, which the authorizer reports as a missing key.
    pub fn from_forwarded(headers: &HeaderMap, body: Bytes) -> Self {
        let claims = headers
            .get(CLAIMS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| serde_json::from_str::<Map<String, Value>>(raw).ok());

        let authorizer = match claims {
            Some(claims) => json!({ "claims": claims }),
            None => json!({}),
        };

        Self {
            body: Some(body),
            request_context: Some(json!({ "authorizer": authorizer })),
        }
    }

    /// Walks `requestContext.authorizer.claims`.
    pub fn claims(&self) -> Result<&Value, CategoryError> {
        let mut current = self
            .request_context
            .as_ref()
            .ok_or_else(|| CategoryError::MissingKey(CLAIMS_PATH[0].to_string()))?;

        for depth in 1..CLAIMS_PATH.len() {
            current = current
                .get(CLAIMS_PATH[depth])
                .ok_or_else(|| CategoryError::MissingKey(CLAIMS_PATH[..=depth].join(".")))?;
        }

        Ok(current)
    }

    /// The body to validate. An absent body reads as an empty object.
    pub fn body_or_empty(&self) -> &[u8] {
        self.body.as_deref().unwrap_or(b"{}")
    }
}

fn string_body<'de, D>(deserializer: D) -> Result<Option<Bytes>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(Bytes::from))
}
