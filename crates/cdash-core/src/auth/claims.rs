//! Identity claims decoded from the credential token.
//!
//! The token is a JWT issued by the remote API. Only the payload segment is
//! read; the signature is never checked. Claims drive UI branching only and
//! the API re-checks the role on every privileged call.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role classification carried in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// The role an admin toggle switches to.
    pub fn toggled(self) -> Self {
        match self {
            Role::Admin => Role::User,
            Role::User => Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User attributes decoded client-side from the credential token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawClaims")]
pub struct IdentityClaims {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Payload as issued. Issuers disagree on which claim carries the user id and
/// often send several, so each candidate is read on its own.
#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

impl From<RawClaims> for IdentityClaims {
    fn from(raw: RawClaims) -> Self {
        // `id`, then `_id`, then `sub`.
        let id = [raw.id, raw.object_id, raw.sub]
            .iter()
            .flatten()
            .find_map(id_text)
            .unwrap_or_default();
        Self {
            id,
            name: raw.name.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            role: raw.role.unwrap_or_default(),
            iat: raw.iat,
            exp: raw.exp,
        }
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl IdentityClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to show in headers, falling back to the email, then "User".
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else if !self.email.trim().is_empty() {
            &self.email
        } else {
            "User"
        }
    }

    /// Expiry as a timestamp, for display only.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Why a token could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum ClaimsError {
    #[error("token is not a JWT (expected 3 dot-separated segments, got {0})")]
    Malformed(usize),
    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes identity claims from a JWT without verifying it.
pub fn decode_claims(token: &str) -> Result<IdentityClaims, ClaimsError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return Err(ClaimsError::Malformed(parts.len()));
    }
    // Some issuers pad the payload; URL_SAFE_NO_PAD rejects '='.
    let payload = parts[1].trim_end_matches('=');
    let decoded = URL_SAFE_NO_PAD.decode(payload)?;
    // Reading into a map first rejects arrays, which serde would otherwise
    // accept positionally.
    let payload: Map<String, Value> = serde_json::from_slice(&decoded)?;
    let claims = IdentityClaims::deserialize(Value::Object(payload))?;
    Ok(claims)
}
