use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::types::Role;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload. `role` is captured at issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
    pub role: Role,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        role: Role,
        kind: TokenKind,
        issuer: &str,
        audience: &str,
        issued_at: OffsetDateTime,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: user_id,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + ttl).unix_timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            kind,
            role,
        }
    }
}
