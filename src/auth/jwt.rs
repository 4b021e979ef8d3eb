use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, TokenKind};
use crate::{config::JwtConfig, state::AppState, types::Role};

/// HS256 keys plus the issuer/audience every token must carry.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[cfg.issuer.as_str()]);
        validation.set_audience(&[cfg.audience.as_str()]);
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.ttl_minutes.max(1)),
            refresh_ttl: Duration::minutes(cfg.refresh_ttl_minutes.max(1)),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::from(&state.config.jwt)
    }
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl JwtKeys {
    pub fn sign(&self, user_id: Uuid, role: Role, kind: TokenKind) -> anyhow::Result<String> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims::new(
            user_id,
            role,
            kind,
            &self.issuer,
            &self.audience,
            OffsetDateTime::now_utc(),
            ttl,
        );
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, ?kind, ?role, "jwt signed");
        Ok(token)
    }

    /// Access and refresh token for the same user and role.
    pub fn sign_pair(&self, user_id: Uuid, role: Role) -> anyhow::Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.sign(user_id, role, TokenKind::Access)?,
            refresh_token: self.sign(user_id, role, TokenKind::Refresh)?,
        })
    }

    /// Checks signature, expiry, issuer and audience. Either token kind passes.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)?.claims;
        debug!(user_id = %claims.sub, kind = ?claims.kind, "jwt verified");
        Ok(claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        anyhow::ensure!(claims.kind == TokenKind::Refresh, "not a refresh token");
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        })
    }

    #[test]
    fn pair_carries_role_and_kind() {
        let k = keys("dev-secret", "wordbook", "wordbook-users");
        let user_id = Uuid::new_v4();
        let pair = k.sign_pair(user_id, Role::Admin).unwrap();

        let access = k.verify(&pair.access_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(access.role, Role::Admin);
        assert_eq!(access.exp - access.iat, 5 * 60);

        let refresh = k.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);
        assert_eq!(refresh.exp - refresh.iat, 60 * 60);
    }

    #[test]
    fn access_token_is_not_a_refresh_token() {
        let k = keys("dev-secret", "iss", "aud");
        let token = k.sign(Uuid::new_v4(), Role::User, TokenKind::Access).unwrap();
        let err = k.verify_refresh(&token).unwrap_err();
        assert!(err.to_string().contains("not a refresh token"));
    }

    #[test]
    fn issuer_audience_and_secret_must_match() {
        let good = keys("same-secret", "good-iss", "good-aud");
        let token = good.sign(Uuid::new_v4(), Role::User, TokenKind::Access).unwrap();
        assert!(keys("same-secret", "bad-iss", "good-aud").verify(&token).is_err());
        assert!(keys("same-secret", "good-iss", "bad-aud").verify(&token).is_err());
        assert!(keys("other-secret", "good-iss", "good-aud").verify(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let k = keys("dev-secret", "iss", "aud");
        let claims = Claims::new(
            Uuid::new_v4(),
            Role::User,
            TokenKind::Access,
            "iss",
            "aud",
            OffsetDateTime::now_utc() - Duration::hours(2),
            Duration::minutes(5),
        );
        let token = encode(&Header::default(), &claims, &k.encoding).unwrap();
        assert!(k.verify(&token).is_err());
    }
}
