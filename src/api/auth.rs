use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiClientError;
use crate::models::user::{AuthResponse, RegisterResponse, User};

pub const REGISTER_ENDPOINT: &str = "/api/auth/register";
pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/api/auth/logout";

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Creates an account. Does not log in; call [`ApiClient::login`] next.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse, ApiClientError> {
        let response: RegisterResponse = self
            .post(REGISTER_ENDPOINT, &Credentials { email, password }, false)
            .await?;
        info!("registered account for {}", response.user.email);
        Ok(response)
    }

    /// Exchanges credentials for a bearer token and stores it, replacing
    /// whatever token was held before.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiClientError> {
        let response: AuthResponse = self
            .post(LOGIN_ENDPOINT, &Credentials { email, password }, false)
            .await?;
        if !response.access_token.is_empty() {
            self.tokens.set(&response.access_token);
        }
        Ok(response)
    }

    /// Tells the backend the session is over, then drops the stored token.
    /// The token is cleared even when the request fails; in that case the
    /// failure is still returned so the caller can report it.
    pub async fn logout(&self) -> Result<(), ApiClientError> {
        let result = if self.tokens.get().is_some() {
            self.post::<_, Value>(LOGOUT_ENDPOINT, &serde_json::json!({}), true)
                .await
                .map(|_| ())
        } else {
            Ok(())
        };
        self.tokens.clear();
        result
    }

    /// Best-effort identity from the stored token's JWT payload, for
    /// display only. No signature check; the backend stays authoritative.
    pub fn current_user(&self) -> Option<User> {
        let token = self.tokens.get()?;
        user_from_token(&token)
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Value,
    email: String,
    #[serde(default)]
    created_at: Option<String>,
}

fn user_from_token(token: &str) -> Option<User> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    // `sub` arrives as a number or a numeric string depending on the
    // backend's JWT library; accept both.
    let id = match &claims.sub {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    Some(User {
        id,
        email: claims.email,
        created_at: claims
            .created_at
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
    })
}
