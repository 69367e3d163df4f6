use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::domain::User;
use crate::error::{AuthError, TransportError};
use crate::transport::{ApiRequest, TokenStore, Transport};

pub const LOGIN_PATH: &str = "/api/users/login";
const LOGIN_FAILED: &str = "Login failed";

/// Login endpoint body. Unlike resource endpoints it has no `data.data` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Signs an admin in and keeps the bearer token for authorized calls.
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, mobile: &str, password: &str) -> Result<User, AuthError> {
        if mobile.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let request = ApiRequest::post(LOGIN_PATH, json!({ "mobile": mobile, "password": password }))
            .without_session_check();
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(TransportError::Api { status, body, .. }) => {
                let message = rejection_message(&body);
                warn!(status, %message, "Login rejected");
                return Err(AuthError::Rejected(message));
            }
            Err(e) => return Err(e.into()),
        };

        let LoginResponse { token, user } = response.into_body()?;
        if !user.is_admin() {
            warn!(user_id = %user.id, "Non-admin login attempt");
            return Err(AuthError::NotAdmin);
        }

        let user_json = serde_json::to_string(&user).map_err(TransportError::from)?;
        self.tokens
            .save(&token)
            .and_then(|()| self.tokens.save_admin_user(&user_json))
            .map_err(|e| AuthError::Rejected(format!("Could not store session: {e}")))?;
        info!(user_id = %user.id, "Admin signed in");
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.tokens
            .clear()
            .map_err(|e| AuthError::Rejected(format!("Could not clear token: {e}")))
    }

    /// The stored admin, if the stored session is complete.
    pub fn signed_in_user(&self) -> Option<User> {
        self.tokens.token()?;
        let raw = self.tokens.admin_user()?;
        serde_json::from_str(&raw).ok()
    }

    /// A session needs both the token and the admin user.
    pub fn is_signed_in(&self) -> bool {
        self.signed_in_user().is_some()
    }
}

/// Text shown for a refused login: the body's `error`, then `message`.
fn rejection_message(body: &Value) -> String {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(LOGIN_FAILED)
        .to_string()
}
