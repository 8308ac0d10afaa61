//! Login and registration forms

use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ClientError;

pub const LOGIN_FAILED: &str = "Login failed. Check credentials.";
pub const LOGIN_NETWORK_ERROR: &str = "Network error during login.";
pub const REGISTER_FAILED: &str = "Registration failed.";
pub const REGISTER_NETWORK_ERROR: &str = "Network error during registration.";
pub const REGISTERED_LOGIN_FAILED: &str = "Registered but login failed";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// What a form submission produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Bearer token to hand to the session store
    Authenticated(String),
    /// Human-readable reason, never empty
    Rejected(String),
}

impl AuthOutcome {
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthOutcome::Authenticated(token) => Some(token),
            AuthOutcome::Rejected(_) => None,
        }
    }
}

enum LoginFailure {
    Rejected,
    Network,
}

/// Form-encoded login; returns the access token
async fn request_token(api: &ApiClient, credentials: &Credentials) -> Result<String, LoginFailure> {
    match api.login(&credentials.email, &credentials.password).await {
        Ok(token) if !token.access_token.is_empty() => Ok(token.access_token),
        Ok(_) => {
            tracing::warn!("Login response carried an empty token");
            Err(LoginFailure::Rejected)
        }
        Err(ClientError::Api { status, .. }) => {
            tracing::warn!(status, "Login rejected");
            Err(LoginFailure::Rejected)
        }
        Err(e) => {
            tracing::warn!("Login request failed: {}", e);
            Err(LoginFailure::Network)
        }
    }
}

/// Login page form state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub credentials: Credentials,
    submitting: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(email, password),
            ..Self::default()
        }
    }

    /// True while a request is in flight; the submit control is disabled.
    ///
    /// `submit` borrows the form mutably until the request settles, so nothing
    /// else can read the flag mid-flight. A front end that renders while a
    /// submission runs tracks that on its own side. Once `submit` returns the
    /// flag is always `false`.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self, api: &ApiClient) -> AuthOutcome {
        self.submitting = true;
        self.error = None;

        let outcome = match request_token(api, &self.credentials).await {
            Ok(token) => AuthOutcome::Authenticated(token),
            Err(LoginFailure::Rejected) => AuthOutcome::Rejected(LOGIN_FAILED.into()),
            Err(LoginFailure::Network) => AuthOutcome::Rejected(LOGIN_NETWORK_ERROR.into()),
        };

        self.finish(outcome)
    }

    fn finish(&mut self, outcome: AuthOutcome) -> AuthOutcome {
        if let AuthOutcome::Rejected(msg) = &outcome {
            self.error = Some(msg.clone());
        }
        self.submitting = false;
        outcome
    }
}

/// Register page form state. A successful registration logs in straight away.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub credentials: Credentials,
    submitting: bool,
    error: Option<String>,
}

impl RegisterForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(email, password),
            ..Self::default()
        }
    }

    /// See [`LoginForm::is_submitting`]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn submit(&mut self, api: &ApiClient) -> AuthOutcome {
        self.submitting = true;
        self.error = None;

        let outcome = self.register_then_login(api).await;

        if let AuthOutcome::Rejected(msg) = &outcome {
            self.error = Some(msg.clone());
        }
        self.submitting = false;
        outcome
    }

    async fn register_then_login(&self, api: &ApiClient) -> AuthOutcome {
        let creds = &self.credentials;
        match api.register(&creds.email, &creds.password).await {
            Ok(user) => tracing::info!(id = user.id, email = %user.email, "Registered, logging in"),
            Err(ClientError::Api { status, detail, .. }) => {
                let message = detail.unwrap_or_else(|| REGISTER_FAILED.to_string());
                tracing::warn!(status, "Registration rejected: {}", message);
                return AuthOutcome::Rejected(message);
            }
            Err(e) => {
                tracing::warn!("Register request failed: {}", e);
                return AuthOutcome::Rejected(REGISTER_NETWORK_ERROR.into());
            }
        }

        match request_token(api, creds).await {
            Ok(token) => AuthOutcome::Authenticated(token),
            Err(LoginFailure::Rejected) => AuthOutcome::Rejected(REGISTERED_LOGIN_FAILED.into()),
            Err(LoginFailure::Network) => AuthOutcome::Rejected(REGISTER_NETWORK_ERROR.into()),
        }
    }
}
