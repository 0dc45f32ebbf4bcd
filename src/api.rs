//! HTTP client for the Smart Brain backend.
//!
//! The backend owns accounts and proxies image submissions to the
//! face-detection service; this client only speaks its JSON contract:
//!
//! - `POST /signin`, `POST /register` — return a user record carrying `id`
//!   on success, an `id`-less shape on refusal
//! - `POST /imageurl` — returns the raw detection payload, passed through
//!   uninterpreted (see [`crate::interpret`])
//! - `PUT /image` — bumps and returns the account's entry count
//! - `GET /profile` — returns the user record

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::session::User;

/// Failure kinds exposed by the backend client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network failure or a non-2xx status; retryable.
    #[error("backend request failed: {0}")]
    Transport(String),
    /// The backend answered but refused the operation (bad credentials,
    /// rejected registration).
    #[error("{0}")]
    Rejected(String),
    /// A successful response whose body did not match the documented shape.
    #[error("malformed backend response: {0}")]
    Shape(String),
}

#[derive(Serialize)]
struct SigninRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct ImageUrlRequest<'a> {
    input: &'a str,
}

#[derive(Serialize)]
struct ImageCountRequest {
    id: i64,
}

/// Blocking client for the backend contract.
///
/// All requests are JSON over a shared agent carrying the configured
/// transport timeout, so a hung backend cannot wedge the caller forever.
pub struct BackendClient {
    base_url: String,
    agent: ureq::Agent,
}

impl BackendClient {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticate against `POST /signin`.
    ///
    /// A response shape lacking `id` means the credentials were refused,
    /// not that the response was malformed.
    pub fn signin(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let response = self
            .agent
            .post(&self.endpoint("/signin"))
            .send_json(SigninRequest { email, password })
            .map_err(transport)?;
        user_from_response(response, "sign-in refused; check email and password")
    }

    /// Create an account via `POST /register`; same acceptance rule as
    /// [`BackendClient::signin`].
    pub fn register(&self, email: &str, password: &str, name: &str) -> Result<User, ApiError> {
        let response = self
            .agent
            .post(&self.endpoint("/register"))
            .send_json(RegisterRequest {
                email,
                password,
                name,
            })
            .map_err(transport)?;
        user_from_response(response, "registration refused by the backend")
    }

    /// Submit an image URL for detection via `POST /imageurl` and return the
    /// raw detection payload.
    ///
    /// The detection service reports its own failures as an error-shaped
    /// body under a non-2xx status, so status errors still surface their
    /// body here; interpretation of that payload is the caller's job.
    pub fn submit_image_url(&self, image_url: &str) -> Result<Value, ApiError> {
        let response = self
            .agent
            .post(&self.endpoint("/imageurl"))
            .send_json(ImageUrlRequest { input: image_url });
        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(err) => return Err(transport(err)),
        };
        detection_payload(response)
    }

    /// Bump the account's entry count via `PUT /image`; returns the updated
    /// count.
    pub fn increment_entries(&self, user_id: i64) -> Result<i64, ApiError> {
        let response = self
            .agent
            .put(&self.endpoint("/image"))
            .send_json(ImageCountRequest { id: user_id })
            .map_err(transport)?;
        let value: Value = response
            .into_json()
            .map_err(|err| ApiError::Shape(err.to_string()))?;
        value
            .as_i64()
            .ok_or_else(|| ApiError::Shape(format!("expected an entry count, got {value}")))
    }

    /// Fetch the user record via `GET /profile`.
    pub fn profile(&self) -> Result<User, ApiError> {
        let response = self
            .agent
            .get(&self.endpoint("/profile"))
            .call()
            .map_err(transport)?;
        user_from_response(response, "profile unavailable")
    }
}

fn transport(err: ureq::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn user_from_response(response: ureq::Response, refused: &str) -> Result<User, ApiError> {
    let value: Value = response
        .into_json()
        .map_err(|err| ApiError::Shape(err.to_string()))?;
    if value.get("id").is_none() {
        return Err(ApiError::Rejected(refused.to_string()));
    }
    serde_json::from_value(value).map_err(|err| ApiError::Shape(err.to_string()))
}

fn detection_payload(response: ureq::Response) -> Result<Value, ApiError> {
    let body = response
        .into_string()
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    // Non-JSON bodies become a string payload so error-marker text still
    // reaches the interpreter.
    Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
}
