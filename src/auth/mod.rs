//! Login, registration and logout against the backend's public endpoints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::http::{ApiClient, ApiRequest};
use crate::models::required;

/// Pages a controller can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Login,
    Register,
    Recipes,
    Ingredients,
}

/// Where to go next, and how long to wait first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub page: Page,
    pub after: Duration,
}

#[derive(Debug, Clone, Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<()> {
        required("username", &self.username)?;
        required("email", &self.email)?;
        required("password", &self.password)?;
        if self.password != self.repeat_password {
            return Err(ClientError::validation("passwords must match"));
        }
        Ok(())
    }
}

/// Split a `/login` body of the form `"<token> <isAdmin>"`.
///
/// A missing flag reads as non-admin; a missing token is an error.
pub fn parse_login_body(body: &str) -> Result<(String, bool)> {
    let mut parts = body.split_whitespace();
    let token = parts
        .next()
        .ok_or_else(|| ClientError::Decode("login response carried no token".to_string()))?;
    let is_admin = parts.next() == Some("true");
    Ok((token.to_string(), is_admin))
}

pub struct AuthController {
    client: ApiClient,
    redirect_delay: Duration,
}

impl AuthController {
    pub fn new(client: ApiClient, redirect_delay: Duration) -> Self {
        Self {
            client,
            redirect_delay,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Authenticate and record the session. On any failure the session is
    /// left exactly as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<Navigation> {
        required("username", username)?;
        required("password", password)?;

        let request = ApiRequest::post("/login")
            .anonymous()
            .json(&LoginBody { username, password })?;
        let response = self.client.send(request).await?;
        if response.status != 200 {
            tracing::warn!(status = response.status, "unexpected login status");
            return Err(ClientError::UnexpectedStatus(response.status));
        }

        let (token, is_admin) = parse_login_body(&response.body)?;
        self.client.session().set_session(&token, is_admin)?;
        tracing::info!(username, is_admin, "logged in");

        Ok(Navigation {
            page: Page::Recipes,
            after: self.redirect_delay,
        })
    }

    pub async fn register(&self, form: &RegistrationForm) -> Result<Navigation> {
        form.validate()?;

        let request = ApiRequest::post("/register").anonymous().json(&RegisterBody {
            username: &form.username,
            email: &form.email,
            password: &form.password,
        })?;
        let response = self.client.send(request).await?;
        if response.status != 201 {
            tracing::warn!(status = response.status, "unexpected registration status");
            return Err(ClientError::UnexpectedStatus(response.status));
        }

        tracing::info!(username = %form.username, "registered");
        Ok(Navigation {
            page: Page::Login,
            after: self.redirect_delay,
        })
    }

    /// Tell the server, then drop the local session. A rejected logout keeps
    /// the session so the user can try again.
    pub async fn logout(&self) -> Result<Navigation> {
        self.client.send(ApiRequest::post("/logout")).await?;
        self.client.session().clear()?;
        tracing::info!("logged out");

        Ok(Navigation {
            page: Page::Login,
            after: Duration::ZERO,
        })
    }
}
