//! API client helpers shared by the scenarios: registration, login and the
//! authorization headers every authenticated call carries.

use serde::Serialize;

use crate::client::{
    ApiRequest, Endpoint, Headers, Session, Transport, APPLICATION_JSON, AUTHORIZATION, CONTENT_TYPE,
};

/// `{"user": {...}}` envelope used by the users endpoints
#[derive(Debug, Serialize)]
pub struct UserBody<T> {
    pub user: T,
}

#[derive(Debug, Serialize)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /users` request for the given user
pub fn register_request<T: Transport>(
    session: &Session<'_, T>,
    email: &str,
    username: &str,
    password: &str,
) -> ApiRequest {
    session.request(Endpoint::Register).with_json(&UserBody {
        user: NewUser {
            email,
            username,
            password,
        },
    })
}

/// `POST /users/login` request for the given credentials
pub fn login_request<T: Transport>(session: &Session<'_, T>, email: &str, password: &str) -> ApiRequest {
    session.request(Endpoint::Login).with_json(&UserBody {
        user: LoginUser { email, password },
    })
}

/// Register a user and return the token from the response.
///
/// Issues exactly one `POST /users` and records the
/// `"registration successful"` check (status 200 or 201). Returns `None` when
/// the body has no `user.token`; there is no retry.
pub async fn register_user<T: Transport>(
    session: &mut Session<'_, T>,
    email: &str,
    username: &str,
    password: &str,
) -> Option<String> {
    let request = register_request(session, email, username, password);
    let response = session.send(request).await;
    session.check("registration successful", matches!(response.status, 200 | 201));
    response.json_str("user.token")
}

/// Log in and return the token from the response.
///
/// Issues exactly one `POST /users/login` and records the `"login successful"`
/// check (status 200). Returns `None` when the body has no `user.token`.
pub async fn login<T: Transport>(
    session: &mut Session<'_, T>,
    email: &str,
    password: &str,
) -> Option<String> {
    let request = login_request(session, email, password);
    let response = session.send(request).await;
    session.check("login successful", response.status == 200);
    response.json_str("user.token")
}

/// Headers for an authenticated JSON call: exactly `Content-Type` and
/// `Authorization: Token <token>`.
pub fn auth_headers(token: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert(CONTENT_TYPE, APPLICATION_JSON.to_string());
    headers.insert(AUTHORIZATION, format!("Token {token}"));
    headers
}
