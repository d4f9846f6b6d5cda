//! Conduit API endpoints exercised by the scenarios (all under the `/api` base).

use super::Method;

/// One API operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /users`
    Register,
    /// `POST /users/login`
    Login,
    /// `GET /user`
    CurrentUser,
    /// `GET /articles`
    ListArticles,
    /// `GET /articles/{slug}`
    GetArticle { slug: String },
    /// `POST /articles`
    CreateArticle,
    /// `POST /articles/{slug}/favorite`
    FavoriteArticle { slug: String },
    /// `GET /tags`
    ListTags,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Register
            | Endpoint::Login
            | Endpoint::CreateArticle
            | Endpoint::FavoriteArticle { .. } => Method::Post,
            Endpoint::CurrentUser
            | Endpoint::ListArticles
            | Endpoint::GetArticle { .. }
            | Endpoint::ListTags => Method::Get,
        }
    }

    /// Path relative to the API base; slugs are percent-encoded
    pub fn path(&self) -> String {
        match self {
            Endpoint::Register => "/users".to_string(),
            Endpoint::Login => "/users/login".to_string(),
            Endpoint::CurrentUser => "/user".to_string(),
            Endpoint::ListArticles | Endpoint::CreateArticle => "/articles".to_string(),
            Endpoint::GetArticle { slug } => format!("/articles/{}", urlencoding::encode(slug)),
            Endpoint::FavoriteArticle { slug } => {
                format!("/articles/{}/favorite", urlencoding::encode(slug))
            }
            Endpoint::ListTags => "/tags".to_string(),
        }
    }

    /// Stable metric name; path parameters stay templated so every slug
    /// aggregates under one entry
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Register => "POST /users",
            Endpoint::Login => "POST /users/login",
            Endpoint::CurrentUser => "GET /user",
            Endpoint::ListArticles => "GET /articles",
            Endpoint::GetArticle { .. } => "GET /articles/{slug}",
            Endpoint::CreateArticle => "POST /articles",
            Endpoint::FavoriteArticle { .. } => "POST /articles/{slug}/favorite",
            Endpoint::ListTags => "GET /tags",
        }
    }
}
