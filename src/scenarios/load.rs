//! Load scenario: ten users, then fifty, through the full authenticated flow.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::SetupData;
use crate::client::{ApiRequest, Endpoint, Headers, Session, Transport};
use crate::helpers::{auth_headers, login_request, register_request};
use crate::profile::Stage;

pub const STAGES: &[Stage] = &[
    Stage::mins(2, 10),
    Stage::mins(5, 10),
    Stage::mins(2, 50),
    Stage::mins(5, 50),
    Stage::mins(2, 0),
];

#[derive(Debug, Serialize)]
pub struct ArticleBody<'a> {
    pub article: NewArticle<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle<'a> {
    pub title: String,
    pub description: &'a str,
    pub body: &'a str,
    pub tag_list: &'a [&'a str],
}

/// Outcome of the create-article step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleCreation {
    /// Status 200/201 with an `article.slug` in the body
    Created { slug: String },
    Failed,
}

/// Obtain the token every iteration shares.
///
/// Tries the setup credentials, then the test user's, and only registers the
/// test user when neither login yields a token. Setup requests count toward
/// run metrics but record no checks.
pub async fn setup<T: Transport>(session: &mut Session<'_, T>) -> SetupData {
    let config = session.config();
    let request = login_request(session, &config.setup_user.email, &config.setup_user.password);
    let mut token = token_from(session, request).await;

    if token.is_none() {
        tracing::info!(
            email = %config.test_user.email,
            "setup login returned no token, trying test user"
        );
        let request = login_request(session, &config.test_user.email, &config.test_user.password);
        token = token_from(session, request).await;
    }

    if token.is_none() {
        tracing::info!(email = %config.test_user.email, "registering test user");
        let request = register_request(
            session,
            &config.test_user.email,
            &config.test_user.username,
            &config.test_user.password,
        );
        token = token_from(session, request).await;
    }

    if token.is_none() {
        tracing::error!("setup could not obtain a token; authenticated calls will fail");
    }
    SetupData { token }
}

async fn token_from<T: Transport>(session: &mut Session<'_, T>, request: ApiRequest) -> Option<String> {
    session.send(request).await.json_str("user.token")
}

pub async fn iteration<T: Transport>(session: &mut Session<'_, T>, setup: &SetupData) {
    let headers = auth_headers(setup.token.as_deref().unwrap_or_default());

    let request = session.request(Endpoint::ListArticles).with_headers(&headers);
    let response = session.send(request).await;
    session.check("articles list status is 200", response.status == 200);
    session.check("articles list has data", response.has_value("articles"));
    session.think(1).await;

    let request = session.request(Endpoint::ListTags).with_headers(&headers);
    let response = session.send(request).await;
    session.check("tags status is 200", response.status == 200);
    session.think(1).await;

    let request = session.request(Endpoint::CurrentUser).with_headers(&headers);
    let response = session.send(request).await;
    session.check("current user status is 200", response.status == 200);
    session.think(1).await;

    let ArticleCreation::Created { slug } = create_article(session, &headers).await else {
        return;
    };

    let request = session
        .request(Endpoint::GetArticle { slug: slug.clone() })
        .with_headers(&headers);
    let response = session.send(request).await;
    session.check("get article status is 200", response.status == 200);
    session.think(1).await;

    let request = session
        .request(Endpoint::FavoriteArticle { slug })
        .with_headers(&headers);
    let response = session.send(request).await;
    session.check("favorite successful", response.status == 200);
    session.think(1).await;
}

/// Create a uniquely titled article and report its slug.
pub async fn create_article<T: Transport>(
    session: &mut Session<'_, T>,
    headers: &Headers,
) -> ArticleCreation {
    let request = session
        .request(Endpoint::CreateArticle)
        .with_headers(headers)
        .with_json(&ArticleBody {
            article: NewArticle {
                title: format!("Test Article {}", unix_millis()),
                description: "Performance test article",
                body: "This is a test article for performance testing",
                tag_list: &["test", "performance"],
            },
        });
    let response = session.send(request).await;
    let created = session.check("article created", matches!(response.status, 200 | 201));

    match response.json_str("article.slug") {
        Some(slug) if created => ArticleCreation::Created { slug },
        None if created => {
            tracing::warn!(status = response.status, "article created without a slug");
            ArticleCreation::Failed
        }
        _ => ArticleCreation::Failed,
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
