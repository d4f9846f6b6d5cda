use std::io::Read;
use std::thread;
use std::time::Duration;

use conduit_loadtest::client::{ApiRequest, Endpoint, HttpTransport, Transport};
use conduit_loadtest::config::LoadTestConfig;
use conduit_loadtest::helpers::auth_headers;
use serde_json::json;

struct Received {
    method: String,
    url: String,
    authorization: Option<String>,
    content_type: Option<String>,
    body: String,
}

/// Serve one request, answer with `status`/`body`, and hand back what arrived
fn serve_once(status: u16, body: &'static str) -> (String, thread::JoinHandle<Received>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let header = |name: &'static str| {
            request
                .headers()
                .iter()
                .find(|h| h.field.equiv(name))
                .map(|h| h.value.as_str().to_string())
        };
        let authorization = header("Authorization");
        let content_type = header("Content-Type");
        let method = request.method().to_string();
        let url = request.url().to_string();
        let mut received_body = String::new();
        request.as_reader().read_to_string(&mut received_body).unwrap();
        request
            .respond(tiny_http::Response::from_string(body).with_status_code(status))
            .unwrap();
        Received {
            method,
            url,
            authorization,
            content_type,
            body: received_body,
        }
    });
    (format!("http://{addr}/api"), handle)
}

fn config_for(base_url: &str) -> LoadTestConfig {
    LoadTestConfig::default().with_base_url(base_url).unwrap()
}

#[tokio::test]
async fn test_post_with_headers_and_body() {
    let (base_url, server) = serve_once(201, r#"{"article":{"slug":"hello-world"}}"#);
    let config = config_for(&base_url);
    let mut transport = HttpTransport::new(Duration::from_secs(5)).unwrap();

    let request = ApiRequest::new(&Endpoint::CreateArticle, &config)
        .with_headers(&auth_headers("abc123"))
        .with_json(&json!({"article": {"title": "Hello"}}));
    let response = transport.send(request).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.json_str("article.slug").as_deref(), Some("hello-world"));

    let received = server.join().unwrap();
    assert_eq!(received.method, "POST");
    assert_eq!(received.url, "/api/articles");
    assert_eq!(received.authorization.as_deref(), Some("Token abc123"));
    assert_eq!(received.content_type.as_deref(), Some("application/json"));
    assert_eq!(received.body, r#"{"article":{"title":"Hello"}}"#);
}

#[tokio::test]
async fn test_error_status_is_a_response_not_an_error() {
    let (base_url, server) = serve_once(404, r#"{"errors":{"article":["not found"]}}"#);
    let config = config_for(&base_url);
    let mut transport = HttpTransport::new(Duration::from_secs(5)).unwrap();

    let request = ApiRequest::new(
        &Endpoint::GetArticle {
            slug: "missing one".to_string(),
        },
        &config,
    );
    let response = transport.send(request).await.unwrap();

    assert_eq!(response.status, 404);
    let received = server.join().unwrap();
    assert_eq!(received.method, "GET");
    assert_eq!(received.url, "/api/articles/missing%20one");
    assert!(received.body.is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = config_for(&format!("http://127.0.0.1:{port}/api"));
    let mut transport = HttpTransport::new(Duration::from_secs(2)).unwrap();

    let result = transport
        .send(ApiRequest::new(&Endpoint::ListTags, &config))
        .await;

    assert!(result.is_err());
}
