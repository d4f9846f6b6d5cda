//! Transport backed by a goose virtual user.

use async_trait::async_trait;
use goose::prelude::*;

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};

/// Sends requests through the `GooseUser` running the current iteration, so
/// goose records them under the endpoint's metric name.
pub struct GooseTransport<'u> {
    user: &'u mut GooseUser,
}

impl<'u> GooseTransport<'u> {
    pub fn new(user: &'u mut GooseUser) -> Self {
        Self { user }
    }
}

#[async_trait]
impl Transport for GooseTransport<'_> {
    async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = match request.method {
            Method::Get => GooseMethod::Get,
            Method::Post => GooseMethod::Post,
        };

        let mut request_builder = self
            .user
            .get_request_builder(&method, &request.url)
            .map_err(|e| TransportError::new(e.to_string()))?;
        for (name, value) in &request.headers {
            request_builder = request_builder.header(*name, value.as_str());
        }
        if let Some(body) = request.body.clone() {
            request_builder = request_builder.body(body);
        }

        let goose_request = GooseRequest::builder()
            .method(method)
            .path(request.url.as_str())
            .name(request.name)
            .set_request_builder(request_builder)
            .build();
        let goose_response = self
            .user
            .request(goose_request)
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let response = goose_response
            .response
            .map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}
