//! Transport seam between the request dispatcher and the network.
//!
//! The client only ever hands a fully signed [`ApiRequest`] to a
//! [`Transport`] and expects an [`Envelope`] back. [`HttpTransport`] is the
//! production implementation; tests plug in stubs.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, header};

use crate::error::TransportError;
use crate::types::{Envelope, Method};

/// A signed request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL; carries the query string for GET.
    pub target: String,
    /// Form body for POST.
    pub body: Option<String>,
}

pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Envelope, TransportError>>;
}

pub struct HttpTransport {
    http_client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join base URL and target with exactly one `/` between them.
    fn url_for(&self, target: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            target.trim_start_matches('/')
        )
    }

    async fn execute(&self, request: ApiRequest) -> Result<Envelope, TransportError> {
        let url = self.url_for(&request.target);

        let builder = match request.method {
            Method::Get => self.http_client.get(&url),
            Method::Post => self
                .http_client
                .post(&url)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(request.body.unwrap_or_default()),
        };

        let response = builder
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Error envelopes are surfaced as such even when the status is not 2xx.
        match serde_json::from_str::<Envelope>(&body) {
            Ok(envelope) if status.is_success() || !envelope.success => Ok(envelope),
            Ok(_) => Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(TransportError::Decode(e)),
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Envelope, TransportError>> {
        Box::pin(self.execute(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        Router,
        extract::RawQuery,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::json;

    async fn spawn_mock_api() -> String {
        let app = Router::new()
            .route(
                "/v0/users/list",
                get(|RawQuery(query): RawQuery| async move {
                    axum::Json(json!({"success": true, "data": {"query": query}}))
                }),
            )
            .route(
                "/v0/users/create",
                post(|headers: HeaderMap, body: String| async move {
                    let content_type = headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    axum::Json(json!({
                        "success": true,
                        "data": {"body": body, "content_type": content_type}
                    }))
                }),
            )
            .route(
                "/v0/users/edit",
                post(|| async {
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        axum::Json(json!({"success": false, "err": "invalid uuid"})),
                    )
                        .into_response()
                }),
            )
            .route("/v0/broken", get(|| async { "<html>oops</html>" }))
            .route(
                "/v0/down",
                get(|| async { (StatusCode::BAD_GATEWAY, "upstream down").into_response() }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v0/", addr)
    }

    #[test]
    fn test_url_join() {
        let transport = HttpTransport::new("http://www.demo.com/").unwrap();
        assert_eq!(
            transport.url_for("/users/list?a=b"),
            "http://www.demo.com/users/list?a=b"
        );
        let transport = HttpTransport::new("http://www.demo.com").unwrap();
        assert_eq!(transport.url_for("users/list"), "http://www.demo.com/users/list");
        assert_eq!(transport.base_url(), "http://www.demo.com");
    }

    #[tokio::test]
    async fn test_get_sends_query_in_url() {
        let transport = HttpTransport::new(spawn_mock_api().await).unwrap();
        let envelope = transport
            .send(ApiRequest {
                method: Method::Get,
                target: "/users/list?api_key=apikey&page_no=1".into(),
                body: None,
            })
            .await
            .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data["query"], json!("api_key=apikey&page_no=1"));
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let transport = HttpTransport::new(spawn_mock_api().await).unwrap();
        let envelope = transport
            .send(ApiRequest {
                method: Method::Post,
                target: "/users/create".into(),
                body: Some("api_key=apikey&name=demo&signature=abc".into()),
            })
            .await
            .unwrap();

        assert_eq!(
            envelope.data["body"],
            json!("api_key=apikey&name=demo&signature=abc")
        );
        assert_eq!(
            envelope.data["content_type"],
            json!("application/x-www-form-urlencoded")
        );
    }

    #[tokio::test]
    async fn test_error_envelope_on_client_error_status() {
        let transport = HttpTransport::new(spawn_mock_api().await).unwrap();
        let envelope = transport
            .send(ApiRequest {
                method: Method::Post,
                target: "/users/edit".into(),
                body: Some(String::new()),
            })
            .await
            .unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.error_message(), "invalid uuid");
    }

    #[tokio::test]
    async fn test_non_json_and_bad_status() {
        let base = spawn_mock_api().await;
        let transport = HttpTransport::new(base).unwrap();

        let err = transport
            .send(ApiRequest {
                method: Method::Get,
                target: "/broken".into(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));

        let err = transport
            .send(ApiRequest {
                method: Method::Get,
                target: "/down".into(),
                body: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 502, .. }));
    }
}
