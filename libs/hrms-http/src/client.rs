use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use tower::Service;
use tower::buffer::Buffer;

pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// `Buffer<Req, F>` over the boxed inner stack
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// HTTP client over a tower middleware stack
///
/// `Clone + Send + Sync`; cloning only clones the buffer channel, so store it
/// directly without a `Mutex`. Build one with [`HttpClient::builder`].
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) transport_security: TransportSecurity,
}

impl HttpClient {
    /// Client with the default configuration
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Start a request with an arbitrary method.
    ///
    /// `url` must be absolute; relative URLs fail with
    /// [`HttpError::InvalidUri`] at send time.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            method,
            url.to_owned(),
            self.transport_security,
        )
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }
}

/// An `HttpError` from the inner stack passes through; anything else means
/// the buffer worker is gone.
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(err) => {
            tracing::error!(error = %err, "buffer worker closed unexpectedly; service unavailable");
            HttpError::ServiceClosed
        }
    }
}

/// Poll the buffer once; a full buffer fails with `Overloaded` instead of
/// waiting for a slot.
pub async fn try_acquire_buffer_slot(service: &mut BufferedService) -> Result<(), HttpError> {
    use std::task::Poll;

    let polled = std::future::poll_fn(|cx| match service.poll_ready(cx) {
        Poll::Ready(result) => Poll::Ready(Some(result)),
        Poll::Pending => Poll::Ready(None),
    })
    .await;

    match polled {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(map_buffer_error(e)),
        None => Err(HttpError::Overloaded),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::HttpClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn test_client() -> HttpClient {
        HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .build()
            .unwrap()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[tokio::test]
    async fn get_with_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/dashboard.php")
                .query_param("type", "stats")
                .header("x-auth-token", "t1");
            then.status(200).json_body(json!({"success": true}));
        });

        let url = format!("{}/api/dashboard.php?type=stats", server.base_url());
        let resp = test_client()
            .get(&url)
            .header("x-auth-token", "t1")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
        mock.assert();
    }

    #[tokio::test]
    async fn post_json_sets_content_type() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/login.php")
                .header("content-type", "application/json")
                .json_body(json!({"email": "a@b.c", "password": "pw"}));
            then.status(200).body("{}");
        });

        let url = format!("{}/api/login.php", server.base_url());
        let resp = test_client()
            .post(&url)
            .json(&json!({"email": "a@b.c", "password": "pw"}))
            .unwrap()
            .send()
            .await
            .unwrap();

        assert!(resp.status().is_success());
        mock.assert();
    }

    #[tokio::test]
    async fn arbitrary_method_and_raw_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/profile.php")
                .header("content-type", "text/plain")
                .body("hello");
            then.status(204);
        });

        let url = format!("{}/api/profile.php", server.base_url());
        let resp = test_client()
            .request(http::Method::PUT, &url)
            .header("content-type", "text/plain")
            .body_string("hello".to_owned())
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);
        mock.assert();
    }

    #[tokio::test]
    async fn non_2xx_is_ok_until_checked() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/api/employees.php");
            then.status(401).body(r#"{"message":"expired"}"#);
        });

        let url = format!("{}/api/employees.php", server.base_url());
        let resp = test_client()
            .request(http::Method::DELETE, &url)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::UNAUTHORIZED);

        let err = resp.text().await.unwrap_err();
        assert_eq!(err.status(), Some(http::StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn custom_user_agent_is_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ua").header("user-agent", "hrms-test/1.0");
            then.status(200);
        });

        let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .user_agent("hrms-test/1.0")
            .build()
            .unwrap();
        client
            .get(&format!("{}/ua", server.base_url()))
            .send()
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn gzip_body_is_decompressed() {
        let server = MockServer::start();
        let original = br#"{"token":"fresh"}"#;
        server.mock(|when, then| {
            when.method(POST).path("/api/refresh.php");
            then.status(200)
                .header("content-encoding", "gzip")
                .header("content-type", "application/json")
                .body(gzip(original));
        });

        let url = format!("{}/api/refresh.php", server.base_url());
        let body = test_client().post(&url).send().await.unwrap().bytes().await.unwrap();
        assert_eq!(body.as_ref(), original);
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500));
        });

        let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = client
            .get(&format!("{}/slow", server.base_url()))
            .send()
            .await
            .unwrap_err();

        assert!(matches!(err, HttpError::Timeout(_)), "got {err:?}");
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Port 9 (discard) is closed on test hosts
        let err = test_client()
            .get("http://127.0.0.1:9/api/profile.php")
            .send()
            .await
            .unwrap_err();
        assert!(err.is_network(), "got {err:?}");
    }

    #[tokio::test]
    async fn http_rejected_when_tls_only() {
        let client = HttpClientBuilder::new().build().unwrap();
        let err = client.get("http://hr.local/api").send().await.unwrap_err();
        match err {
            HttpError::InvalidScheme { scheme, .. } => assert_eq!(scheme, "http"),
            other => panic!("expected InvalidScheme, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn relative_url_rejected() {
        let err = test_client().get("/api/profile.php").send().await.unwrap_err();
        assert!(matches!(
            err,
            HttpError::InvalidUri {
                kind: crate::InvalidUriKind::MissingAuthority,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn invalid_header_is_deferred_to_send() {
        let err = test_client()
            .get("http://127.0.0.1:9/")
            .header("bad header", "v")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderName(_)));
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_client() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/leave.php");
            then.status(200).body("[]");
        });

        let client = test_client();
        let url = format!("{}/api/leave.php", server.base_url());
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let client = client.clone();
                let url = url.clone();
                tokio::spawn(async move { client.get(&url).send().await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(resp) if resp.status().is_success() => ok += 1,
                Err(HttpError::Overloaded) => {}
                other => panic!("unexpected result: {:?}", other.map(|r| r.status())),
            }
        }
        assert!(ok > 0);
        assert_eq!(mock.calls(), ok);
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<HttpClient>();
    }

    #[test]
    fn buffer_error_mapping() {
        let timeout: tower::BoxError = Box::new(HttpError::Timeout(Duration::from_secs(1)));
        assert!(matches!(map_buffer_error(timeout), HttpError::Timeout(_)));

        let other: tower::BoxError = Box::new(std::io::Error::other("worker died"));
        assert!(matches!(map_buffer_error(other), HttpError::ServiceClosed));
    }
}
