//! Response capture from reqwest.
//!
//! The HTTP client stays with the caller; this adapter only turns a
//! received `reqwest::Response` into the domain `Response` under test.

use verdict_domain::Response;

/// Errors that can occur while capturing a response.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Reading the body failed.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        /// URL of the response.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
}

/// Reads the status and full body of `response`.
///
/// The body is parsed as JSON when possible, see [`Response::from_bytes`].
///
/// # Errors
///
/// Returns [`CaptureError::Body`] if the body cannot be read.
pub async fn capture_response(response: reqwest::Response) -> Result<Response, CaptureError> {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    tracing::debug!(target: "verdict", status, %url, "capturing response");

    let bytes = response
        .bytes()
        .await
        .map_err(|source| CaptureError::Body { url, source })?;

    Ok(Response::from_bytes(status, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP/1.1 reply and returns the URL.
    async fn serve_once(status: &'static str, content_type: &'static str, body: &'static str) -> String {
        serve_raw(format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ))
        .await
    }

    /// Writes `reply` verbatim to the first connection, then closes it.
    async fn serve_raw(reply: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("local address");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept connection");
            let mut request = Vec::new();
            let mut chunk = [0_u8; 1024];
            loop {
                let read = socket.read(&mut chunk).await.expect("read request");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            socket.write_all(reply.as_bytes()).await.expect("write reply");
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/")
    }

    fn client() -> reqwest::Client {
        reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client should build")
    }

    #[tokio::test]
    async fn test_capture_json_body() {
        let url = serve_once("201 Created", "application/json", r#"{"id": 7, "tags": ["a"]}"#).await;
        let response = client().get(&url).send().await.expect("request should succeed");

        let captured = capture_response(response).await.expect("capture should succeed");
        assert_eq!(captured.status(), 201);
        assert_eq!(captured.body(), &json!({"id": 7, "tags": ["a"]}));
    }

    #[tokio::test]
    async fn test_capture_text_body() {
        let url = serve_once("503 Service Unavailable", "text/plain", "try later").await;
        let response = client().get(&url).send().await.expect("request should succeed");

        let captured = capture_response(response).await.expect("capture should succeed");
        assert_eq!(captured.status(), 503);
        assert_eq!(captured.body(), &json!("try later"));
    }

    #[tokio::test]
    async fn test_capture_truncated_body_fails() {
        let url = serve_raw(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"id\""
                .to_string(),
        )
        .await;
        let response = client().get(&url).send().await.expect("headers should arrive");

        let result = capture_response(response).await;
        assert!(
            matches!(&result, Err(CaptureError::Body { url: failed, .. }) if *failed == url),
            "unexpected capture result: {result:?}"
        );
    }
}
