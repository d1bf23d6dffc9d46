//! HTTP/1.1 client for the locator bridge.
//!
//! Opens one connection per call. Timeouts for location queries are
//! enforced by the caller; the configured value is forwarded to the bridge
//! so it can give up on the vendor side too.

use std::time::Duration;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Full, Limited};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use tracing::debug;

use findmy_core::{
    Device, DeviceDirectory, DeviceListing, LocateError, LocateFuture, LocateResult,
    LocationReport, LocationSource,
};

/// Longest slice of an error body kept in [`LocateError::Status`].
const MAX_ERROR_BODY: usize = 256;

/// Largest response body read from the bridge.
const MAX_RESPONSE_BODY: usize = 8 * 1024 * 1024;

/// Client for a locator bridge at a fixed base URL.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    /// `host:port` to connect to.
    address: String,
    /// Value for the `Host` header.
    authority: String,
    /// Path prefix without a trailing slash.
    base_path: String,
}

/// Body of `POST /locate`.
#[derive(Serialize)]
struct LocateRequest<'a> {
    device_id: &'a str,
    device_name: &'a str,
    timeout_seconds: f64,
    print_output: bool,
}

impl BridgeClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:9825`).
    pub fn new(base_url: &str) -> LocateResult<Self> {
        let uri: Uri = base_url
            .parse()
            .map_err(|e| LocateError::InvalidUrl(format!("{base_url}: {e}")))?;

        if uri.scheme_str() != Some("http") {
            return Err(LocateError::InvalidUrl(format!(
                "{base_url}: only http:// is supported"
            )));
        }

        let authority = uri
            .authority()
            .ok_or_else(|| LocateError::InvalidUrl(format!("{base_url}: missing host")))?;

        let address = match authority.port_u16() {
            Some(_) => authority.as_str().to_string(),
            None => format!("{}:80", authority.host()),
        };

        Ok(Self {
            address,
            authority: authority.as_str().to_string(),
            base_path: uri.path().trim_end_matches('/').to_string(),
        })
    }

    /// The `host:port` this client connects to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Send one request and return the body of a 2xx response.
    async fn send(&self, method: Method, path: &str, json: Option<Vec<u8>>) -> LocateResult<Bytes> {
        let uri = format!("{}{path}", self.base_path);

        let stream = tokio::net::TcpStream::connect(&self.address)
            .await
            .map_err(|source| LocateError::Connect {
                address: self.address.clone(),
                source,
            })?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake::<_, Full<Bytes>>(io)
            .await
            .map_err(|e| LocateError::Http(e.to_string()))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "locator connection closed with error");
            }
        });

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(uri.as_str())
            .header(HOST, self.authority.as_str())
            .header(USER_AGENT, concat!("findmy-exporter/", env!("CARGO_PKG_VERSION")));

        let body = match json {
            Some(payload) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Bytes::from(payload)
            }
            None => Bytes::new(),
        };

        let req = builder
            .body(Full::new(body))
            .map_err(|e| LocateError::Http(e.to_string()))?;

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| LocateError::Http(e.to_string()))?;

        let status = resp.status();
        let bytes = Limited::new(resp.into_body(), MAX_RESPONSE_BODY)
            .collect()
            .await
            .map_err(|e| LocateError::Http(e.to_string()))?
            .to_bytes();

        if !status.is_success() {
            debug!(%status, %method, %uri, "locator returned non-2xx");
            let snippet = &bytes[..bytes.len().min(MAX_ERROR_BODY)];
            return Err(LocateError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(snippet).into_owned(),
            });
        }

        Ok(bytes)
    }
}

impl DeviceDirectory for BridgeClient {
    fn list_devices(&self) -> LocateFuture<'_, DeviceListing> {
        Box::pin(async move {
            let body = self.send(Method::GET, "/devices", None).await?;
            DeviceListing::decode(&body)
        })
    }
}

impl LocationSource for BridgeClient {
    fn locate<'a>(
        &'a self,
        device: &'a Device,
        timeout: Duration,
    ) -> LocateFuture<'a, Vec<LocationReport>> {
        Box::pin(async move {
            let payload = serde_json::to_vec(&LocateRequest {
                device_id: &device.id,
                device_name: &device.name,
                timeout_seconds: timeout.as_secs_f64(),
                print_output: false,
            })?;
            let body = self.send(Method::POST, "/locate", Some(payload)).await?;
            LocationReport::decode_all(&body)
        })
    }
}
