use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::from_str;
use tracing::debug;

use crate::error::{RagError, Result};

/// Blocking JSON client shared by the service backends.
///
/// No timeout is set here, so every call uses reqwest's default.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_headers(&[])
    }

    /// Builds a client that sends `headers` on every request. Values are
    /// marked sensitive so they never show up in debug output.
    pub fn with_headers(headers: &[(&'static str, &str)]) -> Result<Self> {
        let mut map = HeaderMap::new();
        for &(name, value) in headers {
            let mut value = HeaderValue::from_str(value).map_err(|e| RagError::InvalidSetting {
                name,
                reason: e.to_string(),
            })?;
            value.set_sensitive(true);
            map.insert(HeaderName::from_static(name), value);
        }
        let client = Client::builder().default_headers(map).build()?;
        Ok(Self { client })
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        send("GET", url, self.client.get(url))
    }

    pub fn post_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        send("POST", url, self.client.post(url).header(CONTENT_TYPE, "application/json").json(body))
    }

    pub fn put_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        send("PUT", url, self.client.put(url).header(CONTENT_TYPE, "application/json").json(body))
    }
}

fn send<T: DeserializeOwned>(method: &'static str, url: &str, req: RequestBuilder) -> Result<T> {
    debug!(method, url, "sending request");
    let resp = req.send()?;
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    if !status.is_success() {
        return Err(RagError::Status {
            method,
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }
    from_str::<T>(&text).map_err(|source| RagError::Decode {
        method,
        url: url.to_string(),
        source,
        body: text,
    })
}
