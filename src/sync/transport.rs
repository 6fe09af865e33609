use url::Url;

use crate::error::{SyncError, SyncResult};

/// Completion callback for a request; receives the response body on success
pub type ResponseCallback = Box<dyn FnOnce(SyncResult<Vec<u8>>) + Send + 'static>;

/// Outgoing request body
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// `application/json`
    Json(Vec<u8>),
    /// `application/x-www-form-urlencoded`
    Form(String),
}

impl Body {
    pub fn content_type(&self) -> &'static str {
        match self {
            Body::Json(_) => "application/json",
            Body::Form(_) => "application/x-www-form-urlencoded; charset=UTF-8",
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Json(bytes) => bytes,
            Body::Form(text) => text.into_bytes(),
        }
    }
}

/// Non-blocking HTTP access. Implementations must invoke `on_done` exactly once.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url, on_done: ResponseCallback);

    fn post(&self, url: &Url, body: Body, on_done: ResponseCallback);
}

/// Transport backed by `ehttp`: background threads natively, `fetch` on the web
#[derive(Debug, Default, Clone, Copy)]
pub struct EhttpTransport;

const ACCEPT: &str = "application/json, text/plain, */*";

impl EhttpTransport {
    fn finish(url: String, result: ehttp::Result<ehttp::Response>) -> SyncResult<Vec<u8>> {
        match result {
            Err(reason) => Err(SyncError::Transport { url, reason }),
            Ok(response) if !response.ok => Err(SyncError::Status {
                url,
                status: response.status,
                status_text: response.status_text,
            }),
            Ok(response) => Ok(response.bytes),
        }
    }
}

impl Transport for EhttpTransport {
    fn get(&self, url: &Url, on_done: ResponseCallback) {
        let mut request = ehttp::Request::get(url.as_str());
        request.headers = ehttp::Headers::new(&[("Accept", ACCEPT)]);

        let url = url.to_string();
        ehttp::fetch(request, move |result| on_done(Self::finish(url, result)));
    }

    fn post(&self, url: &Url, body: Body, on_done: ResponseCallback) {
        let content_type = body.content_type();
        let mut request = ehttp::Request::post(url.as_str(), body.into_bytes());
        request.headers = ehttp::Headers::new(&[("Accept", ACCEPT), ("Content-Type", content_type)]);

        let url = url.to_string();
        ehttp::fetch(request, move |result| on_done(Self::finish(url, result)));
    }
}
