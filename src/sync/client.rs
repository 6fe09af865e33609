use std::sync::Arc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use log::{info, warn};
use serde::Serialize;
use url::Url;

use super::protocol::{self, Endpoint, RoiResponse, SelectResponse, ViewResponse};
use super::select::SelectKind;
use super::transport::{Body, ResponseCallback, Transport};
use crate::error::SyncResult;
use crate::geometry::{RectRoi, RoiPoint};
use crate::texture_manager;

/// Results handed back to the UI thread
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A station or focus value was fetched
    SelectFetched {
        camera_id: String,
        kind: SelectKind,
        value: String,
        default_label: String,
    },
    /// A camera frame was fetched and decoded
    ViewFetched {
        camera_id: String,
        image: egui::ColorImage,
    },
    /// The stored rectangle ROI was fetched
    RoiFetched {
        camera_id: String,
        roi: RectRoi,
    },
    /// A POST completed; the server's reply is kept for display
    Posted {
        endpoint: String,
        response: serde_json::Value,
    },
}

/// Client for the camera server.
///
/// Every call returns immediately. Completed GETs are turned into
/// [`SyncEvent`]s that the UI drains with [`SyncClient::poll_events`];
/// failures are logged and dropped. Responses are applied in arrival order,
/// so a slow reply can overwrite state set by a newer one.
pub struct SyncClient {
    base: Url,
    transport: Arc<dyn Transport>,
    sender: UnboundedSender<SyncEvent>,
    receiver: UnboundedReceiver<SyncEvent>,
    repaint: Option<egui::Context>,
}

impl SyncClient {
    pub fn new(base: Url, transport: Arc<dyn Transport>) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            base,
            transport,
            sender,
            receiver,
            repaint: None,
        }
    }

    /// Wake the UI whenever a response arrives
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn set_base_url(&mut self, base: Url) {
        info!("Camera server set to {}", base);
        self.base = base;
    }

    /// Drain every event that has arrived since the last call
    pub fn poll_events(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    fn url(&self, endpoint: &Endpoint) -> Option<Url> {
        match endpoint.url(&self.base) {
            Ok(url) => Some(url),
            Err(err) => {
                warn!("Cannot address {}: {}", endpoint, err);
                None
            }
        }
    }

    /// GET `endpoint` and turn its JSON body into an event with `handle`
    fn fetch_json<T, F>(&self, endpoint: Endpoint, handle: F)
    where
        T: serde::de::DeserializeOwned + 'static,
        F: FnOnce(T) -> SyncResult<SyncEvent> + Send + 'static,
    {
        let Some(url) = self.url(&endpoint) else {
            return;
        };
        let on_done = self.deliver(endpoint.path(), move |bytes| {
            let parsed: T = serde_json::from_slice(&bytes)?;
            handle(parsed)
        });
        self.transport.get(&url, on_done);
    }

    /// Wrap an event builder into a transport callback that logs failures
    fn deliver<F>(&self, endpoint: String, build: F) -> ResponseCallback
    where
        F: FnOnce(Vec<u8>) -> SyncResult<SyncEvent> + Send + 'static,
    {
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();
        Box::new(move |result| {
            match result.and_then(build) {
                Ok(event) => {
                    if sender.unbounded_send(event).is_err() {
                        warn!("Dropped response from {}: client is gone", endpoint);
                    }
                    if let Some(ctx) = repaint {
                        ctx.request_repaint();
                    }
                }
                Err(err) => warn!("{} failed: {}", endpoint, err),
            }
        })
    }

    /// Fetch `{status, data}` and apply it to the camera's `kind` select control
    pub fn update_select(&self, camera_id: &str, kind: SelectKind, default_label: &str) {
        let endpoint = match kind {
            SelectKind::Station => Endpoint::Station(camera_id.to_owned()),
            SelectKind::Focus => Endpoint::Focus(camera_id.to_owned()),
        };
        let path = endpoint.path();
        let camera_id = camera_id.to_owned();
        let default_label = default_label.to_owned();
        self.fetch_json(endpoint, move |response: SelectResponse| {
            info!("GET: {}", path);
            info!("Found: {}", protocol::status_text(&response.status));
            Ok(SyncEvent::SelectFetched {
                camera_id,
                kind,
                value: response.data,
                default_label,
            })
        });
    }

    /// Fetch `{status, image}` and decode the frame for the camera's view
    pub fn update_view(&self, camera_id: &str) {
        let endpoint = Endpoint::View(camera_id.to_owned());
        let path = endpoint.path();
        let camera_id = camera_id.to_owned();
        self.fetch_json(endpoint, move |response: ViewResponse| {
            info!("GET: {}", path);
            info!("Found: {}", protocol::status_text(&response.status));
            let image = texture_manager::decode_base64_frame(&response.image)?;
            Ok(SyncEvent::ViewFetched { camera_id, image })
        });
    }

    /// Fetch `{status, x, y, width, height}` for the camera's rectangle overlay
    pub fn update_roi(&self, camera_id: &str) {
        let endpoint = Endpoint::Roi(camera_id.to_owned());
        let path = endpoint.path();
        let camera_id = camera_id.to_owned();
        self.fetch_json(endpoint, move |response: RoiResponse| {
            info!("GET: {}", path);
            info!("Found: {}", protocol::status_text(&response.status));
            Ok(SyncEvent::RoiFetched {
                camera_id,
                roi: response.roi(),
            })
        });
    }

    /// POST `{"payload": payload}` and log the reply
    pub fn set_json<T: Serialize>(&self, endpoint: Endpoint, payload: &T) {
        let body = match protocol::encode_payload(payload) {
            Ok(body) => body,
            Err(err) => {
                warn!("Could not encode payload for {}: {}", endpoint, err);
                return;
            }
        };
        self.post(endpoint, Body::Json(body));
    }

    /// POST the polygon ROI as `roi_coord` form data to `/record_roi`
    pub fn record_roi(&self, points: &[RoiPoint]) {
        info!("Recording ROI with {} points", points.len());
        self.post(Endpoint::RecordRoi, Body::Form(protocol::encode_roi_form(points)));
    }

    /// POST `camera_view` to `/choose_camera`. The server streams and records
    /// polygon ROIs for whichever camera was chosen last.
    pub fn choose_camera(&self, camera_id: &str) {
        info!("Choosing camera {} for the live stream", camera_id);
        self.post(
            Endpoint::ChooseCamera,
            Body::Form(protocol::encode_choose_camera_form(camera_id)),
        );
    }

    fn post(&self, endpoint: Endpoint, body: Body) {
        let Some(url) = self.url(&endpoint) else {
            return;
        };
        let path = endpoint.path();
        let on_done = self.deliver(path.clone(), move |bytes| {
            // `/record_roi` answers with a rendered page rather than JSON
            let response = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            info!("POST {}: {}", path, response);
            Ok(SyncEvent::Posted { endpoint: path, response })
        });
        self.transport.post(&url, body, on_done);
    }

    pub fn shortcut_update_station(&self, camera_id: &str) {
        self.update_select(camera_id, SelectKind::Station, STATION_NOT_SET);
    }

    pub fn shortcut_update_focus(&self, camera_id: &str) {
        self.update_select(camera_id, SelectKind::Focus, FOCUS_NOT_SET);
    }

    pub fn shortcut_update_view(&self, camera_id: &str) {
        self.update_view(camera_id);
    }

    pub fn shortcut_update_roi(&self, camera_id: &str) {
        self.update_roi(camera_id);
    }

    /// All four GETs for one camera
    pub fn refresh_camera(&self, camera_id: &str) {
        self.shortcut_update_station(camera_id);
        self.shortcut_update_focus(camera_id);
        self.shortcut_update_view(camera_id);
        self.shortcut_update_roi(camera_id);
    }

    pub fn set_station(&self, camera_id: &str, station_id: &str) {
        self.set_json(Endpoint::Station(camera_id.to_owned()), &station_id);
    }

    pub fn set_focus(&self, camera_id: &str, focus_id: &str) {
        self.set_json(Endpoint::Focus(camera_id.to_owned()), &focus_id);
    }

    pub fn set_roi(&self, camera_id: &str, roi: &RectRoi) {
        self.set_json(Endpoint::Roi(camera_id.to_owned()), roi);
    }
}

/// Placeholder the server returns when no station is stored
pub const STATION_NOT_SET: &str = "Select Station";

/// Placeholder the server returns when no focus level is stored
pub const FOCUS_NOT_SET: &str = "X";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use parking_lot::Mutex;

    /// Answers every GET with the same canned body and records requests
    struct CannedTransport {
        reply: SyncResult<Vec<u8>>,
        requests: Mutex<Vec<(String, Option<Body>)>>,
    }

    impl CannedTransport {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(body.as_bytes().to_vec()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(SyncError::Transport {
                    url: "http://test/".into(),
                    reason: "connection refused".into(),
                }),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn answer(&self) -> SyncResult<Vec<u8>> {
            match &self.reply {
                Ok(bytes) => Ok(bytes.clone()),
                Err(err) => Err(SyncError::Transport {
                    url: "http://test/".into(),
                    reason: err.to_string(),
                }),
            }
        }
    }

    impl Transport for CannedTransport {
        fn get(&self, url: &Url, on_done: ResponseCallback) {
            self.requests.lock().push((url.to_string(), None));
            on_done(self.answer());
        }

        fn post(&self, url: &Url, body: Body, on_done: ResponseCallback) {
            self.requests.lock().push((url.to_string(), Some(body)));
            on_done(self.answer());
        }
    }

    fn make_client(transport: Arc<CannedTransport>) -> SyncClient {
        SyncClient::new(Url::parse("http://test/").unwrap(), transport)
    }

    #[test]
    fn test_station_fetch_produces_event() {
        let transport = CannedTransport::ok(r#"{"status": true, "data": "L1: Menu (1)"}"#);
        let mut client = make_client(transport.clone());
        client.shortcut_update_station("A");

        let events = client.poll_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            SyncEvent::SelectFetched { camera_id, kind, value, default_label } => {
                assert_eq!(camera_id, "A");
                assert_eq!(*kind, SelectKind::Station);
                assert_eq!(value, "L1: Menu (1)");
                assert_eq!(default_label, STATION_NOT_SET);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(transport.requests.lock()[0].0, "http://test/update_station/A");
    }

    #[test]
    fn test_roi_fetch() {
        let transport = CannedTransport::ok(r#"{"status": true, "x": 1, "y": 2, "width": 3, "height": 4}"#);
        let mut client = make_client(transport);
        client.shortcut_update_roi("B");
        match client.poll_events().as_slice() {
            [SyncEvent::RoiFetched { camera_id, roi }] => {
                assert_eq!(camera_id, "B");
                assert_eq!(*roi, RectRoi { x: 1, y: 2, width: 3, height: 4 });
            }
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_failures_produce_no_events() {
        let mut client = make_client(CannedTransport::failing());
        client.refresh_camera("A");
        assert!(client.poll_events().is_empty());

        let mut client = client_with_body("not json");
        client.shortcut_update_focus("A");
        assert!(client.poll_events().is_empty());
    }

    fn client_with_body(body: &str) -> SyncClient {
        make_client(CannedTransport::ok(body))
    }

    #[test]
    fn test_set_roi_posts_json_payload() {
        let transport = CannedTransport::ok(r#"{"status": true}"#);
        let mut client = make_client(transport.clone());
        client.set_roi("A", &RectRoi { x: 20, y: 10, width: 30, height: 50 });

        let requests = transport.requests.lock();
        let (url, body) = &requests[0];
        assert_eq!(url, "http://test/update_roi/A");
        let Some(Body::Json(bytes)) = body else {
            panic!("expected a JSON body");
        };
        let json: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(json["payload"]["width"], 30);
        drop(requests);

        assert!(matches!(client.poll_events().as_slice(), [SyncEvent::Posted { .. }]));
    }

    #[test]
    fn test_record_roi_posts_form() {
        let transport = CannedTransport::ok("<html></html>");
        let mut client = make_client(transport.clone());
        client.record_roi(&[RoiPoint { x: 1, y: 2 }]);

        let requests = transport.requests.lock();
        assert_eq!(requests[0].0, "http://test/record_roi");
        assert_eq!(
            requests[0].1,
            Some(Body::Form("roi_coord%5B0%5D%5Bx%5D=1&roi_coord%5B0%5D%5By%5D=2".into()))
        );
        drop(requests);

        match client.poll_events().as_slice() {
            [SyncEvent::Posted { endpoint, response }] => {
                assert_eq!(endpoint, "/record_roi");
                assert_eq!(response, &serde_json::Value::String("<html></html>".into()));
            }
            other => panic!("unexpected events {:?}", other),
        }
    }
}
