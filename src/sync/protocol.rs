//! Wire shapes of the camera server's JSON and form endpoints.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{SyncError, SyncResult};
use crate::geometry::{RectRoi, RoiPoint};

/// The server endpoints this client talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Station(String),
    Focus(String),
    View(String),
    Roi(String),
    RecordRoi,
    ChooseCamera,
    StreamFeed,
}

impl Endpoint {
    fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Station(camera_id) => vec!["update_station", camera_id],
            Endpoint::Focus(camera_id) => vec!["update_focus", camera_id],
            Endpoint::View(camera_id) => vec!["update_view", camera_id],
            Endpoint::Roi(camera_id) => vec!["update_roi", camera_id],
            Endpoint::RecordRoi => vec!["record_roi"],
            Endpoint::ChooseCamera => vec!["choose_camera"],
            Endpoint::StreamFeed => vec!["stream_feed"],
        }
    }

    /// Server-relative path, e.g. `/update_station/A`
    pub fn path(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }

    /// Absolute URL under `base`. Camera ids are percent-encoded as a single segment.
    pub fn url(&self, base: &Url) -> SyncResult<Url> {
        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SyncError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty();
            for segment in self.segments() {
                segments.push(segment);
            }
        }
        Ok(url)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// `GET /update_station/{id}` and `GET /update_focus/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectResponse {
    #[serde(default)]
    pub status: serde_json::Value,
    pub data: String,
}

/// `GET /update_view/{id}`; `image` is base64 of an encoded frame
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewResponse {
    #[serde(default)]
    pub status: serde_json::Value,
    pub image: String,
}

/// `GET /update_roi/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoiResponse {
    #[serde(default)]
    pub status: serde_json::Value,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RoiResponse {
    pub fn roi(&self) -> RectRoi {
        RectRoi {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Body of every JSON POST: `{"payload": ...}`
#[derive(Debug, Serialize)]
pub struct Payload<'a, T: Serialize> {
    pub payload: &'a T,
}

pub fn encode_payload<T: Serialize>(payload: &T) -> SyncResult<Vec<u8>> {
    Ok(serde_json::to_vec(&Payload { payload })?)
}

/// Encode ROI points the way jQuery serializes an array of objects:
/// `roi_coord[0][x]=10&roi_coord[0][y]=10&roi_coord[1][x]=...`
pub fn encode_roi_form(points: &[RoiPoint]) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    for (i, point) in points.iter().enumerate() {
        form.append_pair(&format!("roi_coord[{i}][x]"), &point.x.to_string());
        form.append_pair(&format!("roi_coord[{i}][y]"), &point.y.to_string());
    }
    form.finish()
}

/// Form body of `/choose_camera`: `camera_view=<id>`
pub fn encode_choose_camera_form(camera_id: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("camera_view", camera_id)
        .finish()
}

/// Render a `status` field the way the log lines expect it
pub fn status_text(status: &serde_json::Value) -> String {
    match status {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".to_owned(),
        other => other.to_string(),
    }
}
