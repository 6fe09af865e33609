use crate::geometry::{RectRoi, RoiPoint};
use crate::sync::SyncClient;

/// Changes the user made that have to reach the camera server
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Store the selected station option for a camera
    SetStation {
        camera_id: String,
        station: String,
    },
    /// Store the selected focus level for a camera
    SetFocus {
        camera_id: String,
        focus: String,
    },
    /// Store a rectangle ROI for a camera
    SetRoi {
        camera_id: String,
        roi: RectRoi,
    },
    /// Record the polygon ROI of the stream currently shown by the server
    RecordRoi {
        points: Vec<RoiPoint>,
    },
    /// Make the server stream and record polygon ROIs for this camera
    ChooseCamera {
        camera_id: String,
    },
    /// Re-fetch station, focus, view and ROI for a camera
    RefreshCamera {
        camera_id: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetStation { .. } => "Set Station",
            Command::SetFocus { .. } => "Set Focus",
            Command::SetRoi { .. } => "Set ROI",
            Command::RecordRoi { .. } => "Record ROI",
            Command::ChooseCamera { .. } => "Choose Camera",
            Command::RefreshCamera { .. } => "Refresh Camera",
        }
    }

    /// Send the command through the client. Completion is reported
    /// asynchronously through the client's event queue.
    pub fn execute(&self, client: &SyncClient) {
        log::debug!("Executing {:?}", self);
        match self {
            Command::SetStation { camera_id, station } => client.set_station(camera_id, station),
            Command::SetFocus { camera_id, focus } => client.set_focus(camera_id, focus),
            Command::SetRoi { camera_id, roi } => client.set_roi(camera_id, roi),
            Command::RecordRoi { points } => client.record_roi(points),
            Command::ChooseCamera { camera_id } => client.choose_camera(camera_id),
            Command::RefreshCamera { camera_id } => client.refresh_camera(camera_id),
        }
    }
}
