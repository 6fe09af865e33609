mod mjpeg;

pub use mjpeg::{boundary_from_content_type, MjpegDecoder, DEFAULT_BOUNDARY};

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;

use egui::ColorImage;
use ehttp::streaming::Part;
use log::{debug, info, warn};
use parking_lot::Mutex;
use url::Url;

use crate::texture_manager::decode_frame;
use crate::util::time::current_time_secs;

/// Frames kept for the rate estimate
const RATE_WINDOW: usize = 30;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FeedStatus {
    #[default]
    Stopped,
    Connecting,
    Live,
    Failed(String),
}

impl FeedStatus {
    pub fn label(&self) -> String {
        match self {
            FeedStatus::Stopped => "Stopped".to_owned(),
            FeedStatus::Connecting => "Connecting".to_owned(),
            FeedStatus::Live => "Live".to_owned(),
            FeedStatus::Failed(reason) => format!("Failed: {reason}"),
        }
    }
}

/// State shared between the UI thread and the fetch callback
#[derive(Default)]
struct FeedShared {
    /// Bumped on every start/stop; callbacks from an older run give up
    generation: u64,
    status: FeedStatus,
    latest: Option<ColorImage>,
    frame_times: VecDeque<f64>,
    frames_received: u64,
    decoder: MjpegDecoder,
}

impl FeedShared {
    /// Handle one piece of the streaming response for run `generation`
    fn on_part(&mut self, result: ehttp::Result<Part>, generation: u64, now: f64) -> ControlFlow<()> {
        if self.generation != generation {
            return ControlFlow::Break(());
        }
        let part = match result {
            Ok(part) => part,
            Err(err) => {
                warn!("Stream failed: {}", err);
                self.status = FeedStatus::Failed(err);
                return ControlFlow::Break(());
            }
        };

        match part {
            Part::Response(response) => {
                if !response.ok {
                    warn!("Stream refused: {} {}", response.status, response.status_text);
                    self.status = FeedStatus::Failed(format!("{} {}", response.status, response.status_text));
                    return ControlFlow::Break(());
                }
                if let Some(boundary) = response
                    .headers
                    .get("content-type")
                    .and_then(boundary_from_content_type)
                {
                    debug!("Stream boundary: {}", boundary);
                    self.decoder = MjpegDecoder::new(&boundary);
                }
                ControlFlow::Continue(())
            }
            Part::Chunk(chunk) => {
                if chunk.is_empty() {
                    info!("Stream ended");
                    self.status = FeedStatus::Stopped;
                    return ControlFlow::Break(());
                }
                // Only the newest complete frame is worth decoding
                if let Some(jpeg) = self.decoder.push(&chunk).pop() {
                    match decode_frame(&jpeg) {
                        Ok(image) => self.publish(image, now),
                        Err(err) => warn!("Dropping undecodable stream frame: {}", err),
                    }
                }
                ControlFlow::Continue(())
            }
        }
    }

    fn publish(&mut self, image: ColorImage, now: f64) {
        self.latest = Some(image);
        self.frames_received += 1;
        self.frame_times.push_back(now);
        while self.frame_times.len() > RATE_WINDOW {
            self.frame_times.pop_front();
        }
        self.status = FeedStatus::Live;
    }

    fn frames_per_second(&self) -> f32 {
        match (self.frame_times.front(), self.frame_times.back()) {
            (Some(first), Some(last)) if last > first => {
                ((self.frame_times.len() - 1) as f64 / (last - first)) as f32
            }
            _ => 0.0,
        }
    }
}

/// The live MJPEG feed shown behind the polygon surface.
///
/// Only the newest decoded frame is kept; the UI takes it once per frame.
#[derive(Clone)]
pub struct StreamFeed {
    shared: Arc<Mutex<FeedShared>>,
    repaint: Option<egui::Context>,
}

impl Default for StreamFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamFeed {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(FeedShared::default())),
            repaint: None,
        }
    }

    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn status(&self) -> FeedStatus {
        self.shared.lock().status.clone()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.status(), FeedStatus::Connecting | FeedStatus::Live)
    }

    pub fn frames_received(&self) -> u64 {
        self.shared.lock().frames_received
    }

    pub fn frames_per_second(&self) -> f32 {
        self.shared.lock().frames_per_second()
    }

    /// Take the newest frame, if one arrived since the last call
    pub fn take_frame(&self) -> Option<ColorImage> {
        self.shared.lock().latest.take()
    }

    /// Start streaming from `url`, replacing any running stream
    pub fn start(&self, url: Url) {
        let generation = {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            shared.status = FeedStatus::Connecting;
            shared.frame_times.clear();
            shared.decoder = MjpegDecoder::default();
            shared.generation
        };
        info!("Starting stream from {}", url);

        let shared = self.shared.clone();
        let repaint = self.repaint.clone();
        let request = ehttp::Request::get(url.as_str());

        ehttp::streaming::fetch(request, move |result: ehttp::Result<Part>| {
            let mut guard = shared.lock();
            let frames_before = guard.frames_received;
            let flow = guard.on_part(result, generation, current_time_secs());
            let published = guard.frames_received != frames_before;
            drop(guard);
            if published {
                if let Some(ctx) = &repaint {
                    ctx.request_repaint();
                }
            }
            flow
        });
    }

    /// Stop the running stream. The connection closes when its next chunk arrives.
    pub fn stop(&self) {
        let mut shared = self.shared.lock();
        shared.generation += 1;
        shared.status = FeedStatus::Stopped;
        shared.latest = None;
        info!("Stream stopped");
    }
}
