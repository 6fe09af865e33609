use std::sync::Arc;

use log::{info, warn};

use crate::command::Command;
use crate::config::{DashboardConfig, DEFAULT_SERVER_URL};
use crate::error::SyncResult;
use crate::input::InputHandler;
use crate::panels::{camera_panel, polygon_window, settings_panel};
use crate::renderer::Renderer;
use crate::stream::StreamFeed;
use crate::sync::{
    EhttpTransport, SelectControl, SelectKind, SyncClient, SyncEvent, Transport, FOCUS_NOT_SET,
    STATION_NOT_SET,
};
use crate::texture_manager::{TextureKey, TextureManager};
use crate::tools::{
    PolygonRoiTool, RectangleRoiTool, RoiTool, POLYGON_SURFACE_SIZE, RECTANGLE_SURFACE_SIZE,
};

/// Everything the dashboard shows for one camera
pub struct CameraCard {
    pub camera_id: String,
    pub station: SelectControl,
    pub focus: SelectControl,
    pub tool: RectangleRoiTool,
    pub input: InputHandler,
}

impl CameraCard {
    pub fn new(camera_id: &str, config: &DashboardConfig) -> Self {
        Self {
            camera_id: camera_id.to_owned(),
            station: SelectControl::with_choices(&config.station_choices),
            focus: SelectControl::with_choices(&config.focus_choices),
            tool: RectangleRoiTool::new(camera_id),
            input: InputHandler::new(egui::Rect::from_min_size(egui::Pos2::ZERO, RECTANGLE_SURFACE_SIZE)),
        }
    }

    pub fn select_mut(&mut self, kind: SelectKind) -> &mut SelectControl {
        match kind {
            SelectKind::Station => &mut self.station,
            SelectKind::Focus => &mut self.focus,
        }
    }
}

/// The polygon ROI surface over the live stream
pub struct PolygonSurface {
    pub tool: PolygonRoiTool,
    pub input: InputHandler,
    pub open: bool,
    /// Camera last chosen for the server's live stream
    pub camera: Option<String>,
}

impl Default for PolygonSurface {
    fn default() -> Self {
        Self {
            tool: PolygonRoiTool::new(POLYGON_SURFACE_SIZE),
            input: InputHandler::new(egui::Rect::from_min_size(egui::Pos2::ZERO, POLYGON_SURFACE_SIZE)),
            open: true,
            camera: None,
        }
    }
}

pub struct RoiDashboardApp {
    pub(crate) config: DashboardConfig,
    /// Server address as typed in the settings panel, applied on demand
    pub(crate) server_url_edit: String,
    pub(crate) new_camera_edit: String,
    pub(crate) client: SyncClient,
    pub(crate) cameras: Vec<CameraCard>,
    pub(crate) polygon: PolygonSurface,
    pub(crate) renderer: Renderer,
    pub(crate) textures: TextureManager,
    pub(crate) stream: StreamFeed,
    /// Last reply to a POST, shown in the settings panel
    pub(crate) last_response: Option<String>,
}

impl RoiDashboardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> SyncResult<Self> {
        let mut config: DashboardConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        config.apply_env_overrides();
        if let Err(err) = config.base_url() {
            warn!("Invalid server address {:?} ({}), using the default", config.server_url, err);
            config.server_url = DEFAULT_SERVER_URL.to_owned();
        }

        let app = Self::with_transport(&cc.egui_ctx, config, Arc::new(EhttpTransport))?;
        if app.config.stream_on_start {
            app.start_stream();
        }
        Ok(app)
    }

    /// Build the app around any transport and fetch every camera's state
    pub fn with_transport(
        ctx: &egui::Context,
        config: DashboardConfig,
        transport: Arc<dyn Transport>,
    ) -> SyncResult<Self> {
        let base = config.base_url()?;
        let client = SyncClient::new(base, transport).with_repaint(ctx.clone());
        let cameras = config.cameras.iter().map(|id| CameraCard::new(id, &config)).collect();

        let app = Self {
            server_url_edit: config.server_url.clone(),
            new_camera_edit: String::new(),
            config,
            client,
            cameras,
            polygon: PolygonSurface::default(),
            renderer: Renderer::new(),
            textures: TextureManager::new(),
            stream: StreamFeed::new().with_repaint(ctx.clone()),
            last_response: None,
        };
        app.refresh_all();
        Ok(app)
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn cameras(&self) -> &[CameraCard] {
        &self.cameras
    }

    pub fn camera(&self, camera_id: &str) -> Option<&CameraCard> {
        self.cameras.iter().find(|card| card.camera_id == camera_id)
    }

    pub fn camera_mut(&mut self, camera_id: &str) -> Option<&mut CameraCard> {
        self.cameras.iter_mut().find(|card| card.camera_id == camera_id)
    }

    pub fn polygon(&self) -> &PolygonSurface {
        &self.polygon
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Send a command to the camera server
    pub fn dispatch(&self, command: Command) {
        info!("{}", command.name());
        command.execute(&self.client);
    }

    pub fn refresh_all(&self) {
        for card in &self.cameras {
            self.client.refresh_camera(&card.camera_id);
        }
    }

    /// Point the client and the stream at a new server
    pub fn apply_server_url(&mut self) {
        let mut config = self.config.clone();
        config.server_url = self.server_url_edit.trim().to_owned();
        match config.base_url() {
            Ok(base) => {
                self.config = config;
                self.client.set_base_url(base);
                if self.stream.is_running() {
                    self.start_stream();
                }
                self.refresh_all();
            }
            Err(err) => warn!("Invalid server address {:?}: {}", self.server_url_edit, err),
        }
    }

    pub fn add_camera(&mut self, camera_id: &str) {
        let camera_id = camera_id.trim();
        if camera_id.is_empty() || self.camera(camera_id).is_some() {
            return;
        }
        self.config.cameras.push(camera_id.to_owned());
        self.cameras.push(CameraCard::new(camera_id, &self.config));
        self.client.refresh_camera(camera_id);
    }

    pub fn remove_camera(&mut self, camera_id: &str) {
        self.config.cameras.retain(|id| id != camera_id);
        self.cameras.retain(|card| card.camera_id != camera_id);
        self.textures.remove(&TextureKey::CameraView(camera_id.to_owned()));
        if self.polygon.camera.as_deref() == Some(camera_id) {
            self.polygon.camera = None;
        }
    }

    /// Ask the server to stream this camera. The polygon drawn over the
    /// previous camera's feed no longer applies and is cleared.
    pub fn choose_stream_camera(&mut self, camera_id: &str) {
        if self.polygon.camera.as_deref() == Some(camera_id) {
            return;
        }
        self.polygon.camera = Some(camera_id.to_owned());
        self.polygon.tool.clear();
        self.dispatch(Command::ChooseCamera {
            camera_id: camera_id.to_owned(),
        });
    }

    /// Switch between the plain and debug feeds, reconnecting if live
    pub fn set_stream_path(&mut self, path: &str) {
        if self.config.stream_path == path {
            return;
        }
        self.config.stream_path = path.to_owned();
        if self.stream.is_running() {
            self.start_stream();
        }
    }

    pub fn start_stream(&self) {
        match self.config.stream_url() {
            Ok(url) => self.stream.start(url),
            Err(err) => warn!("Cannot start stream: {}", err),
        }
    }

    pub fn stop_stream(&mut self) {
        self.stream.stop();
        self.textures.remove(&TextureKey::StreamFeed);
    }

    /// Apply every response that arrived since the last frame
    pub fn handle_sync_events(&mut self, ctx: &egui::Context) {
        for event in self.client.poll_events() {
            self.apply_sync_event(ctx, event);
        }
    }

    pub fn apply_sync_event(&mut self, ctx: &egui::Context, event: SyncEvent) {
        match event {
            SyncEvent::SelectFetched {
                camera_id,
                kind,
                value,
                default_label,
            } => {
                let Some(card) = self.camera_mut(&camera_id) else {
                    return;
                };
                if !card.select_mut(kind).apply_fetched(&value, &default_label) {
                    warn!("{}: no {} option {:?}", camera_id, kind.as_str(), value);
                }
            }
            SyncEvent::ViewFetched { camera_id, image } => {
                if self.camera(&camera_id).is_some() {
                    self.textures.set_image(ctx, TextureKey::CameraView(camera_id), image);
                }
            }
            SyncEvent::RoiFetched { camera_id, roi } => {
                if let Some(card) = self.camera_mut(&camera_id) {
                    card.tool.set_server_roi(roi);
                }
            }
            SyncEvent::Posted { endpoint, response } => {
                self.last_response = Some(format!("{endpoint}: {response}"));
            }
        }
    }

    /// Upload the newest stream frame, if any
    fn update_stream_texture(&mut self, ctx: &egui::Context) {
        if let Some(frame) = self.stream.take_frame() {
            self.textures.set_image(ctx, TextureKey::StreamFeed, frame);
        }
    }

    pub(crate) fn not_set_label(kind: SelectKind) -> &'static str {
        match kind {
            SelectKind::Station => STATION_NOT_SET,
            SelectKind::Focus => FOCUS_NOT_SET,
        }
    }
}

impl eframe::App for RoiDashboardApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_sync_events(ctx);
        self.update_stream_texture(ctx);

        settings_panel(self, ctx);
        polygon_window(self, ctx);
        camera_panel(self, ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.stream.stop();
    }
}
