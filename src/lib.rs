#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod state;
pub mod stream;
pub mod sync;
pub mod texture_manager;
pub mod tools;
pub mod util;
pub mod widgets;

pub use app::RoiDashboardApp;
pub use command::Command;
pub use config::DashboardConfig;
pub use error::{SyncError, SyncResult, TransitionError};
pub use input::{InputEvent, InputHandler, InputLocation};
pub use renderer::Renderer;
pub use state::PolygonState;
pub use sync::{SyncClient, SyncEvent};
pub use tools::{PolygonRoiTool, RectangleRoiTool, RoiTool};
