mod camera_panel;
mod polygon_panel;
mod settings_panel;

pub use camera_panel::camera_panel;
pub use polygon_panel::polygon_window;
pub use settings_panel::settings_panel;
