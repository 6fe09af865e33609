use crate::app::RoiDashboardApp;
use crate::config::{DEBUG_FEED_PATH, STREAM_FEED_PATH};

/// Side panel with the server address, stream controls and the camera list
pub fn settings_panel(app: &mut RoiDashboardApp, ctx: &egui::Context) {
    egui::SidePanel::left("settings_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Settings");
            ui.separator();

            ui.label("Camera server:");
            let edit = ui.text_edit_singleline(&mut app.server_url_edit);
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.horizontal(|ui| {
                if ui.button("Apply").clicked() || submitted {
                    app.apply_server_url();
                }
                if ui.button("Refresh all").clicked() {
                    app.refresh_all();
                }
            });

            ui.separator();
            ui.strong("Live stream");
            ui.label(app.stream.status().label());
            ui.label(format!(
                "{} frames, {:.1} fps",
                app.stream.frames_received(),
                app.stream.frames_per_second()
            ));
            ui.horizontal(|ui| {
                if app.stream.is_running() {
                    if ui.button("Stop").clicked() {
                        app.stop_stream();
                    }
                } else if ui.button("Start").clicked() {
                    app.start_stream();
                }
            });
            ui.horizontal(|ui| {
                let mut path = app.config.stream_path.clone();
                ui.radio_value(&mut path, STREAM_FEED_PATH.to_owned(), "Feed");
                ui.radio_value(&mut path, DEBUG_FEED_PATH.to_owned(), "Debug feed");
                app.set_stream_path(&path);
            });
            ui.checkbox(&mut app.config.stream_on_start, "Start on launch");
            ui.checkbox(&mut app.polygon.open, "Show polygon ROI");

            ui.separator();
            ui.strong("Cameras");
            let mut removed = None;
            for card in app.cameras() {
                ui.horizontal(|ui| {
                    ui.label(&card.camera_id);
                    if ui.small_button("Remove").clicked() {
                        removed = Some(card.camera_id.clone());
                    }
                });
            }
            if let Some(camera_id) = removed {
                log::info!("Removing camera {}", camera_id);
                app.remove_camera(&camera_id);
            }
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut app.new_camera_edit).desired_width(80.0));
                if ui.button("Add camera").clicked() {
                    let camera_id = std::mem::take(&mut app.new_camera_edit);
                    app.add_camera(&camera_id);
                }
            });

            if let Some(response) = app.last_response() {
                ui.separator();
                ui.strong("Last reply");
                ui.label(response);
            }
        });
}
