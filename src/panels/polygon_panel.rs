use egui::{ComboBox, Sense};

use crate::app::RoiDashboardApp;
use crate::geometry::hit_test_handles;
use crate::texture_manager::TextureKey;
use crate::tools::{RoiTool, POLYGON_SURFACE_SIZE};
use crate::widgets::VertexHandle;

/// Window holding the polygon ROI surface over the live stream
pub fn polygon_window(app: &mut RoiDashboardApp, ctx: &egui::Context) {
    let mut open = app.polygon.open;
    let mut commands = Vec::new();
    let mut chosen = None;

    egui::Window::new("Polygon ROI")
        .open(&mut open)
        .resizable(false)
        .default_pos(egui::pos2(260.0, 80.0))
        .show(ctx, |ui| {
            let RoiDashboardApp {
                config,
                polygon,
                renderer,
                textures,
                stream,
                ..
            } = &mut *app;

            ui.horizontal(|ui| {
                ui.label("Camera:");
                ComboBox::from_id_salt("stream_camera")
                    .selected_text(polygon.camera.as_deref().unwrap_or("Choose camera"))
                    .show_ui(ui, |ui| {
                        for camera_id in &config.cameras {
                            let is_selected = polygon.camera.as_ref() == Some(camera_id);
                            if ui.selectable_label(is_selected, camera_id).clicked() && !is_selected {
                                chosen = Some(camera_id.clone());
                            }
                        }
                    });
                ui.separator();
                if ui.button("Clear").clicked() {
                    polygon.tool.clear();
                }
                ui.label(format!("State: {}", polygon.tool.current_state_name()));
                ui.separator();
                ui.weak(format!(
                    "Stream: {} ({:.1} fps)",
                    stream.status().label(),
                    stream.frames_per_second()
                ));
            });

            let (response, painter) = ui.allocate_painter(POLYGON_SURFACE_SIZE, Sense::click_and_drag());
            for event in polygon.input.process_response(&response) {
                if let Some(command) = polygon.tool.handle_event(&event) {
                    commands.push(command);
                }
            }

            if let Some(hover) = response.hover_pos() {
                let local = (hover - response.rect.min).to_pos2();
                let state = polygon.tool.state();
                let dragging = state.is_dragging();
                if dragging || hit_test_handles(local, state.vertices()).is_some() {
                    ctx.set_cursor_icon(VertexHandle::cursor_icon(dragging));
                }
            }

            renderer.render_background(&painter, response.rect, textures.texture_id(&TextureKey::StreamFeed));
            polygon.tool.draw(renderer, &painter, response.rect);
        });

    app.polygon.open = open;
    if let Some(camera_id) = chosen {
        app.choose_stream_camera(&camera_id);
    }
    for command in commands {
        app.dispatch(command);
    }
}
