use egui::{ComboBox, Sense, Ui};

use crate::app::{CameraCard, RoiDashboardApp};
use crate::command::Command;
use crate::renderer::Renderer;
use crate::sync::SelectKind;
use crate::texture_manager::{TextureKey, TextureManager};
use crate::tools::{RoiTool, RECTANGLE_SURFACE_SIZE};

/// One card per camera, laid out in a wrapping grid
pub fn camera_panel(app: &mut RoiDashboardApp, ctx: &egui::Context) {
    let mut commands = Vec::new();

    egui::CentralPanel::default().show(ctx, |ui| {
        let RoiDashboardApp {
            cameras,
            renderer,
            textures,
            ..
        } = &mut *app;
        let (renderer, textures): (&Renderer, &TextureManager) = (renderer, textures);

        if cameras.is_empty() {
            ui.label("No cameras configured.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for card in cameras.iter_mut() {
                    ui.group(|ui| {
                        ui.vertical(|ui| camera_card(ui, card, renderer, textures, &mut commands));
                    });
                }
            });
        });
    });

    for command in commands {
        app.dispatch(command);
    }
}

fn camera_card(
    ui: &mut Ui,
    card: &mut CameraCard,
    renderer: &Renderer,
    textures: &TextureManager,
    commands: &mut Vec<Command>,
) {
    ui.heading(format!("Camera {}", card.camera_id));

    ui.horizontal(|ui| {
        ui.label("Station:");
        if let Some(station) = select_combo(ui, card, SelectKind::Station) {
            commands.push(Command::SetStation {
                camera_id: card.camera_id.clone(),
                station,
            });
        }
    });
    ui.horizontal(|ui| {
        ui.label("Focus:");
        if let Some(focus) = select_combo(ui, card, SelectKind::Focus) {
            commands.push(Command::SetFocus {
                camera_id: card.camera_id.clone(),
                focus,
            });
        }
    });

    let (response, painter) = ui.allocate_painter(RECTANGLE_SURFACE_SIZE, Sense::click_and_drag());
    for event in card.input.process_response(&response) {
        if let Some(command) = card.tool.handle_event(&event) {
            commands.push(command);
        }
    }

    let texture = textures.texture_id(&TextureKey::CameraView(card.camera_id.clone()));
    renderer.render_background(&painter, response.rect, texture);
    card.tool.draw(renderer, &painter, response.rect);

    ui.horizontal(|ui| {
        if ui.button("Refresh").clicked() {
            commands.push(Command::RefreshCamera {
                camera_id: card.camera_id.clone(),
            });
        }
        if ui.button("Clear ROI").clicked() {
            card.tool.clear();
        }
        ui.weak(card.tool.current_state_name());
    });
}

/// Combo box over one of the card's select controls. Returns the newly
/// picked option id when the user changes it.
fn select_combo(ui: &mut Ui, card: &mut CameraCard, kind: SelectKind) -> Option<String> {
    let camera_id = card.camera_id.clone();
    let control = card.select_mut(kind);
    let placeholder = RoiDashboardApp::not_set_label(kind);
    let selected_text = match control.selected() {
        Some(option) => option.label.clone(),
        None => placeholder.to_owned(),
    };

    let mut picked = None;
    ComboBox::from_id_salt((camera_id.as_str(), kind.as_str()))
        .selected_text(selected_text)
        .width(160.0)
        .show_ui(ui, |ui| {
            for option in control.options() {
                let is_selected = control.selected_id() == Some(option.id.as_str());
                if ui.selectable_label(is_selected, &option.label).clicked() && !is_selected {
                    picked = Some(option.id.clone());
                }
            }
        });

    let picked = picked?;
    control.select_id(&picked);
    log::info!("Camera {}: {} set to {}", camera_id, kind.as_str(), picked);
    Some(picked)
}
