use std::path::PathBuf;

use crossprint_core::consts::MAX_ANCHORS;
use crossprint_core::geometry::CropEdge;
use crossprint_core::tools::ToolMode;

use super::section_header;
use crate::app::CrossPrintApp;
use crate::panels::menu_bar;

const LEFT_PANEL_WIDTH: f32 = 280.0;

pub fn show(ctx: &egui::Context, app: &mut CrossPrintApp) {
    egui::SidePanel::left("tools")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                file_section(ui, app);
                ui.separator();
                mode_section(ui, app);
                ui.separator();
                match app.editor.mode() {
                    ToolMode::Idle => {
                        ui.small("Pick a tool to start editing.");
                    }
                    ToolMode::Anchors => anchors_section(ui, app),
                    ToolMode::Crop => crop_section(ui, app),
                    ToolMode::Threshold => threshold_section(ui, app),
                }
                ui.separator();
                export_section(ui, app);
            });
        });
}

fn file_section(ui: &mut egui::Ui, app: &mut CrossPrintApp) {
    section_header(ui, "File", None);
    ui.add_space(4.0);

    if ui.button("Open...").clicked() {
        menu_bar::open_file(app);
    }

    let state = app.editor.state();
    if let Some(image) = &state.image {
        ui.label(state.image_name.as_str());
        ui.small(format!("{}x{} preview", image.width(), image.height()));
    } else {
        ui.small("Drop an image here or use Open.");
    }
}

fn mode_section(ui: &mut egui::Ui, app: &mut CrossPrintApp) {
    section_header(ui, "Tool", None);
    ui.add_space(4.0);

    let loaded = app.editor.state().is_loaded();
    let current = app.editor.mode();
    ui.horizontal_wrapped(|ui| {
        for mode in ToolMode::ALL {
            let enabled = loaded || mode == ToolMode::Idle;
            let response = ui.add_enabled(
                enabled,
                egui::Button::selectable(current == mode, mode.to_string()),
            );
            if response.clicked() && current != mode {
                app.editor.enter_mode(mode);
            }
        }
    });
}

fn apply_button(ui: &mut egui::Ui, app: &mut CrossPrintApp, label: &str) {
    let btn = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 28.0));
    if ui.add_enabled(app.editor.can_apply(), btn).clicked() {
        app.editor.apply();
    }
}

fn anchors_section(ui: &mut egui::Ui, app: &mut CrossPrintApp) {
    let count = app.editor.state().anchors.len();
    let status = format!("{count}/{MAX_ANCHORS}");
    section_header(ui, "Perspective", Some(&status));
    ui.add_space(4.0);
    ui.small("Click the four corners of the print. Drag a marker to adjust it.");

    for (i, anchor) in app.editor.state().anchors.iter().enumerate() {
        ui.small(format!("{}: ({:.0}, {:.0})", i + 1, anchor.x, anchor.y));
    }

    ui.add_space(4.0);
    if ui.add_enabled(count > 0, egui::Button::new("Clear")).clicked() {
        app.editor.clear_anchors();
    }
    apply_button(ui, app, "Apply Perspective");
}

fn crop_section(ui: &mut egui::Ui, app: &mut CrossPrintApp) {
    section_header(ui, "Crop", None);
    ui.add_space(4.0);

    let Some(size) = app.editor.state().image_size() else {
        return;
    };
    let Some(crop) = app.editor.state().crop else {
        return;
    };

    for edge in CropEdge::ALL {
        let max = match edge {
            CropEdge::Left | CropEdge::Right => size.width,
            CropEdge::Top | CropEdge::Bottom => size.height,
        };
        let mut value = crop.edge(edge);
        ui.horizontal(|ui| {
            ui.label(format!("{edge:?}"));
            let changed = ui
                .add(egui::DragValue::new(&mut value).range(0.0..=max).speed(1.0))
                .changed();
            if changed {
                app.editor.set_crop_edge(edge, value);
            }
        });
    }
    ui.small(format!("{:.0}x{:.0}", crop.width(), crop.height()));

    ui.add_space(4.0);
    if ui.button("Reset").clicked() {
        app.editor.reset_crop();
    }
    apply_button(ui, app, "Apply Crop");
}

fn threshold_section(ui: &mut egui::Ui, app: &mut CrossPrintApp) {
    section_header(ui, "Threshold", None);
    ui.add_space(4.0);

    let mut value = app.editor.state().threshold_value;
    if ui
        .add(egui::Slider::new(&mut value, 0..=255).text("Level"))
        .changed()
    {
        app.editor.set_threshold(value);
    }

    ui.horizontal(|ui| {
        if ui.button("Auto (Otsu)").clicked() {
            app.editor.auto_threshold();
        }
    });

    ui.add_space(4.0);
    apply_button(ui, app, "Apply Threshold");
    let btn = egui::Button::new("Apply Otsu (full res)").min_size(egui::vec2(ui.available_width(), 28.0));
    if ui.add_enabled(app.editor.can_apply(), btn).clicked() {
        app.editor.apply_threshold_otsu();
    }
}

fn export_section(ui: &mut egui::Ui, app: &mut CrossPrintApp) {
    section_header(ui, "Export", None);
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(&mut app.export_dir).desired_width(160.0));
        if ui.button("Browse...").clicked() {
            menu_bar::export_to(app);
        }
    });

    let loaded = app.editor.state().is_loaded();
    let busy = app.editor.is_busy();
    let btn = egui::Button::new("Export PNG").min_size(egui::vec2(ui.available_width(), 28.0));
    if ui.add_enabled(loaded && !busy, btn).clicked() {
        app.editor.export(PathBuf::from(&app.export_dir));
    }
}
