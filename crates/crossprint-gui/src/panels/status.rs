use crate::app::CrossPrintApp;

pub fn show(ctx: &egui::Context, app: &mut CrossPrintApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        let state = app.editor.state();
        ui.horizontal(|ui| {
            if app.editor.is_busy() {
                ui.spinner();
            }
            ui.label(app.editor.status());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("Mode: {}", state.mode));
                ui.separator();
                ui.label(format!("Zoom: {:.0}%", state.viewport.zoom * 100.0));
                if let Some(image) = &state.image {
                    ui.separator();
                    ui.label(format!("{}x{}", image.width(), image.height()));
                    if state.dirty {
                        ui.separator();
                        ui.label(egui::RichText::new("Unsaved").color(egui::Color32::from_rgb(0xf5, 0x9e, 0x0b)));
                    }
                }
            });
        });

        ui.add_space(2.0);
    });
}
