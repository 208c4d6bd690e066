use crossprint_core::geometry::{CropEdge, ScreenPoint, Size};
use crossprint_core::tools::ToolMode;

use crate::app::CrossPrintApp;
use crate::paint::paint_scene;

pub fn show(ctx: &egui::Context, app: &mut CrossPrintApp) {
    egui::CentralPanel::default()
        .frame(egui::Frame::NONE)
        .show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            app.editor
                .set_canvas_size(Size::new(rect.width(), rect.height()));

            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
            if app.editor.state().is_loaded() {
                handle_pointer(ui, &response, app, rect);
                handle_zoom(ui, &response, app, rect);
                handle_pan(&response, app);

                if response.double_clicked() {
                    app.editor.fit_to_screen();
                }
                set_cursor(ctx, &response, app);
            }

            if let Some(scene) = app.editor.frame() {
                app.scene = Some(scene);
            }
            if let Some(scene) = &app.scene {
                paint_scene(ctx, ui.painter(), rect, scene, &mut app.textures);
            }

            if !app.editor.state().is_loaded() {
                show_placeholder(ui, rect);
            }
        });
}

fn to_canvas(pos: egui::Pos2, rect: egui::Rect) -> ScreenPoint {
    let local = pos - rect.min;
    ScreenPoint::new(local.x, local.y)
}

fn handle_pointer(ui: &egui::Ui, response: &egui::Response, app: &mut CrossPrintApp, rect: egui::Rect) {
    let (pressed, down, released, moving, pos) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_down(),
            i.pointer.primary_released(),
            i.pointer.is_moving(),
            i.pointer.interact_pos(),
        )
    });

    if pressed && response.hovered() {
        if let Some(pos) = pos {
            app.editor.pointer_down(to_canvas(pos, rect));
        }
    } else if down && moving {
        if let Some(pos) = pos {
            app.editor.pointer_move(to_canvas(pos, rect));
        }
    }
    if released {
        app.editor.pointer_up();
    }
}

fn handle_zoom(ui: &egui::Ui, response: &egui::Response, app: &mut CrossPrintApp, rect: egui::Rect) {
    let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }

    if let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) {
        // egui reports scroll-up as positive; the editor zooms in on negative deltas.
        app.editor.wheel(-scroll_delta, to_canvas(mouse_pos, rect));
    }
}

fn handle_pan(response: &egui::Response, app: &mut CrossPrintApp) {
    if response.dragged_by(egui::PointerButton::Middle) {
        let delta = response.drag_delta();
        app.editor.pan_by(delta.x, delta.y);
    }
}

fn set_cursor(ctx: &egui::Context, response: &egui::Response, app: &CrossPrintApp) {
    let icon = if let Some(edge) = app.editor.dragged_crop_edge() {
        match edge {
            CropEdge::Left | CropEdge::Right => egui::CursorIcon::ResizeHorizontal,
            CropEdge::Top | CropEdge::Bottom => egui::CursorIcon::ResizeVertical,
        }
    } else if app.editor.dragged_anchor().is_some() {
        egui::CursorIcon::Grabbing
    } else if response.hovered() && app.editor.mode() != ToolMode::Idle {
        egui::CursorIcon::Crosshair
    } else {
        return;
    };
    ctx.set_cursor_icon(icon);
}

fn show_placeholder(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "Open or drop an image to begin",
        egui::FontId::proportional(18.0),
        egui::Color32::from_gray(100),
    );
}
