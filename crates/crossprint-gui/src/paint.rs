use crossprint_core::geometry::{ScreenPoint, ScreenRect};
use crossprint_core::render::{Overlay, Scene};

use crate::convert::{to_color32, TextureCache};

fn pos(origin: egui::Pos2, p: ScreenPoint) -> egui::Pos2 {
    origin + egui::vec2(p.x, p.y)
}

fn rect(origin: egui::Pos2, r: ScreenRect) -> egui::Rect {
    egui::Rect::from_min_max(pos(origin, r.min), pos(origin, r.max))
}

/// Draw a composed scene into `canvas`. Scene coordinates are relative to the
/// canvas' top-left corner.
pub fn paint_scene(
    ctx: &egui::Context,
    painter: &egui::Painter,
    canvas: egui::Rect,
    scene: &Scene,
    textures: &mut TextureCache,
) {
    let origin = canvas.min;
    painter.rect_filled(canvas, 0.0, to_color32(scene.background));

    if let Some(layer) = &scene.image {
        let texture = textures.texture_for(ctx, layer);
        painter.image(
            texture,
            rect(origin, layer.dest),
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    for overlay in &scene.overlays {
        paint_overlay(painter, origin, overlay);
    }
}

fn paint_overlay(painter: &egui::Painter, origin: egui::Pos2, overlay: &Overlay) {
    match overlay {
        Overlay::DashedLine {
            from,
            to,
            color,
            width,
            dash,
            gap,
        } => {
            painter.extend(egui::Shape::dashed_line(
                &[pos(origin, *from), pos(origin, *to)],
                egui::Stroke::new(*width, to_color32(*color)),
                *dash,
                *gap,
            ));
        }
        Overlay::Disc {
            center,
            radius,
            color,
        } => {
            painter.circle_filled(pos(origin, *center), *radius, to_color32(*color));
        }
        Overlay::Label {
            pos: at,
            text,
            color,
            size,
        } => {
            painter.text(
                pos(origin, *at),
                egui::Align2::LEFT_BOTTOM,
                text,
                egui::FontId::proportional(*size),
                to_color32(*color),
            );
        }
        Overlay::FillRect { rect: r, color } => {
            painter.rect_filled(rect(origin, *r), 0.0, to_color32(*color));
        }
        Overlay::StrokeRect {
            rect: r,
            color,
            width,
        } => {
            painter.rect_stroke(
                rect(origin, *r),
                0.0,
                egui::Stroke::new(*width, to_color32(*color)),
                egui::StrokeKind::Middle,
            );
        }
    }
}
