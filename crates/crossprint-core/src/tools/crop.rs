use tracing::debug;

use super::{ApplyContext, Tool, ToolContext};
use crate::bridge::EditOp;
use crate::consts::CROP_EDGE_TOLERANCE;
use crate::geometry::{CropEdge, CropRect, ImagePoint, ScreenPoint};
use crate::image::ImageId;
use crate::state::AppState;

/// Drags the edges of the crop rectangle.
#[derive(Debug, Default)]
pub struct CropTool {
    dragging: Option<CropEdge>,
}

impl CropTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragging(&self) -> Option<CropEdge> {
        self.dragging
    }

    /// Set one edge from a numeric input, snapping to whole pixels.
    pub fn set_edge(&mut self, cx: &mut ToolContext<'_>, edge: CropEdge, value: f32) {
        let Some(size) = cx.state.image_size() else {
            return;
        };
        let current = cx.state.crop.unwrap_or_else(|| CropRect::full(size));
        cx.state.crop = Some(current.with_edge_value(edge, value, size));
        cx.request_redraw();
    }

    /// Back to the full image.
    pub fn reset(&mut self, cx: &mut ToolContext<'_>) {
        self.dragging = None;
        cx.state.crop = cx.state.image_size().map(CropRect::full);
        cx.request_redraw();
    }

    /// First edge, in priority order, within `tolerance` of `p`.
    fn hit_test(crop: &CropRect, p: ImagePoint, tolerance: f32) -> Option<CropEdge> {
        CropEdge::ALL.into_iter().find(|&edge| {
            let along = match edge {
                CropEdge::Left | CropEdge::Right => p.x,
                CropEdge::Top | CropEdge::Bottom => p.y,
            };
            (along - crop.edge(edge)).abs() < tolerance
        })
    }
}

impl Tool for CropTool {
    fn enter(&mut self, cx: &mut ToolContext<'_>) {
        self.dragging = None;
        if cx.state.crop.is_none() {
            cx.state.crop = cx.state.image_size().map(CropRect::full);
        }
        cx.request_redraw();
    }

    fn exit(&mut self, _cx: &mut ToolContext<'_>) {
        self.dragging = None;
    }

    fn pointer_down(&mut self, cx: &mut ToolContext<'_>, pos: ScreenPoint) {
        if !cx.state.is_loaded() {
            return;
        }
        let Some(crop) = &cx.state.crop else {
            return;
        };
        let p = cx.state.viewport.to_image(pos);
        let tolerance = CROP_EDGE_TOLERANCE / cx.state.viewport.zoom;
        self.dragging = Self::hit_test(crop, p, tolerance);
        if let Some(edge) = self.dragging {
            debug!(?edge, "crop edge drag start");
        }
    }

    fn pointer_move(&mut self, cx: &mut ToolContext<'_>, pos: ScreenPoint) {
        let Some(edge) = self.dragging else {
            return;
        };
        let (Some(crop), Some(size)) = (cx.state.crop, cx.state.image_size()) else {
            return;
        };
        let p = cx.state.viewport.to_image(pos);
        cx.state.crop = Some(crop.with_dragged_edge(edge, p, size));
        cx.request_redraw();
    }

    fn pointer_up(&mut self, _cx: &mut ToolContext<'_>) {
        self.dragging = None;
    }

    fn can_apply(&self, state: &AppState) -> bool {
        state.is_loaded() && state.crop.is_some_and(|c| c.is_applicable())
    }

    fn apply_op(&self, cx: &ApplyContext<'_>) -> Option<(ImageId, EditOp)> {
        if !self.can_apply(cx.state) {
            return None;
        }
        let id = cx.state.image_id()?;
        let crop = cx.state.crop?;
        Some((id, EditOp::Crop(crop)))
    }

    fn on_applied(&mut self, cx: &mut ToolContext<'_>) {
        self.dragging = None;
        cx.state.crop = cx.state.image_size().map(CropRect::full);
        cx.state.fit_to_screen();
        cx.request_redraw();
    }

    fn busy_status(&self) -> &'static str {
        "Cropping..."
    }

    fn done_status(&self) -> &'static str {
        "Cropped"
    }
}
