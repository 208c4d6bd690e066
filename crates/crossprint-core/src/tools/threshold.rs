use super::{ApplyContext, Tool, ToolContext};
use crate::bridge::EditOp;
use crate::image::ImageId;
use crate::otsu::estimate_threshold;
use crate::service::ThresholdMode;
use crate::state::AppState;

/// Slider-driven binarization with a local live preview.
///
/// Slider moves and the auto estimate only touch `threshold_value` and
/// `threshold_preview`; nothing reaches the service until `apply`.
#[derive(Debug, Default)]
pub struct ThresholdTool;

impl ThresholdTool {
    pub fn new() -> Self {
        Self
    }

    pub fn set_value(&mut self, cx: &mut ToolContext<'_>, value: u8) {
        cx.state.threshold_value = value;
        cx.state.threshold_preview = Some(value);
        cx.set_status(format!("Threshold: {value}"));
    }

    /// Estimate a threshold from the displayed bitmap and preview it.
    /// Returns `None` when no image is loaded.
    pub fn auto(&mut self, cx: &mut ToolContext<'_>) -> Option<u8> {
        let value = estimate_threshold(&cx.state.image.as_ref()?.bitmap);
        cx.state.threshold_value = value;
        cx.state.threshold_preview = Some(value);
        cx.set_status(format!("Otsu: {value}"));
        Some(value)
    }

    /// Like `apply_op`, but asks the service for its own Otsu level computed
    /// at full resolution.
    pub fn otsu_op(&self, cx: &ApplyContext<'_>) -> Option<(ImageId, EditOp)> {
        self.op_for(ThresholdMode::Otsu, cx)
    }

    fn op_for(&self, mode: ThresholdMode, cx: &ApplyContext<'_>) -> Option<(ImageId, EditOp)> {
        if !self.can_apply(cx.state) {
            return None;
        }
        let id = cx
            .history
            .threshold_source(cx.threshold_source, cx.state.image_id())?;
        Some((
            id,
            EditOp::Threshold {
                mode,
                value: cx.state.threshold_value,
            },
        ))
    }
}

impl Tool for ThresholdTool {
    /// Keeps the last slider value but leaves the preview off until the
    /// slider moves.
    fn enter(&mut self, cx: &mut ToolContext<'_>) {
        cx.state.threshold_preview = None;
        cx.request_redraw();
    }

    fn exit(&mut self, cx: &mut ToolContext<'_>) {
        cx.state.threshold_preview = None;
    }

    fn can_apply(&self, state: &AppState) -> bool {
        state.is_loaded()
    }

    fn apply_op(&self, cx: &ApplyContext<'_>) -> Option<(ImageId, EditOp)> {
        self.op_for(ThresholdMode::Global, cx)
    }

    fn on_applied(&mut self, cx: &mut ToolContext<'_>) {
        cx.state.threshold_preview = None;
        cx.request_redraw();
    }

    fn busy_status(&self) -> &'static str {
        "Applying threshold..."
    }

    fn done_status(&self) -> &'static str {
        "Threshold applied"
    }
}
