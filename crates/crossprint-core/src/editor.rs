//! The editor: owns every piece of interactive state and routes input,
//! apply requests and bridge completions between them.

use std::path::PathBuf;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::bridge::{BridgeEvent, BridgeJob, EditOp, JobSink, LoadSource};
use crate::config::EditorConfig;
use crate::file_types;
use crate::geometry::{CropEdge, ScreenPoint, Size};
use crate::history::Checkpoints;
use crate::image::{Image, ImageId};
use crate::render::{Compositor, RenderScheduler, RepaintSink, Scene};
use crate::state::AppState;
use crate::tools::{
    AnchorTool, ApplyContext, CropTool, ThresholdTool, Tool, ToolContext, ToolMode,
};

pub struct Editor {
    state: AppState,
    history: Checkpoints,
    scheduler: RenderScheduler,
    compositor: Compositor,
    anchors: AnchorTool,
    crop: CropTool,
    threshold: ThresholdTool,
    config: EditorConfig,
    jobs: Box<dyn JobSink>,
    /// Bumped for every bitmap installed from the service.
    generation: u64,
    /// Jobs submitted whose event has not arrived yet.
    in_flight: usize,
}

impl Editor {
    pub fn new(config: EditorConfig, jobs: Box<dyn JobSink>) -> Self {
        Self {
            state: AppState::new(config.default_threshold),
            history: Checkpoints::default(),
            scheduler: RenderScheduler::new(),
            compositor: Compositor::new(),
            anchors: AnchorTool::new(),
            crop: CropTool::new(),
            threshold: ThresholdTool::new(),
            config,
            jobs,
            generation: 0,
            in_flight: 0,
        }
    }

    pub fn set_repaint_sink(&mut self, sink: RepaintSink) {
        self.scheduler.set_sink(sink);
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history(&self) -> &Checkpoints {
        &self.history
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn status(&self) -> &str {
        &self.state.status
    }

    pub fn mode(&self) -> ToolMode {
        self.state.mode
    }

    /// True while any submitted job has not completed.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        info!("{status}");
        self.state.status = status;
        self.scheduler.request_redraw();
    }

    // --- tool dispatch ---

    fn tool(&self, mode: ToolMode) -> Option<&dyn Tool> {
        match mode {
            ToolMode::Idle => None,
            ToolMode::Anchors => Some(&self.anchors),
            ToolMode::Crop => Some(&self.crop),
            ToolMode::Threshold => Some(&self.threshold),
        }
    }

    /// Run `f` on the tool for `mode` with a context borrowing the rest of the
    /// editor. Returns `None` for `Idle`.
    fn with_tool<R>(
        &mut self,
        mode: ToolMode,
        f: impl FnOnce(&mut dyn Tool, &mut ToolContext<'_>) -> R,
    ) -> Option<R> {
        let Self {
            state,
            scheduler,
            anchors,
            crop,
            threshold,
            ..
        } = self;
        let tool: &mut dyn Tool = match mode {
            ToolMode::Idle => return None,
            ToolMode::Anchors => anchors,
            ToolMode::Crop => crop,
            ToolMode::Threshold => threshold,
        };
        let mut cx = ToolContext { state, scheduler };
        Some(f(tool, &mut cx))
    }

    // --- canvas and viewport ---

    /// Track the drawing surface size, re-fitting the image when it changes.
    pub fn set_canvas_size(&mut self, size: Size) {
        if self.state.canvas == size {
            return;
        }
        debug!(width = size.width, height = size.height, "canvas resized");
        self.state.canvas = size;
        self.state.fit_to_screen();
        self.scheduler.request_redraw();
    }

    pub fn fit_to_screen(&mut self) {
        self.state.fit_to_screen();
        self.scheduler.request_redraw();
    }

    /// Wheel zoom around `cursor`. Positive deltas zoom out.
    pub fn wheel(&mut self, delta: f32, cursor: ScreenPoint) {
        if !self.state.is_loaded() {
            return;
        }
        self.state.viewport.zoom_at_screen_point(delta, cursor);
        self.scheduler.request_redraw();
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.state.viewport.pan_by(dx, dy);
        self.scheduler.request_redraw();
    }

    // --- modes and pointer input ---

    /// Leave the current mode (dropping any drag) and enter `mode`.
    pub fn enter_mode(&mut self, mode: ToolMode) {
        if mode != ToolMode::Idle && !self.state.is_loaded() {
            debug!(%mode, "ignoring mode switch without an image");
            return;
        }
        let previous = self.state.mode;
        self.with_tool(previous, |tool, cx| tool.exit(cx));
        self.state.mode = mode;
        self.with_tool(mode, |tool, cx| tool.enter(cx));
        self.set_status(format!("Mode: {mode}"));
    }

    pub fn pointer_down(&mut self, pos: ScreenPoint) {
        self.with_tool(self.state.mode, |tool, cx| tool.pointer_down(cx, pos));
    }

    pub fn pointer_move(&mut self, pos: ScreenPoint) {
        self.with_tool(self.state.mode, |tool, cx| tool.pointer_move(cx, pos));
    }

    pub fn pointer_up(&mut self) {
        self.with_tool(self.state.mode, |tool, cx| tool.pointer_up(cx));
    }

    // --- per-tool controls ---

    pub fn clear_anchors(&mut self) {
        let Self {
            state,
            scheduler,
            anchors,
            ..
        } = self;
        anchors.clear(&mut ToolContext { state, scheduler });
    }

    /// Index of the anchor under drag, if any.
    pub fn dragged_anchor(&self) -> Option<usize> {
        self.anchors.dragging()
    }

    pub fn dragged_crop_edge(&self) -> Option<CropEdge> {
        self.crop.dragging()
    }

    pub fn set_crop_edge(&mut self, edge: CropEdge, value: f32) {
        let Self {
            state,
            scheduler,
            crop,
            ..
        } = self;
        crop.set_edge(&mut ToolContext { state, scheduler }, edge, value);
    }

    pub fn reset_crop(&mut self) {
        let Self {
            state,
            scheduler,
            crop,
            ..
        } = self;
        crop.reset(&mut ToolContext { state, scheduler });
    }

    /// Slider input: live preview only.
    pub fn set_threshold(&mut self, value: u8) {
        let Self {
            state,
            scheduler,
            threshold,
            ..
        } = self;
        threshold.set_value(&mut ToolContext { state, scheduler }, value);
    }

    /// Seed the slider with the Otsu estimate of the displayed bitmap.
    pub fn auto_threshold(&mut self) -> Option<u8> {
        let Self {
            state,
            scheduler,
            threshold,
            ..
        } = self;
        threshold.auto(&mut ToolContext { state, scheduler })
    }

    pub fn apply_threshold(&mut self) {
        let request = self.threshold.apply_op(&self.apply_context());
        self.submit_apply(request, self.threshold.busy_status());
    }

    /// Commit a threshold computed by the service on the full-resolution image.
    pub fn apply_threshold_otsu(&mut self) {
        let request = self.threshold.otsu_op(&self.apply_context());
        self.submit_apply(request, self.threshold.busy_status());
    }

    // --- apply / open / export ---

    /// Whether the active tool's apply action is enabled. Disabled while a
    /// job is in flight.
    pub fn can_apply(&self) -> bool {
        !self.is_busy()
            && self
                .tool(self.state.mode)
                .is_some_and(|tool| tool.can_apply(&self.state))
    }

    pub fn apply(&mut self) {
        let Some(tool) = self.tool(self.state.mode) else {
            return;
        };
        let request = tool.apply_op(&self.apply_context());
        let busy = tool.busy_status();
        self.submit_apply(request, busy);
    }

    fn apply_context(&self) -> ApplyContext<'_> {
        ApplyContext {
            state: &self.state,
            history: &self.history,
            threshold_source: self.config.threshold_source,
        }
    }

    fn submit_apply(&mut self, request: Option<(ImageId, EditOp)>, busy: &str) {
        if self.is_busy() {
            debug!("apply ignored while a job is in flight");
            return;
        }
        let Some((image_id, op)) = request else {
            debug!("apply not available");
            return;
        };
        info!(%image_id, op = %op.service_op(), "apply requested");
        self.submit(BridgeJob::Apply { image_id, op }, busy);
    }

    /// Unsaved edits would be lost by opening another image.
    pub fn needs_discard_confirmation(&self) -> bool {
        self.state.is_loaded() && self.state.dirty
    }

    pub fn open(&mut self, source: LoadSource) {
        info!(name = %source.name(), "opening image");
        self.submit(BridgeJob::Load(source), "Loading image...");
    }

    /// Open a dropped file after checking its type. Rejected files never reach
    /// the service.
    pub fn drop_file(&mut self, name: &str, mime: Option<&str>, source: LoadSource) -> bool {
        if let Err(e) = file_types::ensure_supported(name, mime) {
            warn!("{e}");
            self.set_status(e.to_string());
            return false;
        }
        self.open(source);
        true
    }

    pub fn export(&mut self, out_dir: PathBuf) {
        let Some(image_id) = self.state.image_id() else {
            self.set_status("Nothing to export");
            return;
        };
        self.submit(BridgeJob::Export { image_id, out_dir }, "Exporting...");
    }

    fn submit(&mut self, job: BridgeJob, busy: &str) {
        match self.jobs.submit(job) {
            Ok(()) => {
                self.in_flight += 1;
                self.set_status(busy);
            }
            Err(e) => {
                warn!("could not queue job: {e}");
                self.set_status(e.to_string());
            }
        }
    }

    // --- completions ---

    /// Completion half of every job.
    pub fn handle_event(&mut self, event: BridgeEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match event {
            BridgeEvent::Loaded {
                image_id,
                name,
                meta,
                bitmap,
            } => {
                let previous = self.state.mode;
                self.with_tool(previous, |tool, cx| tool.exit(cx));
                self.state.mode = ToolMode::Idle;

                self.install(image_id, bitmap);
                self.state.image_name = name;
                self.state.dirty = false;
                self.state.anchors.clear();
                self.state.crop = None;
                self.state.threshold_preview = None;
                self.history.set_checkpoint(image_id);
                self.state.fit_to_screen();

                let status = format!(
                    "Loaded {} ({}x{})",
                    self.state.image_name, meta.width, meta.height
                );
                self.set_status(status);
            }
            BridgeEvent::Applied {
                image_id,
                op,
                bitmap,
            } => {
                self.install(image_id, bitmap);
                if let Some(done) = self.commit_edit(image_id, &op) {
                    self.set_status(done);
                }
            }
            BridgeEvent::PreviewFailed {
                image_id,
                op,
                failed,
                message,
            } => {
                // The service already holds the edit; only the display is stale.
                warn!(%failed, "{message}");
                self.commit_edit(image_id, &op);
                self.set_status(format!(
                    "{} applied, but {failed} failed: {message}",
                    op.service_op()
                ));
            }
            BridgeEvent::Exported { path } => {
                self.state.dirty = false;
                self.set_status(format!("Exported: {}", path.display()));
            }
            BridgeEvent::Failed { op, message } => {
                warn!(%op, "{message}");
                self.set_status(format!("{op} failed: {message}"));
            }
        }
        self.scheduler.request_redraw();
    }

    /// Record a committed edit: dirty flag, checkpoint or working id, and the
    /// owning tool's post-apply reset. Returns the tool's completion status.
    fn commit_edit(&mut self, image_id: ImageId, op: &EditOp) -> Option<&'static str> {
        self.state.dirty = true;
        let mode = match op {
            EditOp::Homography(_) => {
                self.history.set_checkpoint(image_id);
                ToolMode::Anchors
            }
            EditOp::Crop(_) => {
                self.history.set_checkpoint(image_id);
                ToolMode::Crop
            }
            EditOp::Threshold { .. } => {
                self.history.set_working(image_id);
                ToolMode::Threshold
            }
        };
        self.with_tool(mode, |tool, cx| {
            tool.on_applied(cx);
            tool.done_status()
        })
    }

    fn install(&mut self, id: ImageId, bitmap: RgbaImage) {
        self.generation += 1;
        debug!(%id, generation = self.generation, "installing bitmap");
        self.state.image = Some(Image::new(id, Arc::new(bitmap), self.generation));
    }

    // --- rendering ---

    /// Frame tick: a new scene when a redraw was requested, else `None`.
    pub fn frame(&mut self) -> Option<Scene> {
        if self.scheduler.begin_frame() {
            Some(self.compose())
        } else {
            None
        }
    }

    pub fn compose(&mut self) -> Scene {
        self.compositor.compose(&self.state)
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}
