use tracing::trace;

/// Callback asking the host to run another frame.
pub type RepaintSink = Box<dyn Fn() + Send>;

/// Coalesces redraw requests into at most one paint per frame.
///
/// `request_redraw` sets a pending flag and pokes the repaint sink only on the
/// transition from clean to pending. `begin_frame` clears the flag and reports
/// whether this frame should paint. Starts pending so the first frame paints.
pub struct RenderScheduler {
    pending: bool,
    paints: u64,
    sink: Option<RepaintSink>,
}

impl Default for RenderScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("pending", &self.pending)
            .field("paints", &self.paints)
            .finish_non_exhaustive()
    }
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self {
            pending: true,
            paints: 0,
            sink: None,
        }
    }

    pub fn with_sink(sink: RepaintSink) -> Self {
        Self {
            sink: Some(sink),
            ..Self::new()
        }
    }

    pub fn set_sink(&mut self, sink: RepaintSink) {
        self.sink = Some(sink);
    }

    /// Idempotent until the next `begin_frame`.
    pub fn request_redraw(&mut self) {
        if self.pending {
            return;
        }
        self.pending = true;
        trace!("redraw scheduled");
        if let Some(sink) = &self.sink {
            sink();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Frame boundary. Returns `true` exactly once per batch of requests.
    pub fn begin_frame(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.paints += 1;
        true
    }

    /// Number of frames that painted so far.
    pub fn paint_count(&self) -> u64 {
        self.paints
    }
}
