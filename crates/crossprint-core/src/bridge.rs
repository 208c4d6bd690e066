//! Single-flight queue in front of the image service.
//!
//! One worker thread owns the service and runs jobs strictly in submission
//! order, so two calls never touch the same image concurrently. The worker
//! does not look at its queue until the one-shot [`ReadySignal`] fires; jobs
//! submitted before that simply wait.

use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use image::{ImageFormat, RgbaImage};
use tracing::{debug, info, warn};

use crate::error::{CrossPrintError, Result, ServiceOp};
use crate::geometry::{CropRect, ImagePoint};
use crate::image::ImageId;
use crate::service::{ImageMeta, ImageService, ThresholdMode};

/// Where a newly opened image comes from.
#[derive(Clone, Debug)]
pub enum LoadSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl LoadSource {
    /// Display name for the status line.
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Bytes { name, .. } => name.clone(),
        }
    }
}

/// An edit committed to the service.
#[derive(Clone, Debug, PartialEq)]
pub enum EditOp {
    Homography([ImagePoint; 4]),
    Crop(CropRect),
    Threshold { mode: ThresholdMode, value: u8 },
}

impl EditOp {
    pub fn service_op(&self) -> ServiceOp {
        match self {
            Self::Homography(_) => ServiceOp::ApplyHomography,
            Self::Crop(_) => ServiceOp::ApplyCrop,
            Self::Threshold { .. } => ServiceOp::ApplyThreshold,
        }
    }
}

/// One unit of work for the bridge. Each job yields exactly one [`BridgeEvent`].
#[derive(Clone, Debug)]
pub enum BridgeJob {
    /// Load, then fetch and decode the preview.
    Load(LoadSource),
    /// Apply an edit, then fetch and decode the new preview.
    Apply { image_id: ImageId, op: EditOp },
    Export { image_id: ImageId, out_dir: PathBuf },
}

impl BridgeJob {
    /// The first service call the job makes.
    pub fn service_op(&self) -> ServiceOp {
        match self {
            Self::Load(LoadSource::Path(_)) => ServiceOp::LoadImage,
            Self::Load(LoadSource::Bytes { .. }) => ServiceOp::LoadImageFromBytes,
            Self::Apply { op, .. } => op.service_op(),
            Self::Export { .. } => ServiceOp::ExportImage,
        }
    }
}

/// Outcome of a job, delivered back to the UI thread.
#[derive(Debug)]
pub enum BridgeEvent {
    Loaded {
        image_id: ImageId,
        name: String,
        meta: ImageMeta,
        bitmap: RgbaImage,
    },
    Applied {
        image_id: ImageId,
        op: EditOp,
        bitmap: RgbaImage,
    },
    /// The edit was committed by the service but its new preview could not
    /// be fetched or decoded. The image behind `image_id` has changed.
    PreviewFailed {
        image_id: ImageId,
        op: EditOp,
        failed: ServiceOp,
        message: String,
    },
    Exported {
        path: PathBuf,
    },
    Failed {
        op: ServiceOp,
        message: String,
    },
}

/// Anything that accepts bridge jobs.
pub trait JobSink {
    fn submit(&self, job: BridgeJob) -> Result<()>;
}

/// Callback run after each event is sent, e.g. to wake the UI.
pub type Notify = Box<dyn Fn() + Send>;

/// Fires once to let the bridge start issuing calls.
pub struct ReadySignal {
    tx: mpsc::Sender<()>,
}

impl ReadySignal {
    pub fn signal(self) {
        let _ = self.tx.send(());
    }
}

/// Cloneable handle for submitting jobs from other threads (e.g. file dialogs).
#[derive(Clone)]
pub struct BridgeSender {
    tx: mpsc::Sender<BridgeJob>,
}

impl JobSink for BridgeSender {
    fn submit(&self, job: BridgeJob) -> Result<()> {
        debug!(op = %job.service_op(), "job queued");
        self.tx.send(job).map_err(|_| CrossPrintError::BridgeClosed)
    }
}

/// Owner side of the queue. Dropping it (and every sender) stops the worker.
pub struct BridgeQueue {
    sender: BridgeSender,
}

impl BridgeQueue {
    /// Spawn the worker thread. Events go to `events`; `notify` runs after each.
    pub fn spawn<S>(
        service: S,
        events: mpsc::Sender<BridgeEvent>,
        notify: Notify,
    ) -> Result<(Self, ReadySignal)>
    where
        S: ImageService + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::channel::<BridgeJob>();
        let (ready_tx, ready_rx) = mpsc::channel::<()>();

        std::thread::Builder::new()
            .name("crossprint-bridge".into())
            .spawn(move || {
                if ready_rx.recv().is_err() {
                    debug!("bridge never became ready; worker exiting");
                    return;
                }
                info!("image bridge ready");
                worker_loop(service, job_rx, events, notify);
            })?;

        Ok((
            Self {
                sender: BridgeSender { tx: job_tx },
            },
            ReadySignal { tx: ready_tx },
        ))
    }

    pub fn sender(&self) -> BridgeSender {
        self.sender.clone()
    }
}

impl JobSink for BridgeQueue {
    fn submit(&self, job: BridgeJob) -> Result<()> {
        self.sender.submit(job)
    }
}

fn worker_loop<S: ImageService>(
    mut service: S,
    jobs: mpsc::Receiver<BridgeJob>,
    events: mpsc::Sender<BridgeEvent>,
    notify: Notify,
) {
    while let Ok(job) = jobs.recv() {
        let event = run_job(&mut service, job);
        if events.send(event).is_err() {
            debug!("event receiver dropped; worker exiting");
            return;
        }
        notify();
    }
}

/// Run one job to completion, turning any failure into a `Failed` event.
pub fn run_job<S: ImageService + ?Sized>(service: &mut S, job: BridgeJob) -> BridgeEvent {
    let op = job.service_op();
    match execute(service, job) {
        Ok(event) => event,
        Err(e) => {
            let (op, message) = split_failure(e, op);
            warn!(%op, "service call failed: {message}");
            BridgeEvent::Failed { op, message }
        }
    }
}

/// Operation name and message of a failure, defaulting to `op` when the
/// error was not already attributed to a call.
fn split_failure(e: CrossPrintError, op: ServiceOp) -> (ServiceOp, String) {
    match e.in_op(op) {
        CrossPrintError::ServiceCall { op, message } => (op, message),
        other => (op, other.to_string()),
    }
}

fn execute<S: ImageService + ?Sized>(service: &mut S, job: BridgeJob) -> Result<BridgeEvent> {
    match job {
        BridgeJob::Load(source) => {
            let name = source.name();
            let loaded = match &source {
                LoadSource::Path(path) => service
                    .load_image(path)
                    .map_err(|e| e.in_op(ServiceOp::LoadImage))?,
                LoadSource::Bytes { name, bytes } => service
                    .load_image_from_bytes(name, bytes)
                    .map_err(|e| e.in_op(ServiceOp::LoadImageFromBytes))?,
            };
            let bitmap = fetch_preview(service, loaded.id)?;
            Ok(BridgeEvent::Loaded {
                image_id: loaded.id,
                name,
                meta: loaded.meta,
                bitmap,
            })
        }
        BridgeJob::Apply { image_id, op } => {
            let result = match &op {
                EditOp::Homography(anchors) => service.apply_homography(image_id, anchors),
                EditOp::Crop(rect) => service.apply_crop(image_id, rect),
                EditOp::Threshold { mode, value } => {
                    service.apply_threshold(image_id, *mode, *value)
                }
            };
            result.map_err(|e| e.in_op(op.service_op()))?;
            match fetch_preview(service, image_id) {
                Ok(bitmap) => Ok(BridgeEvent::Applied {
                    image_id,
                    op,
                    bitmap,
                }),
                Err(e) => {
                    let (failed, message) = split_failure(e, ServiceOp::GetPreviewPng);
                    warn!(%image_id, op = %op.service_op(), %failed, "edit applied but preview lost: {message}");
                    Ok(BridgeEvent::PreviewFailed {
                        image_id,
                        op,
                        failed,
                        message,
                    })
                }
            }
        }
        BridgeJob::Export { image_id, out_dir } => {
            let path = service
                .export_image(image_id, &out_dir)
                .map_err(|e| e.in_op(ServiceOp::ExportImage))?;
            Ok(BridgeEvent::Exported { path })
        }
    }
}

fn fetch_preview<S: ImageService + ?Sized>(service: &mut S, id: ImageId) -> Result<RgbaImage> {
    let png = service
        .get_preview_png(id)
        .map_err(|e| e.in_op(ServiceOp::GetPreviewPng))?;
    let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
        .map_err(|e| CrossPrintError::from(e).in_op(ServiceOp::DecodePreview))?;
    Ok(decoded.to_rgba8())
}
