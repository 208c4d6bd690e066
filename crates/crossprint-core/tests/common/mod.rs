#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use image::{ImageFormat, Rgba, RgbaImage};

use crossprint_core::bridge::{BridgeEvent, BridgeJob, JobSink, LoadSource};
use crossprint_core::config::EditorConfig;
use crossprint_core::editor::Editor;
use crossprint_core::error::{CrossPrintError, Result};
use crossprint_core::geometry::{CropRect, ImagePoint, Size};
use crossprint_core::image::ImageId;
use crossprint_core::service::{ImageMeta, ImageService, LoadedImage, ThresholdMode};

pub const CANVAS: Size = Size {
    width: 400.0,
    height: 300.0,
};

/// Single-colour RGBA bitmap.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Left half grey level `left`, right half grey level `right`.
pub fn bicolor(width: u32, height: u32, left: u8, right: u8) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        let v = if x < width / 2 { left } else { right };
        Rgba([v, v, v, 255])
    })
}

/// Horizontal grey ramp from 0 to 255.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        Rgba([v, v, v, 255])
    })
}

pub fn encode_png(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

// ---------------------------------------------------------------------------
// Job sink that only records
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingSink {
    jobs: Arc<Mutex<Vec<BridgeJob>>>,
}

impl RecordingSink {
    pub fn jobs(&self) -> Vec<BridgeJob> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<BridgeJob> {
        self.jobs.lock().unwrap().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }
}

impl JobSink for RecordingSink {
    fn submit(&self, job: BridgeJob) -> Result<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

/// Sink whose bridge has gone away.
pub struct ClosedSink;

impl JobSink for ClosedSink {
    fn submit(&self, _job: BridgeJob) -> Result<()> {
        Err(CrossPrintError::BridgeClosed)
    }
}

/// Editor on a 400x300 canvas with `bitmap` loaded as image #1.
pub fn loaded_editor_with(bitmap: RgbaImage) -> (Editor, RecordingSink) {
    let sink = RecordingSink::default();
    let mut editor = Editor::new(EditorConfig::default(), Box::new(sink.clone()));
    editor.set_canvas_size(CANVAS);
    editor.open(LoadSource::Bytes {
        name: "scan.png".into(),
        bytes: Arc::from(Vec::new()),
    });

    let (width, height) = bitmap.dimensions();
    editor.handle_event(BridgeEvent::Loaded {
        image_id: ImageId(1),
        name: "scan.png".into(),
        meta: ImageMeta {
            width,
            height,
            scale: 1.0,
        },
        bitmap,
    });
    (editor, sink)
}

/// Editor with a plain 800x600 image, fitted at zoom 0.5 and pan (0, 0).
pub fn loaded_editor() -> (Editor, RecordingSink) {
    loaded_editor_with(solid(800, 600, [200, 200, 200, 255]))
}

// ---------------------------------------------------------------------------
// Service that records every call
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
    in_call: Arc<AtomicBool>,
    overlapped: Arc<AtomicBool>,
}

impl CallLog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }

    fn enter(&self, name: &str) {
        if self.in_call.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.lock().unwrap().push(name.to_string());
        std::thread::sleep(std::time::Duration::from_millis(5));
        self.in_call.store(false, Ordering::SeqCst);
    }
}

/// Fake image service: every call is logged, previews are a 2x2 PNG.
pub struct RecordingService {
    pub log: CallLog,
    /// Calls with this name fail.
    pub fail_on: Option<&'static str>,
}

impl RecordingService {
    pub fn new(log: CallLog) -> Self {
        Self { log, fail_on: None }
    }

    fn call(&self, name: &'static str) -> Result<()> {
        self.log.enter(name);
        if self.fail_on == Some(name) {
            return Err(CrossPrintError::InvalidGeometry(format!("{name} rejected")));
        }
        Ok(())
    }

    fn loaded() -> LoadedImage {
        LoadedImage {
            id: ImageId(7),
            meta: ImageMeta {
                width: 2,
                height: 2,
                scale: 1.0,
            },
        }
    }
}

impl ImageService for RecordingService {
    fn load_image(&mut self, _path: &Path) -> Result<LoadedImage> {
        self.call("load_image")?;
        Ok(Self::loaded())
    }

    fn load_image_from_bytes(&mut self, _name: &str, _bytes: &[u8]) -> Result<LoadedImage> {
        self.call("load_image_from_bytes")?;
        Ok(Self::loaded())
    }

    fn get_preview_png(&mut self, _id: ImageId) -> Result<Vec<u8>> {
        self.call("get_preview_png")?;
        Ok(encode_png(&solid(2, 2, [9, 9, 9, 255])))
    }

    fn apply_homography(&mut self, _id: ImageId, _anchors: &[ImagePoint; 4]) -> Result<()> {
        self.call("apply_homography")
    }

    fn apply_crop(&mut self, _id: ImageId, _rect: &CropRect) -> Result<()> {
        self.call("apply_crop")
    }

    fn apply_threshold(&mut self, _id: ImageId, _mode: ThresholdMode, _value: u8) -> Result<()> {
        self.call("apply_threshold")
    }

    fn export_image(&mut self, _id: ImageId, out_dir: &Path) -> Result<PathBuf> {
        self.call("export_image")?;
        Ok(out_dir.join("out.png"))
    }
}
