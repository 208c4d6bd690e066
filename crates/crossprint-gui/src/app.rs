use std::path::PathBuf;
use std::sync::mpsc;

use crossprint_core::bridge::{BridgeEvent, BridgeQueue, LoadSource};
use crossprint_core::config::EditorConfig;
use crossprint_core::editor::Editor;
use crossprint_core::file_types;
use crossprint_core::render::Scene;
use crossprint_core::service::LocalImageService;
use tracing::{debug, info};

use crate::convert::TextureCache;
use crate::panels;

/// Results of file dialogs, which run off the UI thread.
pub enum UiMessage {
    Open(PathBuf),
    ExportTo(PathBuf),
}

/// An open request held back until the user agrees to drop unsaved edits.
pub struct PendingOpen {
    pub name: String,
    pub mime: Option<String>,
    pub source: LoadSource,
}

pub struct CrossPrintApp {
    pub editor: Editor,
    pub event_rx: mpsc::Receiver<BridgeEvent>,
    pub ui_tx: mpsc::Sender<UiMessage>,
    pub ui_rx: mpsc::Receiver<UiMessage>,
    pub textures: TextureCache,
    /// Last composed scene, repainted every egui frame.
    pub scene: Option<Scene>,
    pub pending_open: Option<PendingOpen>,
    pub export_dir: String,
    pub show_about: bool,
}

impl CrossPrintApp {
    pub fn new(ctx: &egui::Context, config: EditorConfig) -> anyhow::Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();
        let (ui_tx, ui_rx) = mpsc::channel();

        let service = LocalImageService::new(config.store.clone());
        let notify_ctx = ctx.clone();
        let (queue, ready) = BridgeQueue::spawn(
            service,
            event_tx,
            Box::new(move || notify_ctx.request_repaint()),
        )?;

        let export_dir = config.export_dir.display().to_string();
        let mut editor = Editor::new(config, Box::new(queue));
        let repaint_ctx = ctx.clone();
        editor.set_repaint_sink(Box::new(move || repaint_ctx.request_repaint()));
        ready.signal();

        Ok(Self {
            editor,
            event_rx,
            ui_tx,
            ui_rx,
            textures: TextureCache::default(),
            scene: None,
            pending_open: None,
            export_dir,
            show_about: false,
        })
    }

    /// Drain all pending completions from the bridge.
    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.editor.handle_event(event);
        }
    }

    fn poll_ui_messages(&mut self) {
        while let Ok(message) = self.ui_rx.try_recv() {
            match message {
                UiMessage::Open(path) => {
                    let source = LoadSource::Path(path);
                    let name = source.name();
                    self.request_open(name, None, source);
                }
                UiMessage::ExportTo(dir) => {
                    self.export_dir = dir.display().to_string();
                    self.editor.export(dir);
                }
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only the first file is opened.
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let mime = (!file.mime.is_empty()).then(|| file.mime.clone());
        let source = if let Some(path) = file.path {
            LoadSource::Path(path)
        } else if let Some(bytes) = file.bytes {
            LoadSource::Bytes {
                name: file.name.clone(),
                bytes,
            }
        } else {
            debug!(name = %file.name, "dropped file without path or bytes");
            return;
        };
        let name = if file.name.is_empty() {
            source.name()
        } else {
            file.name
        };
        self.request_open(name, mime, source);
    }

    /// Open now, or ask first when the current image has unsaved edits.
    pub fn request_open(&mut self, name: String, mime: Option<String>, source: LoadSource) {
        if file_types::is_supported(&name, mime.as_deref()) && self.editor.needs_discard_confirmation() {
            info!(%name, "open deferred until unsaved edits are discarded");
            self.pending_open = Some(PendingOpen { name, mime, source });
            return;
        }
        self.editor.drop_file(&name, mime.as_deref(), source);
    }

    fn show_discard_dialog(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_open.as_ref() else {
            return;
        };
        let mut decision = None;
        egui::Window::new("Unsaved changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!(
                    "Discard edits to {} and open {}?",
                    self.editor.state().image_name,
                    pending.name
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Discard").clicked() {
                        decision = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                });
            });

        match decision {
            Some(true) => {
                if let Some(pending) = self.pending_open.take() {
                    self.editor
                        .drop_file(&pending.name, pending.mime.as_deref(), pending.source);
                }
            }
            Some(false) => {
                self.pending_open = None;
                self.editor.set_status("Open cancelled");
            }
            None => {}
        }
    }
}

impl eframe::App for CrossPrintApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_ui_messages();
        self.poll_events();
        self.handle_dropped_files(ctx);

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::tools::show(ctx, self);
        panels::viewport::show(ctx, self);

        self.show_discard_dialog(ctx);

        if self.show_about {
            egui::Window::new("About CrossPrint")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("CrossPrint");
                        ui.label("Perspective, crop and threshold editor for scanned prints");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}
