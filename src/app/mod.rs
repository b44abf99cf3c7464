mod state;
mod ui;

pub use state::{
    validate_selection, StatusBanner, StatusKind, UploadPhase, UploadState, NO_FILES_MESSAGE,
    PROGRESS_FLOOR, UPLOADING_MESSAGE,
};

use crate::upload::{UploadClient, UploadEvent, UploadJob, UploadOutcome};
use crate::utils::endpoint::{normalize_base_url, DEFAULT_BASE_URL};
use eframe::egui;
use log::{error, info, warn};
use std::sync::mpsc::{channel, Receiver};

/// Orchestrates one upload cycle per submission: validates the form, hands
/// the job to a worker thread and folds the worker's events back into the
/// window state each frame.
pub struct UploaderApp {
    server_url: String,
    job: UploadJob,
    state: UploadState,
    events: Option<Receiver<UploadEvent>>,
    /// Base address the running (or last) cycle was sent to; download and
    /// preview paths from the response are resolved against it.
    active_base: Option<String>,
    preview_texture: Option<egui::TextureHandle>,
}

impl UploaderApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        info!("initializing DICOM 3D uploader");
        Self {
            server_url: DEFAULT_BASE_URL.to_string(),
            job: UploadJob::default(),
            state: UploadState::default(),
            events: None,
            active_base: None,
            preview_texture: None,
        }
    }

    /// Intercepts the submit. Validation failures surface as an error
    /// banner without any network traffic; a valid submission locks the
    /// submit control until a terminal event arrives.
    pub fn start_upload(&mut self) {
        if let Err(message) = validate_selection(&self.job.files) {
            self.state.show_banner(StatusKind::Error, message);
            return;
        }

        let base_url = match normalize_base_url(&self.server_url) {
            Ok(url) => url,
            Err(e) => {
                self.state
                    .show_banner(StatusKind::Error, format!("Ungültige Serveradresse: {}", e));
                return;
            }
        };

        self.preview_texture = None;
        self.active_base = Some(base_url.clone());
        self.state.begin_upload();

        let job = self.job.clone();
        let (sender, receiver) = channel();
        self.events = Some(receiver);

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("failed to start upload runtime: {}", e);
                    let _ = sender.send(UploadEvent::Finished(UploadOutcome::NetworkError(
                        e.to_string(),
                    )));
                    return;
                }
            };
            rt.block_on(async {
                let client = UploadClient::new(base_url);
                let outcome = client.upload(&job, &sender).await;

                let preview = match &outcome {
                    UploadOutcome::Success { preview_url, .. } if !preview_url.is_empty() => {
                        client.fetch_preview(preview_url).await
                    }
                    _ => None,
                };

                let _ = sender.send(UploadEvent::Finished(outcome));
                if let Some(bytes) = preview {
                    let _ = sender.send(UploadEvent::Preview(bytes));
                }
            });
        });
    }

    /// Drains worker events and decodes a freshly fetched preview image
    /// into a texture.
    fn update_state(&mut self, ctx: &egui::Context) {
        let mut had_updates = false;
        if let Some(receiver) = &self.events {
            while let Ok(event) = receiver.try_recv() {
                had_updates = true;
                self.state.apply(event);
            }
        }

        if self.preview_texture.is_none() {
            if let Some(bytes) = self.state.preview_bytes.take() {
                match decode_preview(&bytes) {
                    Ok(image) => {
                        self.preview_texture = Some(ctx.load_texture(
                            "model-preview",
                            image,
                            egui::TextureOptions::LINEAR,
                        ));
                    }
                    Err(e) => warn!("could not decode preview image: {}", e),
                }
            }
        }

        if had_updates || self.state.in_flight() {
            ctx.request_repaint();
        }
    }
}

fn decode_preview(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let rgba = decoded.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        rgba.as_flat_samples().as_slice(),
    ))
}

impl eframe::App for UploaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
