use crate::upload::{UploadEvent, UploadOutcome, PROGRESS_CAP};
use std::path::Path;

/// Shown while the progress bar first appears, before any transfer data
/// exists. Cosmetic, not a measured value.
pub const PROGRESS_FLOOR: u8 = 10;

pub const NO_FILES_MESSAGE: &str = "Bitte wählen Sie mindestens eine DICOM-Datei aus.";
pub const UPLOADING_MESSAGE: &str = "Dateien werden hochgeladen...";

/// Local pre-flight check: at least one file must be selected.
pub fn validate_selection(files: &[impl AsRef<Path>]) -> Result<(), &'static str> {
    if files.is_empty() {
        Err(NO_FILES_MESSAGE)
    } else {
        Ok(())
    }
}

/// Visual category of the status banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// The single replaceable banner below the form. No history is kept; each
/// new status takes the place of the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub kind: StatusKind,
    pub message: String,
}

/// Phases of one submit-to-response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    AwaitingResponse,
    Succeeded,
    Failed,
}

/// Everything the result area of the window renders from. Kept free of GUI
/// handles so the whole cycle can be driven in tests.
#[derive(Default)]
pub struct UploadState {
    pub phase: UploadPhase,
    pub banner: Option<StatusBanner>,
    /// Progress bar position in [0, 100]. Monotone within one cycle.
    pub percent: u8,
    pub progress_visible: bool,
    /// Server-relative source of the preview image.
    pub preview_source: Option<String>,
    /// Server-relative target of the download link.
    pub download_target: Option<String>,
    /// Fetched preview bytes, pending decode by the GUI layer.
    pub preview_bytes: Option<Vec<u8>>,
}

impl UploadState {
    /// The submit control is locked exactly while a request is in flight.
    pub fn in_flight(&self) -> bool {
        matches!(
            self.phase,
            UploadPhase::Uploading | UploadPhase::AwaitingResponse
        )
    }

    pub fn submit_enabled(&self) -> bool {
        !self.in_flight()
    }

    pub fn show_banner(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.banner = Some(StatusBanner {
            kind,
            message: message.into(),
        });
    }

    /// Enters the upload phase for a validated submission.
    pub fn begin_upload(&mut self) {
        self.phase = UploadPhase::Uploading;
        self.percent = PROGRESS_FLOOR;
        self.progress_visible = true;
        self.preview_source = None;
        self.download_target = None;
        self.preview_bytes = None;
        self.show_banner(StatusKind::Info, UPLOADING_MESSAGE);
    }

    /// Applies one worker event. Progress never moves backwards and stays
    /// below 100 until the server has confirmed success.
    pub fn apply(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::Progress(percent) => {
                if self.in_flight() {
                    self.percent = self.percent.max(percent.min(PROGRESS_CAP));
                }
            }
            UploadEvent::BodySent => {
                if self.phase == UploadPhase::Uploading {
                    self.phase = UploadPhase::AwaitingResponse;
                }
            }
            UploadEvent::Finished(outcome) => self.finish(outcome),
            UploadEvent::Preview(bytes) => self.preview_bytes = Some(bytes),
        }
    }

    fn finish(&mut self, outcome: UploadOutcome) {
        let message = outcome.banner_text();
        match outcome {
            UploadOutcome::Success {
                preview_url,
                download_url,
            } => {
                self.phase = UploadPhase::Succeeded;
                self.percent = 100;
                self.preview_source = Some(preview_url);
                self.download_target = Some(download_url);
                self.show_banner(StatusKind::Success, message);
            }
            _ => {
                self.phase = UploadPhase::Failed;
                self.show_banner(StatusKind::Error, message);
            }
        }
    }
}
