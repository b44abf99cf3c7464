mod client;
mod types;

pub use client::{classify_response, transfer_percent, UploadClient, PROGRESS_CAP};
pub use types::{FilterKind, ServerResponse, UploadEvent, UploadJob, UploadOutcome};
