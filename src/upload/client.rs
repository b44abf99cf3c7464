use crate::upload::types::{ServerResponse, UploadEvent, UploadJob, UploadOutcome};
use crate::utils::endpoint::join_url;
use futures_util::{stream, Stream, StreamExt};
use log::{info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Fallback message for `success: false` responses without an error field.
const UNKNOWN_ERROR: &str = "Ein unbekannter Fehler ist aufgetreten.";

/// Transfer progress is held at or below this percentage until the server
/// has confirmed the reconstruction.
pub const PROGRESS_CAP: u8 = 90;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
#[error("{name}: {source}")]
struct FileReadError {
    name: String,
    #[source]
    source: std::io::Error,
}

/// Client for the reconstruction backend.
pub struct UploadClient {
    base_url: String,
    client: reqwest::Client,
}

impl UploadClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Runs one upload cycle and reports transfer progress through `events`.
    ///
    /// No timeout is applied; a backend that never answers leaves the
    /// request pending.
    pub async fn upload(&self, job: &UploadJob, events: &Sender<UploadEvent>) -> UploadOutcome {
        let form = match build_form(job, events) {
            Ok(form) => form,
            Err(e) => return UploadOutcome::FileError(e.to_string()),
        };

        let url = join_url(&self.base_url, "/upload");
        info!("uploading {} files to {}", job.files.len(), url);

        let response = match self.client.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("upload request failed: {}", e);
                return UploadOutcome::NetworkError(e.to_string());
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("could not read response body: {}", e);
                return UploadOutcome::NetworkError(e.to_string());
            }
        };

        classify_response(status, &body)
    }

    /// Fetches the rendered preview image after a successful reconstruction.
    ///
    /// Failures are logged and degrade to an empty preview area; they do
    /// not change the outcome of the upload itself.
    pub async fn fetch_preview(&self, preview_url: &str) -> Option<Vec<u8>> {
        let url = join_url(&self.base_url, preview_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                response.bytes().await.ok().map(|bytes| bytes.to_vec())
            }
            Ok(response) => {
                warn!("preview not available: HTTP {}", response.status());
                None
            }
            Err(e) => {
                warn!("preview not available: {}", e);
                None
            }
        }
    }
}

/// Sorts one HTTP response into the outcome taxonomy.
///
/// Only status 200 counts as a handled request; the backend reports
/// application-level failures as 200 with `success: false`.
pub fn classify_response(status: u16, body: &str) -> UploadOutcome {
    if status == 200 {
        match serde_json::from_str::<ServerResponse>(body) {
            Ok(response) if response.success => UploadOutcome::Success {
                preview_url: response.preview_url.unwrap_or_default(),
                download_url: response.download_url.unwrap_or_default(),
            },
            Ok(response) => UploadOutcome::ApplicationError(
                response.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ),
            Err(_) => UploadOutcome::ParseError,
        }
    } else {
        let message = serde_json::from_str::<ServerResponse>(body)
            .ok()
            .and_then(|response| response.error);
        UploadOutcome::HttpError { status, message }
    }
}

/// Maps transferred bytes to a bar percentage, capped so the bar never
/// completes before the server has answered.
pub fn transfer_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return PROGRESS_CAP;
    }
    let rounded = (sent.saturating_mul(100) + total / 2) / total;
    rounded.min(u64::from(PROGRESS_CAP)) as u8
}

fn build_form(job: &UploadJob, events: &Sender<UploadEvent>) -> Result<Form, FileReadError> {
    let mut form = Form::new()
        .text("filter_type", job.filter.form_value())
        .text("sigma", job.sigma.to_string())
        .text("min_threshold", job.min_threshold.to_string())
        .text("max_threshold", job.max_threshold.to_string());

    // Proportional progress is only possible when every file size is known.
    let total: Option<u64> = job
        .files
        .iter()
        .map(|path| std::fs::metadata(path).ok().map(|meta| meta.len()))
        .sum();

    let sent = Arc::new(AtomicU64::new(0));
    let events = Arc::new(Mutex::new(events.clone()));

    for path in &job.files {
        let name = file_name_of(path);
        let data = std::fs::read(path).map_err(|source| FileReadError {
            name: name.clone(),
            source,
        })?;

        let part = match total {
            Some(total_bytes) => {
                let length = data.len() as u64;
                let body = Body::wrap_stream(progress_stream(
                    data,
                    Arc::clone(&sent),
                    total_bytes,
                    Arc::clone(&events),
                ));
                Part::stream_with_length(body, length)
            }
            None => Part::bytes(data),
        };

        form = form.part("files[]", part.file_name(name));
    }

    Ok(form)
}

/// Chunks one file's bytes into a stream that reports cumulative transfer
/// progress as the request body is polled.
fn progress_stream(
    data: Vec<u8>,
    sent: Arc<AtomicU64>,
    total: u64,
    events: Arc<Mutex<Sender<UploadEvent>>>,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> {
    let chunks: Vec<Vec<u8>> = data.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    stream::iter(chunks).map(move |chunk| {
        let done = sent.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
        if let Ok(sender) = events.lock() {
            let _ = sender.send(UploadEvent::Progress(transfer_percent(done, total)));
            if done >= total {
                let _ = sender.send(UploadEvent::BodySent);
            }
        }
        Ok(chunk)
    })
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_with_success_flag_is_a_success() {
        let body = r#"{"success":true,"session_id":"abc","preview_url":"/preview/abc","download_url":"/download/abc"}"#;
        assert_eq!(
            classify_response(200, body),
            UploadOutcome::Success {
                preview_url: "/preview/abc".to_string(),
                download_url: "/download/abc".to_string(),
            }
        );
    }

    #[test]
    fn ok_response_without_success_is_an_application_error() {
        let body = r#"{"success":false,"error":"Segmentierung fehlgeschlagen"}"#;
        assert_eq!(
            classify_response(200, body),
            UploadOutcome::ApplicationError("Segmentierung fehlgeschlagen".to_string())
        );
    }

    #[test]
    fn application_error_without_message_uses_the_fallback() {
        let body = r#"{"success":false}"#;
        assert_eq!(
            classify_response(200, body),
            UploadOutcome::ApplicationError(UNKNOWN_ERROR.to_string())
        );
    }

    #[test]
    fn unparsable_ok_body_is_a_parse_error() {
        assert_eq!(
            classify_response(200, "<html>gateway</html>"),
            UploadOutcome::ParseError
        );
    }

    #[test]
    fn error_status_keeps_the_server_message() {
        let body = r#"{"error":"Keine Dateien hochgeladen"}"#;
        assert_eq!(
            classify_response(400, body),
            UploadOutcome::HttpError {
                status: 400,
                message: Some("Keine Dateien hochgeladen".to_string()),
            }
        );
    }

    #[test]
    fn error_status_with_unparsable_body_has_no_message() {
        assert_eq!(
            classify_response(500, "Internal Server Error"),
            UploadOutcome::HttpError {
                status: 500,
                message: None,
            }
        );
    }

    #[test]
    fn transfer_percent_is_proportional_and_capped() {
        assert_eq!(transfer_percent(0, 1000), 0);
        assert_eq!(transfer_percent(500, 1000), 50);
        assert_eq!(transfer_percent(950, 1000), PROGRESS_CAP);
        assert_eq!(transfer_percent(1000, 1000), PROGRESS_CAP);
    }

    #[test]
    fn transfer_percent_with_zero_total_stays_at_the_cap() {
        assert_eq!(transfer_percent(123, 0), PROGRESS_CAP);
    }
}
