use serde::Deserialize;
use std::path::PathBuf;

/// JSON body returned by the reconstruction backend.
///
/// Handled requests answer with status 200 and carry the `success` flag;
/// transport-level failures answer non-200 with at most an `error` field.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerResponse {
    #[serde(default)]
    pub success: bool,
    pub preview_url: Option<String>,
    pub download_url: Option<String>,
    pub error: Option<String>,
}

/// Smoothing filter the backend applies before segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterKind {
    #[default]
    Gaussian,
    Median,
    Unfiltered,
}

impl FilterKind {
    /// Sigma only parameterizes the Gaussian filter.
    pub fn uses_sigma(self) -> bool {
        matches!(self, FilterKind::Gaussian)
    }

    /// Value sent in the `filter_type` form field.
    pub fn form_value(self) -> &'static str {
        match self {
            FilterKind::Gaussian => "gaussian",
            FilterKind::Median => "median",
            FilterKind::Unfiltered => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Gaussian => "Gauß",
            FilterKind::Median => "Median",
            FilterKind::Unfiltered => "Ohne Filter",
        }
    }
}

/// One reconstruction request as entered in the form.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub files: Vec<PathBuf>,
    pub filter: FilterKind,
    pub sigma: f64,
    /// Lower bound of the segmentation window in Hounsfield units.
    pub min_threshold: i32,
    /// Upper bound of the segmentation window in Hounsfield units.
    pub max_threshold: i32,
}

impl Default for UploadJob {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            filter: FilterKind::Gaussian,
            sigma: 1.0,
            min_threshold: 300,
            max_threshold: 1500,
        }
    }
}

/// Terminal result of one upload cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success {
        preview_url: String,
        download_url: String,
    },
    /// Status 200 with `success: false`; message supplied by the server.
    ApplicationError(String),
    /// Non-200 status; message taken from the JSON body when it has one.
    HttpError { status: u16, message: Option<String> },
    /// The response body was not valid JSON.
    ParseError,
    /// The request never completed.
    NetworkError(String),
    /// A selected file could not be read before the request was sent.
    FileError(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    /// User-facing banner text for this outcome.
    pub fn banner_text(&self) -> String {
        match self {
            UploadOutcome::Success { .. } => "3D-Modell wurde erfolgreich erstellt!".to_string(),
            UploadOutcome::ApplicationError(message) => message.clone(),
            UploadOutcome::HttpError {
                message: Some(message),
                ..
            } => message.clone(),
            UploadOutcome::HttpError {
                status,
                message: None,
            } => format!("Serverfehler: {}", status),
            UploadOutcome::ParseError => "Fehler beim Parsen der Serverantwort.".to_string(),
            UploadOutcome::NetworkError(_) => {
                "Netzwerkfehler beim Hochladen der Dateien.".to_string()
            }
            UploadOutcome::FileError(message) => {
                format!("Datei konnte nicht gelesen werden: {}", message)
            }
        }
    }
}

/// Messages sent from the upload worker to the UI thread.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// Byte-proportional transfer progress, already capped at 90.
    Progress(u8),
    /// The request body has been handed off completely.
    BodySent,
    Finished(UploadOutcome),
    /// Raw bytes of the preview image fetched after a success.
    Preview(Vec<u8>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigma_is_gated_on_the_gaussian_filter() {
        assert!(FilterKind::Gaussian.uses_sigma());
        assert!(!FilterKind::Median.uses_sigma());
        assert!(!FilterKind::Unfiltered.uses_sigma());
    }

    #[test]
    fn form_values_match_the_backend_vocabulary() {
        assert_eq!(FilterKind::Gaussian.form_value(), "gaussian");
        assert_eq!(FilterKind::Median.form_value(), "median");
        assert_eq!(FilterKind::Unfiltered.form_value(), "none");
    }

    #[test]
    fn http_error_without_body_message_names_the_status_code() {
        let outcome = UploadOutcome::HttpError {
            status: 500,
            message: None,
        };
        assert_eq!(outcome.banner_text(), "Serverfehler: 500");
    }

    #[test]
    fn http_error_prefers_the_server_message() {
        let outcome = UploadOutcome::HttpError {
            status: 400,
            message: Some("Keine Dateien hochgeladen".to_string()),
        };
        assert_eq!(outcome.banner_text(), "Keine Dateien hochgeladen");
    }
}
