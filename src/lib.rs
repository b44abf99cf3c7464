//! Desktop client for a DICOM-to-3D reconstruction service.
//!
//! The client collects a DICOM series and reconstruction parameters,
//! uploads them as one multipart request to the backend's `/upload`
//! endpoint and presents progress, the rendered preview image and a
//! download link for the finished model.

pub mod app;
pub mod upload;
pub mod utils;
