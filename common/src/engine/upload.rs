//! File upload protocol for `file` fields.
//!
//! Selecting a file hands the payload to an [`UploadTransport`], which talks to
//! the storage collaborator and returns its [`UploadResponse`]. A successful
//! response carrying a stored path becomes the field's value, with backslash
//! separators normalised to forward slashes. Every other outcome leaves the
//! form state untouched and is reported as an [`UploadOutcome::Failed`].
//!
//! The stored reference is later resolved for previews by prefixing the
//! collaborator's base address, see [`preview_url`].

use thiserror::Error;

use crate::model::upload::UploadResponse;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unreadable response: {0}")]
    Decode(String),
    #[error("server rejected the upload")]
    Rejected,
    #[error("response has no file path")]
    MissingReference,
}

/// Sends one file to the storage collaborator.
///
/// `Payload` is whatever the host environment hands over for a selected file
/// (a browser `File`, a byte buffer in tests).
#[allow(async_fn_in_trait)]
pub trait UploadTransport {
    type Payload;

    async fn upload(&self, payload: Self::Payload) -> Result<UploadResponse, UploadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The interaction carried no file.
    Skipped,
    /// The reference to store as the field's value.
    Committed { field: String, reference: String },
    Failed { field: String, error: UploadError },
}

/// Uploads the selected file for `field`, if there is one.
pub async fn handle_file_selected<T: UploadTransport>(
    transport: &T,
    field: &str,
    payload: Option<T::Payload>,
) -> UploadOutcome {
    let Some(payload) = payload else {
        return UploadOutcome::Skipped;
    };

    match transport
        .upload(payload)
        .await
        .and_then(interpret_response)
    {
        Ok(reference) => UploadOutcome::Committed {
            field: field.to_string(),
            reference,
        },
        Err(error) => UploadOutcome::Failed {
            field: field.to_string(),
            error,
        },
    }
}

/// Extracts the normalised reference from a collaborator response.
pub fn interpret_response(response: UploadResponse) -> Result<String, UploadError> {
    if !response.success {
        return Err(UploadError::Rejected);
    }
    match response.file_path {
        Some(path) if !path.is_empty() => Ok(normalize_reference(&path)),
        _ => Err(UploadError::MissingReference),
    }
}

pub fn normalize_reference(path: &str) -> String {
    path.replace('\\', "/")
}

/// URL that displays a stored reference: the base address, a slash, then the
/// reference. An empty base yields a root-relative URL.
pub fn preview_url(base: &str, reference: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), reference)
}
