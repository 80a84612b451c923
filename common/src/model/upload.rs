use crate::model::value::FormValues;
use serde::{Deserialize, Serialize};

/// Body returned by the upload endpoint.
///
/// `file_path` is a relative reference such as `uploads/<name>`; it may use
/// either separator and is normalised by the client before being stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(rename = "filePath", default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl UploadResponse {
    pub fn stored(file_path: impl Into<String>) -> Self {
        Self {
            success: true,
            file_path: Some(file_path.into()),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            file_path: None,
        }
    }
}

/// Body returned by the submit endpoint: the accepted values echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitFormResponse {
    pub success: bool,
    pub data: FormValues,
}
