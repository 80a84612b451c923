//! Browser side of the upload protocol: posts the selected `File` as a
//! single-part multipart body and decodes the server's answer.

use common::engine::upload::{UploadError, UploadTransport};
use common::model::upload::UploadResponse;
use gloo_net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

#[derive(Clone)]
pub struct HttpUploader {
    endpoint: String,
}

impl HttpUploader {
    pub fn new(base: &str) -> Self {
        Self {
            endpoint: format!("{}/upload", base.trim_end_matches('/')),
        }
    }
}

impl UploadTransport for HttpUploader {
    type Payload = File;

    async fn upload(&self, file: File) -> Result<UploadResponse, UploadError> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", &file, &file.name())
            .map_err(js_error)?;

        let response = Request::post(&self.endpoint)
            .body(form)
            .map_err(|e| UploadError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        response
            .json::<UploadResponse>()
            .await
            .map_err(|e| UploadError::Decode(e.to_string()))
    }
}

fn js_error(value: JsValue) -> UploadError {
    UploadError::Transport(format!("{:?}", value))
}
