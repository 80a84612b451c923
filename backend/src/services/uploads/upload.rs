use crate::config::ServerConfig;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse, Responder};
use common::model::upload::UploadResponse;
use futures_util::StreamExt;
use log::{error, info};
use md5::{Context, Digest};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// URL segment stored files are served under; also the prefix of every
/// returned `filePath`.
pub const UPLOADS_ROUTE: &str = "uploads";

static NEXT_PART: AtomicU64 = AtomicU64::new(0);

/// HTTP handler wrapper that converts the storage result to an `HttpResponse`.
///
/// - On success: `200 OK` with an `UploadResponse` carrying the file path.
/// - On failure: `400 Bad Request` with `{"success": false}`.
pub async fn process(payload: Multipart, config: web::Data<ServerConfig>) -> impl Responder {
    match store_upload(payload, &config.upload_dir, config.max_upload_bytes).await {
        Ok(file_path) => {
            info!("Stored upload as {}", file_path);
            HttpResponse::Ok().json(UploadResponse::stored(file_path))
        }
        Err(e) => {
            error!("Upload failed: {}", e);
            HttpResponse::BadRequest().json(UploadResponse::failed())
        }
    }
}

/// Writes the first `file` part of `payload` into `upload_dir` and returns its
/// relative reference (`uploads/<md5><ext>`). Other parts are ignored.
///
/// The bytes are streamed into a part file next to their destination and
/// renamed once the digest is known. Files larger than `max_bytes` are
/// rejected and leave nothing behind.
pub async fn store_upload(
    mut payload: Multipart,
    upload_dir: &Path,
    max_bytes: usize,
) -> Result<String, Box<dyn std::error::Error>> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let part_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if part_name.as_deref() != Some("file") {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();

        tokio::fs::create_dir_all(upload_dir).await?;
        let part_path = part_path(upload_dir);
        let (digest, size) = match write_part(&mut field, &part_path, max_bytes).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&part_path).await;
                return Err(e);
            }
        };

        // Browsers send an empty, unnamed part when no file was chosen.
        if filename.is_empty() && size == 0 {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err("Missing file".into());
        }

        let stored_name = format!("{:x}{}", digest, extension_of(&filename));
        if let Err(e) = tokio::fs::rename(&part_path, upload_dir.join(&stored_name)).await {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e.into());
        }

        return Ok(format!("{}/{}", UPLOADS_ROUTE, stored_name));
    }

    Err("Missing file".into())
}

/// Unique hidden name for an upload still being received.
fn part_path(upload_dir: &Path) -> PathBuf {
    let n = NEXT_PART.fetch_add(1, Ordering::Relaxed);
    upload_dir.join(format!(".incoming-{}-{}.part", std::process::id(), n))
}

/// Streams one multipart field into `path`, hashing as it goes. Returns the
/// MD5 digest and the number of bytes written.
async fn write_part(
    field: &mut Field,
    path: &Path,
    max_bytes: usize,
) -> Result<(Digest, usize), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut md5_hasher = Context::new();
    let mut size = 0usize;

    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        size += chunk.len();
        if size > max_bytes {
            return Err(format!("File exceeds the {} byte limit", max_bytes).into());
        }
        md5_hasher.consume(&chunk);
        writer.write_all(&chunk)?;
    }
    writer.flush()?;

    Ok((md5_hasher.finalize(), size))
}

/// Extension of the client file name including the dot, or an empty string.
/// Only short alphanumeric extensions are kept.
fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;
    use actix_web::App;

    const BOUNDARY: &str = "----formsboundary";

    fn multipart_body(part_name: &str, filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part_name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn config_for(dir: &Path) -> ServerConfig {
        ServerConfig {
            upload_dir: dir.to_path_buf(),
            open_browser: false,
            max_upload_bytes: 64,
            ..ServerConfig::default()
        }
    }

    fn stored_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[actix_web::test]
    async fn test_upload_stores_file_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(config_for(dir.path())))
                .service(super::super::configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body("file", "avatar.PNG", b"fake image bytes"))
            .to_request();
        let resp: UploadResponse = actix_test::call_and_read_body_json(&app, req).await;

        assert!(resp.success);
        let expected_name = format!("{:x}.png", md5::compute(b"fake image bytes"));
        assert_eq!(
            resp.file_path.as_deref(),
            Some(format!("uploads/{}", expected_name).as_str())
        );
        let stored = std::fs::read(dir.path().join(&expected_name)).unwrap();
        assert_eq!(stored, b"fake image bytes");
        assert_eq!(stored_files(dir.path()), vec![expected_name]);
    }

    #[actix_web::test]
    async fn test_upload_over_limit_is_rejected_and_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(config_for(dir.path())))
                .service(super::super::configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body("file", "big.bin", &[7u8; 65]))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: UploadResponse = actix_test::read_body_json(resp).await;
        assert_eq!(body, UploadResponse::failed());
        assert!(stored_files(dir.path()).is_empty());
    }

    #[actix_web::test]
    async fn test_upload_without_file_part_fails() {
        let dir = tempfile::tempdir().unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(config_for(dir.path())))
                .service(super::super::configure_routes()),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/upload")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body("other", "notes.txt", b"ignored"))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: UploadResponse = actix_test::read_body_json(resp).await;
        assert_eq!(body, UploadResponse::failed());
    }

    #[test]
    fn test_extension_of_keeps_safe_extensions_only() {
        assert_eq!(extension_of("photo.JPG"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("no_extension"), "");
        assert_eq!(extension_of("weird.p/ng"), "");
    }
}
