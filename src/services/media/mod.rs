//! 媒体文件存储
//!
//! 所有上传文件保存在 `<root>/<kind>/<file_name>`，数据库中只记录相对路径 `<kind>/<file_name>`。

pub mod form;

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use actix_web::{HttpRequest, HttpResponse, web};

use crate::errors::{PortalError, Result};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::{extension_of, normalize_image};

pub use form::{FormError, MultipartForm, UploadedFile};

/// 媒体分类，对应根目录下的子目录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Statement,
    Answer,
    Correction,
    AudioCorrection,
}

impl MediaKind {
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Statement,
        MediaKind::Answer,
        MediaKind::Correction,
        MediaKind::AudioCorrection,
    ];

    pub fn dir(&self) -> &'static str {
        match self {
            MediaKind::Statement => "statements",
            MediaKind::Answer => "answers",
            MediaKind::Correction => "corrections",
            MediaKind::AudioCorrection => "audio_corrections",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 从 app_data 中获取媒体存储
    pub fn from_request(request: &HttpRequest) -> web::Data<MediaStore> {
        request
            .app_data::<web::Data<MediaStore>>()
            .expect("MediaStore not found in app data")
            .clone()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 创建根目录及各分类子目录
    pub fn ensure_dirs(&self) -> Result<()> {
        for kind in MediaKind::ALL {
            fs::create_dir_all(self.root.join(kind.dir())).map_err(|e| {
                PortalError::file_operation(format!(
                    "Failed to create media directory {}: {e}",
                    kind.dir()
                ))
            })?;
        }
        Ok(())
    }

    /// 写入文件，返回相对路径
    pub fn save(&self, kind: MediaKind, file_name: &str, bytes: &[u8]) -> Result<String> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return Err(PortalError::validation(format!(
                "Invalid media file name: {file_name}"
            )));
        }

        let dir = self.root.join(kind.dir());
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(file_name), bytes).map_err(|e| {
            PortalError::file_operation(format!("Failed to write {file_name}: {e}"))
        })?;

        Ok(format!("{}/{}", kind.dir(), file_name))
    }

    pub fn read(&self, relative: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PortalError::not_found(format!("Media not found: {relative}")),
            _ => PortalError::file_operation(format!("Failed to read {relative}: {e}")),
        })
    }

    /// 删除文件，文件不存在不算错误
    pub fn remove(&self, relative: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortalError::file_operation(format!(
                "Failed to remove {relative}: {e}"
            ))),
        }
    }

    /// 尽力删除一组文件，失败只记录日志
    pub fn remove_all<'a>(&self, paths: impl IntoIterator<Item = &'a str>) {
        for path in paths {
            if let Err(e) = self.remove(path) {
                tracing::warn!("{}", e);
            }
        }
    }

    // 相对路径只允许普通路径段
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        let valid = !relative.is_empty()
            && path
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !valid {
            return Err(PortalError::validation(format!(
                "Invalid media path: {relative}"
            )));
        }
        Ok(self.root.join(path))
    }
}

/// 归一化照片并保存，返回相对路径
///
/// 图片处理在阻塞线程池中进行。
pub async fn store_photo(
    media: web::Data<MediaStore>,
    kind: MediaKind,
    data: Vec<u8>,
) -> Result<String> {
    let normalized = web::block(move || normalize_image(&data))
        .await
        .map_err(|e| PortalError::file_operation(format!("Image worker failed: {e}")))??;
    media.save(kind, &normalized.file_name, &normalized.data)
}

/// 媒体处理错误对应的响应
pub fn media_error_response(error: &PortalError) -> HttpResponse {
    match error {
        PortalError::ImageDecode(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ImageDecodeFailed, msg.as_str())),
        PortalError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::FileTypeNotAllowed, msg.as_str())),
        other => {
            tracing::error!("{}", other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                format!("Failed to store file: {}", other.message()),
            ))
        }
    }
}

/// 根据扩展名推断下载时的 Content-Type
pub fn content_type_for(relative: &str) -> &'static str {
    match extension_of(relative).as_str() {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".mp3" => "audio/mpeg",
        ".wav" => "audio/wav",
        ".ogg" | ".oga" => "audio/ogg",
        ".m4a" => "audio/mp4",
        ".aac" => "audio/aac",
        ".webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> MediaStore {
        let root = std::env::temp_dir().join(format!("portal-media-{}", Uuid::new_v4()));
        let store = MediaStore::new(root);
        store.ensure_dirs().unwrap();
        store
    }

    #[test]
    fn test_save_read_remove() {
        let store = temp_store();
        let path = store
            .save(MediaKind::Statement, "a.jpg", b"\xFF\xD8\xFFdata")
            .unwrap();
        assert_eq!(path, "statements/a.jpg");
        assert_eq!(store.read(&path).unwrap(), b"\xFF\xD8\xFFdata");

        store.remove(&path).unwrap();
        assert!(matches!(store.read(&path), Err(PortalError::NotFound(_))));
        // 再次删除不报错
        store.remove(&path).unwrap();

        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn test_rejects_traversal() {
        let store = temp_store();
        assert!(store.read("../secret").is_err());
        assert!(store.read("/etc/passwd").is_err());
        assert!(store.remove("").is_err());
        assert!(store.save(MediaKind::Answer, "../x.jpg", b"x").is_err());
        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn test_kind_directories() {
        let store = temp_store();
        for kind in MediaKind::ALL {
            assert!(store.root().join(kind.dir()).is_dir());
        }
        assert_eq!(MediaKind::AudioCorrection.dir(), "audio_corrections");
        fs::remove_dir_all(store.root()).unwrap();
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("statements/x.jpg"), "image/jpeg");
        assert_eq!(content_type_for("audio_corrections/x.MP3"), "audio/mpeg");
        assert_eq!(content_type_for("audio_corrections/x.wav"), "audio/wav");
        assert_eq!(content_type_for("x"), "application/octet-stream");
    }
}
