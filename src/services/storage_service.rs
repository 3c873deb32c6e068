// src/services/storage_service.rs
//
// Profile photos on the local filesystem: `<root>/<user_id>/<uuid>.<ext>`,
// published as `<base_url>/storage/<user_id>/<uuid>.<ext>`.

use std::{io::ErrorKind, path::PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::common::error::AppError;

pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

const ALLOWED_TYPES: [(&str, &str); 3] = [
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
}

fn content_type_for(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    ALLOWED_TYPES
        .iter()
        .find(|(_, known)| known.eq_ignore_ascii_case(ext))
        .map(|(mime, _)| *mime)
}

/// Type and size checks, run before anything touches the disk.
pub fn check_upload(content_type: &str, len: usize) -> Result<&'static str, AppError> {
    let ext = extension_for(content_type)
        .ok_or_else(|| AppError::UnsupportedMediaType(content_type.to_string()))?;
    if len > MAX_PHOTO_BYTES {
        return Err(AppError::FileTooLarge { limit: MAX_PHOTO_BYTES });
    }
    Ok(ext)
}

#[derive(Clone)]
pub struct PhotoStorage {
    root: PathBuf,
    public_base_url: String,
}

impl PhotoStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self { root, public_base_url }
    }

    fn user_dir(&self, user_id: Uuid) -> PathBuf {
        self.root.join(user_id.to_string())
    }

    fn public_url(&self, user_id: Uuid, file_name: &str) -> String {
        format!("{}/storage/{}/{}", self.public_base_url, user_id, file_name)
    }

    async fn stored_files(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let mut entries = match fs::read_dir(self.user_dir(user_id)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub async fn current_url(&self, user_id: Uuid) -> Result<Option<String>, AppError> {
        let files = self.stored_files(user_id).await?;
        Ok(files.last().map(|name| self.public_url(user_id, name)))
    }

    /// Stores a new photo and drops the previous ones. Returns the public URL.
    pub async fn save(&self, user_id: Uuid, content_type: &str, bytes: &[u8]) -> Result<String, AppError> {
        let ext = check_upload(content_type, bytes.len())?;

        let dir = self.user_dir(user_id);
        fs::create_dir_all(&dir).await.map_err(io_error)?;

        let previous = self.stored_files(user_id).await?;

        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        fs::write(dir.join(&file_name), bytes).await.map_err(io_error)?;

        for name in previous {
            if let Err(e) = fs::remove_file(dir.join(&name)).await {
                tracing::warn!(user_id = %user_id, file = %name, "failed to remove old photo: {}", e);
            }
        }

        tracing::info!(user_id = %user_id, file = %file_name, "profile photo stored");
        Ok(self.public_url(user_id, &file_name))
    }

    /// Returns false when there was nothing to delete.
    pub async fn remove(&self, user_id: Uuid) -> Result<bool, AppError> {
        let files = self.stored_files(user_id).await?;
        if files.is_empty() {
            return Ok(false);
        }
        for name in files {
            fs::remove_file(self.user_dir(user_id).join(name)).await.map_err(io_error)?;
        }
        Ok(true)
    }

    /// Reads a published file. Only `<uuid>/<uuid>.<ext>` paths resolve, so
    /// nothing outside the storage root can be reached.
    pub async fn read(&self, user_id: &str, file_name: &str) -> Result<Option<(Vec<u8>, &'static str)>, AppError> {
        let Ok(user_id) = Uuid::parse_str(user_id) else {
            return Ok(None);
        };
        let Some((stem, _)) = file_name.rsplit_once('.') else {
            return Ok(None);
        };
        let (Ok(_), Some(content_type)) = (Uuid::parse_str(stem), content_type_for(file_name)) else {
            return Ok(None);
        };

        match fs::read(self.user_dir(user_id).join(file_name)).await {
            Ok(bytes) => Ok(Some((bytes, content_type))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }
}

fn io_error(e: std::io::Error) -> AppError {
    AppError::InternalServerError(anyhow::Error::new(e).context("photo storage I/O failed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (PhotoStorage, PathBuf) {
        let root = std::env::temp_dir().join(format!("photo-storage-{}", Uuid::new_v4()));
        (PhotoStorage::new(root.clone(), "http://localhost:3000".into()), root)
    }

    #[test]
    fn accepts_only_known_image_types() {
        assert_eq!(check_upload("image/png", 10).unwrap(), "png");
        assert_eq!(check_upload("IMAGE/JPEG; charset=binary", 10).unwrap(), "jpg");
        assert!(matches!(check_upload("application/pdf", 10), Err(AppError::UnsupportedMediaType(_))));
    }

    #[test]
    fn rejects_files_over_the_limit() {
        assert!(check_upload("image/webp", MAX_PHOTO_BYTES).is_ok());
        assert!(matches!(
            check_upload("image/webp", MAX_PHOTO_BYTES + 1),
            Err(AppError::FileTooLarge { limit: MAX_PHOTO_BYTES })
        ));
    }

    #[tokio::test]
    async fn rejected_upload_writes_nothing() {
        let (storage, root) = storage();
        let user = Uuid::new_v4();

        let result = storage.save(user, "text/plain", b"hello").await;
        assert!(result.is_err());
        assert!(!root.exists());
    }

    #[tokio::test]
    async fn saving_replaces_the_previous_photo() {
        let (storage, root) = storage();
        let user = Uuid::new_v4();

        let first = storage.save(user, "image/png", b"one").await.unwrap();
        let second = storage.save(user, "image/jpeg", b"two").await.unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with(&format!("http://localhost:3000/storage/{}/", user)));
        assert!(second.ends_with(".jpg"));
        assert_eq!(storage.current_url(user).await.unwrap(), Some(second.clone()));

        let file_name = second.rsplit('/').next().unwrap();
        let (bytes, content_type) = storage.read(&user.to_string(), file_name).await.unwrap().unwrap();
        assert_eq!(bytes, b"two");
        assert_eq!(content_type, "image/jpeg");

        assert!(storage.remove(user).await.unwrap());
        assert_eq!(storage.current_url(user).await.unwrap(), None);
        assert!(!storage.remove(user).await.unwrap());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn read_refuses_paths_outside_the_layout() {
        let (storage, _) = storage();
        let user = Uuid::new_v4().to_string();

        assert!(storage.read("..", "passwd").await.unwrap().is_none());
        assert!(storage.read(&user, "../secret.png").await.unwrap().is_none());
        assert!(storage.read(&user, &format!("{}.exe", Uuid::new_v4())).await.unwrap().is_none());
    }
}
