//! External media storage.
//!
//! ## Summary
//! Bytes never touch the database: uploads go to a [`MediaHost`] and only the
//! returned URL and public id are persisted. [`CloudinaryHost`] talks to the
//! Cloudinary upload API; [`UnconfiguredMediaHost`] is used when no credentials
//! are configured and fails every call.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use cocina_core::config::CloudinaryConfig;
use cocina_db::db::enums::MediaType;

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp", "mp4", "mov", "avi"];

#[derive(Error, Debug)]
pub enum MediaHostError {
    #[error("Media host is not configured")]
    NotConfigured,

    #[error("Media host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Media host rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// A file received from a client, ready to hand to the host.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    /// ## Summary
    /// Both the file extension and the MIME type must name an accepted image
    /// or video format (`jpeg|jpg|png|gif|webp|mp4|mov|avi`).
    #[must_use]
    pub fn has_allowed_type(&self) -> bool {
        let extension_ok = self.file_name.rsplit_once('.').is_some_and(|(_, ext)| {
            ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        });

        let mime_ok = self.content_type.as_deref().is_some_and(|mime| {
            let mime = mime.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.iter().any(|ext| mime.contains(ext))
                || mime == "video/quicktime"
                || mime == "video/x-msvideo"
        });

        extension_ok && mime_ok
    }
}

/// What the host kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
    pub media_type: MediaType,
}

#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Stores `upload` under `folder`.
    async fn upload(&self, upload: MediaUpload, folder: &str)
    -> Result<StoredMedia, MediaHostError>;

    /// Releases a previously stored object.
    async fn destroy(&self, public_id: &str, media_type: MediaType)
    -> Result<(), MediaHostError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMediaHost;

#[async_trait]
impl MediaHost for UnconfiguredMediaHost {
    async fn upload(
        &self,
        _upload: MediaUpload,
        _folder: &str,
    ) -> Result<StoredMedia, MediaHostError> {
        Err(MediaHostError::NotConfigured)
    }

    async fn destroy(
        &self,
        _public_id: &str,
        _media_type: MediaType,
    ) -> Result<(), MediaHostError> {
        Err(MediaHostError::NotConfigured)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    resource_type: String,
}

pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
    base_url: String,
}

impl CloudinaryHost {
    #[must_use]
    pub fn new(config: CloudinaryConfig) -> Self {
        let base_url = format!("https://api.cloudinary.com/v1_1/{}", config.cloud_name);
        Self {
            client: reqwest::Client::new(),
            config,
            base_url,
        }
    }

    /// ## Summary
    /// Signs `params` (already in key order) the way the upload API expects:
    /// `k1=v1&k2=v2` followed by the API secret, SHA-256, hex.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let joined = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn send(&self, url: String, form: Form) -> Result<reqwest::Response, MediaHostError> {
        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(MediaHostError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    #[tracing::instrument(
        skip(self, upload),
        fields(file_name = %upload.file_name, size = upload.bytes.len())
    )]
    async fn upload(
        &self,
        upload: MediaUpload,
        folder: &str,
    ) -> Result<StoredMedia, MediaHostError> {
        let public_id = uuid::Uuid::now_v7().to_string();
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", folder),
            ("public_id", &public_id),
            ("timestamp", &timestamp),
        ]);

        let mut file = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type.as_deref() {
            file = file.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder.to_string())
            .text("public_id", public_id)
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response: UploadResponse = self
            .send(format!("{}/auto/upload", self.base_url), form)
            .await?
            .json()
            .await?;

        let media_type = if response.resource_type == "video" {
            MediaType::Video
        } else {
            MediaType::Image
        };

        tracing::info!(public_id = %response.public_id, %media_type, "Media stored");

        Ok(StoredMedia {
            url: response.secure_url,
            public_id: response.public_id,
            media_type,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn destroy(&self, public_id: &str, media_type: MediaType) -> Result<(), MediaHostError> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let resource_type = match media_type {
            MediaType::Image => "image",
            MediaType::Video => "video",
        };
        self.send(format!("{}/{resource_type}/destroy", self.base_url), form)
            .await?;

        tracing::info!(public_id, "Media released");
        Ok(())
    }
}
