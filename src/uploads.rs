use std::env;

use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};

/// Settings for the external image host, uploaded to directly from the
/// client rather than through the portal backend.
#[derive(Clone, Debug, Default)]
pub struct UploadConfig {
    cloud_name: Option<String>,
    upload_preset: Option<String>,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            cloud_name: Some(cloud_name.into()),
            upload_preset: Some(upload_preset.into()),
        }
    }

    /// Both the cloud name and the unsigned upload preset must be present.
    pub fn is_configured(&self) -> bool {
        self.cloud_name.is_some() && self.upload_preset.is_some()
    }
}

/// Result of a successful image upload.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

/// Uploads photos to the image host, scoped into a folder per feature
/// (student photos, TPC member photos, ...).
#[derive(Clone)]
pub struct Uploader {
    http: reqwest::Client,
    config: UploadConfig,
}

impl Uploader {
    pub fn new(config: UploadConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<UploadedImage> {
        let (Some(cloud_name), Some(preset)) =
            (&self.config.cloud_name, &self.config.upload_preset)
        else {
            return Err(ApiError::Unexpected(
                "image uploads are not configured".to_string(),
            ));
        };

        let url = format!("https://api.cloudinary.com/v1_1/{cloud_name}/image/upload");
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("upload_preset", preset.clone())
            .text("folder", folder.to_string())
            .part("file", part);

        debug!(folder, filename, "uploading image");
        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|err| ApiError::Unexpected(format!("invalid upload response: {err}")))?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("image upload failed")
                .to_string();
            return Err(ApiError::Request {
                status: status.as_u16(),
                message,
            });
        }

        let secure_url = body.get("secure_url").and_then(Value::as_str);
        let public_id = body.get("public_id").and_then(Value::as_str);
        match (secure_url, public_id) {
            (Some(secure_url), Some(public_id)) => Ok(UploadedImage {
                secure_url: secure_url.to_string(),
                public_id: public_id.to_string(),
            }),
            _ => Err(ApiError::Unexpected(
                "upload response missing secure_url or public_id".to_string(),
            )),
        }
    }

    /// CDN transformation URL for a previously uploaded image.
    pub fn optimized_url(&self, public_id: &str, width: u32, height: u32) -> Option<String> {
        let cloud_name = self.config.cloud_name.as_deref()?;
        Some(format!(
            "https://res.cloudinary.com/{cloud_name}/image/upload/c_fill,f_auto,q_auto,w_{width},h_{height}/{public_id}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_without_both_values() {
        assert!(!UploadConfig::default().is_configured());
        assert!(UploadConfig::new("demo", "unsigned").is_configured());
    }

    #[test]
    fn optimized_url_embeds_transformations() {
        let uploader = Uploader::new(UploadConfig::new("demo", "unsigned"));
        assert_eq!(
            uploader.optimized_url("tpc/photo123", 200, 200).unwrap(),
            "https://res.cloudinary.com/demo/image/upload/c_fill,f_auto,q_auto,w_200,h_200/tpc/photo123"
        );
    }

    #[test]
    fn optimized_url_requires_cloud_name() {
        let uploader = Uploader::new(UploadConfig::default());
        assert!(uploader.optimized_url("x", 10, 10).is_none());
    }
}
