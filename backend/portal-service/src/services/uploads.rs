/// File intake and relay to the media provider.
///
/// Inbound multipart requests are buffered with a mime/size policy (images
/// and PDFs only, 10 MB per file), then individual files are relayed to
/// the Cloudinary upload REST API with a signed request.
use actix_multipart::Multipart;
use futures_util::StreamExt;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::collections::HashMap;

use crate::config::CloudinaryConfig;
use crate::error::{AppError, Result};

pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A parsed multipart form: text fields plus buffered file fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl UploadForm {
    /// Drain a multipart payload, enforcing the upload policy.
    pub async fn from_multipart(mut payload: Multipart, max_files: usize) -> Result<Self> {
        let mut form = UploadForm::default();

        while let Some(item) = payload.next().await {
            let mut field =
                item.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?;

            let field_name = field.name().to_string();
            let file_name = field
                .content_disposition()
                .get_filename()
                .map(|s| s.to_string());

            let mut data: Vec<u8> = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
                if data.len() + chunk.len() > MAX_FILE_SIZE {
                    return Err(AppError::BadRequest(
                        "File too large, limit is 10MB".to_string(),
                    ));
                }
                data.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) if !file_name.is_empty() => {
                    if form.files.len() >= max_files {
                        return Err(AppError::BadRequest(format!(
                            "Too many files, limit is {}",
                            max_files
                        )));
                    }

                    let content_type = field
                        .content_type()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "application/octet-stream".to_string());

                    if !is_allowed_mime(&content_type) {
                        return Err(AppError::BadRequest(
                            "Only images and PDFs are allowed!".to_string(),
                        ));
                    }

                    form.files.push(UploadedFile {
                        field_name,
                        file_name,
                        content_type,
                        data,
                    });
                }
                _ => {
                    // Plain text field.
                    let value = String::from_utf8(data).map_err(|_| {
                        AppError::BadRequest(format!("Field '{}' is not valid UTF-8", field_name))
                    })?;
                    form.fields.insert(field_name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn files_named(&self, field_name: &str) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|f| f.field_name == field_name)
            .collect()
    }

    pub fn first_file(&self) -> Option<&UploadedFile> {
        self.files.first()
    }
}

pub fn is_allowed_mime(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type == "application/pdf"
}

/// Result of a provider upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedAsset {
    pub secure_url: String,
    pub public_id: String,
}

/// Minimal Cloudinary REST client. Requests are authenticated with the
/// account's api key and a SHA-1 signature over the sorted parameters.
#[derive(Clone)]
pub struct Cloudinary {
    config: CloudinaryConfig,
    http: reqwest::Client,
}

impl Cloudinary {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        // Parameters must be sorted by name and joined with '&', then the
        // api secret is appended before hashing.
        let mut sorted: Vec<(&str, &str)> = params.to_vec();
        sorted.sort_by_key(|(k, _)| *k);
        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha1::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Upload one buffered file into `<base_folder>/<folder>`.
    pub async fn upload(&self, file: &UploadedFile, folder: &str) -> Result<UploadedAsset> {
        let folder = format!("{}/{}", self.config.base_folder, folder);
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", &folder), ("timestamp", &timestamp)]);

        let part = reqwest::multipart::Part::bytes(file.data.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AppError::Upload(format!("Invalid content type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder)
            .text("signature", signature)
            .part("file", part);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.config.cloud_name
        );

        let response = self.http.post(&url).multipart(form).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "Cloudinary upload failed: {}", body);
            return Err(AppError::Upload("Media upload failed".to_string()));
        }

        let asset: UploadedAsset = response.json().await?;
        Ok(asset)
    }

    /// Remove a previously uploaded asset.
    pub async fn destroy(&self, public_id: &str) -> Result<()> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/destroy",
            self.config.cloud_name
        );

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("public_id", public_id.to_string())
            .text("signature", signature);

        let response = self.http.post(&url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Upload("Media deletion failed".to_string()));
        }

        Ok(())
    }

    /// Upload every file in the batch, returning their URLs in order.
    pub async fn upload_all(&self, files: &[&UploadedFile], folder: &str) -> Result<Vec<String>> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let asset = self.upload(file, folder).await?;
            urls.push(asset.secure_url);
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_policy() {
        assert!(is_allowed_mime("image/png"));
        assert!(is_allowed_mime("image/jpeg"));
        assert!(is_allowed_mime("application/pdf"));
        assert!(!is_allowed_mime("text/html"));
        assert!(!is_allowed_mime("application/zip"));
    }

    #[test]
    fn test_signature_is_deterministic_and_sorted() {
        let client = Cloudinary::new(CloudinaryConfig {
            cloud_name: "demo".into(),
            api_key: "key".into(),
            api_secret: "secret".into(),
            base_folder: "cse-portal".into(),
        });

        let a = client.sign(&[("folder", "x"), ("timestamp", "1")]);
        let b = client.sign(&[("timestamp", "1"), ("folder", "x")]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let mk = |secret: &str| {
            Cloudinary::new(CloudinaryConfig {
                cloud_name: "demo".into(),
                api_key: "key".into(),
                api_secret: secret.into(),
                base_folder: "cse-portal".into(),
            })
        };
        let a = mk("one").sign(&[("timestamp", "1")]);
        let b = mk("two").sign(&[("timestamp", "1")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_form_accessors() {
        let form = UploadForm {
            fields: HashMap::from([("title".to_string(), "Hello".to_string())]),
            files: vec![
                UploadedFile {
                    field_name: "images".into(),
                    file_name: "a.png".into(),
                    content_type: "image/png".into(),
                    data: vec![1],
                },
                UploadedFile {
                    field_name: "attachments".into(),
                    file_name: "b.pdf".into(),
                    content_type: "application/pdf".into(),
                    data: vec![2],
                },
            ],
        };

        assert_eq!(form.text("title"), Some("Hello"));
        assert_eq!(form.text("missing"), None);
        assert_eq!(form.files_named("images").len(), 1);
        assert_eq!(form.files_named("attachments").len(), 1);
        assert_eq!(form.first_file().map(|f| f.file_name.as_str()), Some("a.png"));
    }
}
