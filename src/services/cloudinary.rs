// SPDX-License-Identifier: MIT

//! Image host client (Cloudinary).
//!
//! Uploads go through the unsigned upload endpoint with a preset; resizing
//! never calls the host, it is a purely syntactic rewrite of the canonical
//! URL (a transformation segment spliced in after `/upload/`).

use crate::error::AppError;
use serde::Deserialize;

/// Cloudinary client.
#[derive(Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

/// Result of a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
}

impl CloudinaryClient {
    /// Create a client for the given cloud and unsigned upload preset.
    pub fn new(cloud_name: &str, upload_preset: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url: format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                cloud_name
            ),
            upload_preset,
        }
    }

    /// Upload an image, tagging the file name with the owner's uid.
    pub async fn upload(&self, bytes: Vec<u8>, owner_uid: &str) -> Result<UploadedImage, AppError> {
        let file_name = format!("{}_{}.jpg", owner_uid, chrono::Utc::now().timestamp());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| AppError::ImageHost(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ImageHost(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ImageHost(format!(
                "Upload failed ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ImageHost(format!("Malformed upload response: {}", e)))
    }

    /// Derive a resized variant of a canonical Cloudinary URL.
    ///
    /// Non-Cloudinary URLs are returned unchanged.
    pub fn optimized_url(url: &str, width: u32, height: u32) -> String {
        if !url.contains("cloudinary.com") {
            return url.to_string();
        }
        match url.split_once("/upload/") {
            Some((prefix, suffix)) => format!(
                "{}/upload/c_fill,w_{},h_{},q_auto,f_auto/{}",
                prefix, width, height, suffix
            ),
            None => url.to_string(),
        }
    }

    /// Extract the public id from a canonical Cloudinary URL.
    pub fn public_id_from_url(url: &str) -> Option<String> {
        if !url.contains("cloudinary.com") {
            return None;
        }
        let parts: Vec<&str> = url.split('/').collect();
        let upload_index = parts.iter().position(|p| *p == "upload")?;
        // Skip the version segment (v12345) that follows "upload".
        let tail = parts.get(upload_index + 2..)?;
        if tail.is_empty() {
            return None;
        }
        let joined = tail.join("/");
        let public_id = match joined.rsplit_once('.') {
            Some((stem, _ext)) => stem.to_string(),
            None => joined,
        };
        Some(public_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://res.cloudinary.com/demo/image/upload/v1700000000/u1_123.jpg";

    #[test]
    fn test_optimized_url_inserts_transformation() {
        let resized = CloudinaryClient::optimized_url(URL, 300, 300);
        assert_eq!(
            resized,
            "https://res.cloudinary.com/demo/image/upload/c_fill,w_300,h_300,q_auto,f_auto/v1700000000/u1_123.jpg"
        );
    }

    #[test]
    fn test_optimized_url_passes_through_foreign_urls() {
        let foreign = "https://example.com/image.jpg";
        assert_eq!(CloudinaryClient::optimized_url(foreign, 300, 300), foreign);
    }

    #[test]
    fn test_public_id_extraction() {
        assert_eq!(
            CloudinaryClient::public_id_from_url(URL),
            Some("u1_123".to_string())
        );
    }

    #[test]
    fn test_public_id_with_folder() {
        let url = "https://res.cloudinary.com/demo/image/upload/v1/rally/u1_123.png";
        assert_eq!(
            CloudinaryClient::public_id_from_url(url),
            Some("rally/u1_123".to_string())
        );
    }

    #[test]
    fn test_public_id_foreign_url() {
        assert_eq!(
            CloudinaryClient::public_id_from_url("https://example.com/a.jpg"),
            None
        );
    }
}
