use crate::display;
use crate::prelude::*;
use async_trait::async_trait;
use serde_json::json;
use std::fmt;

/// Privacy level the published clip ends up with.
#[derive(
    strum::Display, clap::ValueEnum, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub(crate) enum Privacy {
    Public,
    Unlisted,
    Private,
}

pub(crate) struct UploadRequest<'a> {
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) privacy: Privacy,
    pub(crate) file: &'a Utf8Path,
}

/// Boundary to the video-hosting upload protocol.
#[async_trait]
pub(crate) trait Uploader: fmt::Debug + Send + Sync {
    /// Publishes the file; returns the hosted video id.
    async fn upload(&self, request: &UploadRequest<'_>) -> Result<String>;
}

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";

/// YouTube Data API v3 resumable upload: one request to open the session,
/// one to push the bytes. Failures surface the status code and response body;
/// retrying is left to the user.
#[derive(Debug)]
pub(crate) struct YoutubeUploader {
    client: reqwest::Client,
    access_token: String,
}

impl YoutubeUploader {
    pub(crate) fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
        }
    }
}

#[async_trait]
impl Uploader for YoutubeUploader {
    async fn upload(&self, request: &UploadRequest<'_>) -> Result<String> {
        debug!("Requesting an upload session...");

        let metadata = json!({
            "snippet": {
                "title": request.title,
                "description": request.description,
                // Gaming
                "categoryId": "20",
            },
            "status": {
                "privacyStatus": request.privacy.to_string(),
            },
        });

        let response = self
            .client
            .post(UPLOAD_URL)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(&self.access_token)
            .json(&metadata)
            .send()
            .await
            .context("Failed to reach the upload endpoint")?;

        let response = ensure_success(response).await?;

        let session_url = response
            .headers()
            .get(reqwest::header::LOCATION)
            .context("The upload session response carried no `Location` header")?
            .to_str()?
            .to_owned();

        info!("Uploading {}...", display::bold(&request.file));

        let bytes = fs::read(request.file).await?;

        let response = self
            .client
            .put(&session_url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "video/mp4")
            .body(bytes)
            .send()
            .await
            .context("Failed to send the video bytes")?;

        let response = ensure_success(response).await?;

        #[derive(serde::Deserialize)]
        struct UploadedVideo {
            id: String,
        }

        let video: UploadedVideo = response
            .json()
            .await
            .context("The upload response was not valid JSON")?;

        Ok(video.id)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    bail!("An HTTP error {status} occurred:\n{body}")
}
