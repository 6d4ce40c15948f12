use super::{mime_type_for, AccessToken, Attachment, TicketUploader};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files?uploadType=media";
const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: Option<String>,
    mime_type: Option<String>,
    web_view_link: Option<String>,
}

/// Uploads ticket files to Google Drive
pub struct GoogleDriveUploader {
    client: Client,
    token: Arc<AccessToken>,
    folder_id: Option<String>,
}

impl GoogleDriveUploader {
    pub fn new(token: Arc<AccessToken>, folder_id: Option<String>) -> Self {
        Self {
            client: Client::new(),
            token,
            folder_id,
        }
    }

    fn metadata_url(&self, file_id: &str) -> Result<Url> {
        let mut url = Url::parse(FILES_URL)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Drive API URL cannot take a path"))?
            .push(file_id);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fields", "id,name,mimeType,webViewLink");
            if let Some(folder) = &self.folder_id {
                query.append_pair("addParents", folder);
            }
        }
        Ok(url)
    }
}

async fn read_drive_file(response: reqwest::Response, action: &str) -> Result<DriveFile> {
    let status = response.status();
    if !status.is_success() {
        let payload = response.json::<Value>().await.unwrap_or(Value::Null);
        return Err(anyhow!(
            "Drive API {} returned {}: {}",
            action,
            status,
            payload["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
        ));
    }
    response
        .json::<DriveFile>()
        .await
        .with_context(|| format!("Invalid Drive API {} response", action))
}

#[async_trait]
impl TicketUploader for GoogleDriveUploader {
    async fn upload(&self, path: &Path) -> Result<Attachment> {
        let token = self.token.get()?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read ticket {}", path.display()))?;
        let mime_type = mime_type_for(path);
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ticket".to_string());
        debug!("Uploading {} ({} bytes, {})", title, bytes.len(), mime_type);

        let response = self
            .client
            .post(UPLOAD_URL)
            .bearer_auth(token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .context("Failed to reach the Drive API")?;
        let uploaded = read_drive_file(response, "upload").await?;

        // Media uploads arrive untitled; name and file them in a second call
        let response = self
            .client
            .patch(self.metadata_url(&uploaded.id)?)
            .bearer_auth(token.expose_secret())
            .json(&json!({ "name": title }))
            .send()
            .await
            .context("Failed to reach the Drive API")?;
        let file = read_drive_file(response, "rename").await?;

        let file_url = file
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", file.id));
        info!("Uploaded ticket to {}", file_url);

        Ok(Attachment {
            file_id: file.id,
            file_url,
            title: file.name.unwrap_or(title),
            mime_type: file.mime_type.unwrap_or_else(|| mime_type.to_string()),
        })
    }
}
