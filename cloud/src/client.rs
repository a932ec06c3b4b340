// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Cloud client for file and system tag operations.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::config::CloudConfig;
use crate::error::CloudError;
use crate::http::{HttpClient, dav_method};
use crate::request::PropFindRequest;
use crate::response::{MultiStatusResponse, MultiStatusTagResponse, Property, TagPropResponse};
use crate::tag::Tag;
use crate::types::Href;

const XML_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/xml; charset=utf-8");
const JSON_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");
const SYSTEM_TAGS: &str = "systemtags/";

/// Client for an `ownCloud`/`Nextcloud` server.
///
/// File paths passed to the methods are relative to the user's storage root
/// (`files/{username}/` below the DAV root).
///
/// # Example
///
/// ```ignore
/// use cirrus_cloud::CloudClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CloudClient::dial(
///     "https://cloud.example.com/remote.php/dav/",
///     "alice",
///     "app-password",
/// )?;
///
/// client.mkdir("Reports").await?;
/// client.upload(b"Hello World!\n".to_vec(), "Reports/hello.txt").await?;
/// let listing = client.list_directory("Reports/", 1).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CloudClient {
    http: Arc<HttpClient>,
}

impl CloudClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or HTTP client
    /// initialization fails.
    pub fn new(config: CloudConfig) -> Result<Self, CloudError> {
        let http = HttpClient::new(config)?;
        Ok(Self {
            http: Arc::new(http),
        })
    }

    /// Connects to the server at `host` (its DAV root) with the given credentials.
    ///
    /// No request is sent; the connection is established lazily.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not a valid URL.
    pub fn dial(host: &str, username: &str, password: &str) -> Result<Self, CloudError> {
        Self::new(CloudConfig::new(host, username, password))
    }

    /// Lists a directory with the given PROPFIND depth (0 = the resource
    /// itself, 1 = its immediate children).
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::NotFound`] if the path does not exist, or any
    /// transport error.
    pub async fn list_directory(
        &self,
        path: &str,
        depth: u32,
    ) -> Result<MultiStatusResponse, CloudError> {
        let target = self.files_path(path);
        tracing::debug!(path = %target, depth, "listing directory");

        let body = PropFindRequest::file_properties().build()?;
        let depth = depth.to_string();
        let result = self
            .http
            .send_for::<MultiStatusResponse>(
                dav_method("PROPFIND")?,
                &target,
                Some(body.into_bytes()),
                &[("Depth", depth.as_str()), XML_CONTENT_TYPE],
            )
            .await;

        match result {
            Ok((reply, _)) if reply.status == StatusCode::NOT_FOUND => {
                Err(CloudError::NotFound(Href::new(target)))
            }
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Err(CloudError::NotFound(Href::new(target)))
            }
            Ok((_, listing)) => Ok(listing.unwrap_or_default()),
            Err(e) => Err(e),
        }
    }

    /// Creates a directory. Succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if MKCOL fails for any reason other than the
    /// directory already existing.
    pub async fn mkdir(&self, path: &str) -> Result<(), CloudError> {
        let target = self.files_path(path);
        tracing::debug!(path = %target, "creating directory");

        match self.http.send(dav_method("MKCOL")?, &target, None, &[]).await {
            Ok(_) => Ok(()),
            // 405 Method Not Allowed: the collection already exists
            Err(e) if e.status() == Some(StatusCode::METHOD_NOT_ALLOWED) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Deletes a file or directory.
    ///
    /// # Errors
    ///
    /// Returns an error if DELETE fails.
    pub async fn delete(&self, path: &str) -> Result<(), CloudError> {
        let target = self.files_path(path);
        tracing::debug!(path = %target, "deleting");

        self.http.send(Method::DELETE, &target, None, &[]).await?;
        Ok(())
    }

    /// Uploads `content` to `dest`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if PUT fails.
    pub async fn upload(&self, content: Vec<u8>, dest: &str) -> Result<(), CloudError> {
        let target = self.files_path(dest);
        tracing::debug!(path = %target, len = content.len(), "uploading");

        self.http
            .send(Method::PUT, &target, Some(content), &[])
            .await?;
        Ok(())
    }

    /// Downloads the full content of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if GET fails.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, CloudError> {
        let target = self.files_path(path);
        tracing::debug!(path = %target, "downloading");

        let reply = self.http.send(Method::GET, &target, None, &[]).await?;
        Ok(reply.body)
    }

    /// Returns `true` if a property query on `path` completes without error.
    pub async fn exists(&self, path: &str) -> bool {
        let target = self.files_path(path);
        let Ok(method) = dav_method("PROPFIND") else {
            return false;
        };

        match self.http.send(method, &target, None, &[]).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(path = %target, error = %e, "existence check failed");
                false
            }
        }
    }

    /// Lists all system tags.
    ///
    /// # Errors
    ///
    /// Returns an error if PROPFIND fails.
    pub async fn system_tags(&self) -> Result<MultiStatusTagResponse, CloudError> {
        let body = PropFindRequest::tag_properties().build()?;
        let (_, tags) = self
            .http
            .send_for::<MultiStatusTagResponse>(
                dav_method("PROPFIND")?,
                SYSTEM_TAGS,
                Some(body.into_bytes()),
                &[XML_CONTENT_TYPE],
            )
            .await?;

        Ok(tags.unwrap_or_default())
    }

    /// Finds the first system tag with the given display name.
    ///
    /// Returns `Ok(None)` if no tag matches.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the system tags fails.
    pub async fn find_system_tag(
        &self,
        display_name: &str,
    ) -> Result<Option<TagPropResponse>, CloudError> {
        let tags = self.system_tags().await?;
        Ok(tags.find_by_display_name(display_name).cloned())
    }

    /// Creates a system tag.
    ///
    /// Returns `Ok(false)` if a tag with the same name already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if POST fails for any other reason.
    pub async fn add_system_tag(&self, tag: &Tag) -> Result<bool, CloudError> {
        tracing::debug!(name = %tag.name, "creating system tag");

        let result = self
            .http
            .send(
                Method::POST,
                SYSTEM_TAGS,
                Some(tag.to_json()?),
                &[JSON_CONTENT_TYPE],
            )
            .await;

        conflict_tolerant(result.map(|reply| reply.status))
    }

    /// Assigns a system tag to a file, creating the tag first if needed.
    ///
    /// Returns `Ok(false)` if the file is already tagged, or if the listing of
    /// `path` yields no resource.
    ///
    /// The steps are not atomic: if assignment fails after the tag was
    /// created, the tag stays on the server unassigned.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::TagNotFound`] if the tag cannot be resolved after
    /// creation, or any error of the underlying requests.
    pub async fn add_tag(&self, path: &str, tag: &Tag) -> Result<bool, CloudError> {
        self.add_system_tag(tag).await?;

        let listing = self.list_directory(path, 0).await?;
        let Some(file_id) = listing
            .responses
            .first()
            .and_then(|r| r.properties.first())
            .and_then(Property::file_id)
        else {
            tracing::debug!(path, "listing returned no file id, nothing to tag");
            return Ok(false);
        };

        let tag_id = self
            .find_system_tag(&tag.name)
            .await?
            .and_then(|r| r.property(&tag.name).and_then(|p| p.tag_id()))
            .ok_or_else(|| CloudError::TagNotFound(tag.name.clone()))?;

        tracing::debug!(%file_id, %tag_id, "assigning system tag");
        let result = self
            .http
            .send(
                Method::PUT,
                &format!("systemtags-relations/files/{file_id}/{tag_id}"),
                Some(tag.to_json()?),
                &[JSON_CONTENT_TYPE],
            )
            .await;

        conflict_tolerant(result.map(|reply| reply.status))
    }

    /// Builds the path of a file below the user's storage root.
    fn files_path(&self, path: &str) -> String {
        format!("files/{}/{}", self.http.username(), path)
    }
}

/// Maps a 409 Conflict (with or without a fault body) to `Ok(false)`.
fn conflict_tolerant(result: Result<StatusCode, CloudError>) -> Result<bool, CloudError> {
    match result {
        Ok(status) if status == StatusCode::CONFLICT => Ok(false),
        Ok(_) => Ok(true),
        Err(e) if e.status() == Some(StatusCode::CONFLICT) => Ok(false),
        Err(e) => Err(e),
    }
}
