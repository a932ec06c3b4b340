// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and response classification.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use url::Url;

use crate::config::CloudConfig;
use crate::error::CloudError;
use crate::response::{Fault, FromXml};

/// Raw outcome of a request that reached the server.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP client for cloud operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    config: CloudConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or HTTP client creation fails.
    pub fn new(config: CloudConfig) -> Result<Self, CloudError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CloudError::Config(format!("invalid base URL {}: {e}", config.base_url)))?;

        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CloudError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Returns the username requests are authenticated as.
    pub fn username(&self) -> &str {
        &self.config.username
    }

    /// Resolves `path` as a reference relative to the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference cannot be resolved.
    pub fn resolve(&self, path: &str) -> Result<Url, CloudError> {
        Ok(self.base_url.join(path)?)
    }

    /// Sends a request and decodes a non-empty body into `T`.
    ///
    /// Returns `None` as the value when the body is empty or is not a `T`
    /// document but also carries no fault.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::send`].
    pub async fn send_for<T: FromXml>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> Result<(Reply, Option<T>), CloudError> {
        let reply = self.exchange(method, path, body, headers).await?;
        let value = decode_reply::<T>(&reply)?;
        Ok((reply, value))
    }

    /// Sends a request without a decode target.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved, the request cannot be
    /// built or sent, the body cannot be read, the body is malformed XML, or
    /// the body is a fault envelope.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> Result<Reply, CloudError> {
        let reply = self.exchange(method, path, body, headers).await?;
        check_fault(&reply)?;
        Ok(reply)
    }

    /// Performs one round trip and reads the whole body.
    async fn exchange(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> Result<Reply, CloudError> {
        let url = self.resolve(path)?;
        tracing::debug!(%method, %url, "sending request");

        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password));
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        if let Some(body) = body {
            req = req.body(body);
        }
        let request = req
            .build()
            .map_err(|e| CloudError::Request(e.to_string()))?;

        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|e| CloudError::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| CloudError::Body(e.to_string()))?
            .to_vec();

        tracing::debug!(%status, len = body.len(), "received response");
        Ok(Reply { status, body })
    }
}

/// Parses a WebDAV method name such as `PROPFIND` or `MKCOL`.
///
/// # Errors
///
/// Returns an error if the name is not a valid HTTP token.
pub fn dav_method(name: &str) -> Result<Method, CloudError> {
    Method::from_bytes(name.as_bytes())
        .map_err(|e| CloudError::Request(format!("Invalid method: {e}")))
}

/// Decodes the body into `T`, falling back to fault detection when the body
/// is not a `T` document.
fn decode_reply<T: FromXml>(reply: &Reply) -> Result<Option<T>, CloudError> {
    if !reply.body.is_empty() {
        match T::from_xml(&String::from_utf8_lossy(&reply.body)) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => tracing::trace!(error = %e, "body is not the expected document"),
        }
    }
    check_fault(reply)?;
    Ok(None)
}

/// Surfaces a fault envelope or malformed XML body as an error.
///
/// Empty bodies and bodies without any element (plain text) pass.
fn check_fault(reply: &Reply) -> Result<(), CloudError> {
    if reply.body.is_empty() {
        return Ok(());
    }

    let text = String::from_utf8_lossy(&reply.body);
    match Fault::from_xml(&text) {
        Ok(Some(fault)) if !fault.exception.is_empty() => Err(CloudError::Server {
            status: reply.status,
            exception: fault.exception,
            message: fault.message,
        }),
        Ok(_) => Ok(()),
        Err(e) => Err(CloudError::Decode {
            status: reply.status,
            body: text.into_owned(),
            reason: e.to_string(),
        }),
    }
}
