// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Connection settings for a cloud server.
///
/// `base_url` is the DAV root of the server, e.g.
/// `https://cloud.example.com/remote.php/dav/`. Request paths are resolved
/// against it as relative references, so it should end with a slash.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CloudConfig {
    /// DAV root of the server.
    pub base_url: String,
    /// Username, used for Basic authentication and for the `files/{username}/` root.
    pub username: String,
    /// Password or app token for Basic authentication.
    pub password: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl CloudConfig {
    /// Creates a configuration with default timeout and user agent.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("cirrus-cloud/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self::new(String::new(), String::new(), String::new())
    }
}
