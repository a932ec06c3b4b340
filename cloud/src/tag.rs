// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! System tags.

use crate::error::CloudError;
use crate::response::SystemTagProperty;
use crate::types::TagId;

/// A system tag, as sent when creating a tag or assigning it to a file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Display name, unique per server.
    pub name: String,
    /// Whether the tag can be assigned at all.
    pub can_assign: bool,
    /// Whether regular users may assign the tag.
    pub user_assignable: bool,
    /// Whether regular users can see the tag.
    pub user_visible: bool,
}

impl Tag {
    /// Creates a visible, assignable tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            can_assign: true,
            user_assignable: true,
            user_visible: true,
        }
    }

    /// Encodes the tag as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>, CloudError> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl SystemTagProperty {
    /// Returns the tag identifier, if the server reported one.
    #[must_use]
    pub fn tag_id(&self) -> Option<TagId> {
        match self.id.trim() {
            "" => None,
            id => Some(TagId::from(id)),
        }
    }

    /// Parses `oc:user-visible`.
    #[must_use]
    pub fn is_user_visible(&self) -> Option<bool> {
        parse_flag(&self.user_visible)
    }

    /// Parses `oc:user-assignable`.
    #[must_use]
    pub fn is_user_assignable(&self) -> Option<bool> {
        parse_flag(&self.user_assignable)
    }

    /// Parses `oc:can-assign`.
    #[must_use]
    pub fn can_assign(&self) -> Option<bool> {
        parse_flag(&self.can_assign)
    }

    /// Converts the wire properties into a typed [`Tag`].
    ///
    /// A flag the server did not report is read as `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if a reported flag is not a boolean.
    pub fn to_tag(&self) -> Result<Tag, CloudError> {
        let flag = |name: &str, value: &str| match value.trim() {
            "" => Ok(false),
            _ => parse_flag(value).ok_or_else(|| {
                CloudError::Decode {
                    status: reqwest::StatusCode::MULTI_STATUS,
                    body: value.to_string(),
                    reason: format!("{name} is not a boolean"),
                }
            }),
        };

        Ok(Tag {
            name: self.display_name.clone(),
            can_assign: flag("can-assign", &self.can_assign)?,
            user_assignable: flag("user-assignable", &self.user_assignable)?,
            user_visible: flag("user-visible", &self.user_visible)?,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
