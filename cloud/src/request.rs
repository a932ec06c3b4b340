// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request body builders for WebDAV operations.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::error::CloudError;
use crate::xml::ns;

/// PROPFIND request builder.
#[derive(Debug, Clone)]
pub struct PropFindRequest {
    props: Vec<Prop>,
}

/// Properties to request in PROPFIND.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    /// Last modification time (`d:getlastmodified`).
    LastModified,
    /// `ETag` (`d:getetag`).
    ETag,
    /// MIME type (`d:getcontenttype`).
    ContentType,
    /// Resource type (`d:resourcetype`).
    ResourceType,
    /// Content length in bytes (`d:getcontentlength`).
    ContentLength,
    /// Whether a preview is available (`nc:has-preview`).
    HasPreview,
    /// Server file identifier (`oc:fileid`).
    FileId,
    /// Permission string (`oc:permissions`).
    Permissions,
    /// Size including children for folders (`oc:size`).
    Size,
    /// Favorite flag (`oc:favorite`).
    Favorite,
    /// Number of unread comments (`oc:comments-unread`).
    CommentsUnread,
    /// Display name of the owner (`oc:owner-display-name`).
    OwnerDisplayName,
    /// Share types (`oc:share-types`).
    ShareTypes,
    /// System tag identifier (`oc:id`).
    TagId,
    /// System tag display name (`oc:display-name`).
    TagDisplayName,
    /// System tag visibility (`oc:user-visible`).
    TagUserVisible,
    /// System tag assignability (`oc:user-assignable`).
    TagUserAssignable,
    /// Whether the current user can assign the tag (`oc:can-assign`).
    TagCanAssign,
}

impl Prop {
    /// Properties fetched by a directory listing.
    pub const FILE: [Prop; 13] = [
        Self::LastModified,
        Self::ETag,
        Self::ContentType,
        Self::ResourceType,
        Self::ContentLength,
        Self::HasPreview,
        Self::FileId,
        Self::Permissions,
        Self::Size,
        Self::Favorite,
        Self::CommentsUnread,
        Self::OwnerDisplayName,
        Self::ShareTypes,
    ];

    /// Properties fetched from the system tag collection.
    pub const TAG: [Prop; 5] = [
        Self::TagId,
        Self::TagDisplayName,
        Self::TagUserVisible,
        Self::TagUserAssignable,
        Self::TagCanAssign,
    ];

    const fn name(self) -> &'static str {
        match self {
            Self::LastModified => "getlastmodified",
            Self::ETag => "getetag",
            Self::ContentType => "getcontenttype",
            Self::ResourceType => "resourcetype",
            Self::ContentLength => "getcontentlength",
            Self::HasPreview => "has-preview",
            Self::FileId => "fileid",
            Self::Permissions => "permissions",
            Self::Size => "size",
            Self::Favorite => "favorite",
            Self::CommentsUnread => "comments-unread",
            Self::OwnerDisplayName => "owner-display-name",
            Self::ShareTypes => "share-types",
            Self::TagId => "id",
            Self::TagDisplayName => "display-name",
            Self::TagUserVisible => "user-visible",
            Self::TagUserAssignable => "user-assignable",
            Self::TagCanAssign => "can-assign",
        }
    }

    const fn prefix(self) -> &'static str {
        match self {
            Self::LastModified
            | Self::ETag
            | Self::ContentType
            | Self::ResourceType
            | Self::ContentLength => "d",
            Self::HasPreview => "nc",
            _ => "oc",
        }
    }
}

impl PropFindRequest {
    /// Creates an empty PROPFIND request.
    #[must_use]
    pub fn new() -> Self {
        Self { props: Vec::new() }
    }

    /// Creates the request used for directory listings.
    #[must_use]
    pub fn file_properties() -> Self {
        Self {
            props: Prop::FILE.to_vec(),
        }
    }

    /// Creates the request used for the system tag collection.
    #[must_use]
    pub fn tag_properties() -> Self {
        Self {
            props: Prop::TAG.to_vec(),
        }
    }

    /// Adds a property to the request.
    pub fn add_property(&mut self, prop: Prop) -> &mut Self {
        self.props.push(prop);
        self
    }

    /// Returns the requested properties in order.
    #[must_use]
    pub fn properties(&self) -> &[Prop] {
        &self.props
    }

    /// Builds the XML body for the PROPFIND request.
    ///
    /// All three namespaces are always declared on the root element.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, CloudError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <d:propfind xmlns:d="DAV:" xmlns:oc="..." xmlns:nc="...">
        let mut propfind = BytesStart::new("d:propfind");
        propfind.push_attribute(("xmlns:d", ns::DAV));
        propfind.push_attribute(("xmlns:oc", ns::OC));
        propfind.push_attribute(("xmlns:nc", ns::NC));
        writer.write_event(Event::Start(propfind))?;

        writer.write_event(Event::Start(BytesStart::new("d:prop")))?;
        for prop in &self.props {
            let qname = format!("{}:{}", prop.prefix(), prop.name());
            writer.write_event(Event::Start(BytesStart::new(qname.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new(qname)))?;
        }
        writer.write_event(Event::End(BytesEnd::new("d:prop")))?;

        writer.write_event(Event::End(BytesEnd::new("d:propfind")))?;

        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| CloudError::Xml(format!("UTF-8 error: {e}")))
    }
}

impl Default for PropFindRequest {
    fn default() -> Self {
        Self::new()
    }
}
