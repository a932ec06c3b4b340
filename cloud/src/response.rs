// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for WebDAV operations.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::CloudError;
use crate::types::{FileId, Href};
use crate::xml::{eof_error, read_child_names, read_element_text};

/// Documents the transport helper can decode a response body into.
pub(crate) trait FromXml: Sized {
    fn from_xml(xml: &str) -> Result<Self, CloudError>;
}

/// `WebDAV` multistatus response of a directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiStatusResponse {
    /// One entry per matched resource, in document order.
    pub responses: Vec<PropResponse>,
}

/// Individual resource in a [`MultiStatusResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropResponse {
    /// Path of the resource.
    pub href: Href,
    /// One entry per `propstat/prop` block, in document order.
    pub properties: Vec<Property>,
}

/// File metadata as reported by the server.
///
/// Fields keep their wire representation; a property the server did not
/// report (or reported in a non-200 `propstat`) is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Property {
    /// `d:getlastmodified`, an RFC 1123 date.
    pub last_modified: String,
    /// `d:getetag`.
    pub etag: String,
    /// `d:getcontenttype`.
    pub content_type: String,
    /// Local names of the `d:resourcetype` children, space separated
    /// (`collection` for folders, empty for files).
    pub resource_type: String,
    /// `d:getcontentlength`.
    pub content_length: String,
    /// `nc:has-preview`.
    pub has_preview: String,
    /// `oc:fileid`.
    pub file_id: String,
    /// `oc:permissions`.
    pub permissions: String,
    /// `oc:size`.
    pub size: String,
    /// `oc:favorite`.
    pub favorite: String,
    /// `oc:comments-unread`.
    pub comments_unread: String,
    /// `oc:owner-display-name`.
    pub owner_display_name: String,
    /// `oc:share-types`.
    pub share_types: String,
}

impl Property {
    /// Returns `true` if the resource is a collection (folder).
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.resource_type.split(' ').any(|t| t == "collection")
    }

    /// Parses `d:getcontentlength`.
    #[must_use]
    pub fn content_length_bytes(&self) -> Option<u64> {
        self.content_length.trim().parse().ok()
    }

    /// Parses `oc:size`.
    #[must_use]
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.trim().parse().ok()
    }

    /// Returns `true` if the resource is marked as a favorite.
    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.favorite.trim() == "1"
    }

    /// Returns the file identifier, if the server reported one.
    #[must_use]
    pub fn file_id(&self) -> Option<FileId> {
        match self.file_id.trim() {
            "" => None,
            id => Some(FileId::from(id)),
        }
    }
}

/// `WebDAV` multistatus response of the system tag collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiStatusTagResponse {
    /// One entry per tag (plus the collection itself), in document order.
    pub responses: Vec<TagPropResponse>,
}

/// Individual resource in a [`MultiStatusTagResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPropResponse {
    /// Path of the tag resource.
    pub href: Href,
    /// One entry per `propstat/prop` block, in document order.
    pub properties: Vec<SystemTagProperty>,
}

/// System tag properties in wire form.
///
/// Boolean flags are kept as the strings the server sent; see
/// [`SystemTagProperty::to_tag`] for a typed view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemTagProperty {
    /// `oc:id`.
    pub id: String,
    /// `oc:display-name`.
    pub display_name: String,
    /// `oc:user-visible`.
    pub user_visible: String,
    /// `oc:user-assignable`.
    pub user_assignable: String,
    /// `oc:can-assign`.
    pub can_assign: String,
}

/// Error envelope returned by the server, e.g.
/// `<d:error><s:exception>…</s:exception><s:message>…</s:message></d:error>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fault {
    /// Exception type.
    pub exception: String,
    /// Error message.
    pub message: String,
}

/// A set of properties filled from the children of one `d:prop` element.
trait PropertySet: Default {
    /// Consumes the element whose start tag named `name` was just read.
    fn read(&mut self, name: &[u8], reader: &mut Reader<&[u8]>) -> Result<(), quick_xml::Error>;
}

impl PropertySet for Property {
    fn read(&mut self, name: &[u8], reader: &mut Reader<&[u8]>) -> Result<(), quick_xml::Error> {
        let field = match name {
            b"resourcetype" => {
                self.resource_type = read_child_names(reader)?.join(" ");
                return Ok(());
            }
            b"getlastmodified" => &mut self.last_modified,
            b"getetag" => &mut self.etag,
            b"getcontenttype" => &mut self.content_type,
            b"getcontentlength" => &mut self.content_length,
            b"has-preview" => &mut self.has_preview,
            b"fileid" => &mut self.file_id,
            b"permissions" => &mut self.permissions,
            b"size" => &mut self.size,
            b"favorite" => &mut self.favorite,
            b"comments-unread" => &mut self.comments_unread,
            b"owner-display-name" => &mut self.owner_display_name,
            b"share-types" => {
                self.share_types = read_share_types(reader)?;
                return Ok(());
            }
            _ => {
                read_element_text(reader)?;
                return Ok(());
            }
        };
        *field = read_element_text(reader)?;
        Ok(())
    }
}

impl PropertySet for SystemTagProperty {
    fn read(&mut self, name: &[u8], reader: &mut Reader<&[u8]>) -> Result<(), quick_xml::Error> {
        let text = read_element_text(reader)?;
        match name {
            b"id" => self.id = text,
            b"display-name" => self.display_name = text,
            b"user-visible" => self.user_visible = text,
            b"user-assignable" => self.user_assignable = text,
            b"can-assign" => self.can_assign = text,
            _ => {}
        }
        Ok(())
    }
}

/// `oc:share-types` holds one `oc:share-type` child per share; join them
/// with spaces so the wire value stays a single string.
fn read_share_types(reader: &mut Reader<&[u8]>) -> Result<String, quick_xml::Error> {
    let mut types = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(_) => types.push(read_element_text(reader)?),
            Event::Text(e) => types.push(e.unescape()?.into_owned()),
            Event::End(_) => break,
            Event::Eof => return Err(eof_error("share-types")),
            _ => {}
        }
    }
    Ok(types.join(" "))
}

impl MultiStatusResponse {
    /// Parses a multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or its root is not `multistatus`.
    pub fn from_xml(xml: &str) -> Result<Self, CloudError> {
        let responses = parse_multistatus::<Property>(xml)?
            .into_iter()
            .map(|(href, properties)| PropResponse { href, properties })
            .collect();
        Ok(Self { responses })
    }

    /// Finds the response whose href ends with the given file name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&PropResponse> {
        self.responses
            .iter()
            .find(|r| r.href.file_name() == Some(name))
    }
}

impl FromXml for MultiStatusResponse {
    fn from_xml(xml: &str) -> Result<Self, CloudError> {
        Self::from_xml(xml)
    }
}

impl MultiStatusTagResponse {
    /// Parses a system tag multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed or its root is not `multistatus`.
    pub fn from_xml(xml: &str) -> Result<Self, CloudError> {
        let responses = parse_multistatus::<SystemTagProperty>(xml)?
            .into_iter()
            .map(|(href, properties)| TagPropResponse { href, properties })
            .collect();
        Ok(Self { responses })
    }

    /// Returns the first response carrying a property block with the given
    /// display name.
    #[must_use]
    pub fn find_by_display_name(&self, display_name: &str) -> Option<&TagPropResponse> {
        self.responses.iter().find(|r| r.property(display_name).is_some())
    }
}

impl FromXml for MultiStatusTagResponse {
    fn from_xml(xml: &str) -> Result<Self, CloudError> {
        Self::from_xml(xml)
    }
}

impl TagPropResponse {
    /// Returns the property block with the given display name.
    #[must_use]
    pub fn property(&self, display_name: &str) -> Option<&SystemTagProperty> {
        self.properties
            .iter()
            .find(|p| p.display_name == display_name)
    }
}

impl Fault {
    /// Parses an error envelope.
    ///
    /// The root element may have any name; `exception` and `message` are
    /// matched among its children by local name. Returns `Ok(None)` when the
    /// input ends before any element appears, which is the case for empty and
    /// plain-text bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is malformed.
    pub fn from_xml(xml: &str) -> Result<Option<Self>, CloudError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = true;

        loop {
            match reader.read_event()? {
                Event::Eof => return Ok(None),
                Event::Empty(_) => return Ok(Some(Self::default())),
                Event::Start(_) => break,
                Event::End(e) => {
                    return Err(CloudError::Xml(format!(
                        "unexpected end element </{}>",
                        String::from_utf8_lossy(e.name().into_inner())
                    )));
                }
                _ => {}
            }
        }

        let mut fault = Self::default();
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let text = read_element_text(&mut reader)?;
                    match e.name().local_name().into_inner() {
                        b"exception" => fault.exception = text,
                        b"message" => fault.message = text,
                        _ => {}
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(eof_error("error envelope").into()),
                _ => {}
            }
        }

        Ok(Some(fault))
    }
}

/// Parses a multistatus document into `(href, property blocks)` pairs.
fn parse_multistatus<P: PropertySet>(xml: &str) -> Result<Vec<(Href, Vec<P>)>, CloudError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = true;

    // Locate the root element.
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().local_name().into_inner() == b"multistatus" => break,
            Event::Empty(e) if e.name().local_name().into_inner() == b"multistatus" => {
                return Ok(Vec::new());
            }
            Event::Start(e) | Event::Empty(e) => {
                return Err(CloudError::Xml(format!(
                    "expected element <multistatus>, found <{}>",
                    String::from_utf8_lossy(e.name().local_name().into_inner())
                )));
            }
            Event::Eof => return Err(eof_error("multistatus").into()),
            _ => {}
        }
    }

    let mut responses = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().local_name().into_inner() == b"response" => {
                responses.push(parse_response(&mut reader)?);
            }
            Event::Start(_) => {
                read_element_text(&mut reader)?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(eof_error("multistatus").into()),
            _ => {}
        }
    }

    Ok(responses)
}

fn parse_response<P: PropertySet>(
    reader: &mut Reader<&[u8]>,
) -> Result<(Href, Vec<P>), CloudError> {
    let mut href = Href::default();
    let mut properties = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().local_name().into_inner() {
                b"href" => href = Href::new(read_element_text(reader)?),
                b"propstat" => parse_propstat(reader, &mut properties)?,
                _ => {
                    read_element_text(reader)?;
                }
            },
            Event::End(_) => break,
            Event::Eof => return Err(eof_error("response").into()),
            _ => {}
        }
    }

    Ok((href, properties))
}

fn parse_propstat<P: PropertySet>(
    reader: &mut Reader<&[u8]>,
    properties: &mut Vec<P>,
) -> Result<(), CloudError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().local_name().into_inner() == b"prop" => {
                let mut props = P::default();
                loop {
                    match reader.read_event()? {
                        Event::Start(e) => {
                            let name = e.name().local_name().into_inner().to_vec();
                            props.read(&name, reader)?;
                        }
                        Event::End(_) => break,
                        Event::Eof => return Err(eof_error("prop").into()),
                        _ => {}
                    }
                }
                properties.push(props);
            }
            Event::Empty(e) if e.name().local_name().into_inner() == b"prop" => {
                properties.push(P::default());
            }
            Event::Start(_) => {
                read_element_text(reader)?;
            }
            Event::End(_) => break,
            Event::Eof => return Err(eof_error("propstat").into()),
            _ => {}
        }
    }

    Ok(())
}
