// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for WebDAV processing.

use std::io;
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::events::Event;

/// XML namespaces used by the server.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// `ownCloud` namespace.
    pub const OC: &str = "http://owncloud.org/ns";

    /// `Nextcloud` namespace.
    pub const NC: &str = "http://nextcloud.org/ns";
}

/// Reads the text content of the element whose start tag was just consumed,
/// leaving the reader after its end tag.
///
/// Text of nested elements is concatenated.
///
/// # Errors
///
/// Returns an error if XML parsing fails or the input ends inside the element.
pub fn read_element_text(reader: &mut Reader<&[u8]>) -> Result<String, quick_xml::Error> {
    let mut text = String::new();
    let mut depth = 1;

    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Text(e) => {
                let unescaped = e.unescape()?;
                text.push_str(unescaped.as_ref());
            }
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => return Err(eof_error("element")),
            _ => {}
        }
    }

    Ok(text)
}

/// Collects the local names of the direct child elements of the element whose
/// start tag was just consumed, e.g. `collection` for
/// `<d:resourcetype><d:collection/></d:resourcetype>`.
///
/// # Errors
///
/// Returns an error if XML parsing fails or the input ends inside the element.
pub fn read_child_names(reader: &mut Reader<&[u8]>) -> Result<Vec<String>, quick_xml::Error> {
    let mut names = Vec::new();
    let mut depth = 1;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 1 {
                    names.push(local_name(e.name().local_name().into_inner()));
                }
                depth += 1;
            }
            Event::Empty(e) if depth == 1 => {
                names.push(local_name(e.name().local_name().into_inner()));
            }
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Eof => return Err(eof_error("element")),
            _ => {}
        }
    }

    Ok(names)
}

fn local_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Error for a document that ends inside `element`.
pub fn eof_error(element: &str) -> quick_xml::Error {
    quick_xml::Error::Io(Arc::new(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("unexpected end of document inside <{element}>"),
    )))
}
