// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Thin client for the WebDAV and system-tag APIs of `ownCloud`/`Nextcloud` servers.
//!
//! Every operation on [`CloudClient`] maps onto one HTTP request (or a short,
//! fixed sequence of them) and decodes the XML or JSON reply into typed values.
//! Nothing is cached or retried.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::similar_names, clippy::single_match_else, clippy::match_bool)]

mod client;
mod config;
mod error;
mod http;
mod request;
mod response;
mod tag;
mod types;
mod xml;

pub use crate::client::CloudClient;
pub use crate::config::CloudConfig;
pub use crate::error::CloudError;
pub use crate::request::{Prop, PropFindRequest};
pub use crate::response::{
    Fault, MultiStatusResponse, MultiStatusTagResponse, PropResponse, Property, SystemTagProperty,
    TagPropResponse,
};
pub use crate::tag::Tag;
pub use crate::types::{FileId, Href, TagId};
