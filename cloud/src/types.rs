// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Creates a new value from a string.
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns the inner string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_newtype! {
    /// Resource href (path) as reported by the server or requested by the caller,
    /// such as `/remote.php/dav/files/alice/Photos/`.
    Href
}

string_newtype! {
    /// Server-assigned numeric file identifier (`oc:fileid`), kept in wire form.
    FileId
}

string_newtype! {
    /// Server-assigned system tag identifier (`oc:id`), kept in wire form.
    TagId
}

impl Href {
    /// Returns the last non-empty path segment, e.g. `test.txt` for
    /// `/files/alice/Test/test.txt` and `Test` for `/files/alice/Test/`.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.split('/').rev().find(|segment| !segment.is_empty())
    }
}
