//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through an export. Each type
//! keeps ids from being mixed up and validates its format on construction,
//! including when deserialized from production JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl $name {
            fn reject_empty(id: &str) -> Result<(), String> {
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                Ok(())
            }
        }
    };
}

string_id!(
    /// Asset identifier
    ///
    /// Unique within a production's asset set. It becomes a directory name in
    /// the exported site (`/assets/<id>/<filename>`), so it must be a single
    /// path segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio::domain::ids::AssetId;
    ///
    /// let id = AssetId::new("a1").unwrap();
    /// assert_eq!(id.as_str(), "a1");
    /// assert!(AssetId::new("../etc").is_err());
    /// ```
    AssetId,
    "Asset ID"
);

impl AssetId {
    /// Creates a new AssetId, rejecting empty ids and ids that are not a
    /// single safe path segment
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        Self::reject_empty(&id)?;
        if !is_path_segment(&id) {
            return Err(format!(
                "Asset ID '{id}' must be a single path segment (no '/', '\\', '.' or '..')"
            ));
        }
        Ok(Self(id))
    }
}

string_id!(
    /// Template identifier
    ///
    /// Selects a template from the registry by exact match.
    ///
    /// # Examples
    ///
    /// ```
    /// use folio::domain::ids::TemplateId;
    /// use std::str::FromStr;
    ///
    /// let template_id = TemplateId::from_str("garlic").unwrap();
    /// assert_eq!(template_id.as_str(), "garlic");
    /// ```
    TemplateId,
    "Template ID"
);

impl TemplateId {
    /// Creates a new TemplateId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        Self::reject_empty(&id)?;
        Ok(Self(id))
    }

    /// Whether the id can be used as a directory name under the bundles path
    pub fn is_path_safe(&self) -> bool {
        is_path_segment(&self.0)
    }
}

string_id!(
    /// Edition identifier
    EditionId,
    "Edition ID"
);

impl EditionId {
    /// Creates a new EditionId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        Self::reject_empty(&id)?;
        Ok(Self(id))
    }
}

/// Export job identifier
///
/// A fresh v4 UUID per run. It names the job's workspace directory and must
/// never appear in exported output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh job id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether `s` can be used verbatim as one path component
pub(crate) fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\', '\0'])
}
