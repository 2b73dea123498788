//! The command shapes a probe can issue.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A database and collection pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// The database name.
    pub database: String,
    /// The collection name.
    pub collection: String,
}

impl Namespace {
    /// Create a namespace.
    #[must_use]
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self { database: database.into(), collection: collection.into() }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// A document filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Matches documents where `field` is present (or absent, if `exists` is false).
    Exists {
        /// The field to test.
        field: String,
        /// Whether the field must be present.
        exists: bool,
    },
    /// Matches documents where `field` equals `value`.
    Eq {
        /// The field to compare.
        field: String,
        /// The expected value.
        value: Value,
    },
}

impl Filter {
    /// A filter no document carrying `field` can satisfy.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Exists { field: field.into(), exists: false }
    }

    /// Returns `true` if `document` satisfies the filter.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        match self {
            Self::Exists { field, exists } => document.get(field).is_some() == *exists,
            Self::Eq { field, value } => document.get(field) == Some(value),
        }
    }
}

/// A command issued by a probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeCommand {
    /// Read at most `limit` documents, projected to a single field.
    Find {
        /// Where to read.
        namespace: Namespace,
        /// The only field returned.
        projection: String,
        /// Maximum number of documents returned.
        limit: u32,
    },
    /// Set `field` to `value` on the first document matching `filter`.
    UpdateOne {
        /// Where to write.
        namespace: Namespace,
        /// Selects the document to update.
        filter: Filter,
        /// The field to set.
        field: String,
        /// The value to set.
        value: Value,
    },
}

impl ProbeCommand {
    /// Create a find command.
    #[must_use]
    pub fn find(namespace: Namespace, projection: impl Into<String>, limit: u32) -> Self {
        Self::Find { namespace, projection: projection.into(), limit }
    }

    /// Create an update-one command.
    #[must_use]
    pub fn update_one(
        namespace: Namespace,
        filter: Filter,
        field: impl Into<String>,
        value: Value,
    ) -> Self {
        Self::UpdateOne { namespace, filter, field: field.into(), value }
    }

    /// The namespace the command targets.
    #[must_use]
    pub const fn namespace(&self) -> &Namespace {
        match self {
            Self::Find { namespace, .. } | Self::UpdateOne { namespace, .. } => namespace,
        }
    }

    /// Returns `true` if the command writes.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::UpdateOne { .. })
    }
}

/// What a successful command returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandReply {
    /// Documents returned by a read.
    pub documents: Vec<Value>,
    /// Number of documents matched by a write.
    pub matched: u64,
    /// Number of documents modified by a write.
    pub modified: u64,
}
