//! Values attached to a resource entry for a given configuration.

use serde::{Deserialize, Serialize};

use crate::table::string_pool::StringRef;

/// Value pointing at an external file (drawable, layout, raw asset, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
  /// Path of the file inside the package, stored in the table's string pool.
  pub path: StringRef,
}

/// Resource value payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Value {
  /// File-backed resource.
  File(FileReference),
  /// Inline string stored in the pool.
  String {
    /// Pool handle of the string contents.
    value: StringRef,
  },
  /// Reference to another resource by id.
  Reference {
    /// Target resource id, unset until ids are assigned.
    id: Option<u32>,
  },
  /// Primitive data value (`TYPE_INT_*`, `TYPE_FLOAT`, ...).
  Primitive {
    /// Raw data type tag.
    data_type: u8,
    /// Raw data.
    data: u32,
  },
}

impl Value {
  /// Borrow the file reference when this value is file-backed.
  pub fn as_file(&self) -> Option<&FileReference> {
    match self {
      Self::File(file_ref) => Some(file_ref),
      _ => None,
    }
  }

  /// Mutably borrow the file reference when this value is file-backed.
  pub fn as_file_mut(&mut self) -> Option<&mut FileReference> {
    match self {
      Self::File(file_ref) => Some(file_ref),
      _ => None,
    }
  }
}

/// Per-configuration variant of a resource entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfigValue {
  /// Configuration qualifier string (`""` for the default, `hdpi`, `night-v8`, ...).
  #[serde(default)]
  pub config: String,
  /// Value for this configuration.
  pub value: Value,
}
