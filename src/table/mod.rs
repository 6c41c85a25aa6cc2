//! In-memory resource table the obfuscation pass reads and rewrites.
//!
//! The table mirrors the usual package → type → entry → config value nesting. Strings that
//! end up in the packaged artifact (file paths, inline strings) live in a single shared
//! [`StringPool`] and are referenced by handle.

mod resource;
mod string_pool;
mod value;

use serde::{Deserialize, Serialize};

pub use resource::{ResourceId, ResourceName, ResourceType};
pub use string_pool::{StringPool, StringRef};
pub use value::{FileReference, ResourceConfigValue, Value};

/// Marker attached to entries that other packages may overlay at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayableItem {
  /// Name of the `<overlayable>` block that declared the entry.
  pub overlayable: String,
  /// Policy names allowed to overlay the entry.
  #[serde(default)]
  pub policies: Vec<String>,
}

/// Single named resource within a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
  /// Entry name, e.g. `app_icon`.
  pub name: String,
  /// Assigned resource id; unset for entries that are not finalized yet.
  #[serde(default)]
  pub id: Option<ResourceId>,
  /// Present when the entry is declared overlayable.
  #[serde(default)]
  pub overlayable_item: Option<OverlayableItem>,
  /// Per-configuration values.
  #[serde(default)]
  pub values: Vec<ResourceConfigValue>,
}

impl ResourceEntry {
  /// Create an entry with no id and no values.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      id: None,
      overlayable_item: None,
      values: Vec::new(),
    }
  }
}

/// All entries of one resource type inside a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTableType {
  /// Type of every entry in this group.
  #[serde(rename = "type")]
  pub resource_type: ResourceType,
  /// Entries in table order.
  #[serde(default)]
  pub entries: Vec<ResourceEntry>,
}

/// A resource package (`android`, `com.example.app`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTablePackage {
  /// Package name.
  pub name: String,
  /// Types in table order.
  #[serde(default)]
  pub types: Vec<ResourceTableType>,
}

/// Fully resolved resource table, prior to flattening.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceTable {
  /// Packages in table order.
  #[serde(default)]
  pub packages: Vec<ResourceTablePackage>,
  /// Pool backing every [`StringRef`] in the table.
  #[serde(default)]
  pub string_pool: StringPool,
}

impl ResourceTable {
  /// Create an empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Every file reference in the table, in package → type → entry → value order.
  pub fn file_references(&self) -> impl Iterator<Item = &FileReference> {
    self
      .packages
      .iter()
      .flat_map(|package| &package.types)
      .flat_map(|table_type| &table_type.entries)
      .flat_map(|entry| &entry.values)
      .filter_map(|config_value| config_value.value.as_file())
  }

  /// Mutable file references alongside the string pool they point into.
  pub fn file_references_mut(
    &mut self,
  ) -> (impl Iterator<Item = &mut FileReference>, &mut StringPool) {
    let Self {
      packages,
      string_pool,
    } = self;
    let file_refs = packages
      .iter_mut()
      .flat_map(|package| &mut package.types)
      .flat_map(|table_type| &mut table_type.entries)
      .flat_map(|entry| &mut entry.values)
      .filter_map(|config_value| config_value.value.as_file_mut());
    (file_refs, string_pool)
  }
}
