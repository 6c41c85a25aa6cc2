//! Mappings produced by a single obfuscation run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::table::ResourceId;

/// Original file path → shortened file path.
///
/// Keys are distinct originals and no two keys share a value.
pub type ShortenedPathMap = BTreeMap<String, String>;

/// Resource id → original entry name, for entries whose name was collapsed.
pub type IdResourceMap = BTreeMap<ResourceId, String>;

/// Both de-obfuscation mappings of a run, handed to the packaging stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObfuscationMaps {
  /// Shortened file paths keyed by original path.
  pub shortened_paths: ShortenedPathMap,
  /// Original entry names keyed by resource id.
  pub id_resource_names: IdResourceMap,
}

impl ObfuscationMaps {
  /// Returns `true` when neither mapping holds anything.
  pub fn is_empty(&self) -> bool {
    self.shortened_paths.is_empty() && self.id_resource_names.is_empty()
  }
}
