//! Persisted de-obfuscation map and the reverse lookups built on it.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ObfuscationError, Result};
use crate::models::{ObfuscationMaps, ShortenedPathMap};
use crate::table::{ResourceId, ResourceTable};

/// Original and shortened path of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenedPathRecord {
  /// Path before shortening.
  pub original_path: String,
  /// Path written into the packaged table.
  pub shortened_path: String,
}

/// Original name of an entry whose name was collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsedNameRecord {
  /// Resource id of the entry.
  pub id: ResourceId,
  /// Entry name before collapsing.
  pub name: String,
}

/// Document written next to the packaged artifact so it can be de-obfuscated later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeobfuscationMapping {
  /// Shortened paths, sorted by original path.
  #[serde(default)]
  pub shortened_paths: Vec<ShortenedPathRecord>,
  /// Collapsed names, sorted by id.
  #[serde(default)]
  pub collapsed_names: Vec<CollapsedNameRecord>,
}

impl From<&ObfuscationMaps> for DeobfuscationMapping {
  fn from(maps: &ObfuscationMaps) -> Self {
    Self {
      shortened_paths: maps
        .shortened_paths
        .iter()
        .map(|(original, shortened)| ShortenedPathRecord {
          original_path: original.clone(),
          shortened_path: shortened.clone(),
        })
        .collect(),
      collapsed_names: maps
        .id_resource_names
        .iter()
        .map(|(id, name)| CollapsedNameRecord {
          id: *id,
          name: name.clone(),
        })
        .collect(),
    }
  }
}

/// Serialise `maps` as a prettified JSON mapping at `path`.
pub fn write_mapping(path: &Path, maps: &ObfuscationMaps) -> Result<()> {
  let json = serde_json::to_string_pretty(&DeobfuscationMapping::from(maps)).map_err(|source| {
    ObfuscationError::Json {
      path: path.to_path_buf(),
      source,
    }
  })?;
  fs::write(path, json).map_err(|source| ObfuscationError::Io {
    path: path.to_path_buf(),
    source,
  })
}

/// Load a mapping previously written by [`write_mapping`].
pub fn load_mapping(path: &Path) -> Result<DeobfuscationMapping> {
  let content = fs::read_to_string(path).map_err(|source| ObfuscationError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  serde_json::from_str(&content).map_err(|source| ObfuscationError::Json {
    path: path.to_path_buf(),
    source,
  })
}

/// Write the plain-text path map, one `original -> shortened` line per file.
pub fn write_path_map<W: Write>(mut writer: W, shortened_path_map: &ShortenedPathMap) -> io::Result<()> {
  for (original, shortened) in shortened_path_map {
    writeln!(writer, "{original} -> {shortened}")?;
  }
  writer.flush()
}

/// Reverse lookups over a [`DeobfuscationMapping`].
#[derive(Debug, Clone, Default)]
pub struct Deobfuscator {
  original_paths: HashMap<String, String>,
  original_names: BTreeMap<ResourceId, String>,
}

impl Deobfuscator {
  /// Build the lookups for `mapping`.
  pub fn new(mapping: DeobfuscationMapping) -> Self {
    Self {
      original_paths: mapping
        .shortened_paths
        .into_iter()
        .map(|record| (record.shortened_path, record.original_path))
        .collect(),
      original_names: mapping
        .collapsed_names
        .into_iter()
        .map(|record| (record.id, record.name))
        .collect(),
    }
  }

  /// Original path of a shortened file path.
  pub fn original_path(&self, shortened: &str) -> Option<&str> {
    self.original_paths.get(shortened).map(String::as_str)
  }

  /// Original entry name of a collapsed resource.
  pub fn original_name(&self, id: ResourceId) -> Option<&str> {
    self.original_names.get(&id).map(String::as_str)
  }

  /// Point shortened file references in `table` back at their original paths.
  ///
  /// Returns the number of file references rewritten.
  pub fn restore_table(&self, table: &mut ResourceTable) -> Result<usize> {
    let (file_refs, string_pool) = table.file_references_mut();
    let mut restored = 0;
    for file_ref in file_refs {
      let current = string_pool
        .get(file_ref.path)
        .ok_or(ObfuscationError::DanglingStringRef {
          index: file_ref.path.index(),
        })?;
      if let Some(original) = self.original_paths.get(current) {
        file_ref.path = string_pool.make_ref(original.as_str());
        restored += 1;
      }
    }
    tracing::info!(restored, "restored shortened resource paths");
    Ok(restored)
  }
}
