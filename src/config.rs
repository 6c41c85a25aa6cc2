//! Options controlling which transforms the obfuscation pass applies.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ObfuscationError, Result};
use crate::table::ResourceName;

const DEFAULT_CONFIG_FILE: &str = "obfuscation.config.json";

/// Directives in an exemption config that keep a name out of the collapsed key pool.
const NAME_EXEMPTION_DIRECTIVES: &[&str] = &["no_collapse", "no_obfuscate"];

/// Immutable configuration for one obfuscation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ObfuscationOptions {
    /// Replace file reference paths with short hashed names.
    pub shorten_resource_paths: bool,
    /// Drop entry names from the key string pool where runtime behaviour allows it.
    pub collapse_key_stringpool: bool,
    /// Names that must keep their entry name even when collapsing is enabled.
    pub name_collapse_exemptions: BTreeSet<ResourceName>,
}

impl ObfuscationOptions {
    /// Attempt to load options from the provided directory.
    ///
    /// A missing or unparsable options file falls back to the defaults, which leave the table
    /// untouched.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        match Self::from_path(&candidate) {
            Ok(options) => options,
            Err(err) if is_missing_file(&err) => {
                tracing::debug!(path = %candidate.display(), "no obfuscation options file; using defaults");
                Self::default()
            }
            Err(err) => {
                tracing::warn!(path = %candidate.display(), error = %err, "ignoring invalid obfuscation options file; using defaults");
                Self::default()
            }
        }
    }

    /// Read options from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ObfuscationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ObfuscationError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether any transform is enabled, i.e. whether a de-obfuscation map will be produced.
    pub fn any_enabled(&self) -> bool {
        self.shorten_resource_paths || self.collapse_key_stringpool
    }
}

fn is_missing_file(err: &ObfuscationError) -> bool {
    matches!(err, ObfuscationError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
}

/// Parse a line-oriented exemption config.
///
/// Each line reads `type/name#directive[,directive...]`. Blank lines and lines starting with
/// `#` are skipped, as are lines with no recognised directive.
pub fn parse_exemption_config(text: &str) -> Result<BTreeSet<ResourceName>> {
    let mut exemptions = BTreeSet::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (name_part, directives) = line.split_once('#').unwrap_or((line, ""));
        let exempt = directives
            .split(',')
            .map(str::trim)
            .any(|directive| NAME_EXEMPTION_DIRECTIVES.contains(&directive));
        if !exempt {
            continue;
        }

        let name = name_part
            .trim()
            .parse::<ResourceName>()
            .map_err(|err| ObfuscationError::InvalidExemption {
                line: idx + 1,
                reason: err.to_string(),
            })?;
        exemptions.insert(name);
    }

    Ok(exemptions)
}

/// Read and parse an exemption config file.
pub fn load_exemption_config(path: &Path) -> Result<BTreeSet<ResourceName>> {
    let content = fs::read_to_string(path).map_err(|source| ObfuscationError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_exemption_config(&content)
}
