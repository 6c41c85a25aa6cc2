use std::collections::{BTreeSet, HashSet};

use crate::error::{ObfuscationError, Result};
use crate::models::ShortenedPathMap;
use crate::path_shortening::file_name::{
    optimal_shortened_length, shorten_file_name, shortened_path, split_res_path,
};
use crate::table::ResourceTable;

/// Stable digest of an original file path.
///
/// Shortened names have to be identical across hosts and builds, so implementations must not
/// depend on process state or randomised hashers.
pub trait PathDigest {
    /// Digest the full original path.
    fn digest(&self, path: &str) -> u64;
}

/// XXH3 64-bit digest, seed 0, over the UTF-8 bytes of the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3PathDigest;

impl PathDigest for Xxh3PathDigest {
    fn digest(&self, path: &str) -> u64 {
        xxhash_rust::xxh3::xxh3_64(path.as_bytes())
    }
}

impl<F: Fn(&str) -> u64> PathDigest for F {
    fn digest(&self, path: &str) -> u64 {
        self(path)
    }
}

/// Rewrites file reference paths to short, collision-free names under `res/`.
#[derive(Debug, Clone, Default)]
pub struct PathShortener<D = Xxh3PathDigest> {
    digest: D,
}

impl PathShortener {
    /// Shortener using the pinned XXH3 digest.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: PathDigest> PathShortener<D> {
    /// Shortener using a custom digest.
    pub fn with_digest(digest: D) -> Self {
        Self { digest }
    }

    /// Shorten every file reference in `table`, recording each rewrite in `shortened_path_map`.
    ///
    /// Paths are processed in lexicographic order of their original content, so the
    /// collision suffixes handed out are the same on every run. Color state list files keep
    /// their original path.
    pub fn shorten(
        &self,
        table: &mut ResourceTable,
        shortened_path_map: &mut ShortenedPathMap,
    ) -> Result<()> {
        let original_paths = collect_original_paths(table)?;
        let num_chars = optimal_shortened_length(original_paths.len());
        let max_suffixes = 64u64.saturating_pow(num_chars as u32);
        let mut used_paths: HashSet<String> = shortened_path_map.values().cloned().collect();

        for original in &original_paths {
            if shortened_path_map.contains_key(original) {
                continue;
            }

            let parts = split_res_path(original);
            if parts.is_color_state_list() {
                tracing::trace!(path = %original, "keeping color state list path");
                continue;
            }

            let token = shorten_file_name(self.digest.digest(original), num_chars);
            let shortened = place_shortened_path(
                original,
                &token,
                parts.extension,
                &used_paths,
                max_suffixes,
            )?;
            tracing::debug!(original = %original, shortened = %shortened, "shortened resource path");

            used_paths.insert(shortened.clone());
            shortened_path_map.insert(original.clone(), shortened);
        }

        rewrite_file_references(table, shortened_path_map)
    }
}

/// Shorten file paths in `table` with the pinned digest.
pub fn shorten_resource_paths(
    table: &mut ResourceTable,
    shortened_path_map: &mut ShortenedPathMap,
) -> Result<()> {
    PathShortener::new().shorten(table, shortened_path_map)
}

/// Distinct original paths referenced by the table, ordered by content.
fn collect_original_paths(table: &ResourceTable) -> Result<BTreeSet<String>> {
    table
        .file_references()
        .map(|file_ref| {
            table
                .string_pool
                .get(file_ref.path)
                .map(str::to_string)
                .ok_or(ObfuscationError::DanglingStringRef {
                    index: file_ref.path.index(),
                })
        })
        .collect()
}

/// First free candidate for `token`: the bare token, then the token with suffix 0, 1, 2, ...
fn place_shortened_path(
    original: &str,
    token: &str,
    extension: &str,
    used_paths: &HashSet<String>,
    max_suffixes: u64,
) -> Result<String> {
    let candidate = shortened_path(token, extension, None);
    if !used_paths.contains(&candidate) {
        return Ok(candidate);
    }

    for suffix in 0..max_suffixes {
        let candidate = shortened_path(token, extension, Some(suffix));
        if !used_paths.contains(&candidate) {
            tracing::trace!(path = %original, %candidate, suffix, "resolved shortened path collision");
            return Ok(candidate);
        }
    }

    Err(ObfuscationError::PathNamespaceExhausted {
        path: original.to_string(),
        candidates: max_suffixes.saturating_add(1),
    })
}

/// Point every file reference whose original path was shortened at its new path.
fn rewrite_file_references(
    table: &mut ResourceTable,
    shortened_path_map: &ShortenedPathMap,
) -> Result<()> {
    let (file_refs, string_pool) = table.file_references_mut();
    for file_ref in file_refs {
        let original = string_pool
            .get(file_ref.path)
            .ok_or(ObfuscationError::DanglingStringRef {
                index: file_ref.path.index(),
            })?;
        if let Some(shortened) = shortened_path_map.get(original) {
            file_ref.path = string_pool.make_ref(shortened.as_str());
        }
    }
    Ok(())
}
