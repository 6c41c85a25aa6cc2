//! Deterministic shortening of file reference paths.
//!
//! The module is split so that the pure naming rules (splitting paths, rendering digests into
//! tokens, building candidates) can be tested apart from the table walk that resolves
//! collisions and rewrites the string pool.

mod file_name;
mod resolver;

pub use file_name::{
    COLOR_STATE_LIST_PREFIX, PathParts, SHORTENED_DIR, optimal_shortened_length,
    shorten_file_name, shortened_path, split_res_path,
};
pub use resolver::{PathDigest, PathShortener, Xxh3PathDigest, shorten_resource_paths};
