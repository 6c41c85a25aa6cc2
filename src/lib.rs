#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod deobfuscation;
pub mod error;
pub mod models;
pub mod name_collapse;
pub mod obfuscator;
pub mod path_shortening;
pub mod table;

pub use config::ObfuscationOptions;
pub use deobfuscation::{DeobfuscationMapping, Deobfuscator};
pub use error::{ObfuscationError, Result};
pub use models::{IdResourceMap, ObfuscationMaps, ShortenedPathMap};
pub use name_collapse::{NameDisposition, classify};
pub use obfuscator::Obfuscator;
pub use table::ResourceTable;
