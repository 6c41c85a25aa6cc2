//! Obfuscation orchestrator run over a resolved table before it is flattened.

use crate::config::ObfuscationOptions;
use crate::error::Result;
use crate::models::ObfuscationMaps;
use crate::name_collapse::collapse_resource_names;
use crate::path_shortening::{PathDigest, PathShortener, Xxh3PathDigest};
use crate::table::ResourceTable;

/// Runs the name-collapsing and path-shortening transforms over a resource table.
///
/// The obfuscator keeps no state between runs; every call to [`Obfuscator::run`] starts from
/// empty maps and returns them to the caller.
#[derive(Debug, Clone)]
pub struct Obfuscator<D = Xxh3PathDigest> {
  options: ObfuscationOptions,
  shortener: PathShortener<D>,
}

impl Obfuscator {
  /// Create an obfuscator for the provided options.
  pub fn new(options: ObfuscationOptions) -> Self {
    Self {
      options,
      shortener: PathShortener::new(),
    }
  }
}

impl<D: PathDigest> Obfuscator<D> {
  /// Create an obfuscator that digests paths with `digest`.
  pub fn with_digest(options: ObfuscationOptions, digest: D) -> Self {
    Self {
      options,
      shortener: PathShortener::with_digest(digest),
    }
  }

  /// Options this obfuscator was created with.
  pub fn options(&self) -> &ObfuscationOptions {
    &self.options
  }

  /// Apply the enabled transforms to `table` and return the de-obfuscation maps.
  ///
  /// Names are classified first, then file paths are shortened. An error means the table
  /// could not be rewritten reversibly and the build step must stop.
  pub fn run(&self, table: &mut ResourceTable) -> Result<ObfuscationMaps> {
    let mut maps = ObfuscationMaps::default();

    collapse_resource_names(table, &self.options, &mut maps.id_resource_names);

    if self.options.shorten_resource_paths {
      self.shortener.shorten(table, &mut maps.shortened_paths)?;
    }

    tracing::info!(
      shortened_paths = maps.shortened_paths.len(),
      collapsed_names = maps.id_resource_names.len(),
      "resource obfuscation finished"
    );
    Ok(maps)
  }

  /// Whether a de-obfuscation map has to be written for this configuration.
  pub fn has_output(&self) -> bool {
    self.options.any_enabled()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::table::test_support::{file_entry, push_entries, resolved_paths};
  use crate::table::{OverlayableItem, ResourceEntry, ResourceId, ResourceName, ResourceType};

  fn sample_table() -> ResourceTable {
    let mut table = ResourceTable::new();
    let icon = file_entry(&mut table, "app_icon", Some(0x7f01_0001), &[
      "res/drawable/app_icon.png",
      "res/drawable-hdpi/app_icon.png",
    ]);
    let tint = file_entry(&mut table, "tint", Some(0x7f02_0000), &["res/color/tint.xml"]);
    let mut banner = file_entry(&mut table, "banner", Some(0x7f01_0002), &[
      "res/drawable/banner.9.png",
    ]);
    banner.overlayable_item = Some(OverlayableItem {
      overlayable: "Branding".into(),
      policies: Vec::new(),
    });
    push_entries(&mut table, ResourceType::Drawable, vec![icon, banner]);
    push_entries(&mut table, ResourceType::Color, vec![tint]);
    push_entries(&mut table, ResourceType::String, vec![ResourceEntry::new("draft")]);
    table
  }

  fn all_enabled() -> ObfuscationOptions {
    ObfuscationOptions {
      shorten_resource_paths: true,
      collapse_key_stringpool: true,
      ..ObfuscationOptions::default()
    }
  }

  #[test]
  fn disabled_pass_leaves_table_untouched() {
    let mut table = sample_table();
    let before = serde_json::to_string(&table).unwrap();
    let obfuscator = Obfuscator::new(ObfuscationOptions::default());

    let maps = obfuscator.run(&mut table).unwrap();

    assert!(maps.is_empty());
    assert!(!obfuscator.has_output());
    assert_eq!(serde_json::to_string(&table).unwrap(), before);
  }

  #[test]
  fn collapses_plain_entries_and_shortens_files() {
    let mut table = sample_table();
    let obfuscator = Obfuscator::new(all_enabled());

    let maps = obfuscator.run(&mut table).unwrap();

    assert!(obfuscator.has_output());
    assert_eq!(maps.id_resource_names.len(), 2);
    assert_eq!(maps.id_resource_names[&ResourceId(0x7f01_0001)], "app_icon");
    assert_eq!(maps.id_resource_names[&ResourceId(0x7f02_0000)], "tint");
    assert_eq!(maps.shortened_paths.len(), 3);
    assert!(!maps.shortened_paths.contains_key("res/color/tint.xml"));
    assert!(maps.shortened_paths["res/drawable/banner.9.png"].ends_with(".9.png"));

    let paths = resolved_paths(&table);
    assert!(paths.contains(&"res/color/tint.xml".to_string()));
    assert!(paths.iter().all(|path| path.starts_with("res/")));
    assert!(!paths.contains(&"res/drawable/app_icon.png".to_string()));
  }

  #[test]
  fn single_collapsed_entry_is_recorded() {
    let mut table = ResourceTable::new();
    let mut entry = ResourceEntry::new("app_icon");
    entry.id = Some(ResourceId(0x7f01_0001));
    push_entries(&mut table, ResourceType::Mipmap, vec![entry]);
    let options = ObfuscationOptions {
      collapse_key_stringpool: true,
      ..ObfuscationOptions::default()
    };

    let maps = Obfuscator::new(options).run(&mut table).unwrap();

    assert_eq!(maps.id_resource_names[&ResourceId(0x7f01_0001)], "app_icon");
    assert!(maps.shortened_paths.is_empty());
  }

  #[test]
  fn path_shortening_alone_still_needs_output() {
    let options = ObfuscationOptions {
      shorten_resource_paths: true,
      ..ObfuscationOptions::default()
    };
    let mut table = sample_table();
    let obfuscator = Obfuscator::new(options);

    let maps = obfuscator.run(&mut table).unwrap();

    assert!(obfuscator.has_output());
    assert!(maps.id_resource_names.is_empty());
    assert_eq!(maps.shortened_paths.len(), 3);
  }

  #[test]
  fn exempt_names_stay_out_of_the_map() {
    let mut options = all_enabled();
    options
      .name_collapse_exemptions
      .insert(ResourceName::new(ResourceType::Drawable, "app_icon"));
    let mut table = sample_table();

    let maps = Obfuscator::new(options).run(&mut table).unwrap();

    assert!(!maps.id_resource_names.contains_key(&ResourceId(0x7f01_0001)));
    assert!(maps.id_resource_names.contains_key(&ResourceId(0x7f02_0000)));
  }

  #[test]
  fn repeated_runs_are_identical() {
    let obfuscator = Obfuscator::new(all_enabled());
    let mut first = sample_table();
    let mut second = sample_table();

    let first_maps = obfuscator.run(&mut first).unwrap();
    let second_maps = obfuscator.run(&mut second).unwrap();

    assert_eq!(first_maps, second_maps);
    assert_eq!(
      serde_json::to_string(&first_maps).unwrap(),
      serde_json::to_string(&second_maps).unwrap()
    );
    assert_eq!(resolved_paths(&first), resolved_paths(&second));
  }

  #[test]
  fn injected_digest_drives_collision_suffixes() {
    let options = ObfuscationOptions {
      shorten_resource_paths: true,
      ..ObfuscationOptions::default()
    };
    let obfuscator = Obfuscator::with_digest(options, |_: &str| 0u64);
    let mut table = sample_table();

    let maps = obfuscator.run(&mut table).unwrap();

    assert_eq!(maps.shortened_paths["res/drawable-hdpi/app_icon.png"], "res/AA.png");
    assert_eq!(maps.shortened_paths["res/drawable/app_icon.png"], "res/AA0.png");
    assert_eq!(maps.shortened_paths["res/drawable/banner.9.png"], "res/AA.9.png");
  }
}
