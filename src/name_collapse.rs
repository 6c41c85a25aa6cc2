//! Decide which entry names may be dropped from the key string pool.

use crate::config::ObfuscationOptions;
use crate::models::IdResourceMap;
use crate::table::{OverlayableItem, ResourceEntry, ResourceName, ResourceTable, ResourceType};

/// Outcome of classifying one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameDisposition {
  /// Collapsing is disabled or the name is on the exemption list.
  KeepExempt,
  /// The entry is overlayable; overlays resolve it by name at runtime.
  KeepOverlayable,
  /// The name may be collapsed.
  Obfuscated,
}

/// Read-only view of the entry fields the policy looks at.
#[derive(Debug, Clone, Copy)]
pub struct ResourceEntryView<'a> {
  /// Type the entry belongs to.
  pub resource_type: ResourceType,
  /// Entry name.
  pub name: &'a str,
  /// Overlayable marker, if declared.
  pub overlayable_item: Option<&'a OverlayableItem>,
}

impl<'a> ResourceEntryView<'a> {
  /// View `entry` as a member of `resource_type`.
  pub fn new(resource_type: ResourceType, entry: &'a ResourceEntry) -> Self {
    Self {
      resource_type,
      name: &entry.name,
      overlayable_item: entry.overlayable_item.as_ref(),
    }
  }

  /// `type/name` key of the entry.
  pub fn resource_name(&self) -> ResourceName {
    ResourceName::new(self.resource_type, self.name)
  }
}

/// Classify one entry. The first matching rule wins:
///
/// 1. collapsing disabled, or the name is exempt → [`NameDisposition::KeepExempt`]
/// 2. the entry is overlayable → [`NameDisposition::KeepOverlayable`]
/// 3. otherwise → [`NameDisposition::Obfuscated`]
pub fn classify(options: &ObfuscationOptions, entry: &ResourceEntryView<'_>) -> NameDisposition {
  if !options.collapse_key_stringpool
    || options
      .name_collapse_exemptions
      .contains(&entry.resource_name())
  {
    NameDisposition::KeepExempt
  } else if entry.overlayable_item.is_some() {
    NameDisposition::KeepOverlayable
  } else {
    NameDisposition::Obfuscated
  }
}

/// Walk every finalized entry and record `id → name` for the ones whose name is collapsed.
///
/// Entries without an id or with an empty name are skipped without being classified.
pub fn collapse_resource_names(
  table: &ResourceTable,
  options: &ObfuscationOptions,
  id_resource_map: &mut IdResourceMap,
) {
  if !options.collapse_key_stringpool {
    return;
  }

  for package in &table.packages {
    for table_type in &package.types {
      for entry in &table_type.entries {
        let Some(id) = entry.id else {
          continue;
        };
        if entry.name.is_empty() {
          continue;
        }

        let view = ResourceEntryView::new(table_type.resource_type, entry);
        match classify(options, &view) {
          NameDisposition::Obfuscated => {
            tracing::debug!(%id, name = %view.resource_name(), "collapsing resource name");
            id_resource_map.insert(id, entry.name.clone());
          }
          NameDisposition::KeepOverlayable => {
            tracing::trace!(%id, name = %view.resource_name(), "keeping overlayable resource name");
          }
          NameDisposition::KeepExempt => {}
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::table::test_support::push_entries;
  use crate::table::ResourceId;

  fn overlayable() -> OverlayableItem {
    OverlayableItem {
      overlayable: "ThemeResources".into(),
      policies: vec!["public".into()],
    }
  }

  fn entry(name: &str, id: Option<u32>, overlayable_item: Option<OverlayableItem>) -> ResourceEntry {
    ResourceEntry {
      id: id.map(ResourceId),
      overlayable_item,
      ..ResourceEntry::new(name)
    }
  }

  fn collapsing() -> ObfuscationOptions {
    ObfuscationOptions {
      collapse_key_stringpool: true,
      ..ObfuscationOptions::default()
    }
  }

  #[test]
  fn disabled_collapsing_keeps_every_name() {
    let options = ObfuscationOptions::default();
    let plain = entry("app_icon", Some(0x7f01_0001), None);
    let overlay = entry("accent", Some(0x7f01_0002), Some(overlayable()));

    for candidate in [&plain, &overlay] {
      let view = ResourceEntryView::new(ResourceType::Drawable, candidate);
      assert_eq!(classify(&options, &view), NameDisposition::KeepExempt);
    }
  }

  #[test]
  fn exemptions_win_over_overlayable() {
    let mut options = collapsing();
    options
      .name_collapse_exemptions
      .insert(ResourceName::new(ResourceType::Color, "accent"));
    let overlay = entry("accent", Some(0x7f02_0000), Some(overlayable()));

    let view = ResourceEntryView::new(ResourceType::Color, &overlay);
    assert_eq!(classify(&options, &view), NameDisposition::KeepExempt);
  }

  #[test]
  fn exemptions_match_on_type_and_name() {
    let mut options = collapsing();
    options
      .name_collapse_exemptions
      .insert(ResourceName::new(ResourceType::String, "accent"));
    let plain = entry("accent", Some(0x7f02_0000), None);

    let view = ResourceEntryView::new(ResourceType::Color, &plain);
    assert_eq!(classify(&options, &view), NameDisposition::Obfuscated);
  }

  #[test]
  fn overlayable_entries_keep_their_names() {
    let overlay = entry("accent", Some(0x7f02_0000), Some(overlayable()));
    let view = ResourceEntryView::new(ResourceType::Color, &overlay);
    assert_eq!(classify(&collapsing(), &view), NameDisposition::KeepOverlayable);
  }

  #[test]
  fn records_only_collapsed_names() {
    let mut table = ResourceTable::new();
    push_entries(&mut table, ResourceType::Drawable, vec![
      entry("app_icon", Some(0x7f01_0001), None),
      entry("banner", Some(0x7f01_0002), Some(overlayable())),
      entry("logo", Some(0x7f01_0003), None),
      entry("pending", None, None),
      entry("", Some(0x7f01_0004), None),
    ]);
    let mut options = collapsing();
    options
      .name_collapse_exemptions
      .insert(ResourceName::new(ResourceType::Drawable, "logo"));
    let mut map = IdResourceMap::new();

    collapse_resource_names(&table, &options, &mut map);

    assert_eq!(map.len(), 1);
    assert_eq!(map[&ResourceId(0x7f01_0001)], "app_icon");
  }

  #[test]
  fn disabled_collapsing_records_nothing() {
    let mut table = ResourceTable::new();
    push_entries(&mut table, ResourceType::String, vec![entry(
      "title",
      Some(0x7f03_0000),
      None,
    )]);
    let mut map = IdResourceMap::new();

    collapse_resource_names(&table, &ObfuscationOptions::default(), &mut map);

    assert!(map.is_empty());
  }
}
