//! Shared, deduplicated string storage referenced throughout the resource table.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Handle to a string stored in a [`StringPool`].
///
/// Handles compare by index, which says nothing about content: two handles into different
/// pools may resolve to the same text. Anything that has to be reproducible must compare the
/// resolved strings instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringRef(u32);

impl StringRef {
  /// Raw index of the handle inside its pool.
  pub fn index(self) -> u32 {
    self.0
  }
}

/// Append-only pool of unique strings.
#[derive(Debug, Default, Clone)]
pub struct StringPool {
  strings: Vec<String>,
  index: HashMap<String, u32>,
}

impl StringPool {
  /// Create an empty pool.
  pub fn new() -> Self {
    Self::default()
  }

  /// Return a handle for `value`, appending it when the pool does not hold it yet.
  pub fn make_ref(&mut self, value: impl Into<String>) -> StringRef {
    let value = value.into();
    if let Some(&idx) = self.index.get(&value) {
      return StringRef(idx);
    }

    let idx = self.strings.len() as u32;
    self.index.insert(value.clone(), idx);
    self.strings.push(value);
    StringRef(idx)
  }

  /// Resolve a handle, returning `None` when it does not belong to this pool.
  pub fn get(&self, string_ref: StringRef) -> Option<&str> {
    self.strings.get(string_ref.0 as usize).map(String::as_str)
  }

  /// Number of distinct strings in the pool.
  pub fn len(&self) -> usize {
    self.strings.len()
  }

  /// Whether the pool holds no strings.
  pub fn is_empty(&self) -> bool {
    self.strings.is_empty()
  }

  /// Iterate the stored strings in insertion order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.strings.iter().map(String::as_str)
  }
}

impl Serialize for StringPool {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.strings.serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for StringPool {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let strings = Vec::<String>::deserialize(deserializer)?;
    let mut index = HashMap::with_capacity(strings.len());
    for (idx, value) in strings.iter().enumerate() {
      // Keep the first occurrence so existing handles stay valid.
      index.entry(value.clone()).or_insert(idx as u32);
    }
    Ok(Self { strings, index })
  }
}
