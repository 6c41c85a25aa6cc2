//! Resource identifiers: numeric ids, resource types and `type/entry` names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ObfuscationError;

/// Packed `0xPPTTEEEE` resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl ResourceId {
  /// Package byte of the identifier.
  pub fn package_id(self) -> u8 {
    (self.0 >> 24) as u8
  }

  /// Type byte of the identifier.
  pub fn type_id(self) -> u8 {
    (self.0 >> 16) as u8
  }

  /// Entry index within the type.
  pub fn entry_id(self) -> u16 {
    self.0 as u16
  }
}

impl fmt::Display for ResourceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "0x{:08x}", self.0)
  }
}

macro_rules! resource_types {
  ($($variant:ident => $name:literal),+ $(,)?) => {
    /// Kinds of resources a table type can hold.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[allow(missing_docs)]
    pub enum ResourceType {
      $($variant),+
    }

    impl ResourceType {
      /// Name of the type as it appears in resource paths and references.
      pub fn as_str(self) -> &'static str {
        match self {
          $(Self::$variant => $name),+
        }
      }
    }

    impl FromStr for ResourceType {
      type Err = ObfuscationError;

      fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
          $($name => Ok(Self::$variant),)+
          other => Err(ObfuscationError::InvalidResourceName(format!(
            "unknown resource type '{other}'"
          ))),
        }
      }
    }
  };
}

resource_types! {
  Anim => "anim",
  Animator => "animator",
  Array => "array",
  Attr => "attr",
  Bool => "bool",
  Color => "color",
  Dimen => "dimen",
  Drawable => "drawable",
  Font => "font",
  Fraction => "fraction",
  Id => "id",
  Integer => "integer",
  Interpolator => "interpolator",
  Layout => "layout",
  Macro => "macro",
  Menu => "menu",
  Mipmap => "mipmap",
  Navigation => "navigation",
  Plurals => "plurals",
  Raw => "raw",
  String => "string",
  Style => "style",
  Styleable => "styleable",
  Transition => "transition",
  Xml => "xml",
}

impl fmt::Display for ResourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for ResourceType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for ResourceType {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

/// Composite `type/entry` key used for exemptions and the id-to-name record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceName {
  /// Type the entry belongs to.
  pub resource_type: ResourceType,
  /// Entry name within the type.
  pub entry: String,
}

impl ResourceName {
  /// Build a name from its parts.
  pub fn new(resource_type: ResourceType, entry: impl Into<String>) -> Self {
    Self {
      resource_type,
      entry: entry.into(),
    }
  }
}

impl fmt::Display for ResourceName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.resource_type, self.entry)
  }
}

impl FromStr for ResourceName {
  type Err = ObfuscationError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    let value = value.trim();
    let (type_name, entry) = value.split_once('/').ok_or_else(|| {
      ObfuscationError::InvalidResourceName(format!("'{value}' is not of the form type/name"))
    })?;
    if entry.is_empty() {
      return Err(ObfuscationError::InvalidResourceName(format!(
        "'{value}' has an empty entry name"
      )));
    }
    Ok(Self::new(type_name.parse()?, entry))
  }
}

impl Serialize for ResourceName {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ResourceName {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_packed_identifier() {
    let id = ResourceId(0x7f01_0002);
    assert_eq!(id.package_id(), 0x7f);
    assert_eq!(id.type_id(), 0x01);
    assert_eq!(id.entry_id(), 0x0002);
    assert_eq!(id.to_string(), "0x7f010002");
  }

  #[test]
  fn parses_type_slash_entry() {
    let name: ResourceName = "drawable/app_icon".parse().unwrap();
    assert_eq!(name, ResourceName::new(ResourceType::Drawable, "app_icon"));
    assert_eq!(name.to_string(), "drawable/app_icon");
  }

  #[test]
  fn rejects_malformed_names() {
    assert!("app_icon".parse::<ResourceName>().is_err());
    assert!("string/".parse::<ResourceName>().is_err());
    assert!("widget/app_icon".parse::<ResourceName>().is_err());
  }

  #[test]
  fn names_serialize_as_plain_strings() {
    let name = ResourceName::new(ResourceType::String, "title");
    let json = serde_json::to_string(&name).unwrap();
    assert_eq!(json, r#""string/title""#);
    assert_eq!(serde_json::from_str::<ResourceName>(&json).unwrap(), name);
  }
}
