//! Suggestion entry types.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Stable entry identifier.
///
/// Search endpoints return numeric or string ids; both are normalised to a
/// string so that entries from either source compare the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawEntryId", into = "String")]
pub struct EntryId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntryId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawEntryId> for EntryId {
    fn from(raw: RawEntryId) -> Self {
        match raw {
            RawEntryId::Text(s) => Self(s),
            RawEntryId::Number(n) => Self(n.to_string()),
        }
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for EntryId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One candidate result shown in a suggestion surface.
///
/// Entries are immutable once built. A new query replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionEntry {
    /// Unique key within the current result list.
    pub id: EntryId,

    /// Display text.
    #[serde(alias = "name", alias = "title")]
    pub label: String,

    /// Icon identifier (named icon or URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Where a confirmed selection leads: a product slug or a dashboard route.
    #[serde(
        default,
        alias = "slug",
        alias = "targetRoute",
        skip_serializing_if = "Option::is_none"
    )]
    pub target: Option<String>,

    /// Thumbnail URL, passed through to the renderer untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
}

impl SuggestionEntry {
    /// Create a new entry with required fields.
    pub fn new(id: impl Into<EntryId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            target: None,
            image: None,
            price: None,
            sale_price: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_price(mut self, price: f64, sale_price: Option<f64>) -> Self {
        self.price = Some(price);
        self.sale_price = sale_price;
        self
    }

    /// Case-insensitive substring match against the selected fields.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str, fields: MatchFields) -> bool {
        let hit = |haystack: &str| haystack.to_lowercase().contains(needle);

        (fields.contains(MatchFields::ID) && hit(self.id.as_ref()))
            || (fields.contains(MatchFields::LABEL) && hit(&self.label))
            || (fields.contains(MatchFields::TARGET) && self.target.as_deref().is_some_and(hit))
    }
}

bitflags! {
    /// Entry fields considered by local substring filtering.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MatchFields: u8 {
        const ID = 1;
        const LABEL = 1 << 1;
        const TARGET = 1 << 2;
    }
}

impl Default for MatchFields {
    fn default() -> Self {
        MatchFields::ID | MatchFields::LABEL
    }
}

/// A single matchable field, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Id,
    Label,
    Target,
}

impl From<MatchField> for MatchFields {
    fn from(field: MatchField) -> Self {
        match field {
            MatchField::Id => MatchFields::ID,
            MatchField::Label => MatchFields::LABEL,
            MatchField::Target => MatchFields::TARGET,
        }
    }
}

impl FromIterator<MatchField> for MatchFields {
    fn from_iter<I: IntoIterator<Item = MatchField>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MatchFields::empty(), |acc, f| acc | MatchFields::from(f))
    }
}

/// A node of an embedding application's navigation menu.
///
/// Menus are trees; local sources flatten them before filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: EntryId,

    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Route opened on selection. Pure grouping nodes have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_route: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuEntry>,
}

impl MenuEntry {
    pub fn new(
        id: impl Into<EntryId>,
        label: impl Into<String>,
        target_route: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            target_route: Some(target_route.into()),
            children: Vec::new(),
        }
    }

    /// Create a grouping node without a route of its own.
    pub fn group(
        id: impl Into<EntryId>,
        label: impl Into<String>,
        children: Vec<MenuEntry>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            target_route: None,
            children,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Flatten depth-first, parent before children.
    ///
    /// Only routable nodes become entries.
    pub fn flatten(&self, out: &mut Vec<SuggestionEntry>) {
        if let Some(route) = &self.target_route {
            out.push(SuggestionEntry {
                id: self.id.clone(),
                label: self.label.clone(),
                icon: self.icon.clone(),
                target: Some(route.clone()),
                image: None,
                price: None,
                sale_price: None,
            });
        }
        for child in &self.children {
            child.flatten(out);
        }
    }
}
