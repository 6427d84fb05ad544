//! Attribute filtering for rendered node tables.

use std::collections::BTreeSet;

/// Fields hidden from rendering unless explicitly requested.
pub const DEFAULT_HIDDEN_FIELDS: [&str; 2] = ["generation", "resource_provider_generation"];

/// Fields removed from provider records once the tree is linked.
pub const DEFAULT_DROP_FIELDS: [&str; 3] = ["links", "parent_provider_uuid", "root_provider_uuid"];

/// Decides whether an attribute named `name` is rendered.
pub trait FieldFilter {
    fn accepts(&self, name: &str) -> bool;
}

impl<F> FieldFilter for F
where
    F: Fn(&str) -> bool,
{
    fn accepts(&self, name: &str) -> bool {
        self(name)
    }
}

/// Accept everything except `excluded`, then defer to `inner`.
pub struct Excluding<'a> {
    excluded: &'a str,
    inner: &'a dyn FieldFilter,
}

impl<'a> Excluding<'a> {
    pub fn new(excluded: &'a str, inner: &'a dyn FieldFilter) -> Self {
        Self { excluded, inner }
    }
}

impl FieldFilter for Excluding<'_> {
    fn accepts(&self, name: &str) -> bool {
        name != self.excluded && self.inner.accepts(name)
    }
}

/// Allow-list or deny-list of field names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// Show every field.
    All,
    /// Show only these fields.
    Only(BTreeSet<String>),
    /// Show every field except these.
    Except(BTreeSet<String>),
}

impl Default for FieldSelection {
    fn default() -> Self {
        FieldSelection::Except(DEFAULT_HIDDEN_FIELDS.iter().map(|s| s.to_string()).collect())
    }
}

impl FieldSelection {
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSelection::Only(fields.into_iter().map(Into::into).collect())
    }

    pub fn except<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldSelection::Except(fields.into_iter().map(Into::into).collect())
    }

    /// Parse a comma separated allow-list; `None` or blank yields the default.
    pub fn from_csv(fields: Option<&str>) -> Self {
        let Some(fields) = fields else {
            return Self::default();
        };
        let names: BTreeSet<String> = fields
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            Self::default()
        } else {
            FieldSelection::Only(names)
        }
    }
}

impl FieldFilter for FieldSelection {
    fn accepts(&self, name: &str) -> bool {
        match self {
            FieldSelection::All => true,
            FieldSelection::Only(fields) => fields.contains(name),
            FieldSelection::Except(fields) => !fields.contains(name),
        }
    }
}
