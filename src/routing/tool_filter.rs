use std::collections::{BTreeSet, HashSet};

/// Which tool groups may be registered.
///
/// `All` is what you get when no allow-list is configured at all. It is not
/// the same thing as `Only` with an empty set, which enables nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnabledGroups {
    All,
    Only(BTreeSet<String>),
}

impl EnabledGroups {
    pub fn is_all(&self) -> bool {
        matches!(self, EnabledGroups::All)
    }

    /// Check whether the group key (`group:subgroup`) is enabled.
    pub fn allows(&self, key: &str) -> bool {
        match self {
            EnabledGroups::All => true,
            EnabledGroups::Only(keys) => keys.contains(key),
        }
    }
}

/// Exact tool names that must never be registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledTools(HashSet<String>);

impl DisabledTools {
    pub fn contains(&self, tool_name: &str) -> bool {
        self.0.contains(tool_name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for DisabledTools {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Check if a pattern selects a group key.
/// `tweets` selects `tweets:post`, `tweets:delete` and `tweets:get`;
/// `tweets:get` selects only itself.
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    key == pattern
        || key
            .strip_prefix(pattern)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// Resolve the allow-list against the known group keys.
///
/// An absent or empty value enables every group. Patterns that match no
/// known key are ignored rather than reported.
pub fn resolve_enabled_groups<'a, K>(raw: Option<&str>, known_keys: K) -> EnabledGroups
where
    K: IntoIterator<Item = &'a str>,
{
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return EnabledGroups::All,
    };

    let patterns: Vec<&str> = split_list(raw).collect();
    let matched = known_keys
        .into_iter()
        .filter(|key| patterns.iter().any(|pattern| pattern_matches(pattern, key)))
        .map(str::to_string)
        .collect();

    EnabledGroups::Only(matched)
}

/// Resolve the deny-list. Absent input yields an empty set.
pub fn resolve_disabled_tools(raw: Option<&str>) -> DisabledTools {
    raw.map(|raw| split_list(raw).collect())
        .unwrap_or_default()
}

/// Check if a whole group should be offered for registration.
pub fn should_register_group(key: &str, enabled_groups: &EnabledGroups) -> bool {
    enabled_groups.allows(key)
}
