//! Function filtering for `--only` lists
//!
//! Restricts a tally to a named set of functions, e.g. `--only eval,join`.

use std::collections::HashSet;

/// Filter that determines which function names are counted
#[derive(Debug, Clone)]
pub struct FunctionFilter {
    /// Set of function names to include (None = all functions)
    include: Option<HashSet<String>>,
}

impl FunctionFilter {
    /// Create a filter that includes all functions
    pub fn all() -> Self {
        Self { include: None }
    }

    /// Parse a comma-separated list like "eval,join,widen"
    ///
    /// Whitespace around names is trimmed and empty entries are skipped.
    pub fn from_list(list: &str) -> Self {
        let names = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            include: Some(names),
        }
    }

    /// Check if a function should be counted
    pub fn should_count(&self, function_name: &str) -> bool {
        match &self.include {
            None => true,
            Some(set) => set.contains(function_name),
        }
    }
}

impl Default for FunctionFilter {
    fn default() -> Self {
        Self::all()
    }
}
