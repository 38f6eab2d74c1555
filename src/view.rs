//! Filtered projection of the catalog into the rows shown in the table

use crate::catalog::{Catalog, ReportEntry, Scope};
use log::debug;

/// Transient filter state: selected scope plus the search text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub scope: Scope,
    pub search: String,
}

impl ViewFilter {
    pub fn new(scope: Scope, search: impl Into<String>) -> Self {
        Self {
            scope,
            search: search.into(),
        }
    }
}

/// Case-insensitive substring match; an empty needle matches everything
pub fn matches_search(file_name: &str, search: &str) -> bool {
    let needle = search.trim();
    needle.is_empty() || file_name.to_lowercase().contains(&needle.to_lowercase())
}

/// Recomputes the full list of rows for `scope` and `search`.
///
/// Rows come in catalog order, then by file name within a specialty.
pub fn compute_view(catalog: &Catalog, scope: &Scope, search: &str) -> Vec<ReportEntry> {
    let rows: Vec<ReportEntry> = catalog
        .list_files(scope)
        .into_iter()
        .filter(|entry| matches_search(&entry.name, search))
        .collect();
    debug!(
        "View recomputed: scope={} search={:?} rows={}",
        scope.label(),
        search,
        rows.len()
    );
    rows
}

pub fn compute_filtered(catalog: &Catalog, filter: &ViewFilter) -> Vec<ReportEntry> {
    compute_view(catalog, &filter.scope, &filter.search)
}
