//! Span definitions per operation: grow, index build, search.

/// Create a grow span.
#[macro_export]
macro_rules! grow_span {
    ($from:expr, $target:expr) => {
        tracing::info_span!("revlens.grow", from = $from, target = $target)
    };
}

/// Create an index build span.
#[macro_export]
macro_rules! build_span {
    ($kind:expr, $records:expr) => {
        tracing::info_span!("revlens.build", kind = %$kind, records = $records)
    };
}

/// Create a search span.
#[macro_export]
macro_rules! search_span {
    ($mode:expr, $k:expr) => {
        tracing::info_span!("revlens.search", mode = %$mode, k = $k)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const GROW: &str = "revlens.grow";
    pub const BUILD: &str = "revlens.build";
    pub const SEARCH: &str = "revlens.search";
}
