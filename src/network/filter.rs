//! Adapter filtering for presentation.
//!
//! # Design
//!
//! - **Pure Matchers**: [`NameRegexFilter`] and [`LoopbackFilter`] only answer
//!   "does this adapter match?" without include/exclude semantics.
//! - **Filter Chain**: [`FilterChain`] combines matchers:
//!   - Exclude filters: AND logic (must pass ALL excludes)
//!   - Include filters: OR logic (pass ANY include, empty = match all)
//! - **Decorator**: [`FilteredSource`] applies filtering transparently
//!   to any [`AdapterSource`] implementation.
//!
//! Filtering decides which adapters are shown; it never affects what
//! discovery reads or what apply writes.

use regex::Regex;

use crate::command::CommandError;

use super::{AdapterRecord, AdapterSource};

/// Trait for filtering adapter records.
pub trait AdapterFilter: Send + Sync {
    /// Returns `true` if the adapter matches.
    fn matches(&self, adapter: &AdapterRecord) -> bool;
}

/// Matches adapters whose name matches a regex.
///
/// # Examples
///
/// ```
/// use netcfg::network::filter::{AdapterFilter, NameRegexFilter};
/// use netcfg::network::AdapterRecord;
///
/// let filter = NameRegexFilter::new(r"^Ethernet").unwrap();
///
/// let eth = AdapterRecord { name: "Ethernet 2".into(), ..AdapterRecord::default() };
/// let wifi = AdapterRecord { name: "Wi-Fi".into(), ..AdapterRecord::default() };
///
/// assert!(filter.matches(&eth));
/// assert!(!filter.matches(&wifi));
/// ```
#[derive(Debug, Clone)]
pub struct NameRegexFilter {
    pattern: Regex,
}

impl NameRegexFilter {
    /// Creates a name filter with the given regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns the regex pattern.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Regex is not a const type
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl AdapterFilter for NameRegexFilter {
    fn matches(&self, adapter: &AdapterRecord) -> bool {
        self.pattern.is_match(&adapter.name)
    }
}

/// Matches the loopback pseudo-interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackFilter;

impl AdapterFilter for LoopbackFilter {
    fn matches(&self, adapter: &AdapterRecord) -> bool {
        adapter.is_loopback()
    }
}

/// Filter chain with include/exclude semantics.
///
/// Evaluation order:
/// 1. **Exclude filters (AND)**: Any match → reject.
/// 2. **Include filters (OR)**: Any match → accept. Empty includes = match all.
///
/// # Examples
///
/// ```
/// use netcfg::network::filter::{AdapterFilter, FilterChain, LoopbackFilter, NameRegexFilter};
/// use netcfg::network::AdapterRecord;
///
/// let chain = FilterChain::new()
///     .exclude(LoopbackFilter)
///     .include(NameRegexFilter::new("^Wi-Fi").unwrap());
///
/// let wifi = AdapterRecord { name: "Wi-Fi".into(), ..AdapterRecord::default() };
/// let eth = AdapterRecord { name: "Ethernet".into(), ..AdapterRecord::default() };
/// let lo = AdapterRecord { name: "Loopback Pseudo-Interface 1".into(), ..AdapterRecord::default() };
///
/// assert!(chain.matches(&wifi));
/// assert!(!chain.matches(&eth));
/// assert!(!chain.matches(&lo));
/// ```
#[derive(Default)]
pub struct FilterChain {
    includes: Vec<Box<dyn AdapterFilter>>,
    excludes: Vec<Box<dyn AdapterFilter>>,
}

impl FilterChain {
    /// Creates an empty filter chain (matches all adapters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include filter (OR semantics).
    #[must_use]
    pub fn include<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.includes.push(Box::new(filter));
        self
    }

    /// Adds an exclude filter (AND semantics - must not match ANY).
    #[must_use]
    pub fn exclude<F: AdapterFilter + 'static>(mut self, filter: F) -> Self {
        self.excludes.push(Box::new(filter));
        self
    }

    /// Returns the number of include filters.
    #[must_use]
    pub fn include_count(&self) -> usize {
        self.includes.len()
    }

    /// Returns the number of exclude filters.
    #[must_use]
    pub fn exclude_count(&self) -> usize {
        self.excludes.len()
    }

    /// Returns true if no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}

impl AdapterFilter for FilterChain {
    fn matches(&self, adapter: &AdapterRecord) -> bool {
        if self.excludes.iter().any(|f| f.matches(adapter)) {
            return false;
        }

        self.includes.is_empty() || self.includes.iter().any(|f| f.matches(adapter))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("include_count", &self.includes.len())
            .field("exclude_count", &self.excludes.len())
            .finish()
    }
}

/// An adapter source decorator that applies a filter to results.
///
/// # Type Parameters
///
/// - `D`: The inner source type (implements [`AdapterSource`])
/// - `A`: The filter type (implements [`AdapterFilter`])
#[derive(Debug)]
pub struct FilteredSource<D, A> {
    inner: D,
    filter: A,
}

impl<D, A> FilteredSource<D, A> {
    /// Creates a new filtered source.
    #[must_use]
    pub const fn new(inner: D, filter: A) -> Self {
        Self { inner, filter }
    }

    /// Returns a reference to the filter.
    pub const fn filter(&self) -> &A {
        &self.filter
    }
}

impl<D: AdapterSource, A: AdapterFilter> AdapterSource for FilteredSource<D, A> {
    fn discover(&self) -> Result<Vec<AdapterRecord>, CommandError> {
        Ok(self
            .inner
            .discover()?
            .into_iter()
            .filter(|adapter| self.filter.matches(adapter))
            .collect())
    }
}

impl<T: AdapterFilter + ?Sized> AdapterFilter for &T {
    fn matches(&self, adapter: &AdapterRecord) -> bool {
        (*self).matches(adapter)
    }
}

impl AdapterFilter for Box<dyn AdapterFilter> {
    fn matches(&self, adapter: &AdapterRecord) -> bool {
        self.as_ref().matches(adapter)
    }
}
