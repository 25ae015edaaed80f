//! Tests for the adapter filtering module.

use super::filter::*;
use super::{AdapterRecord, AdapterSource};
use crate::command::CommandError;

// ============================================================================
// Test Fixtures
// ============================================================================

fn adapter(name: &str) -> AdapterRecord {
    AdapterRecord {
        name: name.into(),
        ..AdapterRecord::default()
    }
}

struct FixedSource(Vec<AdapterRecord>);

impl AdapterSource for FixedSource {
    fn discover(&self) -> Result<Vec<AdapterRecord>, CommandError> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

impl AdapterSource for FailingSource {
    fn discover(&self) -> Result<Vec<AdapterRecord>, CommandError> {
        Err(CommandError::NoUsableOutput {
            program: "netsh".into(),
        })
    }
}

// ============================================================================
// NameRegexFilter
// ============================================================================

mod name_regex_filter {
    use super::*;

    #[test]
    fn matches_by_pattern() {
        let filter = NameRegexFilter::new("^Eth").unwrap();

        assert!(filter.matches(&adapter("Ethernet")));
        assert!(!filter.matches(&adapter("Wi-Fi")));
    }

    #[test]
    fn invalid_pattern_is_error() {
        assert!(NameRegexFilter::new("[unclosed").is_err());
    }

    #[test]
    fn pattern_is_exposed() {
        let filter = NameRegexFilter::new("^vEthernet").unwrap();
        assert_eq!(filter.pattern().as_str(), "^vEthernet");
    }
}

// ============================================================================
// LoopbackFilter
// ============================================================================

mod loopback_filter {
    use super::*;

    #[test]
    fn matches_loopback_only() {
        assert!(LoopbackFilter.matches(&adapter("Loopback Pseudo-Interface 1")));
        assert!(LoopbackFilter.matches(&adapter("loopback")));
        assert!(!LoopbackFilter.matches(&adapter("Ethernet")));
    }
}

// ============================================================================
// FilterChain
// ============================================================================

mod filter_chain {
    use super::*;

    #[test]
    fn empty_chain_matches_all() {
        let chain = FilterChain::new();

        assert!(chain.is_empty());
        assert!(chain.matches(&adapter("anything")));
    }

    #[test]
    fn excludes_win_over_includes() {
        let chain = FilterChain::new()
            .include(NameRegexFilter::new("Ethernet").unwrap())
            .exclude(NameRegexFilter::new("^vEthernet").unwrap());

        assert!(chain.matches(&adapter("Ethernet")));
        assert!(!chain.matches(&adapter("vEthernet (WSL)")));
    }

    #[test]
    fn includes_are_or() {
        let chain = FilterChain::new()
            .include(NameRegexFilter::new("^Ethernet").unwrap())
            .include(NameRegexFilter::new("^Wi-Fi").unwrap());

        assert!(chain.matches(&adapter("Ethernet")));
        assert!(chain.matches(&adapter("Wi-Fi")));
        assert!(!chain.matches(&adapter("Bluetooth")));
    }

    #[test]
    fn counts_filters() {
        let chain = FilterChain::new()
            .include(NameRegexFilter::new("a").unwrap())
            .exclude(LoopbackFilter)
            .exclude(NameRegexFilter::new("b").unwrap());

        assert_eq!(chain.include_count(), 1);
        assert_eq!(chain.exclude_count(), 2);
        assert!(!chain.is_empty());
    }

    #[test]
    fn debug_shows_counts() {
        let chain = FilterChain::new().exclude(LoopbackFilter);
        let debug = format!("{chain:?}");

        assert!(debug.contains("exclude_count: 1"));
    }
}

// ============================================================================
// FilteredSource
// ============================================================================

mod filtered_source {
    use super::*;

    #[test]
    fn drops_non_matching_adapters() {
        let source = FilteredSource::new(
            FixedSource(vec![
                adapter("Ethernet"),
                adapter("Loopback Pseudo-Interface 1"),
                adapter("Wi-Fi"),
            ]),
            FilterChain::new().exclude(LoopbackFilter),
        );

        let names: Vec<_> = source.discover().unwrap().into_iter().map(|a| a.name).collect();

        assert_eq!(names, vec!["Ethernet", "Wi-Fi"]);
    }

    #[test]
    fn propagates_source_errors() {
        let source = FilteredSource::new(FailingSource, FilterChain::new());

        assert!(matches!(
            source.discover(),
            Err(CommandError::NoUsableOutput { .. })
        ));
    }

    #[test]
    fn exposes_filter() {
        let source = FilteredSource::new(FixedSource(vec![]), LoopbackFilter);

        assert!(source.filter().matches(&adapter("loopback")));
    }
}
