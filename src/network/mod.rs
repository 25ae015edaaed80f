//! Adapter model and interface discovery.
//!
//! This module provides types and traits for:
//! - Representing adapter configuration ([`AdapterRecord`])
//! - Parsing the tool's listing ([`listing`])
//! - Resolving store identifiers ([`IdentifierResolver`])
//! - Discovering adapters ([`Discovery`], [`AdapterSource`])
//! - Filtering what is shown ([`filter`])

mod adapter;
mod discovery;
pub mod filter;
pub mod listing;
mod resolver;

#[cfg(test)]
mod filter_tests;
#[cfg(test)]
mod listing_tests;

pub use adapter::{
    AUTOCONFIG_PREFIX, AdapterId, AdapterRecord, ListedAdapter, StoreFields,
};
pub use discovery::{AdapterSource, Discovery, EnrichError};
pub use resolver::{IdentifierResolver, NotFoundError};
