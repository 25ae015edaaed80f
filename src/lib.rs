//! netcfg: per-adapter IPv4 configuration
//!
//! A library for reading and changing network adapter configuration
//! (DHCP or static addressing, DNS server, DNS suffix and DNS registration)
//! through the system's network configuration tool and a registry-like
//! key/value store, and opens the hosts file for editing.

pub mod command;
pub mod config;
pub mod hosts;
pub mod network;
pub mod session;
pub mod settings;
pub mod store;
