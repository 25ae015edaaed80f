//! Core adapter types.
//!
//! An [`AdapterRecord`] is assembled from two partitions:
//! - [`ListedAdapter`]: fields parsed from the tool's listing
//! - [`StoreFields`]: fields read from the adapter's store entry

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::AdapterSettings;

/// Address prefix assigned by automatic private addressing when no DHCP server answered.
pub const AUTOCONFIG_PREFIX: &str = "169.254.";

/// Opaque store identifier of an adapter (the name of its store sub-key).
///
/// Resolved on demand; bindings can change between store opens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterId(String);

impl AdapterId {
    /// Wraps a store sub-key name.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the sub-key name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Adapter fields parsed from the configuration listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedAdapter {
    /// Display name (block header).
    pub name: String,
    /// Whether addressing is server-assigned.
    pub is_dhcp: bool,
    /// IPv4 address, empty when absent.
    pub ip: String,
    /// Subnet mask, empty when absent.
    pub subnet_mask: String,
    /// Default gateway, empty when absent.
    pub gateway: String,
    /// DNS server, empty when absent or reported as none.
    pub dns: String,
}

impl ListedAdapter {
    /// Creates a listed adapter with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Adapter fields read from the key/value store.
///
/// The default (empty suffix, no registration) is what discovery reports
/// when the store entry cannot be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFields {
    /// Adapter-level DNS search suffix.
    pub dns_suffix: String,
    /// Whether the adapter registers its address in DNS.
    pub register_in_dns: bool,
}

/// One adapter's IPv4 configuration.
///
/// # Equality
///
/// Two records are equal if every field is equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterRecord {
    /// Display name; unique within a discovery snapshot and never empty.
    pub name: String,
    /// Whether address, gateway and DNS are server-assigned.
    pub is_dhcp: bool,
    /// IPv4 address, empty when absent.
    pub ip: String,
    /// Subnet mask, empty when absent.
    pub subnet_mask: String,
    /// Default gateway, empty when absent.
    pub gateway: String,
    /// DNS server, empty when absent.
    pub dns: String,
    /// Adapter-level DNS suffix; editable in either addressing mode.
    pub dns_suffix: String,
    /// DNS registration flag; editable in either addressing mode.
    pub register_in_dns: bool,
}

impl AdapterRecord {
    /// Merges the listing-sourced and store-sourced partitions into one record.
    #[must_use]
    pub fn merge(listed: ListedAdapter, store: StoreFields) -> Self {
        Self {
            name: listed.name,
            is_dhcp: listed.is_dhcp,
            ip: listed.ip,
            subnet_mask: listed.subnet_mask,
            gateway: listed.gateway,
            dns: listed.dns,
            dns_suffix: store.dns_suffix,
            register_in_dns: store.register_in_dns,
        }
    }

    /// Returns true when DHCP is on but the address is self-assigned,
    /// i.e. no DHCP server answered.
    #[must_use]
    pub fn has_dhcp_failure(&self) -> bool {
        self.is_dhcp && self.ip.starts_with(AUTOCONFIG_PREFIX)
    }

    /// Returns true for the loopback pseudo-interface.
    #[must_use]
    pub fn is_loopback(&self) -> bool {
        self.name.eq_ignore_ascii_case("loopback")
            || self.name.starts_with("Loopback Pseudo-Interface")
    }

    /// Returns the settings currently in effect, as an editor would show them.
    #[must_use]
    pub fn settings(&self) -> AdapterSettings {
        AdapterSettings {
            is_dhcp: self.is_dhcp,
            ip: self.ip.clone(),
            subnet_mask: self.subnet_mask.clone(),
            gateway: self.gateway.clone(),
            dns: self.dns.clone(),
            dns_suffix: self.dns_suffix.clone(),
            register_in_dns: self.register_in_dns,
        }
    }

    /// Returns this record with `settings` reflected, as after a successful apply.
    ///
    /// In DHCP mode the address fields are server-assigned and are not part
    /// of an apply, so the discovered values are kept until the next discovery.
    #[must_use]
    pub fn with_settings(&self, settings: &AdapterSettings) -> Self {
        let mut updated = self.clone();
        updated.is_dhcp = settings.is_dhcp;
        updated.dns_suffix.clone_from(&settings.dns_suffix);
        updated.register_in_dns = settings.register_in_dns;

        if !settings.is_dhcp {
            updated.ip.clone_from(&settings.ip);
            updated.subnet_mask.clone_from(&settings.subnet_mask);
            updated.gateway.clone_from(&settings.gateway);
            updated.dns.clone_from(&settings.dns);
        }

        updated
    }
}

impl fmt::Display for AdapterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.is_dhcp { "dhcp" } else { "static" };
        write!(f, "{} ({mode})", self.name)?;
        for (label, value) in [
            ("ip", &self.ip),
            ("mask", &self.subnet_mask),
            ("gateway", &self.gateway),
            ("dns", &self.dns),
            ("suffix", &self.dns_suffix),
        ] {
            if !value.is_empty() {
                write!(f, " {label}={value}")?;
            }
        }
        write!(f, " register={}", self.register_in_dns)
    }
}
