//! Parsing of the tool's block-structured configuration listing.
//!
//! # Design
//!
//! Parsing is split in two layers so other output dialects can be supported
//! by substitution:
//! - **Line classification** ([`LineClassifier`]): decides whether a line starts
//!   a block, carries a `key: value` field, or is ignored.
//! - **Field mapping** ([`FieldLabels`]): maps field keys to [`ListedAdapter`]
//!   fields by case-sensitive substring match.
//!
//! Unknown keys and unparseable lines are skipped so newer tool versions do
//! not break discovery.

use serde::Deserialize;

use super::ListedAdapter;

/// Classification of one listing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Starts a new adapter block with the given name.
    BlockStart(&'a str),
    /// A `key: value` pair belonging to the current block.
    Field {
        /// Text before the first colon, trimmed
        key: &'a str,
        /// Text after the first colon, untrimmed
        value: &'a str,
    },
    /// Anything else (blank lines, separators, continuation lines).
    Ignored,
}

/// Strategy for classifying listing lines.
pub trait LineClassifier: Send + Sync {
    /// Classifies a single line (without its line terminator).
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a>;
}

impl<T: LineClassifier + ?Sized> LineClassifier for &T {
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        (**self).classify(line)
    }
}

impl LineClassifier for Box<dyn LineClassifier> {
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        self.as_ref().classify(line)
    }
}

/// Indentation grammar with bare `Name:` block headers.
///
/// - An unindented line ending in a colon starts a block named by the text before it
/// - An indented line containing a colon is a field
/// - Everything else is ignored
///
/// # Examples
///
/// ```
/// use netcfg::network::listing::{ColonBlockClassifier, LineClassifier, LineKind};
///
/// let c = ColonBlockClassifier;
/// assert_eq!(c.classify("Ethernet:"), LineKind::BlockStart("Ethernet"));
/// assert_eq!(
///     c.classify("    DHCP enabled:   Yes"),
///     LineKind::Field { key: "DHCP enabled", value: "   Yes" },
/// );
/// assert_eq!(c.classify("-------"), LineKind::Ignored);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonBlockClassifier;

impl LineClassifier for ColonBlockClassifier {
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if line.trim().is_empty() {
            return LineKind::Ignored;
        }

        if starts_indented(line) {
            return classify_field(line);
        }

        line.trim_end()
            .strip_suffix(':')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or(LineKind::Ignored, LineKind::BlockStart)
    }
}

/// The tool's native header form, `Configuration for interface "Name"`,
/// in addition to everything [`ColonBlockClassifier`] accepts.
///
/// # Examples
///
/// ```
/// use netcfg::network::listing::{LineClassifier, LineKind, NetshClassifier};
///
/// let c = NetshClassifier;
/// assert_eq!(
///     c.classify(r#"Configuration for interface "Wi-Fi 2""#),
///     LineKind::BlockStart("Wi-Fi 2"),
/// );
/// assert_eq!(c.classify("Ethernet:"), LineKind::BlockStart("Ethernet"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NetshClassifier;

impl NetshClassifier {
    const HEADER_PREFIX: &'static str = "Configuration for interface \"";
}

impl LineClassifier for NetshClassifier {
    fn classify<'a>(&self, line: &'a str) -> LineKind<'a> {
        if !starts_indented(line) {
            if let Some(rest) = line.trim_end().strip_prefix(Self::HEADER_PREFIX) {
                return rest
                    .strip_suffix('"')
                    .filter(|name| !name.is_empty())
                    .map_or(LineKind::Ignored, LineKind::BlockStart);
            }
        }
        ColonBlockClassifier.classify(line)
    }
}

fn starts_indented(line: &str) -> bool {
    line.starts_with(char::is_whitespace)
}

fn classify_field(line: &str) -> LineKind<'_> {
    match line.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => LineKind::Field {
            key: key.trim(),
            value,
        },
        _ => LineKind::Ignored,
    }
}

/// Key labels recognized in field lines.
///
/// Each label is matched as a case-sensitive substring of the field key.
/// Defaults are the English labels of the tool; overrides allow localized
/// output to be read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldLabels {
    /// Key of the DHCP flag field
    pub dhcp_enabled: String,
    /// Marker in the DHCP flag value meaning "on"
    pub yes: String,
    /// Key of the address field
    pub ip_address: String,
    /// Key of the subnet mask field
    pub subnet_mask: String,
    /// Key of the default gateway field
    pub default_gateway: String,
    /// Key of the DNS field in static mode
    pub static_dns: String,
    /// Key of the DNS field in DHCP mode
    pub dhcp_dns: String,
    /// DNS value meaning "no server"
    pub none: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            dhcp_enabled: "DHCP enabled".into(),
            yes: "Yes".into(),
            ip_address: "IP Address".into(),
            subnet_mask: "Subnet Mask".into(),
            default_gateway: "Default Gateway".into(),
            static_dns: "Statically Configured DNS Servers".into(),
            dhcp_dns: "DNS servers configured through DHCP".into(),
            none: "None".into(),
        }
    }
}

impl FieldLabels {
    /// Applies one field to `adapter`; unknown keys leave it unchanged.
    fn apply(&self, adapter: &mut ListedAdapter, key: &str, value: &str) {
        if key.contains(self.dhcp_enabled.as_str()) {
            adapter.is_dhcp = value.contains(self.yes.as_str());
        } else if key.contains(self.ip_address.as_str()) {
            adapter.ip = first_segment(value);
        } else if key.contains(self.subnet_mask.as_str()) {
            adapter.subnet_mask = first_segment(value);
        } else if key.contains(self.default_gateway.as_str()) {
            adapter.gateway = first_segment(value);
        } else if key.contains(self.static_dns.as_str()) || key.contains(self.dhcp_dns.as_str()) {
            let dns = first_segment(value);
            adapter.dns = if dns == self.none { String::new() } else { dns };
        }
    }
}

/// The value up to any further colon, trimmed.
fn first_segment(value: &str) -> String {
    value.split(':').next().unwrap_or_default().trim().to_string()
}

/// Turns a listing into [`ListedAdapter`]s in the order blocks appear.
#[derive(Debug, Clone, Default)]
pub struct ListingParser<C> {
    classifier: C,
    labels: FieldLabels,
}

impl<C: LineClassifier> ListingParser<C> {
    /// Creates a parser with the default English labels.
    #[must_use]
    pub fn new(classifier: C) -> Self {
        Self::with_labels(classifier, FieldLabels::default())
    }

    /// Creates a parser with custom labels.
    #[must_use]
    pub const fn with_labels(classifier: C, labels: FieldLabels) -> Self {
        Self { classifier, labels }
    }

    /// Parses the whole listing.
    ///
    /// Field lines before the first block header are dropped.
    #[must_use]
    pub fn parse(&self, output: &str) -> Vec<ListedAdapter> {
        let mut adapters = Vec::new();
        let mut current: Option<ListedAdapter> = None;

        for line in output.lines() {
            match self.classifier.classify(line) {
                LineKind::BlockStart(name) => {
                    adapters.extend(current.replace(ListedAdapter::named(name)));
                }
                LineKind::Field { key, value } => {
                    if let Some(adapter) = current.as_mut() {
                        self.labels.apply(adapter, key, value);
                    }
                }
                LineKind::Ignored => {}
            }
        }

        adapters.extend(current);
        adapters
    }
}

/// Listing dialect, selecting the line classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Bare `Name:` headers only ([`ColonBlockClassifier`]).
    #[default]
    Colon,
    /// Native `Configuration for interface "Name"` headers as well ([`NetshClassifier`]).
    Netsh,
}

impl Dialect {
    /// Returns the classifier for this dialect.
    #[must_use]
    pub fn classifier(self) -> Box<dyn LineClassifier> {
        match self {
            Self::Colon => Box::new(ColonBlockClassifier),
            Self::Netsh => Box::new(NetshClassifier),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Colon => write!(f, "colon"),
            Self::Netsh => write!(f, "netsh"),
        }
    }
}
