//! Tests for the listing parser.

use super::ListedAdapter;
use super::listing::*;

// ============================================================================
// Test Fixtures
// ============================================================================

const SINGLE_BLOCK: &str = "\
Ethernet:
----------------------------------------
    DHCP enabled:                        Yes
    IP Address:                          169.254.1.5
    Subnet Mask:                         255.255.0.0
";

const TWO_BLOCKS: &str = "\
Ethernet:
    DHCP enabled:                        No
    IP Address:                          192.168.1.10
    Subnet Mask:                         255.255.255.0
    Default Gateway:                     192.168.1.1
    Gateway Metric:                      0
    Statically Configured DNS Servers:   192.168.1.1
                                         8.8.8.8

Wi-Fi:
    DHCP enabled:                        Yes
    IP Address:                          10.0.0.7
    Subnet Mask:                         255.0.0.0
    DNS servers configured through DHCP: None
";

const NATIVE: &str = "\r
Configuration for interface \"Ethernet 2\"\r
    DHCP enabled:                         Yes\r
    IP Address:                           192.168.50.23\r
    Subnet Prefix:                        192.168.50.0/24 (mask 255.255.255.0)\r
    Default Gateway:                      192.168.50.1\r
    DNS servers configured through DHCP:  192.168.50.1\r
\r
Configuration for interface \"Loopback Pseudo-Interface 1\"\r
    DHCP enabled:                         No\r
    IP Address:                           127.0.0.1\r
";

fn colon_parser() -> ListingParser<ColonBlockClassifier> {
    ListingParser::new(ColonBlockClassifier)
}

// ============================================================================
// ColonBlockClassifier
// ============================================================================

mod colon_classifier {
    use super::*;

    #[test]
    fn unindented_colon_line_starts_block() {
        assert_eq!(
            ColonBlockClassifier.classify("Ethernet 2:"),
            LineKind::BlockStart("Ethernet 2")
        );
    }

    #[test]
    fn trailing_whitespace_after_colon_is_allowed() {
        assert_eq!(
            ColonBlockClassifier.classify("Wi-Fi:  "),
            LineKind::BlockStart("Wi-Fi")
        );
    }

    #[test]
    fn unindented_line_without_trailing_colon_is_ignored() {
        assert_eq!(
            ColonBlockClassifier.classify("Ethernet: extra"),
            LineKind::Ignored
        );
        assert_eq!(ColonBlockClassifier.classify("-----"), LineKind::Ignored);
    }

    #[test]
    fn bare_colon_is_ignored() {
        assert_eq!(ColonBlockClassifier.classify(":"), LineKind::Ignored);
    }

    #[test]
    fn indented_key_value_is_field() {
        assert_eq!(
            ColonBlockClassifier.classify("\tIP Address: 10.0.0.1"),
            LineKind::Field {
                key: "IP Address",
                value: " 10.0.0.1"
            }
        );
    }

    #[test]
    fn indented_line_without_colon_is_ignored() {
        assert_eq!(
            ColonBlockClassifier.classify("                 8.8.8.8"),
            LineKind::Ignored
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(ColonBlockClassifier.classify(""), LineKind::Ignored);
        assert_eq!(ColonBlockClassifier.classify("   "), LineKind::Ignored);
    }
}

// ============================================================================
// NetshClassifier
// ============================================================================

mod netsh_classifier {
    use super::*;

    #[test]
    fn native_header_starts_block() {
        assert_eq!(
            NetshClassifier.classify("Configuration for interface \"Ethernet\"  "),
            LineKind::BlockStart("Ethernet")
        );
    }

    #[test]
    fn empty_quoted_name_is_ignored() {
        assert_eq!(
            NetshClassifier.classify("Configuration for interface \"\""),
            LineKind::Ignored
        );
    }

    #[test]
    fn indented_header_text_is_not_a_header() {
        assert_eq!(
            NetshClassifier.classify("  Configuration for interface \"Ethernet\""),
            LineKind::Ignored
        );
    }

    #[test]
    fn falls_back_to_colon_grammar() {
        assert_eq!(
            NetshClassifier.classify("Ethernet:"),
            LineKind::BlockStart("Ethernet")
        );
        assert_eq!(
            NetshClassifier.classify("    Subnet Mask: 255.0.0.0"),
            LineKind::Field {
                key: "Subnet Mask",
                value: " 255.0.0.0"
            }
        );
    }
}

// ============================================================================
// ListingParser
// ============================================================================

mod parser {
    use super::*;

    #[test]
    fn parses_single_autoconfig_block() {
        let adapters = colon_parser().parse(SINGLE_BLOCK);

        assert_eq!(
            adapters,
            vec![ListedAdapter {
                name: "Ethernet".into(),
                is_dhcp: true,
                ip: "169.254.1.5".into(),
                subnet_mask: "255.255.0.0".into(),
                gateway: String::new(),
                dns: String::new(),
            }]
        );
    }

    #[test]
    fn keeps_block_order() {
        let names: Vec<_> = colon_parser()
            .parse(TWO_BLOCKS)
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(names, vec!["Ethernet", "Wi-Fi"]);
    }

    #[test]
    fn parses_static_block_fields() {
        let adapters = colon_parser().parse(TWO_BLOCKS);
        let ethernet = &adapters[0];

        assert!(!ethernet.is_dhcp);
        assert_eq!(ethernet.ip, "192.168.1.10");
        assert_eq!(ethernet.subnet_mask, "255.255.255.0");
        assert_eq!(ethernet.gateway, "192.168.1.1");
        assert_eq!(ethernet.dns, "192.168.1.1");
    }

    #[test]
    fn gateway_metric_is_not_gateway() {
        let adapters = colon_parser().parse(TWO_BLOCKS);
        assert_eq!(adapters[0].gateway, "192.168.1.1");
    }

    #[test]
    fn none_dns_becomes_empty() {
        let adapters = colon_parser().parse(TWO_BLOCKS);
        let wifi = &adapters[1];

        assert!(wifi.is_dhcp);
        assert_eq!(wifi.dns, "");
        assert_eq!(wifi.gateway, "");
    }

    #[test]
    fn fields_before_first_block_are_dropped() {
        let listing = "    IP Address: 1.2.3.4\nEthernet:\n    Subnet Mask: 255.0.0.0\n";
        let adapters = colon_parser().parse(listing);

        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].ip, "");
        assert_eq!(adapters[0].subnet_mask, "255.0.0.0");
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let listing = "Ethernet:\n    Interface Metric: 25\n    Brand New Field: x:y\n";
        let adapters = colon_parser().parse(listing);

        assert_eq!(adapters, vec![ListedAdapter::named("Ethernet")]);
    }

    #[test]
    fn value_is_first_colon_segment() {
        let listing = "Ethernet:\n    Default Gateway: 10.0.0.1 : extra\n";
        let adapters = colon_parser().parse(listing);

        assert_eq!(adapters[0].gateway, "10.0.0.1");
    }

    #[test]
    fn header_without_fields_still_yields_record() {
        let adapters = colon_parser().parse("Ethernet:\nWi-Fi:\n");
        assert_eq!(adapters.len(), 2);
        assert!(adapters.iter().all(|a| a.ip.is_empty()));
    }

    #[test]
    fn empty_listing_yields_nothing() {
        assert!(colon_parser().parse("").is_empty());
        assert!(colon_parser().parse("\n\n   \n").is_empty());
    }

    #[test]
    fn colon_dialect_ignores_native_headers() {
        assert!(colon_parser().parse(NATIVE).is_empty());
    }

    #[test]
    fn netsh_dialect_reads_native_listing() {
        let adapters = ListingParser::new(NetshClassifier).parse(NATIVE);

        assert_eq!(adapters.len(), 2);
        assert_eq!(adapters[0].name, "Ethernet 2");
        assert!(adapters[0].is_dhcp);
        assert_eq!(adapters[0].ip, "192.168.50.23");
        assert_eq!(adapters[0].gateway, "192.168.50.1");
        assert_eq!(adapters[0].dns, "192.168.50.1");
        assert_eq!(adapters[1].name, "Loopback Pseudo-Interface 1");
        assert!(!adapters[1].is_dhcp);
    }

    #[test]
    fn custom_labels_read_localized_output() {
        let labels = FieldLabels {
            dhcp_enabled: "DHCP aktiviert".into(),
            yes: "Ja".into(),
            ip_address: "IP-Adresse".into(),
            ..FieldLabels::default()
        };
        let listing = "Ethernet:\n    DHCP aktiviert:   Ja\n    IP-Adresse:   10.1.1.1\n";

        let adapters = ListingParser::with_labels(ColonBlockClassifier, labels).parse(listing);

        assert!(adapters[0].is_dhcp);
        assert_eq!(adapters[0].ip, "10.1.1.1");
    }

    #[test]
    fn dialect_selects_classifier() {
        let parser = ListingParser::new(Dialect::Netsh.classifier());
        assert_eq!(parser.parse(NATIVE).len(), 2);

        let parser = ListingParser::new(Dialect::Colon.classifier());
        assert!(parser.parse(NATIVE).is_empty());
    }
}

mod dialect {
    use super::*;

    #[test]
    fn default_is_colon() {
        assert_eq!(Dialect::default(), Dialect::Colon);
    }

    #[test]
    fn display_names() {
        assert_eq!(Dialect::Colon.to_string(), "colon");
        assert_eq!(Dialect::Netsh.to_string(), "netsh");
    }
}
