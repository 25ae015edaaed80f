//! Tests for apply planning and execution.

use crate::command::NetshCommand;
use crate::command::mock::MockRunner;
use crate::network::listing::{ColonBlockClassifier, ListingParser};
use crate::network::{AdapterRecord, AdapterSource, Discovery, NotFoundError, StoreFields};
use crate::store::{MemoryStore, StoreData, StoreError, StoreLayout, StoreValue};

use super::*;

// ============================================================================
// Test Fixtures
// ============================================================================

const ROOT: &str = r"SYSTEM\Tcpip\Interfaces";
const ENTRY: &str = r"SYSTEM\Tcpip\Interfaces\{AAA}";

const LISTING: &str = "\
Ethernet:
    DHCP enabled:                        No
    IP Address:                          192.168.1.10
    Subnet Mask:                         255.255.255.0
    Default Gateway:                     192.168.1.1
    Statically Configured DNS Servers:   192.168.1.1
";

fn layout() -> StoreLayout {
    StoreLayout::new(ROOT)
}

fn store() -> MemoryStore {
    MemoryStore::from_data(
        StoreData::new()
            .with_string(ENTRY, "Name", "Ethernet")
            .with_string(ENTRY, "Domain", "corp.example")
            .with_u32(ENTRY, "RegisterAdapterName", 1),
    )
}

fn original() -> AdapterRecord {
    AdapterRecord {
        name: "Ethernet".into(),
        is_dhcp: false,
        ip: "192.168.1.10".into(),
        subnet_mask: "255.255.255.0".into(),
        gateway: "192.168.1.1".into(),
        dns: "192.168.1.1".into(),
        dns_suffix: "corp.example".into(),
        register_in_dns: true,
    }
}

fn applier<'a>(
    runner: &'a MockRunner,
    store: &'a MemoryStore,
) -> Applier<&'a MockRunner, &'a MemoryStore> {
    Applier::new(runner, store, layout())
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

// ============================================================================
// plan
// ============================================================================

mod planning {
    use super::*;

    #[test]
    fn dhcp_switches_address_then_dns() {
        let mut desired = original().settings();
        desired.is_dhcp = true;

        let plan = plan(&original(), &desired).unwrap();

        let steps: Vec<_> = plan.commands().iter().map(|(step, _)| *step).collect();
        assert_eq!(steps, vec![ApplyStep::DhcpAddress, ApplyStep::DhcpDns]);
        assert!(plan.store_update().is_none());
    }

    #[test]
    fn dhcp_ignores_address_fields() {
        let mut desired = original().settings();
        desired.is_dhcp = true;
        desired.ip = "not an address".into();
        desired.subnet_mask = String::new();

        assert!(plan(&original(), &desired).is_ok());
    }

    #[test]
    fn static_with_all_fields() {
        let plan = plan(&original(), &original().settings()).unwrap();

        assert_eq!(
            plan.commands(),
            &[
                (
                    ApplyStep::StaticAddress,
                    NetshCommand::StaticAddress {
                        name: "Ethernet".into(),
                        address: "192.168.1.10".into(),
                        mask: "255.255.255.0".into(),
                        gateway: Some("192.168.1.1".into()),
                    },
                ),
                (
                    ApplyStep::StaticDns,
                    NetshCommand::StaticDns {
                        name: "Ethernet".into(),
                        server: "192.168.1.1".into(),
                    },
                ),
            ]
        );
    }

    #[test]
    fn invalid_address_is_rejected_first() {
        let mut desired = original().settings();
        desired.ip = "256.1.1.1".into();
        desired.subnet_mask = "bad".into();

        assert_eq!(
            plan(&original(), &desired),
            Err(ValidationError::InvalidAddress {
                field: AddressField::Address,
                value: "256.1.1.1".into(),
            })
        );
    }

    #[test]
    fn invalid_mask_is_rejected() {
        let mut desired = original().settings();
        desired.subnet_mask = "255.255.0".into();

        assert!(matches!(
            plan(&original(), &desired),
            Err(ValidationError::InvalidAddress { field: AddressField::Mask, .. })
        ));
    }

    #[test]
    fn empty_address_is_rejected() {
        let mut desired = original().settings();
        desired.ip = String::new();

        assert!(plan(&original(), &desired).is_err());
    }

    #[test]
    fn invalid_gateway_is_omitted() {
        let mut desired = original().settings();
        desired.gateway = "192.168.1".into();

        let plan = plan(&original(), &desired).unwrap();

        assert!(matches!(
            &plan.commands()[0].1,
            NetshCommand::StaticAddress { gateway: None, .. }
        ));
    }

    #[test]
    fn empty_or_invalid_dns_skips_dns_step() {
        for dns in ["", "dns.example"] {
            let mut desired = original().settings();
            desired.dns = dns.into();

            let plan = plan(&original(), &desired).unwrap();

            assert_eq!(plan.commands().len(), 1, "dns = {dns:?}");
        }
    }

    #[test]
    fn store_update_only_when_changed() {
        let unchanged = plan(&original(), &original().settings()).unwrap();
        assert!(unchanged.store_update().is_none());

        let mut desired = original().settings();
        desired.register_in_dns = false;
        let changed = plan(&original(), &desired).unwrap();

        assert_eq!(
            changed.store_update(),
            Some(&StoreFields {
                dns_suffix: "corp.example".into(),
                register_in_dns: false,
            })
        );
    }

    #[test]
    fn display_lists_every_action() {
        let mut desired = original().settings();
        desired.is_dhcp = true;
        desired.dns_suffix = "home.lan".into();

        let text = plan(&original(), &desired).unwrap().to_string();

        assert!(text.starts_with("Plan for 'Ethernet':"));
        assert!(text.contains("switch address source to DHCP"));
        assert!(text.contains("switch DNS source to DHCP"));
        assert!(text.contains("Domain='home.lan' RegisterAdapterName=1"));
    }
}

// ============================================================================
// Applier
// ============================================================================

mod execution {
    use super::*;

    #[test]
    fn invalid_address_issues_no_commands() {
        let runner = MockRunner::new();
        let store = store();
        let mut desired = original().settings();
        desired.ip = "1.2.3".into();
        desired.dns_suffix = "changed".into();

        let result = applier(&runner, &store).apply(&original(), &desired);

        assert!(matches!(result, Err(ApplyError::Validation(_))));
        assert!(runner.calls().is_empty());
        assert_eq!(store.open_count(), 0);
    }

    #[test]
    fn dhcp_issues_two_commands_in_order() {
        let runner = MockRunner::new();
        let store = store();
        let mut desired = original().settings();
        desired.is_dhcp = true;

        applier(&runner, &store).apply(&original(), &desired).unwrap();

        assert_eq!(
            runner.calls(),
            vec![
                args(&["interface", "ipv4", "set", "address", "name=Ethernet", "source=dhcp"]),
                args(&["interface", "ipv4", "set", "dnsservers", "name=Ethernet", "source=dhcp"]),
            ]
        );
    }

    #[test]
    fn static_without_gateway_omits_argument() {
        let runner = MockRunner::new();
        let store = store();
        let mut desired = original().settings();
        desired.gateway = "999.1.1.1".into();
        desired.dns = String::new();

        applier(&runner, &store).apply(&original(), &desired).unwrap();

        assert_eq!(
            runner.calls(),
            vec![args(&[
                "interface",
                "ipv4",
                "set",
                "address",
                "name=Ethernet",
                "source=static",
                "address=192.168.1.10",
                "mask=255.255.255.0",
            ])]
        );
    }

    #[test]
    fn static_dns_disables_validation() {
        let runner = MockRunner::new();
        let store = store();

        applier(&runner, &store)
            .apply(&original(), &original().settings())
            .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains(&"gateway=192.168.1.1".to_string()));
        assert_eq!(
            calls[1],
            args(&[
                "interface",
                "ipv4",
                "set",
                "dnsservers",
                "name=Ethernet",
                "source=static",
                "address=192.168.1.1",
                "validate=no",
            ])
        );
    }

    #[test]
    fn unchanged_suffix_and_register_write_nothing() {
        let runner = MockRunner::new();
        let store = store();
        let mut desired = original().settings();
        desired.is_dhcp = true;

        applier(&runner, &store).apply(&original(), &desired).unwrap();

        assert_eq!(store.write_count(), 0);
        assert_eq!(store.open_count(), 0);
    }

    #[test]
    fn changed_suffix_writes_both_values() {
        let runner = MockRunner::new();
        let store = store();
        let mut desired = original().settings();
        desired.dns_suffix = "home.lan".into();

        applier(&runner, &store).apply(&original(), &desired).unwrap();

        let data = store.snapshot();
        assert_eq!(store.write_count(), 2);
        assert_eq!(
            data.get(ENTRY, "Domain"),
            Some(&StoreValue::String("home.lan".into()))
        );
        assert_eq!(data.get(ENTRY, "RegisterAdapterName"), Some(&StoreValue::U32(1)));
        assert_eq!(store.live_handles(), 0);
    }

    #[test]
    fn changed_register_writes_zero() {
        let runner = MockRunner::new();
        let store = store();
        let mut desired = original().settings();
        desired.register_in_dns = false;

        applier(&runner, &store).apply(&original(), &desired).unwrap();

        assert_eq!(
            store.snapshot().get(ENTRY, "RegisterAdapterName"),
            Some(&StoreValue::U32(0))
        );
    }

    #[test]
    fn store_fields_apply_in_dhcp_mode() {
        let runner = MockRunner::new();
        let store = store();
        let mut desired = original().settings();
        desired.is_dhcp = true;
        desired.dns_suffix = String::new();

        applier(&runner, &store).apply(&original(), &desired).unwrap();

        assert_eq!(runner.calls().len(), 2);
        assert_eq!(
            store.snapshot().get(ENTRY, "Domain"),
            Some(&StoreValue::String(String::new()))
        );
    }

    #[test]
    fn failed_step_is_identified_and_aborts() {
        let runner = MockRunner::new().failing_on("dnsservers");
        let store = store();
        let mut desired = original().settings();
        desired.is_dhcp = true;
        desired.dns_suffix = "home.lan".into();

        let result = applier(&runner, &store).apply(&original(), &desired);

        match result {
            Err(ApplyError::Command { name, step, .. }) => {
                assert_eq!(name, "Ethernet");
                assert_eq!(step, ApplyStep::DhcpDns);
            }
            other => panic!("expected command error, got {other:?}"),
        }
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn first_failure_stops_remaining_commands() {
        let runner = MockRunner::new().failing_on("source=static address=192.168.1.10");
        let store = store();

        let result = applier(&runner, &store).apply(&original(), &original().settings());

        assert!(matches!(
            result,
            Err(ApplyError::Command { step: ApplyStep::StaticAddress, .. })
        ));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn unresolvable_adapter_fails_after_commands() {
        let runner = MockRunner::new();
        let store = store();
        let mut renamed = original();
        renamed.name = "Ethernet 2".into();
        let mut desired = renamed.settings();
        desired.is_dhcp = true;
        desired.dns_suffix = "home.lan".into();

        let result = applier(&runner, &store).apply(&renamed, &desired);

        assert!(matches!(
            result,
            Err(ApplyError::NotFound(NotFoundError::NoMatch { .. }))
        ));
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn write_failure_is_store_error() {
        let runner = MockRunner::new();
        let store = store().failing_writes_to("RegisterAdapterName");
        let mut desired = original().settings();
        desired.dns_suffix = "home.lan".into();

        let result = applier(&runner, &store).apply(&original(), &desired);

        assert!(matches!(
            result,
            Err(ApplyError::Store(StoreError::Write { .. }))
        ));
        // The first write stays applied
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.live_handles(), 0);
    }

    #[test]
    fn error_message_names_step_and_adapter() {
        let runner = MockRunner::new().failing_on("source=dhcp");
        let store = store();
        let mut desired = original().settings();
        desired.is_dhcp = true;

        let err = applier(&runner, &store)
            .apply(&original(), &desired)
            .unwrap_err();

        assert!(
            err.to_string()
                .starts_with("Failed to switch address source to DHCP for 'Ethernet'")
        );
    }
}

// ============================================================================
// Round trip
// ============================================================================

mod round_trip {
    use super::*;

    fn discover(runner: &MockRunner, store: &MemoryStore) -> Vec<AdapterRecord> {
        Discovery::new(runner, store, layout(), ListingParser::new(ColonBlockClassifier))
            .discover()
            .unwrap()
    }

    #[test]
    fn applying_current_values_is_idempotent() {
        let runner = MockRunner::with_listing(LISTING);
        let store = store();

        let before = discover(&runner, &store);
        applier(&runner, &store)
            .apply(&before[0], &before[0].settings())
            .unwrap();
        let after = discover(&runner, &store);

        assert_eq!(before, after);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn rediscovery_reflects_store_changes() {
        let runner = MockRunner::with_listing(LISTING);
        let store = store();

        let before = discover(&runner, &store);
        let mut desired = before[0].settings();
        desired.dns_suffix = "home.lan".into();
        desired.register_in_dns = false;
        applier(&runner, &store).apply(&before[0], &desired).unwrap();
        let after = discover(&runner, &store);

        assert_eq!(after[0], before[0].with_settings(&desired));
    }
}
