//! Argument lists for the `interface ipv4` subcommands of the tool.

use std::fmt;

/// One invocation of the network-configuration tool.
///
/// Every variant renders to `interface ipv4 <subcommand> <key=value>...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetshCommand {
    /// `show config`: lists the configuration of every adapter.
    ShowConfig,

    /// Switches the adapter's address source to DHCP.
    DhcpAddress {
        /// Adapter display name
        name: String,
    },

    /// Switches the adapter's DNS server source to DHCP.
    DhcpDns {
        /// Adapter display name
        name: String,
    },

    /// Sets a static address, mask and optional default gateway.
    StaticAddress {
        /// Adapter display name
        name: String,
        /// IPv4 address
        address: String,
        /// Subnet mask
        mask: String,
        /// Default gateway; omitted from the arguments when `None`
        gateway: Option<String>,
    },

    /// Sets a single static DNS server with tool-side validation disabled.
    StaticDns {
        /// Adapter display name
        name: String,
        /// DNS server address
        server: String,
    },
}

impl NetshCommand {
    /// Builds the argument list passed to the tool.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec!["interface".into(), "ipv4".into()];
        match self {
            Self::ShowConfig => {
                args.extend(["show".into(), "config".into()]);
            }
            Self::DhcpAddress { name } => {
                args.extend(set("address", name));
                args.push("source=dhcp".into());
            }
            Self::DhcpDns { name } => {
                args.extend(set("dnsservers", name));
                args.push("source=dhcp".into());
            }
            Self::StaticAddress {
                name,
                address,
                mask,
                gateway,
            } => {
                args.extend(set("address", name));
                args.push("source=static".into());
                args.push(format!("address={address}"));
                args.push(format!("mask={mask}"));
                if let Some(gateway) = gateway {
                    args.push(format!("gateway={gateway}"));
                }
            }
            Self::StaticDns { name, server } => {
                args.extend(set("dnsservers", name));
                args.push("source=static".into());
                args.push(format!("address={server}"));
                args.push("validate=no".into());
            }
        }
        args
    }
}

fn set(target: &str, name: &str) -> [String; 3] {
    ["set".into(), target.into(), format!("name={name}")]
}

impl fmt::Display for NetshCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_config_args() {
        assert_eq!(
            NetshCommand::ShowConfig.args(),
            ["interface", "ipv4", "show", "config"]
        );
    }

    #[test]
    fn dhcp_address_args() {
        let cmd = NetshCommand::DhcpAddress {
            name: "Ethernet".into(),
        };
        assert_eq!(
            cmd.args(),
            ["interface", "ipv4", "set", "address", "name=Ethernet", "source=dhcp"]
        );
    }

    #[test]
    fn dhcp_dns_args() {
        let cmd = NetshCommand::DhcpDns {
            name: "Wi-Fi".into(),
        };
        assert_eq!(
            cmd.args(),
            ["interface", "ipv4", "set", "dnsservers", "name=Wi-Fi", "source=dhcp"]
        );
    }

    #[test]
    fn static_address_with_gateway() {
        let cmd = NetshCommand::StaticAddress {
            name: "Ethernet".into(),
            address: "10.0.0.5".into(),
            mask: "255.255.255.0".into(),
            gateway: Some("10.0.0.1".into()),
        };
        assert_eq!(
            cmd.args(),
            [
                "interface",
                "ipv4",
                "set",
                "address",
                "name=Ethernet",
                "source=static",
                "address=10.0.0.5",
                "mask=255.255.255.0",
                "gateway=10.0.0.1",
            ]
        );
    }

    #[test]
    fn static_address_without_gateway_omits_argument() {
        let cmd = NetshCommand::StaticAddress {
            name: "Ethernet".into(),
            address: "10.0.0.5".into(),
            mask: "255.255.255.0".into(),
            gateway: None,
        };
        assert!(!cmd.args().iter().any(|a| a.starts_with("gateway=")));
    }

    #[test]
    fn static_dns_disables_validation() {
        let cmd = NetshCommand::StaticDns {
            name: "Ethernet".into(),
            server: "1.1.1.1".into(),
        };
        let args = cmd.args();
        assert_eq!(args.last().map(String::as_str), Some("validate=no"));
        assert!(args.contains(&"address=1.1.1.1".to_string()));
        assert!(args.contains(&"source=static".to_string()));
    }

    #[test]
    fn name_with_spaces_stays_one_argument() {
        let cmd = NetshCommand::DhcpAddress {
            name: "Ethernet 2".into(),
        };
        assert!(cmd.args().contains(&"name=Ethernet 2".to_string()));
    }

    #[test]
    fn display_joins_args() {
        assert_eq!(
            NetshCommand::ShowConfig.to_string(),
            "interface ipv4 show config"
        );
    }
}
