//! Converging one adapter to a desired configuration.
//!
//! # Design
//!
//! Applying is split in two phases:
//! - [`plan`] is pure: it validates the desired settings and decides which
//!   commands to run and whether the store needs writing.
//! - [`Applier::execute`] runs the plan in order and stops at the first
//!   failure. Steps already performed are not rolled back.
//!
//! Validation therefore happens before any command is issued.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::command::{CommandError, CommandRunner, NetshCommand};
use crate::network::{AdapterRecord, IdentifierResolver, NotFoundError, StoreFields};
use crate::store::{Access, KeyValueStore, StoreError, StoreKey, StoreLayout};

use super::is_valid_ipv4_like;

/// Desired configuration of one adapter, as entered by the user.
///
/// In DHCP mode the address fields are display-only and ignored when planning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdapterSettings {
    /// Use server-assigned addressing and DNS.
    pub is_dhcp: bool,
    /// Static IPv4 address.
    pub ip: String,
    /// Static subnet mask.
    pub subnet_mask: String,
    /// Static default gateway; optional.
    pub gateway: String,
    /// Static DNS server; optional.
    pub dns: String,
    /// Adapter-level DNS suffix.
    pub dns_suffix: String,
    /// Register the adapter's address in DNS.
    pub register_in_dns: bool,
}

/// Which required address field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    /// The static IPv4 address.
    Address,
    /// The subnet mask.
    Mask,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => write!(f, "IP address"),
            Self::Mask => write!(f, "subnet mask"),
        }
    }
}

/// A user-supplied static address or mask is not well-formed IPv4.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field is not four dot-separated groups in 0..=255.
    #[error("Invalid {field} '{value}': expected dotted-decimal IPv4 such as 192.168.1.10")]
    InvalidAddress {
        /// Field that failed
        field: AddressField,
        /// Rejected value
        value: String,
    },
}

/// One command-level step of an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStep {
    /// Switch the address source to DHCP.
    DhcpAddress,
    /// Switch the DNS server source to DHCP.
    DhcpDns,
    /// Set the static address, mask and gateway.
    StaticAddress,
    /// Set the static DNS server.
    StaticDns,
}

impl fmt::Display for ApplyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DhcpAddress => write!(f, "switch address source to DHCP"),
            Self::DhcpDns => write!(f, "switch DNS source to DHCP"),
            Self::StaticAddress => write!(f, "set static address"),
            Self::StaticDns => write!(f, "set static DNS server"),
        }
    }
}

/// Error type for applying settings.
///
/// The first failing step aborts the rest; earlier steps stay applied.
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A command step failed.
    #[error("Failed to {step} for '{name}': {source}")]
    Command {
        /// Adapter display name
        name: String,
        /// Step that failed
        step: ApplyStep,
        /// Underlying command failure
        #[source]
        source: CommandError,
    },

    /// The desired settings were rejected before anything ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The adapter's store entry could not be located.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The adapter's store entry could not be opened or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The actions needed to converge one adapter, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPlan {
    name: String,
    commands: Vec<(ApplyStep, NetshCommand)>,
    store_update: Option<StoreFields>,
}

impl ApplyPlan {
    /// Returns the adapter display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the command steps, in order.
    #[must_use]
    pub fn commands(&self) -> &[(ApplyStep, NetshCommand)] {
        &self.commands
    }

    /// Returns the values to write to the store, if they changed.
    #[must_use]
    pub const fn store_update(&self) -> Option<&StoreFields> {
        self.store_update.as_ref()
    }
}

impl fmt::Display for ApplyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plan for '{}':", self.name)?;
        for (step, command) in &self.commands {
            write!(f, "\n  {step}: {command}")?;
        }
        if let Some(fields) = &self.store_update {
            write!(
                f,
                "\n  write store: {}='{}' {}={}",
                StoreLayout::DOMAIN,
                fields.dns_suffix,
                StoreLayout::REGISTER_ADAPTER_NAME,
                u32::from(fields.register_in_dns)
            )?;
        }
        Ok(())
    }
}

/// Plans the changes that bring `original` to `desired`.
///
/// # Rules
///
/// - DHCP: switch the address source, then the DNS source
/// - Static: the address and mask must be valid; the gateway is passed only
///   when non-empty and valid; the DNS server is set only when non-empty
///   and valid
/// - In either mode the store is written only when the suffix or the
///   registration flag differ from `original`
///
/// # Errors
///
/// Returns [`ValidationError`] if, in static mode, the address or the mask
/// is invalid (the address is checked first).
pub fn plan(original: &AdapterRecord, desired: &AdapterSettings) -> Result<ApplyPlan, ValidationError> {
    let name = original.name.clone();
    let commands = if desired.is_dhcp {
        vec![
            (ApplyStep::DhcpAddress, NetshCommand::DhcpAddress { name: name.clone() }),
            (ApplyStep::DhcpDns, NetshCommand::DhcpDns { name: name.clone() }),
        ]
    } else {
        static_commands(&name, desired)?
    };

    let store_update = (desired.dns_suffix != original.dns_suffix
        || desired.register_in_dns != original.register_in_dns)
        .then(|| StoreFields {
            dns_suffix: desired.dns_suffix.clone(),
            register_in_dns: desired.register_in_dns,
        });

    Ok(ApplyPlan {
        name,
        commands,
        store_update,
    })
}

fn static_commands(
    name: &str,
    desired: &AdapterSettings,
) -> Result<Vec<(ApplyStep, NetshCommand)>, ValidationError> {
    require_valid(AddressField::Address, &desired.ip)?;
    require_valid(AddressField::Mask, &desired.subnet_mask)?;

    let gateway = optional_address(&desired.gateway);
    if gateway.is_none() && !desired.gateway.is_empty() {
        tracing::debug!("Omitting invalid gateway '{}' for '{name}'", desired.gateway);
    }

    let mut commands = vec![(
        ApplyStep::StaticAddress,
        NetshCommand::StaticAddress {
            name: name.to_string(),
            address: desired.ip.clone(),
            mask: desired.subnet_mask.clone(),
            gateway,
        },
    )];

    if let Some(server) = optional_address(&desired.dns) {
        commands.push((
            ApplyStep::StaticDns,
            NetshCommand::StaticDns {
                name: name.to_string(),
                server,
            },
        ));
    }

    Ok(commands)
}

fn require_valid(field: AddressField, value: &str) -> Result<(), ValidationError> {
    if is_valid_ipv4_like(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        })
    }
}

fn optional_address(value: &str) -> Option<String> {
    (!value.is_empty() && is_valid_ipv4_like(value)).then(|| value.to_string())
}

/// Executes [`ApplyPlan`]s through the tool and the store.
///
/// Store handles are opened for the write sequence only and released on
/// every exit path.
#[derive(Debug)]
pub struct Applier<R, S> {
    runner: R,
    store: S,
    layout: StoreLayout,
}

impl<R, S> Applier<R, S>
where
    R: CommandRunner,
    S: KeyValueStore,
{
    /// Creates an applier over the given tool and store.
    #[must_use]
    pub const fn new(runner: R, store: S, layout: StoreLayout) -> Self {
        Self {
            runner,
            store,
            layout,
        }
    }

    /// Plans and executes the changes that bring `original` to `desired`.
    ///
    /// # Errors
    ///
    /// Returns the first failure; see [`plan`] and [`Applier::execute`].
    pub fn apply(&self, original: &AdapterRecord, desired: &AdapterSettings) -> Result<(), ApplyError> {
        let plan = plan(original, desired)?;
        self.execute(&plan)
    }

    /// Runs the plan's commands in order, then the store update.
    ///
    /// # Errors
    ///
    /// - [`ApplyError::Command`] naming the failed step
    /// - [`ApplyError::NotFound`] if the store entry cannot be resolved,
    ///   even when every command already succeeded
    /// - [`ApplyError::Store`] if the entry cannot be opened or written
    pub fn execute(&self, plan: &ApplyPlan) -> Result<(), ApplyError> {
        for (step, command) in &plan.commands {
            tracing::debug!("'{}': {step}", plan.name);
            self.runner
                .run(&command.args())
                .map_err(|source| ApplyError::Command {
                    name: plan.name.clone(),
                    step: *step,
                    source,
                })?;
        }

        if let Some(fields) = &plan.store_update {
            self.write_store_fields(&plan.name, fields)?;
        }

        tracing::info!(
            "Applied {} command(s){} to '{}'",
            plan.commands.len(),
            if plan.store_update.is_some() { " and store update" } else { "" },
            plan.name
        );
        Ok(())
    }

    fn write_store_fields(&self, name: &str, fields: &StoreFields) -> Result<(), ApplyError> {
        let id = IdentifierResolver::new(&self.store, &self.layout).resolve(name)?;
        let path = self.layout.adapter_path(id.as_str());
        let mut key = self.store.open(&path, Access::Write)?;

        tracing::debug!("Writing {} = '{}' under '{path}'", StoreLayout::DOMAIN, fields.dns_suffix);
        key.set_string(StoreLayout::DOMAIN, &fields.dns_suffix)?;

        let register = u32::from(fields.register_in_dns);
        tracing::debug!("Writing {} = {register} under '{path}'", StoreLayout::REGISTER_ADAPTER_NAME);
        key.set_u32(StoreLayout::REGISTER_ADAPTER_NAME, register)?;

        Ok(())
    }
}
