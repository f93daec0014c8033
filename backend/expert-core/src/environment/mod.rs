//! Runtime capability checks that gate dispatch.
//!
//! `missing` means the capability is absent entirely (setup remediation),
//! `faulted` means it is present but its probe failed (configuration
//! remediation). Checks are re-run on every call.

pub mod probes;

pub use probes::{CredentialLookupProbe, ModelClientProbe};

use crate::config::GatewayConfig;

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use serde::Serialize;

pub const MODEL_CLIENT_CAPABILITY: &str = "model-client";
pub const CREDENTIAL_LOOKUP_CAPABILITY: &str = "credential-lookup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityState {
    Available,
    Missing,
    Faulted,
}

impl fmt::Display for CapabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityState::Available => write!(f, "available"),
            CapabilityState::Missing => write!(f, "missing"),
            CapabilityState::Faulted => write!(f, "faulted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityStatus {
    pub name: String,
    pub state: CapabilityState,
    /// Diagnostic text, set whenever the state is not `Available`.
    pub detail: Option<String>,
}

impl CapabilityStatus {
    pub fn is_available(&self) -> bool {
        self.state == CapabilityState::Available
    }
}

/// What a single probe observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Available,
    Missing(String),
    Faulted(String),
}

/// A side-effect-free check for one capability.
pub trait CapabilityProbe: Send + Sync {
    fn name(&self) -> &'static str;

    fn probe(&self) -> ProbeOutcome;
}

/// Capability statuses from one `check()`, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSnapshot {
    statuses: Vec<CapabilityStatus>,
}

impl EnvironmentSnapshot {
    pub fn new(statuses: Vec<CapabilityStatus>) -> Self {
        Self { statuses }
    }

    pub fn get(&self, name: &str) -> Option<&CapabilityStatus> {
        self.statuses.iter().find(|status| status.name == name)
    }

    /// First capability, in check order, that is not available.
    pub fn first_unavailable(&self) -> Option<&CapabilityStatus> {
        self.statuses.iter().find(|status| !status.is_available())
    }

    pub fn all_available(&self) -> bool {
        self.first_unavailable().is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityStatus> {
        self.statuses.iter()
    }

    /// Name → status view, for callers that want a mapping.
    pub fn as_map(&self) -> HashMap<&str, &CapabilityStatus> {
        self.statuses
            .iter()
            .map(|status| (status.name.as_str(), status))
            .collect()
    }
}

pub struct EnvironmentValidator {
    probes: Vec<Box<dyn CapabilityProbe>>,
}

impl EnvironmentValidator {
    /// Validator over an explicit probe list, checked in the given order.
    pub fn new(probes: Vec<Box<dyn CapabilityProbe>>) -> Self {
        Self { probes }
    }

    /// Standard probes: model client first, then credential lookup.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(vec![
            Box::new(ModelClientProbe::from_config(&config.model)),
            Box::new(CredentialLookupProbe::from_config(&config.credential)),
        ])
    }

    /// Probe every capability.
    pub fn check(&self) -> EnvironmentSnapshot {
        let statuses = self
            .probes
            .iter()
            .map(|probe| {
                let (state, detail) = match probe.probe() {
                    ProbeOutcome::Available => (CapabilityState::Available, None),
                    ProbeOutcome::Missing(detail) => (CapabilityState::Missing, Some(detail)),
                    ProbeOutcome::Faulted(detail) => (CapabilityState::Faulted, Some(detail)),
                };

                match &detail {
                    None => debug!("Capability {} available", probe.name()),
                    Some(detail) => warn!("Capability {} {}: {}", probe.name(), state, detail),
                }

                CapabilityStatus {
                    name: probe.name().to_string(),
                    state,
                    detail,
                }
            })
            .collect();

        EnvironmentSnapshot::new(statuses)
    }
}
