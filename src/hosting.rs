//! Catalog of external hosting providers a `real` server can point at.
//!
//! The catalog is static reference data: it is never mutated at runtime.
//!
//! ```
//! use rbz_host::hosting::{self, HostingProviderId};
//!
//! let aternos = hosting::provider(HostingProviderId::Aternos);
//! assert_eq!(aternos.base_domain, "aternos.me");
//! assert_eq!("server_pro".parse::<HostingProviderId>().unwrap(), HostingProviderId::ServerPro);
//! ```
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingProviderId {
    Aternos,
    Minehut,
    ServerPro,
    Custom,
}

impl HostingProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            HostingProviderId::Aternos => "aternos",
            HostingProviderId::Minehut => "minehut",
            HostingProviderId::ServerPro => "server_pro",
            HostingProviderId::Custom => "custom",
        }
    }
}

impl fmt::Display for HostingProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostingProviderId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PROVIDERS
            .iter()
            .map(|p| p.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| Error::Validation(format!("Unknown hosting provider '{}'", s)))
    }
}

/// Pricing tier of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderTier {
    Free,
    Paid,
}

/// One entry of the hosting catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingProvider {
    pub id: HostingProviderId,
    pub name: &'static str,
    pub tier: ProviderTier,
    pub description: &'static str,
    pub base_domain: &'static str,
    pub default_port: u16,
    pub supports_custom_address: bool,
    /// Ordered steps shown to the user while linking an external server
    pub setup_instructions: &'static [&'static str],
}

static PROVIDERS: [HostingProvider; 4] = [
    HostingProvider {
        id: HostingProviderId::Aternos,
        name: "Aternos",
        tier: ProviderTier::Free,
        description: "Free hosting with limited resources",
        base_domain: "aternos.me",
        default_port: 25565,
        supports_custom_address: true,
        setup_instructions: &[
            "Sign up at Aternos.org",
            "Create a new server",
            "Copy the server address from the control panel",
            "Paste the address here",
        ],
    },
    HostingProvider {
        id: HostingProviderId::Minehut,
        name: "Minehut",
        tier: ProviderTier::Free,
        description: "Free hosting with mod support",
        base_domain: "minehut.gg",
        default_port: 25565,
        supports_custom_address: true,
        setup_instructions: &[
            "Sign up at Minehut.com",
            "Create a new server",
            "Start the server from the control panel",
            "Copy the connection address",
        ],
    },
    HostingProvider {
        id: HostingProviderId::ServerPro,
        name: "Server.pro",
        tier: ProviderTier::Free,
        description: "Free and paid hosting",
        base_domain: "server.pro",
        default_port: 25565,
        supports_custom_address: true,
        setup_instructions: &[
            "Sign up at Server.pro",
            "Choose the free plan",
            "Create a Minecraft server",
            "Get the connection address",
        ],
    },
    HostingProvider {
        id: HostingProviderId::Custom,
        name: "Custom server",
        tier: ProviderTier::Paid,
        description: "Enter the address of your own server",
        base_domain: "custom.server",
        default_port: 25565,
        supports_custom_address: true,
        setup_instructions: &[
            "Rent a machine from any hosting provider",
            "Install Minecraft on the machine",
            "Configure the network and ports",
            "Enter the address and port here",
        ],
    },
];

/// All catalog entries, in display order
pub fn providers() -> &'static [HostingProvider] {
    &PROVIDERS
}

/// Catalog entry for an id
pub fn provider(id: HostingProviderId) -> &'static HostingProvider {
    // Every id variant has exactly one entry
    match id {
        HostingProviderId::Aternos => &PROVIDERS[0],
        HostingProviderId::Minehut => &PROVIDERS[1],
        HostingProviderId::ServerPro => &PROVIDERS[2],
        HostingProviderId::Custom => &PROVIDERS[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_matches_ids() {
        for entry in providers() {
            assert_eq!(provider(entry.id).id, entry.id);
            assert_eq!(entry.id.as_str().parse::<HostingProviderId>().unwrap(), entry.id);
        }
    }

    #[test]
    fn test_unknown_provider_rejected() {
        assert!(matches!(
            "bisect".parse::<HostingProviderId>(),
            Err(Error::Validation(_))
        ));
    }
}
