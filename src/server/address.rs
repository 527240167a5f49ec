use crate::server::{Edition, ServerAddress};
use rand::Rng;
use std::ops::Range;

/// Maximum length of the subdomain derived from a server name
pub const SUBDOMAIN_MAX_LEN: usize = 10;

/// Used when a name contains no ASCII alphanumerics at all
const FALLBACK_SUBDOMAIN: &str = "server";

impl Edition {
    /// Range generated ports are drawn from
    pub fn port_range(self) -> Range<u16> {
        match self {
            Edition::Java => 25565..30000,
            Edition::Bedrock => 19132..20000,
        }
    }
}

/// Lower-case the name, keep ASCII alphanumerics, truncate to ten characters
pub fn subdomain_token(name: &str) -> String {
    let token: String = name
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(SUBDOMAIN_MAX_LEN)
        .collect();
    if token.is_empty() {
        FALLBACK_SUBDOMAIN.to_string()
    } else {
        token
    }
}

/// Build `<token>.<base_domain>` with a random port from the edition range
pub fn generate_address<R: Rng + ?Sized>(
    name: &str,
    edition: Edition,
    base_domain: &str,
    rng: &mut R,
) -> ServerAddress {
    ServerAddress {
        host: format!("{}.{}", subdomain_token(name), base_domain),
        port: rng.gen_range(edition.port_range()),
    }
}
