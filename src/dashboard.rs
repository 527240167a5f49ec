//! Dashboard aggregation and filtering over server listings.

use crate::server::{ServerRecord, ServerStatus};
use serde::Serialize;

/// Headline figures shown above the server list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStats {
    pub total_servers: usize,
    pub online_servers: usize,
    pub total_players: u64,
}

impl ServerStats {
    pub fn collect<'a>(servers: impl IntoIterator<Item = &'a ServerRecord>) -> Self {
        servers.into_iter().fold(Self::default(), |mut stats, server| {
            stats.total_servers += 1;
            if server.status() == ServerStatus::Online {
                stats.online_servers += 1;
            }
            stats.total_players += u64::from(server.players.online);
            stats
        })
    }
}

/// Search box and status selector of the dashboard.
///
/// An empty search matches every name; `status: None` means "all".
///
/// ```
/// use rbz_host::ServerRegistry;
/// use rbz_host::config::Config;
/// use rbz_host::dashboard::ServerFilter;
/// use rbz_host::server::CreateServerSpec;
///
/// let mut registry = ServerRegistry::new(Config::default());
/// registry.create(CreateServerSpec::named("Skyblock"));
/// registry.create(CreateServerSpec::named("Survival SMP"));
///
/// let filter = ServerFilter::search("SKY");
/// let names: Vec<_> = filter.apply(registry.list()).map(|s| s.name.as_str()).collect();
/// assert_eq!(names, ["Skyblock"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerFilter {
    pub search: String,
    pub status: Option<ServerStatus>,
}

impl ServerFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: term.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: ServerStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Case-insensitive name match plus optional exact status
    pub fn matches(&self, server: &ServerRecord) -> bool {
        let matches_search = server
            .name
            .to_lowercase()
            .contains(&self.search.to_lowercase());
        let matches_status = self.status.is_none_or(|status| server.status() == status);
        matches_search && matches_status
    }

    /// Servers passing the filter, in listing order
    pub fn apply<'a>(
        &'a self,
        servers: &'a [ServerRecord],
    ) -> impl Iterator<Item = &'a ServerRecord> + 'a {
        servers.iter().filter(move |server| self.matches(server))
    }
}
