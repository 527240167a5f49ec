// src/server/record.rs
use crate::error::{Error, Result};
use crate::hosting::HostingProviderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a simulated server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(Uuid);

impl ServerId {
    // Only the registry hands out identifiers
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a simulated server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Server is not running (initial state)
    Offline,
    /// Server is booting
    Starting,
    /// Server is running
    Online,
    /// Server is shutting down
    Stopping,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServerStatus::Offline => "offline",
            ServerStatus::Starting => "starting",
            ServerStatus::Online => "online",
            ServerStatus::Stopping => "stopping",
        };
        f.write_str(s)
    }
}

/// Lifecycle action a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    Stop,
    Restart,
}

impl LifecycleAction {
    /// The only status the action may be requested from
    pub fn required_status(self) -> ServerStatus {
        match self {
            LifecycleAction::Start => ServerStatus::Offline,
            LifecycleAction::Stop | LifecycleAction::Restart => ServerStatus::Online,
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleAction::Start => "start",
            LifecycleAction::Stop => "stop",
            LifecycleAction::Restart => "restart",
        };
        f.write_str(s)
    }
}

/// Minecraft client family a server targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Java,
    Bedrock,
}

/// Whether a server is simulated or points at an external host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostingKind {
    #[default]
    Demo,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Peaceful,
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Host and port players connect to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Online and maximum player counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCounts {
    pub online: u32,
    pub max: u32,
}

impl PlayerCounts {
    /// Counts applied whenever a server comes online from a cold start or goes offline
    pub const RESET: PlayerCounts = PlayerCounts { online: 0, max: 20 };
}

/// Memory usage in megabytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used_mb: u32,
    pub total_mb: u32,
}

impl MemoryUsage {
    /// Usage applied when a server finishes stopping
    pub const RESET: MemoryUsage = MemoryUsage {
        used_mb: 0,
        total_mb: 2048,
    };
}

/// A simulated server owned by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub(crate) id: ServerId,
    pub name: String,
    pub description: Option<String>,
    pub motd: Option<String>,
    pub version: String,
    pub(crate) edition: Edition,
    pub(crate) hosting: HostingKind,
    pub hosting_provider: Option<HostingProviderId>,
    pub address: ServerAddress,
    pub players: PlayerCounts,
    pub memory: MemoryUsage,
    pub(crate) status: ServerStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) last_online_at: Option<DateTime<Utc>>,
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    pub pvp: bool,
    pub whitelist: bool,
}

impl ServerRecord {
    pub fn id(&self) -> ServerId {
        self.id
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    pub fn hosting(&self) -> HostingKind {
        self.hosting
    }

    pub fn status(&self) -> ServerStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last time the server transitioned into `online`
    pub fn last_online_at(&self) -> Option<DateTime<Utc>> {
        self.last_online_at
    }

    /// Apply a partial update, returning whether anything was set
    pub(crate) fn apply(&mut self, update: ServerUpdate) -> bool {
        // Non-short-circuiting `|` so every field is merged
        merge(&mut self.name, update.name)
            | merge(&mut self.description, update.description)
            | merge(&mut self.motd, update.motd)
            | merge(&mut self.version, update.version)
            | merge(&mut self.hosting_provider, update.hosting_provider)
            | merge(&mut self.address, update.address)
            | merge(&mut self.players, update.players)
            | merge(&mut self.memory, update.memory)
            | merge(&mut self.game_mode, update.game_mode)
            | merge(&mut self.difficulty, update.difficulty)
            | merge(&mut self.pvp, update.pvp)
            | merge(&mut self.whitelist, update.whitelist)
    }
}

fn merge<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// Partial update merged into a record by `ServerRegistry::update`
///
/// Identity, edition, hosting kind, creation time and lifecycle status are
/// not updatable; status only moves through start/stop/restart.
///
/// ```
/// use rbz_host::server::ServerUpdate;
///
/// let update = ServerUpdate {
///     name: Some("Creative Build".to_string()),
///     motd: Some(Some("Welcome!".to_string())),
///     ..Default::default()
/// };
/// assert!(update.pvp.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub motd: Option<Option<String>>,
    pub version: Option<String>,
    pub hosting_provider: Option<Option<HostingProviderId>>,
    pub address: Option<ServerAddress>,
    pub players: Option<PlayerCounts>,
    pub memory: Option<MemoryUsage>,
    pub game_mode: Option<GameMode>,
    pub difficulty: Option<Difficulty>,
    pub pvp: Option<bool>,
    pub whitelist: Option<bool>,
}

impl ServerUpdate {
    /// Whether the update sets no field at all
    pub fn is_empty(&self) -> bool {
        *self == ServerUpdate::default()
    }

    /// Reject counts that could never be observed on a running server
    pub fn validate(&self) -> Result<()> {
        if let Some(players) = self.players {
            if players.online > players.max {
                return Err(Error::Validation(format!(
                    "{} players online exceeds the maximum of {}",
                    players.online, players.max
                )));
            }
        }
        if let Some(memory) = self.memory {
            if memory.used_mb > memory.total_mb {
                return Err(Error::Validation(format!(
                    "{} MB used exceeds the total of {} MB",
                    memory.used_mb, memory.total_mb
                )));
            }
        }
        Ok(())
    }
}
