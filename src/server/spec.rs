use crate::error::{Error, Result};
use crate::hosting::HostingProviderId;
use crate::server::{Difficulty, Edition, GameMode, HostingKind};
use serde::{Deserialize, Serialize};

const JAVA_VERSIONS: &[&str] = &[
    "1.21.4", "1.21.3", "1.21.1", "1.20.4", "1.20.2", "1.20.1", "1.19.4", "1.19.2", "1.18.2",
];

const BEDROCK_VERSIONS: &[&str] = &[
    "1.21.80", "1.21.72", "1.21.70", "1.21.62", "1.21.60", "1.21.51", "1.21.50", "1.21.44",
    "1.21.41", "1.21.40",
];

impl Edition {
    /// Game versions offered for this edition, newest first
    pub fn versions(self) -> &'static [&'static str] {
        match self {
            Edition::Java => JAVA_VERSIONS,
            Edition::Bedrock => BEDROCK_VERSIONS,
        }
    }

    /// Version preselected when the edition is chosen
    pub fn default_version(self) -> &'static str {
        self.versions()[0]
    }
}

/// Memory plans a server can be created with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MemorySize {
    Mb1024,
    #[default]
    Mb2048,
    Mb4096,
    Mb8192,
    Mb16384,
}

impl MemorySize {
    pub const ALL: [MemorySize; 5] = [
        MemorySize::Mb1024,
        MemorySize::Mb2048,
        MemorySize::Mb4096,
        MemorySize::Mb8192,
        MemorySize::Mb16384,
    ];

    pub fn megabytes(self) -> u32 {
        match self {
            MemorySize::Mb1024 => 1024,
            MemorySize::Mb2048 => 2048,
            MemorySize::Mb4096 => 4096,
            MemorySize::Mb8192 => 8192,
            MemorySize::Mb16384 => 16384,
        }
    }
}

impl TryFrom<u32> for MemorySize {
    type Error = Error;

    fn try_from(mb: u32) -> Result<Self> {
        MemorySize::ALL
            .into_iter()
            .find(|size| size.megabytes() == mb)
            .ok_or_else(|| Error::Validation(format!("Unsupported memory size {} MB", mb)))
    }
}

impl From<MemorySize> for u32 {
    fn from(size: MemorySize) -> Self {
        size.megabytes()
    }
}

/// Everything the creation wizard collects for a new server.
///
/// Only the name is checked (see [`CreateServerSpec::validate`]); every
/// other field is accepted as given.
///
/// ```
/// use rbz_host::server::{CreateServerSpec, Edition};
///
/// let spec = CreateServerSpec::named("My World");
/// assert_eq!(spec.edition, Edition::Java);
/// assert_eq!(spec.version, "1.21.4");
/// assert_eq!(spec.max_players, 20);
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateServerSpec {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub edition: Edition,
    pub hosting: HostingKind,
    pub hosting_provider: Option<HostingProviderId>,
    pub custom_host: Option<String>,
    pub custom_port: Option<u16>,
    pub motd: Option<String>,
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    /// 1-200 in the wizard; not enforced here
    pub max_players: u32,
    pub memory_size: MemorySize,
    pub pvp: bool,
    pub whitelist: bool,
}

impl Default for CreateServerSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            version: Edition::Java.default_version().to_string(),
            edition: Edition::Java,
            hosting: HostingKind::Demo,
            hosting_provider: None,
            custom_host: None,
            custom_port: None,
            motd: None,
            game_mode: GameMode::Survival,
            difficulty: Difficulty::Normal,
            max_players: 20,
            memory_size: MemorySize::Mb2048,
            pvp: true,
            whitelist: false,
        }
    }
}

impl CreateServerSpec {
    /// Wizard defaults with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Switch edition, resetting the version to the edition's default
    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = edition;
        self.version = edition.default_version().to_string();
        self
    }

    /// Custom host and port, when both were supplied
    pub fn custom_address(&self) -> Option<(&str, u16)> {
        match (self.custom_host.as_deref(), self.custom_port) {
            (Some(host), Some(port)) if !host.is_empty() => Some((host, port)),
            _ => None,
        }
    }

    /// Required-field check run by the creation form before calling the registry
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Server name is required".to_string()));
        }
        Ok(())
    }
}
