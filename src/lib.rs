/*!
 # rbz-host

 A Rust library simulating a Minecraft server hosting panel.

 ## Overview

 rbz-host provides functionality to:
 - Create simulated Java and Bedrock servers with generated demo addresses
 - Drive servers through a start/stop/restart lifecycle with fixed delays
 - Follow lifecycle changes through an event log or a live stream
 - Browse the catalog of external hosting providers
 - Aggregate dashboard statistics and filter server listings
 - Keep the signed-in user's name and email in a key/value store

 Nothing is provisioned: no process is spawned and no socket is opened.
 Delays are counted in virtual ticks so the whole state machine can be
 driven deterministically; [`server::RegistryDriver`] maps ticks to wall
 clock time when the registry backs a running application.

 ## Basic Usage

 ```
 use rbz_host::{ServerRegistry, Result};
 use rbz_host::config::Config;
 use rbz_host::server::{CreateServerSpec, ServerStatus};

 fn main() -> Result<()> {
     let mut registry = ServerRegistry::new(Config::default());

     // Create a demo server
     let spec = CreateServerSpec::named("My World");
     spec.validate()?;
     let id = registry.create(spec).id();
     println!("Connect to {}", registry.get(id).unwrap().address);

     // Start it and let three ticks pass
     registry.start(id)?;
     assert_eq!(registry.status(id)?, ServerStatus::Starting);
     registry.advance(3);
     assert_eq!(registry.status(id)?, ServerStatus::Online);

     Ok(())
 }
 ```

 ## Features

 - **Server Registry**: Sole owner of server records and lifecycle transitions
 - **Virtual Time**: Transition timers fire only when the registry is advanced
 - **Configuration**: JSON or YAML config files
 - **Error Handling**: A single error enum for every fallible operation
 - **Async Support**: Optional tokio driver and event streams

 ## License

 This project is licensed under the terms in the LICENSE file.
*/

pub mod account;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod hosting;
pub mod scheduler;
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use server::{ServerId, ServerRecord, ServerStatus};

use chrono::{DateTime, Utc};
use dashboard::ServerStats;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scheduler::{DueTransition, PendingTransition, TransitionQueue};
use server::{
    CreateServerSpec, HostingKind, LifecycleAction, MemoryUsage, PlayerCounts, ServerAddress,
    ServerEvent, ServerLifecycleEvent, ServerLifecycleManager, ServerUpdate,
};
use std::path::Path;
use tokio::sync::broadcast;

/// Registry of simulated servers
///
/// This struct owns every server record and is the only place lifecycle
/// transitions happen. Records are kept in creation order.
/// All public methods are instrumented with `tracing` spans.
pub struct ServerRegistry {
    /// Configuration
    config: Config,
    /// Records in insertion order
    servers: Vec<ServerRecord>,
    /// Timers waiting to fire
    queue: TransitionQueue,
    /// Lifecycle event history
    lifecycle: ServerLifecycleManager,
    /// Port generator
    rng: StdRng,
    /// Wall-clock time of tick zero
    epoch: DateTime<Utc>,
    /// Current virtual tick
    tick: u64,
}

impl ServerRegistry {
    /// Create a new registry from a configuration file path
    ///
    /// The configuration is validated before use.
    #[tracing::instrument(skip(path), fields(config_path = ?path.as_ref()))]
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        tracing::info!("Loading configuration from file");
        let config = Config::from_file(path)?;
        config::validate_config(&config)?;
        Ok(Self::new(config))
    }

    /// Create a new registry from a JSON configuration string
    #[tracing::instrument(skip(config))]
    pub fn from_config_str(config: &str) -> Result<Self> {
        tracing::info!("Loading configuration from string");
        let config = Config::parse_from_str(config)?;
        config::validate_config(&config)?;
        Ok(Self::new(config))
    }

    /// Create a new, empty registry from a configuration
    #[tracing::instrument(skip(config), fields(base_domain = %config.base_domain))]
    pub fn new(config: Config) -> Self {
        tracing::info!("Creating new ServerRegistry");
        let rng = match config.port_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            lifecycle: ServerLifecycleManager::new(config.event_history),
            config,
            servers: Vec::new(),
            queue: TransitionQueue::new(),
            rng,
            epoch: Utc::now(),
            tick: 0,
        }
    }

    /// Registry configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create a server from a creation spec
    ///
    /// Demo servers, and real servers without a complete custom address,
    /// get `<name-token>.<base domain>` and a random port from the edition
    /// range. The new record starts `offline` and is appended to the list.
    ///
    /// The name is not checked here; callers run
    /// [`CreateServerSpec::validate`] first.
    #[tracing::instrument(skip(self, spec), fields(server_name = %spec.name, edition = ?spec.edition))]
    pub fn create(&mut self, spec: CreateServerSpec) -> &ServerRecord {
        let address = match (spec.hosting, spec.custom_address()) {
            (HostingKind::Real, Some((host, port))) => {
                tracing::debug!(host, port, "Using custom address");
                ServerAddress {
                    host: host.to_string(),
                    port,
                }
            }
            _ => server::generate_address(
                &spec.name,
                spec.edition,
                &self.config.base_domain,
                &mut self.rng,
            ),
        };

        let record = ServerRecord {
            id: ServerId::new(),
            name: spec.name,
            description: spec.description,
            motd: spec.motd,
            version: spec.version,
            edition: spec.edition,
            hosting: spec.hosting,
            hosting_provider: spec.hosting_provider,
            address,
            players: PlayerCounts {
                online: 0,
                max: spec.max_players,
            },
            memory: MemoryUsage {
                used_mb: 0,
                total_mb: spec.memory_size.megabytes(),
            },
            status: ServerStatus::Offline,
            created_at: self.now(),
            last_online_at: None,
            game_mode: spec.game_mode,
            difficulty: spec.difficulty,
            pvp: spec.pvp,
            whitelist: spec.whitelist,
        };

        tracing::info!(server_id = %record.id, address = %record.address, "Server created");
        self.emit(
            record.id,
            record.name.clone(),
            ServerLifecycleEvent::Created,
            Some(record.address.to_string()),
        );

        let index = self.servers.len();
        self.servers.push(record);
        &self.servers[index]
    }

    /// Merge a partial update into a server
    ///
    /// Player counts above their maximum and memory usage above its total
    /// are rejected with `Error::Validation`, leaving the record untouched.
    #[tracing::instrument(skip(self, update), fields(server_id = %id))]
    pub fn update(&mut self, id: ServerId, update: ServerUpdate) -> Result<&ServerRecord> {
        let index = self.index_of(id)?;
        update.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected server update");
        })?;

        if self.servers[index].apply(update) {
            tracing::debug!("Server updated");
            let name = self.servers[index].name.clone();
            self.emit(id, name, ServerLifecycleEvent::Updated, None);
        } else {
            tracing::trace!("Empty update ignored");
        }

        Ok(&self.servers[index])
    }

    /// Remove a server, dropping any pending transition
    ///
    /// Removing an unknown id is a no-op and returns `None`.
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub fn remove(&mut self, id: ServerId) -> Option<ServerRecord> {
        let Some(index) = self.position(id) else {
            tracing::debug!("Remove requested for unknown server");
            return None;
        };

        let record = self.servers.remove(index);
        let dropped = self.queue.cancel_all(id);
        tracing::info!(dropped_transitions = dropped, "Server removed");
        self.emit(id, record.name.clone(), ServerLifecycleEvent::Removed, None);
        Some(record)
    }

    /// Start an offline server
    ///
    /// The server is `starting` immediately and `online` once the start
    /// delay has elapsed.
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub fn start(&mut self, id: ServerId) -> Result<()> {
        self.begin(id, LifecycleAction::Start)
    }

    /// Stop an online server
    ///
    /// The server is `stopping` immediately and `offline` once the stop
    /// delay has elapsed.
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub fn stop(&mut self, id: ServerId) -> Result<()> {
        self.begin(id, LifecycleAction::Stop)
    }

    /// Restart an online server
    ///
    /// `stopping` immediately, `starting` after the stop delay, `online`
    /// after a further start delay. Player and memory figures are kept.
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub fn restart(&mut self, id: ServerId) -> Result<()> {
        self.begin(id, LifecycleAction::Restart)
    }

    /// Move virtual time forward, firing every transition that comes due
    ///
    /// Returns the number of transitions fired.
    #[tracing::instrument(skip(self))]
    pub fn advance(&mut self, ticks: u64) -> usize {
        let target = self.tick.saturating_add(ticks);
        let mut fired = 0;

        while let Some(due) = self.queue.pop_due(target) {
            self.tick = due.due;
            self.fire(due);
            fired += 1;
        }

        self.tick = target;
        if fired > 0 {
            tracing::debug!(fired, tick = self.tick, "Advanced registry");
        }
        fired
    }

    /// Advance until no transition is pending, returning the ticks elapsed
    pub fn run_until_idle(&mut self) -> u64 {
        let start = self.tick;
        while let Some(due) = self.queue.next_due() {
            self.advance(due.saturating_sub(self.tick));
        }
        self.tick - start
    }

    /// Look up a server
    pub fn get(&self, id: ServerId) -> Option<&ServerRecord> {
        self.servers.iter().find(|s| s.id == id)
    }

    /// Get server status
    #[tracing::instrument(skip(self), fields(server_id = %id))]
    pub fn status(&self, id: ServerId) -> Result<ServerStatus> {
        self.get(id).map(|s| s.status).ok_or_else(|| {
            tracing::warn!("Status requested for unknown server");
            Error::ServerNotFound(id.to_string())
        })
    }

    /// All servers in creation order
    pub fn list(&self) -> &[ServerRecord] {
        &self.servers
    }

    /// Number of servers in the registry
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether the registry holds no servers
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Transition waiting to fire for a server, with its due tick
    pub fn pending_transition(&self, id: ServerId) -> Option<(PendingTransition, u64)> {
        self.queue.pending_for(id)
    }

    /// Dashboard figures over every server
    pub fn stats(&self) -> ServerStats {
        ServerStats::collect(&self.servers)
    }

    /// Current virtual tick
    pub fn elapsed_ticks(&self) -> u64 {
        self.tick
    }

    /// Wall-clock time corresponding to the current tick
    pub fn now(&self) -> DateTime<Utc> {
        self.time_at(self.tick)
    }

    /// Lifecycle event history
    pub fn events(&self) -> &ServerLifecycleManager {
        &self.lifecycle
    }

    /// Mutable access to the event history, e.g. to clear it
    pub fn events_mut(&mut self) -> &mut ServerLifecycleManager {
        &mut self.lifecycle
    }

    /// Receive lifecycle events recorded from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.lifecycle.subscribe()
    }

    fn position(&self, id: ServerId) -> Option<usize> {
        self.servers.iter().position(|s| s.id == id)
    }

    fn index_of(&self, id: ServerId) -> Result<usize> {
        self.position(id).ok_or_else(|| {
            tracing::warn!(server_id = %id, "Unknown server");
            Error::ServerNotFound(id.to_string())
        })
    }

    fn time_at(&self, tick: u64) -> DateTime<Utc> {
        let millis = tick.saturating_mul(self.config.timing.tick_millis);
        // Clamp to the latest representable instant rather than overflow
        i64::try_from(millis)
            .ok()
            .and_then(chrono::Duration::try_milliseconds)
            .and_then(|offset| self.epoch.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn begin(&mut self, id: ServerId, action: LifecycleAction) -> Result<()> {
        let index = self.index_of(id)?;
        let timing = &self.config.timing;
        let record = &mut self.servers[index];

        if record.status != action.required_status() {
            tracing::warn!(status = %record.status, %action, "Rejected overlapping transition");
            return Err(Error::InvalidTransition {
                id,
                action,
                status: record.status,
            });
        }

        let (status, pending, delay, event) = match action {
            LifecycleAction::Start => (
                ServerStatus::Starting,
                PendingTransition::FinishStart,
                timing.start_ticks,
                ServerLifecycleEvent::Starting,
            ),
            LifecycleAction::Stop => (
                ServerStatus::Stopping,
                PendingTransition::FinishStop,
                timing.stop_ticks,
                ServerLifecycleEvent::Stopping,
            ),
            LifecycleAction::Restart => (
                ServerStatus::Stopping,
                PendingTransition::RestartBoot,
                timing.stop_ticks,
                ServerLifecycleEvent::Restarting,
            ),
        };

        record.status = status;
        let name = record.name.clone();
        let due = self.tick.saturating_add(delay);
        self.queue.schedule(id, pending, due);

        tracing::info!(status = %status, due, "Transition scheduled");
        self.emit(id, name, event, None);
        Ok(())
    }

    fn fire(&mut self, due: DueTransition) {
        let Some(index) = self.position(due.id) else {
            tracing::debug!(server_id = %due.id, "Transition fired for removed server");
            return;
        };

        let now = self.time_at(due.due);
        let start_ticks = self.config.timing.start_ticks;
        let record = &mut self.servers[index];

        let event = match due.transition {
            PendingTransition::FinishStart => {
                record.status = ServerStatus::Online;
                record.last_online_at = Some(now);
                record.players = PlayerCounts::RESET;
                ServerLifecycleEvent::Online
            }
            PendingTransition::FinishStop => {
                record.status = ServerStatus::Offline;
                record.players = PlayerCounts::RESET;
                record.memory = MemoryUsage::RESET;
                ServerLifecycleEvent::Offline
            }
            PendingTransition::RestartBoot => {
                record.status = ServerStatus::Starting;
                ServerLifecycleEvent::Starting
            }
            PendingTransition::FinishRestart => {
                record.status = ServerStatus::Online;
                record.last_online_at = Some(now);
                ServerLifecycleEvent::Online
            }
        };

        let name = record.name.clone();
        let status = record.status;
        if due.transition == PendingTransition::RestartBoot {
            self.queue
                .schedule(
                due.id,
                PendingTransition::FinishRestart,
                due.due.saturating_add(start_ticks),
            );
        }

        tracing::info!(server_id = %due.id, status = %status, "Transition completed");
        self.emit(due.id, name, event, None);
    }

    fn emit(
        &mut self,
        id: ServerId,
        name: String,
        event: ServerLifecycleEvent,
        details: Option<String>,
    ) {
        let timestamp = self.now();
        self.lifecycle.record(ServerEvent {
            id,
            name,
            event,
            tick: self.tick,
            timestamp,
            details,
        });
    }
}
