use crate::config::TimingConfig;
use crate::error::{Error, Result};
use crate::ServerRegistry;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;

/// Registry shared between a driver and the code rendering it
pub type SharedRegistry = Arc<Mutex<ServerRegistry>>;

impl ServerRegistry {
    /// Wrap the registry for use with a [`RegistryDriver`]
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }
}

/// Lock a shared registry, mapping poisoning to an error
pub fn lock_registry(registry: &SharedRegistry) -> Result<MutexGuard<'_, ServerRegistry>> {
    registry
        .lock()
        .map_err(|_| Error::Other("Failed to lock server registry".to_string()))
}

/// Registry driver configuration
#[derive(Debug, Clone)]
pub struct RegistryDriverConfig {
    /// Wall-clock length of one tick
    pub tick: Duration,
}

impl Default for RegistryDriverConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
        }
    }
}

impl From<&TimingConfig> for RegistryDriverConfig {
    fn from(timing: &TimingConfig) -> Self {
        Self { tick: timing.tick() }
    }
}

/// Background task advancing a shared registry one tick per interval
pub struct RegistryDriver {
    /// Registry being driven
    registry: SharedRegistry,
    /// Driver configuration
    config: RegistryDriverConfig,
    /// Ticker task
    task: Option<JoinHandle<()>>,
    /// Running flag
    running: Arc<Mutex<bool>>,
}

impl RegistryDriver {
    /// Create a new driver; nothing runs until [`RegistryDriver::start`]
    pub fn new(registry: SharedRegistry, config: RegistryDriverConfig) -> Self {
        Self {
            registry,
            config,
            task: None,
            running: Arc::new(Mutex::new(false)),
        }
    }

    /// Spawn the ticker on the current tokio runtime
    pub fn start(&mut self) -> Result<()> {
        {
            let mut running = self
                .running
                .lock()
                .map_err(|_| Error::Other("Failed to lock running flag".to_string()))?;

            if *running {
                return Ok(());
            }

            *running = true;
        }

        let registry = Arc::clone(&self.registry);
        let running = Arc::clone(&self.running);
        let tick = self.config.tick;
        tracing::info!(tick_ms = tick.as_millis() as u64, "Starting registry driver");

        let task = tokio::spawn(async move {
            // First tick one period from now, not immediately
            let mut interval = time::interval_at(time::Instant::now() + tick, tick);

            loop {
                interval.tick().await;

                match running.lock() {
                    Ok(flag) if *flag => {}
                    _ => break,
                }

                match lock_registry(&registry) {
                    Ok(mut registry) => {
                        registry.advance(1);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Registry driver stopping");
                        if let Ok(mut flag) = running.lock() {
                            *flag = false;
                        }
                        break;
                    }
                }
            }
        });

        self.task = Some(task);

        Ok(())
    }

    /// Stop the ticker; pending transitions stay queued
    pub fn stop(&mut self) -> Result<()> {
        {
            let mut running = self
                .running
                .lock()
                .map_err(|_| Error::Other("Failed to lock running flag".to_string()))?;

            if !*running {
                return Ok(());
            }

            *running = false;
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }

        tracing::info!("Registry driver stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().map(|flag| *flag).unwrap_or(false)
    }

    /// Registry being driven
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }
}

impl Drop for RegistryDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
