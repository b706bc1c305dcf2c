//! In-memory storage and configuration for DevVault.

use std::sync::RwLock;

use dv_core::{Command, CoreError, CoreResult, Record, VaultRepository, Website};

pub mod config;
pub mod seed;

pub use config::{config_path, load_config, save_config, AssistConfig, VaultConfig, APP_DIR_NAME};

/// Process-lifetime repository for commands and websites.
#[derive(Debug, Default)]
pub struct MemoryVault {
    commands: RwLock<Vec<Command>>,
    websites: RwLock<Vec<Website>>,
}

impl MemoryVault {
    /// Create an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vault holding the sample records.
    pub fn seeded() -> CoreResult<Self> {
        let vault = Self {
            commands: RwLock::new(seed::sample_commands()?),
            websites: RwLock::new(seed::sample_websites()?),
        };
        tracing::debug!(
            commands = vault.command_count(),
            websites = vault.website_count(),
            "seeded vault"
        );
        Ok(vault)
    }

    /// Number of stored commands.
    pub fn command_count(&self) -> usize {
        self.commands.read().map(|items| items.len()).unwrap_or_default()
    }

    /// Number of stored websites.
    pub fn website_count(&self) -> usize {
        self.websites.read().map(|items| items.len()).unwrap_or_default()
    }
}

fn list_from<T: Clone>(lock: &RwLock<Vec<T>>) -> CoreResult<Vec<T>> {
    let items = lock
        .read()
        .map_err(|_| CoreError::Storage("vault lock poisoned".into()))?;
    Ok(items.clone())
}

fn insert_into<T: Record>(lock: &RwLock<Vec<T>>, record: T) -> CoreResult<()> {
    let mut items = lock
        .write()
        .map_err(|_| CoreError::Storage("vault lock poisoned".into()))?;
    if items.iter().any(|existing| existing.id() == record.id()) {
        return Err(CoreError::Storage(format!(
            "record {} already exists",
            record.id()
        )));
    }
    tracing::info!(id = %record.id(), name = record.display_name(), "stored record");
    items.push(record);
    Ok(())
}

impl VaultRepository<Command> for MemoryVault {
    fn list(&self) -> CoreResult<Vec<Command>> {
        list_from(&self.commands)
    }

    fn create(&self, record: Command) -> CoreResult<()> {
        insert_into(&self.commands, record)
    }
}

impl VaultRepository<Website> for MemoryVault {
    fn list(&self) -> CoreResult<Vec<Website>> {
        list_from(&self.websites)
    }

    fn create(&self, record: Website) -> CoreResult<()> {
        insert_into(&self.websites, record)
    }
}
