use std::{
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use anyhow::Context;
use debounce::EventDebouncer;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

const CONFIG_DEBOUNCE_DURATION_MS: u64 = 200;

/// A RON-backed configuration file.
pub trait Config:
    Sized + Default + Clone + Send + Sync + Serialize + for<'a> Deserialize<'a> + 'static
{
    fn get_path() -> &'static str;

    fn is_valid(&self) -> bool {
        true
    }

    fn create_manager() -> anyhow::Result<ConfigManager<Self>> {
        let mut manager = ConfigManager::new(PathBuf::from(Self::get_path()));
        manager
            .load_if_exists()
            .with_context(|| format!("Failed to load config from {}", Self::get_path()))?;
        Ok(manager)
    }
}

#[derive(Clone, Copy, PartialEq)]
struct UpdateConfigEvent;

/// Owns the current value of a config and writes it back to disk after changes,
/// debounced so that bursts of updates result in a single write.
pub struct ConfigManager<T> {
    path: PathBuf,
    current: Arc<RwLock<T>>,
    debouncer: EventDebouncer<UpdateConfigEvent>,
}

impl<T> ConfigManager<T>
where
    T: Config,
{
    pub fn new(path: PathBuf) -> Self {
        let current = Arc::new(RwLock::new(T::default()));
        let current_clone = current.clone();
        let path_clone = path.clone();

        let write_config = move |_event: UpdateConfigEvent| {
            let config = current_clone
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();

            if let Err(e) = write_config_file(&path_clone, &config) {
                log::warn!("Failed to write config to {:?}: {:?}", &path_clone, e);
            }
        };

        Self {
            path,
            current,
            debouncer: EventDebouncer::new(
                Duration::from_millis(CONFIG_DEBOUNCE_DURATION_MS),
                write_config,
            ),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Arc<RwLock<T>> {
        self.current.clone()
    }

    /// Returns a copy of the current value.
    pub fn snapshot(&self) -> T {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn load_if_exists(&mut self) -> anyhow::Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let config_data = std::fs::read_to_string(&self.path)?;
        if config_data.trim().is_empty() {
            return Ok(());
        }

        let config: T = ron::from_str(&config_data)
            .with_context(|| format!("Failed to parse config from {:?}", &self.path))?;

        if !config.is_valid() {
            anyhow::bail!("Config in {:?} is not valid", &self.path);
        }

        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clone_from(&config);
        Ok(())
    }

    pub fn update_and_save<F>(&self, update_fn: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut config = self
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            update_fn(&mut *config);
        }
        self.debouncer.put(UpdateConfigEvent);
    }
}

fn write_config_file<T: Config>(path: &Path, config: &T) -> anyhow::Result<()> {
    if !config.is_valid() {
        anyhow::bail!("Refusing to write an invalid config");
    }

    let serialized = ron::ser::to_string_pretty(config, PrettyConfig::default())?;
    std::fs::write(path, serialized)?;
    Ok(())
}
