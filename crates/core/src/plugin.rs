use crate::catalog::TemplateCatalog;
use crate::category::Category;
use crate::config::Settings;
use crate::dispatch::{Delivery, DispatchContext, Dispatcher};
use crate::host::{Entity, Player, Server, SystemClock};
use crate::preferences::PreferenceStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

pub const PLUGIN_NAME: &str = "TalkingMobs";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PLUGIN_AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
/// Empty unless the manifest sets `homepage`.
pub const PLUGIN_WEBSITE: &str = env!("CARGO_PKG_HOMEPAGE");

/// The plugin's files inside the server's plugin directory.
#[derive(Debug, Clone)]
pub struct DataFolder {
    root: PathBuf,
}

impl DataFolder {
    pub fn new(root: impl Into<PathBuf>) -> DataFolder {
        DataFolder { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> PathBuf {
        self.root.join("Config.toml")
    }

    pub fn messages(&self) -> PathBuf {
        self.root.join("messages.yml")
    }

    pub fn players(&self) -> PathBuf {
        self.root.join("players.yml")
    }

    pub fn load_settings(&self) -> Result<Settings> {
        Settings::load(&self.config())
    }

    pub fn load_catalog(&self) -> Result<TemplateCatalog> {
        TemplateCatalog::load(&self.messages())
    }
}

/// One running instance of the plugin. The host creates it on startup and
/// routes events and commands to it.
pub struct TalkingMobs {
    settings: RwLock<Arc<Settings>>,
    catalog: RwLock<Arc<TemplateCatalog>>,
    preferences: PreferenceStore,
    dispatcher: Dispatcher,
    data_folder: Option<DataFolder>,
}

impl TalkingMobs {
    /// Creates an instance without files; `reload` has nothing to re-read.
    pub fn new(
        settings: Settings,
        catalog: TemplateCatalog,
        preferences: PreferenceStore,
        dispatcher: Dispatcher,
    ) -> TalkingMobs {
        TalkingMobs {
            settings: RwLock::new(Arc::new(settings)),
            catalog: RwLock::new(Arc::new(catalog)),
            preferences,
            dispatcher,
            data_folder: None,
        }
    }

    /// Loads everything from `data_folder`, creating missing files.
    pub fn open(data_folder: DataFolder) -> Result<TalkingMobs> {
        fs::create_dir_all(data_folder.root()).with_context(|| {
            format!("Could not create {}", data_folder.root().display())
        })?;
        let settings = data_folder.load_settings()?;
        let catalog = data_folder.load_catalog()?;
        let preferences = PreferenceStore::open(&data_folder.players())?;
        info!("Loaded {} from {}", PLUGIN_NAME, data_folder.root().display());

        let mut plugin = TalkingMobs::new(
            settings,
            catalog,
            preferences,
            Dispatcher::new(Box::new(SystemClock)),
        );
        plugin.data_folder = Some(data_folder);
        Ok(plugin)
    }

    pub fn settings(&self) -> Arc<Settings> {
        self.settings
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn catalog(&self) -> Arc<TemplateCatalog> {
        self.catalog
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Re-reads all files. Nothing is replaced unless settings and messages
    /// both load.
    pub fn reload(&self) -> Result<()> {
        let Some(data_folder) = &self.data_folder else {
            return Ok(());
        };
        let settings = data_folder.load_settings()?;
        let catalog = data_folder.load_catalog()?;

        *self.settings.write().unwrap_or_else(|p| p.into_inner()) = Arc::new(settings);
        *self.catalog.write().unwrap_or_else(|p| p.into_inner()) = Arc::new(catalog);
        self.preferences.reload()?;
        info!("Reloaded configuration from {}", data_folder.root().display());
        Ok(())
    }

    /// See [`Dispatcher::dispatch`].
    pub fn dispatch(
        &self,
        server: &dyn Server,
        mob: &dyn Entity,
        announced: Category,
        chain: &[Category],
        recipient: Option<&dyn Player>,
    ) -> Vec<Delivery> {
        let settings = self.settings();
        let catalog = self.catalog();
        let ctx = DispatchContext {
            server,
            settings: &settings,
            catalog: &catalog,
            preferences: &self.preferences,
        };
        self.dispatcher
            .dispatch(&ctx, mob, announced, chain, recipient)
    }
}
