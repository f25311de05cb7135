use crate::category::Category;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Key of the master switch inside a record.
const ALL_KEY: &str = "all";

/// One player's switches, stored as `enabled: { all: bool, <category>: bool }`.
/// Missing switches are on.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PreferenceRecord {
    #[serde(default)]
    enabled: IndexMap<String, bool>,
}

impl PreferenceRecord {
    pub fn is_enabled(&self) -> bool {
        self.enabled.get(ALL_KEY).copied().unwrap_or(true)
    }

    /// The category override only counts while the master switch is on.
    pub fn is_enabled_for(&self, category: Category) -> bool {
        self.is_enabled() && self.enabled.get(category.key()).copied().unwrap_or(true)
    }

    /// Category overrides are kept as they are and apply again once the
    /// master switch is back on.
    fn set_enabled(&mut self, state: bool) {
        self.enabled.insert(ALL_KEY.to_owned(), state);
    }

    fn set_enabled_for(&mut self, category: Category, state: bool) {
        self.enabled.insert(category.key().to_owned(), state);
        self.enabled.insert(ALL_KEY.to_owned(), true);
    }
}

type Records = IndexMap<String, PreferenceRecord>;

fn parse_records(str: &str) -> Result<Records> {
    if str.trim().is_empty() {
        return Ok(Records::default());
    }
    Ok(serde_yaml_ng::from_str(str)?)
}

/// Writes snapshots of the players file on a background thread so that
/// toggling never blocks event handling.
struct PreferenceWriter {
    sender: Option<Sender<String>>,
    thread: Option<JoinHandle<()>>,
}

impl PreferenceWriter {
    fn spawn(path: PathBuf) -> Result<PreferenceWriter> {
        let (sender, receiver) = mpsc::channel::<String>();
        let thread = thread::Builder::new()
            .name("TalkingMobs preference writer".to_owned())
            .spawn(move || {
                while let Ok(mut snapshot) = receiver.recv() {
                    // Only the newest snapshot needs to reach the disk.
                    while let Ok(newer) = receiver.try_recv() {
                        snapshot = newer;
                    }
                    match fs::write(&path, snapshot) {
                        Ok(()) => debug!("Saved player preferences to {}", path.display()),
                        Err(err) => {
                            error!("Could not save config to {}: {}", path.display(), err)
                        }
                    }
                }
            })
            .context("Could not start preference writer thread")?;
        Ok(PreferenceWriter {
            sender: Some(sender),
            thread: Some(thread),
        })
    }

    fn submit(&self, snapshot: String) {
        let sent = self
            .sender
            .as_ref()
            .map(|sender| sender.send(snapshot).is_ok())
            .unwrap_or(false);
        if !sent {
            error!("Preference writer is gone, change will be lost on restart");
        }
    }
}

impl Drop for PreferenceWriter {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain pending snapshots and exit.
        drop(self.sender.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Preference writer thread panicked");
            }
        }
    }
}

/// Per player opt-in state. Reads are served from memory; every change is
/// also queued for writing to the players file, if there is one.
pub struct PreferenceStore {
    records: Mutex<Records>,
    path: Option<PathBuf>,
    writer: Option<PreferenceWriter>,
}

impl PreferenceStore {
    /// A store that is never written anywhere.
    pub fn in_memory() -> PreferenceStore {
        PreferenceStore {
            records: Mutex::new(Records::default()),
            path: None,
            writer: None,
        }
    }

    pub fn open(path: &Path) -> Result<PreferenceStore> {
        let records = Self::read(path)?;
        let writer = PreferenceWriter::spawn(path.to_owned())?;
        Ok(PreferenceStore {
            records: Mutex::new(records),
            path: Some(path.to_owned()),
            writer: Some(writer),
        })
    }

    fn read(path: &Path) -> Result<Records> {
        if !path.exists() {
            return Ok(Records::default());
        }
        let str = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        parse_records(&str).with_context(|| format!("Invalid player data in {}", path.display()))
    }

    /// Replaces the in-memory state with the contents of the players file.
    pub fn reload(&self) -> Result<()> {
        if let Some(path) = &self.path {
            let records = Self::read(path)?;
            *self.lock() = records;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, player: &str) -> PreferenceRecord {
        self.lock().get(player).cloned().unwrap_or_default()
    }

    /// Master switch, on unless the player turned it off.
    pub fn is_enabled(&self, player: &str) -> bool {
        self.lock()
            .get(player)
            .map_or(true, PreferenceRecord::is_enabled)
    }

    pub fn is_enabled_for(&self, player: &str, category: Category) -> bool {
        self.lock()
            .get(player)
            .map_or(true, |record| record.is_enabled_for(category))
    }

    pub fn set_enabled(&self, player: &str, state: bool) {
        self.update(player, |record| record.set_enabled(state));
    }

    /// Sets one category and turns the master switch on, so that enabling a
    /// category always has a visible effect.
    pub fn set_enabled_for(&self, player: &str, category: Category, state: bool) {
        self.update(player, |record| record.set_enabled_for(category, state));
    }

    fn update(&self, player: &str, change: impl FnOnce(&mut PreferenceRecord)) {
        let mut records = self.lock();
        change(records.entry(player.to_owned()).or_default());

        let Some(writer) = &self.writer else {
            return;
        };
        // Queued while still holding the lock so snapshots arrive in order.
        match serde_yaml_ng::to_string(&*records) {
            Ok(snapshot) => writer.submit(snapshot),
            Err(err) => error!("Could not serialize player preferences: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_enabled() {
        let store = PreferenceStore::in_memory();
        assert!(store.is_enabled("Alice"));
        assert!(store.is_enabled_for("Alice", Category::Looking));
        assert_eq!(store.record("Alice"), PreferenceRecord::default());
    }

    #[test]
    fn master_switch_restores_overrides() {
        let store = PreferenceStore::in_memory();
        store.set_enabled_for("Alice", Category::Attacked, false);

        store.set_enabled("Alice", false);
        assert!(!store.is_enabled("Alice"));
        assert!(!store.is_enabled_for("Alice", Category::Spawned));

        store.set_enabled("Alice", true);
        assert!(!store.is_enabled_for("Alice", Category::Attacked));
        assert!(store.is_enabled_for("Alice", Category::Spawned));
    }

    #[test]
    fn enabling_category_forces_master_on() {
        let store = PreferenceStore::in_memory();
        store.set_enabled("Alice", false);
        store.set_enabled_for("Alice", Category::Tamed, true);
        assert!(store.is_enabled("Alice"));
        assert!(store.is_enabled_for("Alice", Category::Tamed));
    }

    #[test]
    fn disabling_category_also_forces_master_on() {
        let store = PreferenceStore::in_memory();
        store.set_enabled("Alice", false);
        store.set_enabled_for("Alice", Category::Tamed, false);
        assert!(store.is_enabled("Alice"));
        assert!(!store.is_enabled_for("Alice", Category::Tamed));
        assert!(store.is_enabled_for("Alice", Category::Looking));
    }

    #[test]
    fn players_are_independent() {
        let store = PreferenceStore::in_memory();
        store.set_enabled("Alice", false);
        assert!(store.is_enabled("Bob"));
    }

    #[test]
    fn parses_players_file() {
        let records = parse_records(
            "Alice:\n  enabled:\n    all: true\n    looking: false\nBob: {}\n",
        )
        .unwrap();
        assert!(!records["Alice"].is_enabled_for(Category::Looking));
        assert!(records["Alice"].is_enabled_for(Category::Attacked));
        assert!(records["Bob"].is_enabled());
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn changes_reach_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.yml");

        let store = PreferenceStore::open(&path).unwrap();
        store.set_enabled_for("Alice", Category::Attacked, false);
        store.set_enabled("Alice", false);
        // Reads never wait for the writer.
        assert!(!store.is_enabled("Alice"));
        drop(store);

        let reopened = PreferenceStore::open(&path).unwrap();
        assert!(!reopened.is_enabled("Alice"));
        reopened.set_enabled("Alice", true);
        assert!(!reopened.is_enabled_for("Alice", Category::Attacked));
    }

    #[test]
    fn reload_reads_file_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.yml");
        let store = PreferenceStore::open(&path).unwrap();
        assert!(store.is_enabled("Bob"));

        fs::write(&path, "Bob:\n  enabled:\n    all: false\n").unwrap();
        store.reload().unwrap();
        assert!(!store.is_enabled("Bob"));
    }

    #[test]
    fn write_failures_keep_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file.
        let store = PreferenceStore::open(dir.path()).unwrap_or_else(|_| PreferenceStore {
            records: Mutex::new(Records::default()),
            path: None,
            writer: Some(PreferenceWriter::spawn(dir.path().to_owned()).unwrap()),
        });
        store.set_enabled("Alice", false);
        assert!(!store.is_enabled("Alice"));
    }
}
