//! Mobs that talk: flavor text sent to players when creatures spawn, get
//! hit, die, get tamed, are clicked or stare back at a player.
//!
//! The embedding server implements the traits in [`host`] and forwards its
//! events to a [`TalkingMobs`] instance.

#![deny(rust_2018_idioms)]

pub mod catalog;
pub mod category;
pub mod commands;
pub mod config;
pub mod dispatch;
mod events;
pub mod format;
pub mod host;
pub mod permissions;
mod plugin;
pub mod preferences;
pub mod throttle;

pub use category::Category;
pub use events::LOOKING_THRESHOLD;
pub use plugin::{DataFolder, TalkingMobs, PLUGIN_AUTHORS, PLUGIN_NAME, PLUGIN_VERSION};
