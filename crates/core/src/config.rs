use crate::category::Category;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use toml_edit::{value, Array, DocumentMut, Item, Table};
use tracing::{error, info};

/// Used when neither the category nor `default` has a format string.
pub const DEFAULT_MESSAGE_FORMAT: &str = "[&a%mobname%&r] %message%";

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut Table);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut Table) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, i64, f64, bool);

impl ConfigSerializeDefault for Vec<String> {
    fn fix_config(self, name: &str, doc: &mut Table) {
        doc.entry(name)
            .or_insert_with(|| value(self.into_iter().collect::<Array>()));
    }
}

impl<T> ConfigSerializeDefault for Option<T> {
    fn fix_config(self, _: &str, _: &mut Table) {
        assert!(self.is_none(), "`Some` as default is unimplemented");
    }
}

/// Opens (or creates) the sub table `name`. Returns `None` when the user put
/// something other than a table there, leaving the error to deserialization.
fn section<'a>(name: &str, doc: &'a mut Table) -> Option<&'a mut Table> {
    doc.entry(name)
        .or_insert_with(|| Item::Table(Table::new()))
        .as_table_mut()
}

macro_rules! gen_config {
    (
        $( $name:ident: $type:ty = $default:expr ),*
    ) => {
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
        pub struct Settings {
            $(
                pub $name: $type,
            )*
        }

        impl Default for Settings {
            fn default() -> Settings {
                Settings {
                    $(
                        $name: $default,
                    )*
                }
            }
        }

        impl ConfigSerializeDefault for Settings {
            fn fix_config(self, _: &str, doc: &mut Table) {
                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), doc);
                )*
            }
        }
    };
}

macro_rules! gen_section {
    (
        $( #[$meta:meta] )*
        $section:ident {
            $( $name:ident: $type:ty = $default:expr ),*
        }
    ) => {
        $( #[$meta] )*
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
        #[serde(default)]
        pub struct $section {
            $(
                pub $name: $type,
            )*
        }

        impl Default for $section {
            fn default() -> $section {
                $section {
                    $(
                        $name: $default,
                    )*
                }
            }
        }

        impl ConfigSerializeDefault for $section {
            fn fix_config(self, name: &str, doc: &mut Table) {
                if let Some(table) = section(name, doc) {
                    $(
                        <$type as ConfigSerializeDefault>::fix_config(self.$name, stringify!($name), table);
                    )*
                }
            }
        }
    };
}

gen_section! {
    /// Switches for the individual event sources. Spawn messages are
    /// controlled by `spawn_reasons` instead.
    EventsConfig {
        attacked: bool = true,
        interacted: bool = true,
        killed_player: bool = true,
        killed_other: bool = true,
        looking: bool = false,
        tamed: bool = true,
        // Deprecated alias of `killed_player`, kept for old config files.
        killed: Option<bool> = None
    }
}

/// Format strings keyed by category key, plus `default`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct MessageFormats(pub IndexMap<String, String>);

impl Default for MessageFormats {
    fn default() -> MessageFormats {
        let mut formats = IndexMap::new();
        formats.insert("default".to_owned(), DEFAULT_MESSAGE_FORMAT.to_owned());
        MessageFormats(formats)
    }
}

impl ConfigSerializeDefault for MessageFormats {
    fn fix_config(self, name: &str, doc: &mut Table) {
        if let Some(table) = section(name, doc) {
            for (key, format) in self.0 {
                format.fix_config(&key, table);
            }
        }
    }
}

gen_config! {
    spam_timeout: i64 = 5000,
    max_distance: f64 = 0.0,
    max_looking_distance: f64 = 5.0,
    looking_scan_radius: f64 = 10.0,
    spawn_reasons: Vec<String> = vec!["SPAWNER".to_owned(), "SPAWNER_EGG".to_owned()],
    events: EventsConfig = EventsConfig::default(),
    message_format: MessageFormats = MessageFormats::default()
}

impl Settings {
    /// Loads the settings file, adding any missing keys with their defaults.
    /// The file is rewritten only if something had to be added.
    pub fn load(path: &Path) -> Result<Settings> {
        let original = match fs::read_to_string(path) {
            Ok(str) => str,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("Could not read {}", path.display()));
            }
        };
        let (settings, patched) = Settings::from_toml_str(&original)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        if original != patched {
            if let Err(err) = fs::write(path, &patched) {
                error!("Could not save config to {}: {}", path.display(), err);
            }
        }

        Ok(settings)
    }

    /// Parses `str`, returning the settings and the document with defaults
    /// filled in.
    pub fn from_toml_str(str: &str) -> Result<(Settings, String)> {
        let mut doc = str.parse::<DocumentMut>()?;
        Settings::default().fix_config("", doc.as_table_mut());

        let patched = doc.to_string();
        let settings = toml::from_str(&patched)?;
        Ok((settings, patched))
    }

    pub fn spam_timeout(&self) -> Duration {
        Duration::from_millis(self.spam_timeout.max(0) as u64)
    }

    pub fn killed_player_enabled(&self) -> bool {
        self.events.killed_player || self.events.killed.unwrap_or(false)
    }

    pub fn is_allowed_spawn_reason(&self, reason: &str) -> bool {
        self.spawn_reasons
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(reason))
    }

    /// Picks the format string for `category`, falling back to `default` and
    /// then to [`DEFAULT_MESSAGE_FORMAT`].
    pub fn message_format(&self, category: Category) -> &str {
        let formats = &self.message_format.0;
        if let Some(format) = formats.get(category.key()) {
            return format;
        }
        if let Some(format) = formats.get("default") {
            return format;
        }
        info!(
            "Message format for event type '{}' not defined!",
            category.key()
        );
        DEFAULT_MESSAGE_FORMAT
    }
}
