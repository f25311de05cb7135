use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The circumstance a mob message is sent for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Mob has been attacked by a player
    Attacked,
    /// Player right clicked on the mob
    Interacted,
    /// Shared template pool for both kinds of death. Never announced by itself.
    Killed,
    /// Mob has been killed by a player
    KilledPlayer,
    /// Mob has been killed by something other than a player
    KilledOther,
    /// Mob and player are looking at each other
    Looking,
    /// Mob has been spawned for one of the configured spawn reasons
    Spawned,
    /// Mob has been tamed by a player
    Tamed,
}

/// Static properties of a [`Category`].
#[derive(Debug, Clone, Copy)]
pub struct CategoryInfo {
    /// Used for template lookup, format strings and the players file.
    pub key: &'static str,
    /// Whether a player may switch this category off individually.
    pub toggleable: bool,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Attacked,
        Category::Interacted,
        Category::Killed,
        Category::KilledPlayer,
        Category::KilledOther,
        Category::Looking,
        Category::Spawned,
        Category::Tamed,
    ];

    pub const fn info(self) -> CategoryInfo {
        let (key, toggleable) = match self {
            Category::Attacked => ("attacked", true),
            Category::Interacted => ("interacted", true),
            Category::Killed => ("killed", false),
            Category::KilledPlayer => ("killed_player", true),
            Category::KilledOther => ("killed_other", true),
            Category::Looking => ("looking", true),
            Category::Spawned => ("spawned", true),
            Category::Tamed => ("tamed", true),
        };
        CategoryInfo { key, toggleable }
    }

    pub const fn key(self) -> &'static str {
        self.info().key
    }

    pub const fn is_toggleable(self) -> bool {
        self.info().toggleable
    }

    pub fn toggleable() -> impl Iterator<Item = Category> {
        Category::ALL.into_iter().filter(|c| c.is_toggleable())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown message category '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseCategoryError(s.to_owned()))
    }
}
