//! The `/talkingmobs` command.

mod error;

pub use error::{CommandError, CommandResult};

use crate::category::Category;
use crate::host::Player;
use crate::permissions::Permission;
use crate::plugin::{TalkingMobs, PLUGIN_AUTHORS, PLUGIN_NAME, PLUGIN_VERSION, PLUGIN_WEBSITE};
use talkingmobs_text::{strip_color, ColorCode};
use tracing::{info, warn};

pub enum CommandSender<'a> {
    Player(&'a dyn Player),
    Console,
}

impl CommandSender<'_> {
    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            CommandSender::Player(player) => player.has_permission(permission.node()),
            CommandSender::Console => true,
        }
    }

    pub fn reply(&self, message: &str) {
        match self {
            CommandSender::Player(player) => player.send_message(message),
            CommandSender::Console => info!("{}", strip_color(message)),
        }
    }

    fn require_permission(&self, permission: Permission) -> CommandResult<()> {
        if !self.has_permission(permission) {
            return Err(CommandError::PermissionDenied {
                permission: permission.node(),
            });
        }
        Ok(())
    }

    fn player(&self) -> CommandResult<&dyn Player> {
        match self {
            CommandSender::Player(player) => Ok(*player),
            CommandSender::Console => Err(CommandError::PlayerOnly),
        }
    }
}

impl TalkingMobs {
    /// Runs `/talkingmobs <args>`. Returns false when no or an unknown
    /// subcommand was given so the host can print the usage.
    pub fn on_command(&self, sender: &CommandSender<'_>, args: &[&str]) -> bool {
        let Some((subcommand, args)) = args.split_first() else {
            return false;
        };

        let result = match *subcommand {
            "help" => {
                print_help(sender);
                Ok(())
            }
            "reload" => self.reload_command(sender),
            "toggle" => self.toggle_command(sender, args),
            "version" => {
                print_version(sender);
                Ok(())
            }
            _ => return false,
        };

        if let Err(err) = result {
            sender.reply(&format!("{}{}", ColorCode::Red, err));
        }
        true
    }

    fn reload_command(&self, sender: &CommandSender<'_>) -> CommandResult<()> {
        sender.require_permission(Permission::Reload)?;
        sender.reply("Reloading configuration...");
        self.reload().map_err(|err| {
            warn!("Reload failed: {:#}", err);
            CommandError::Reload(err)
        })?;
        sender.reply("Done");
        Ok(())
    }

    fn toggle_command(&self, sender: &CommandSender<'_>, args: &[&str]) -> CommandResult<()> {
        let player = sender.player()?;
        let name = player.name();

        let Some(&kind) = args.first() else {
            sender.reply(&format!(
                "Usage: {}/talkingmobs toggle <type>",
                ColorCode::Gold
            ));
            sender.reply("");
            sender.reply(&message_types_list());
            return Ok(());
        };

        let preferences = self.preferences();
        if kind.eq_ignore_ascii_case("all") {
            let state = !preferences.is_enabled(name);
            preferences.set_enabled(name, state);
            sender.reply(&format!(
                "{}Mob messages {}",
                ColorCode::Green,
                enabled_word(state)
            ));
            return Ok(());
        }

        let category = kind
            .parse::<Category>()
            .ok()
            .filter(|category| category.is_toggleable())
            .ok_or_else(|| CommandError::InvalidType(kind.to_owned()))?;

        let state = !preferences.is_enabled_for(name, category);
        preferences.set_enabled_for(name, category, state);
        sender.reply(&format!(
            "{green}Mob messages for type '{blue}{kind}{green}' {}",
            enabled_word(state),
            green = ColorCode::Green,
            blue = ColorCode::Blue,
        ));
        Ok(())
    }
}

fn enabled_word(state: bool) -> &'static str {
    if state { "enabled" } else { "disabled" }
}

fn print_help(sender: &CommandSender<'_>) {
    sender.reply(&format!(
        "{yellow}----------{white} Subcommands {yellow}----------",
        yellow = ColorCode::Yellow,
        white = ColorCode::White,
    ));
    if sender.has_permission(Permission::Reload) {
        sender.reply(&format!(
            "{}/talkingmobs reload: {}Reload the configuration",
            ColorCode::Gold,
            ColorCode::White
        ));
    }
    if let CommandSender::Player(_) = sender {
        sender.reply(&format!(
            "{}/talkingmobs toggle: {}Toggle messages sent by mobs",
            ColorCode::Gold,
            ColorCode::White
        ));
    }
    sender.reply(&format!(
        "{}/talkingmobs version: {}Show the version of this plugin",
        ColorCode::Gold,
        ColorCode::White
    ));
}

fn print_version(sender: &CommandSender<'_>) {
    sender.reply(&format!(
        "{}{} {}{}",
        ColorCode::Gold,
        PLUGIN_NAME,
        ColorCode::Red,
        PLUGIN_VERSION
    ));
    sender.reply(&format!("{}by {}", ColorCode::DarkGreen, PLUGIN_AUTHORS));
    if !PLUGIN_WEBSITE.is_empty() {
        sender.reply(&format!("{}{}", ColorCode::DarkGreen, PLUGIN_WEBSITE));
    }
}

fn message_types_list() -> String {
    let separator = format!("{}, {}", ColorCode::White, ColorCode::DarkGreen);
    let types: Vec<&str> = std::iter::once("all")
        .chain(Category::toggleable().map(Category::key))
        .collect();
    format!(
        "Message types: {}{}",
        ColorCode::DarkGreen,
        types.join(&separator)
    )
}
