use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use talkingmobs_core::catalog::TemplateCatalog;
use talkingmobs_core::config::Settings;
use talkingmobs_core::{format, Category, DataFolder};
use talkingmobs_text::TextComponent;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// TalkingMobs configuration tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Plugin data folder containing Config.toml and messages.yml.
    #[arg(long, default_value = "./plugins/TalkingMobs", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load all files, add missing settings and report problems.
    Check,
    /// Render a message the way a player would receive it.
    Preview {
        /// Mob type, e.g. zombie
        #[arg(long)]
        mob: String,
        /// Event category, e.g. attacked
        #[arg(long)]
        event: Category,
        /// Name substituted for %player%
        #[arg(long, default_value = "Steve")]
        player: String,
        /// Print JSON chat components instead of legacy text
        #[arg(long)]
        json: bool,
    },
    /// List message categories.
    Categories,
}

fn main() -> Result<()> {
    // Setup logging
    let logfile = tracing_appender::rolling::daily("./logs", "talkingmobs.log");
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("TALKINGMOBS_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_writer(logfile.and(std::io::stdout))
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();
    let data_folder = DataFolder::new(args.data_dir);

    match args.command {
        Command::Check => check(&data_folder),
        Command::Preview {
            mob,
            event,
            player,
            json,
        } => preview(&data_folder, &mob, event, &player, json),
        Command::Categories => {
            for category in Category::ALL {
                let note = if category.is_toggleable() {
                    ""
                } else {
                    " (template pool only, not toggleable)"
                };
                println!("{}{}", category, note);
            }
            Ok(())
        }
    }
}

fn load(data_folder: &DataFolder) -> Result<(Settings, TemplateCatalog)> {
    std::fs::create_dir_all(data_folder.root())?;
    Ok((data_folder.load_settings()?, data_folder.load_catalog()?))
}

fn check(data_folder: &DataFolder) -> Result<()> {
    let (settings, catalog) = load(data_folder)?;
    info!(
        "Spam timeout {}ms, max distance {}, spawn reasons {:?}",
        settings.spam_timeout, settings.max_distance, settings.spawn_reasons
    );

    for mob in catalog.mob_types() {
        let counts = catalog
            .counts(mob)
            .into_iter()
            .map(|(key, count)| format!("{}={}", key, count))
            .collect::<Vec<_>>()
            .join(", ");
        info!("{}: {}", mob, counts);
    }

    let unknown = catalog.validate();
    for (mob, key) in &unknown {
        warn!("Unknown event '{}' for mob '{}' will never be used", key, mob);
    }
    if !unknown.is_empty() {
        bail!("{} unknown event entries in messages", unknown.len());
    }
    Ok(())
}

/// Deaths borrow from the shared `killed` pool like they do in game.
fn fallback_chain(category: Category) -> Vec<Category> {
    match category {
        Category::KilledPlayer | Category::KilledOther => vec![category, Category::Killed],
        _ => vec![category],
    }
}

fn preview(
    data_folder: &DataFolder,
    mob: &str,
    category: Category,
    player: &str,
    json: bool,
) -> Result<()> {
    let (settings, catalog) = load(data_folder)?;

    let Some(templates) = fallback_chain(category)
        .into_iter()
        .find_map(|c| catalog.lookup(mob, c))
    else {
        bail!("No messages for event '{}' of mob '{}' defined", category, mob);
    };

    for template in templates {
        let body = format::render(settings.message_format(category), template, mob, category);
        let message = format::finalize(&body, player);
        if json {
            for component in TextComponent::from_legacy_text(&message) {
                println!("{}", component.encode_json()?);
            }
        } else {
            println!("{}", message);
        }
    }
    Ok(())
}
