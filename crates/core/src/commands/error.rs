use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("You do not have the required permissions for this command!")]
    PermissionDenied { permission: &'static str },
    #[error("This command can only be run by a player!")]
    PlayerOnly,
    #[error("Invalid type: {0}")]
    InvalidType(String),
    #[error("Could not reload configuration: {0:#}")]
    Reload(anyhow::Error),
}

pub type CommandResult<T> = Result<T, CommandError>;
