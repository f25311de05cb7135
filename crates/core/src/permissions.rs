/// Permission nodes checked by the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Required to receive any mob message.
    Receive,
    /// Required for `/talkingmobs reload`.
    Reload,
}

impl Permission {
    pub const fn node(self) -> &'static str {
        match self {
            Permission::Receive => "talkingmobs.receive",
            Permission::Reload => "talkingmobs.reload",
        }
    }
}
