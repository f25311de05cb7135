#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use talkingmobs_core::catalog::TemplateCatalog;
use talkingmobs_core::config::Settings;
use talkingmobs_core::dispatch::Dispatcher;
use talkingmobs_core::host::{Clock, Entity, EntityId, EntityKind, Player, Server, Vec3};
use talkingmobs_core::preferences::PreferenceStore;
use talkingmobs_core::{Category, TalkingMobs};

pub const EYE_HEIGHT: f64 = 1.6;

#[derive(Clone)]
pub struct ManualClock {
    start: Instant,
    elapsed: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> ManualClock {
        ManualClock {
            start: Instant::now(),
            elapsed: Default::default(),
        }
    }

    /// Moves the clock to `ms` milliseconds after its creation.
    pub fn set_millis(&self, ms: u64) {
        *self.elapsed.lock().unwrap() = Duration::from_millis(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.elapsed.lock().unwrap()
    }
}

pub struct TestMob {
    pub id: EntityId,
    pub kind: EntityKind,
    pub type_name: String,
    pub location: Vec3,
    pub direction: Vec3,
    pub dead: bool,
}

impl TestMob {
    pub fn new(id: EntityId, type_name: &str, location: Vec3) -> TestMob {
        TestMob {
            id,
            kind: EntityKind::Living,
            type_name: type_name.to_owned(),
            location,
            direction: Vec3::new(0.0, 0.0, 1.0),
            dead: false,
        }
    }

    pub fn facing(mut self, direction: Vec3) -> TestMob {
        self.direction = direction.normalize();
        self
    }
}

impl Entity for TestMob {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn location(&self) -> Vec3 {
        self.location
    }

    fn eye_location(&self) -> Vec3 {
        Vec3::new(self.location.x, self.location.y + EYE_HEIGHT, self.location.z)
    }

    fn direction(&self) -> Vec3 {
        self.direction
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}

pub struct TestPlayer {
    pub id: EntityId,
    pub name: String,
    pub location: Vec3,
    pub direction: Vec3,
    pub permissions: Vec<String>,
    pub inbox: RefCell<Vec<String>>,
}

impl TestPlayer {
    /// A player allowed to receive messages.
    pub fn new(id: EntityId, name: &str, location: Vec3) -> TestPlayer {
        TestPlayer {
            id,
            name: name.to_owned(),
            location,
            direction: Vec3::new(0.0, 0.0, 1.0),
            permissions: vec!["talkingmobs.receive".to_owned()],
            inbox: Default::default(),
        }
    }

    pub fn facing(mut self, direction: Vec3) -> TestPlayer {
        self.direction = direction.normalize();
        self
    }

    pub fn with_permissions(mut self, permissions: &[&str]) -> TestPlayer {
        self.permissions = permissions.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }
}

impl Entity for TestPlayer {
    fn entity_id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn type_name(&self) -> &str {
        "PLAYER"
    }

    fn location(&self) -> Vec3 {
        self.location
    }

    fn eye_location(&self) -> Vec3 {
        Vec3::new(self.location.x, self.location.y + EYE_HEIGHT, self.location.z)
    }

    fn direction(&self) -> Vec3 {
        self.direction
    }

    fn is_dead(&self) -> bool {
        false
    }

    fn as_player(&self) -> Option<&dyn Player> {
        Some(self)
    }
}

impl Player for TestPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_permission(&self, node: &str) -> bool {
        self.permissions.iter().any(|p| p == node)
    }

    fn send_message(&self, message: &str) {
        self.inbox.borrow_mut().push(message.to_owned());
    }
}

#[derive(Default)]
pub struct TestServer {
    pub players: Vec<TestPlayer>,
    pub mobs: Vec<TestMob>,
    /// Mobs whose view is blocked by terrain.
    pub blind: Vec<EntityId>,
}

impl TestServer {
    pub fn new() -> TestServer {
        Default::default()
    }

    pub fn player(&self, name: &str) -> &TestPlayer {
        self.players.iter().find(|p| p.name == name).unwrap()
    }

    pub fn mob(&self, id: EntityId) -> &TestMob {
        self.mobs.iter().find(|m| m.id == id).unwrap()
    }
}

impl Server for TestServer {
    fn online_players(&self) -> Vec<&dyn Player> {
        self.players.iter().map(|p| p as &dyn Player).collect()
    }

    fn nearby_entities(&self, player: &dyn Player, radius: f64) -> Vec<&dyn Entity> {
        let center = player.location();
        self.mobs
            .iter()
            .filter(|m| m.location.distance(center) <= radius)
            .map(|m| m as &dyn Entity)
            .chain(
                self.players
                    .iter()
                    .filter(|p| p.id != player.entity_id())
                    .filter(|p| p.location.distance(center) <= radius)
                    .map(|p| p as &dyn Entity),
            )
            .collect()
    }

    fn has_line_of_sight(&self, from: &dyn Entity, _to: &dyn Player) -> bool {
        !self.blind.contains(&from.entity_id())
    }
}

pub fn templates(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

/// A zombie that says "Ouch!" when attacked, with a plain format.
pub fn zombie_catalog() -> TemplateCatalog {
    let mut catalog = TemplateCatalog::default();
    catalog.insert("zombie", Category::Attacked, templates(&["Ouch!"]));
    catalog
}

pub fn test_settings() -> Settings {
    let mut settings = Settings {
        spam_timeout: 1000,
        ..Default::default()
    };
    settings
        .message_format
        .0
        .insert("attacked".to_owned(), "[%mobname%] %message%".to_owned());
    settings
}

pub fn test_plugin(settings: Settings, catalog: TemplateCatalog) -> (TalkingMobs, ManualClock) {
    let clock = ManualClock::new();
    let dispatcher = Dispatcher::with_rng(Box::new(clock.clone()), StdRng::seed_from_u64(42));
    let plugin = TalkingMobs::new(settings, catalog, PreferenceStore::in_memory(), dispatcher);
    (plugin, clock)
}
