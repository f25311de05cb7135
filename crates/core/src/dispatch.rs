use crate::catalog::TemplateCatalog;
use crate::category::Category;
use crate::config::Settings;
use crate::format;
use crate::host::{Clock, Entity, EntityKind, Player, Server};
use crate::permissions::Permission;
use crate::preferences::PreferenceStore;
use crate::throttle::{ThrottleKey, ThrottleTracker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::slice;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A message that was handed to a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub player: String,
    pub message: String,
}

/// Everything a dispatch reads but does not own.
pub struct DispatchContext<'a> {
    pub server: &'a dyn Server,
    pub settings: &'a Settings,
    pub catalog: &'a TemplateCatalog,
    pub preferences: &'a PreferenceStore,
}

/// Why a recipient did not get a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Permission,
    Preference,
    Throttled,
    Distance,
}

pub struct Dispatcher {
    throttle: ThrottleTracker,
    clock: Box<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl Dispatcher {
    pub fn new(clock: Box<dyn Clock>) -> Dispatcher {
        Dispatcher::with_rng(clock, StdRng::from_os_rng())
    }

    /// Uses the given random source for template choice.
    pub fn with_rng(clock: Box<dyn Clock>, rng: StdRng) -> Dispatcher {
        Dispatcher {
            throttle: ThrottleTracker::new(),
            clock,
            rng: Mutex::new(rng),
        }
    }

    pub fn throttle(&self) -> &ThrottleTracker {
        &self.throttle
    }

    fn choose<'t>(&self, templates: &'t [String]) -> &'t str {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        &templates[rng.random_range(0..templates.len())]
    }

    /// Sends a message from `mob` for the `announced` category.
    ///
    /// Templates come from the first category in `chain` that has any; an
    /// empty chain means just `announced`. Format string, preferences and
    /// throttling always use `announced`. With a `recipient` only that player
    /// is considered, otherwise everyone online.
    pub fn dispatch(
        &self,
        ctx: &DispatchContext<'_>,
        mob: &dyn Entity,
        announced: Category,
        chain: &[Category],
        recipient: Option<&dyn Player>,
    ) -> Vec<Delivery> {
        if mob.as_player().is_some() || mob.kind() != EntityKind::Living {
            return Vec::new();
        }

        let chain = if chain.is_empty() {
            slice::from_ref(&announced)
        } else {
            chain
        };
        let mob_type = mob.type_name();
        let Some(templates) = chain
            .iter()
            .find_map(|&category| ctx.catalog.lookup(mob_type, category))
        else {
            info!(
                "No messages for event '{}' of mob '{}' defined!",
                announced.key(),
                mob_type.to_lowercase()
            );
            return Vec::new();
        };

        let template = self.choose(templates);
        let body = format::render(
            ctx.settings.message_format(announced),
            template,
            mob_type,
            announced,
        );

        let recipients = match recipient {
            Some(player) => vec![player],
            None => ctx.server.online_players(),
        };
        let now = self.clock.now();
        let window = ctx.settings.spam_timeout();

        let mut deliveries = Vec::new();
        for player in recipients {
            if let Err(rejection) = self.check(ctx, mob, player, announced, now, window) {
                debug!(
                    "Not sending {} message of {} to {}: {:?}",
                    announced,
                    mob.entity_id(),
                    player.name(),
                    rejection
                );
                continue;
            }
            let message = format::finalize(&body, player.name());
            player.send_message(&message);
            deliveries.push(Delivery {
                player: player.name().to_owned(),
                message,
            });
        }
        deliveries
    }

    /// Runs the gates in order. Reaching the throttle gate records the
    /// attempt even if the distance gate rejects afterwards.
    fn check(
        &self,
        ctx: &DispatchContext<'_>,
        mob: &dyn Entity,
        player: &dyn Player,
        category: Category,
        now: Instant,
        window: Duration,
    ) -> Result<(), Rejection> {
        if !player.has_permission(Permission::Receive.node()) {
            return Err(Rejection::Permission);
        }
        if !ctx.preferences.is_enabled_for(player.name(), category) {
            return Err(Rejection::Preference);
        }
        let key = ThrottleKey::new(mob.entity_id(), player.name(), category);
        if self.throttle.should_suppress(key, now, window) {
            return Err(Rejection::Throttled);
        }
        let max_distance = ctx.settings.max_distance;
        if max_distance > 0.0 {
            let distance = player.location().distance(mob.location());
            if !(distance.is_finite() && distance <= max_distance) {
                return Err(Rejection::Distance);
            }
        }
        Ok(())
    }
}
