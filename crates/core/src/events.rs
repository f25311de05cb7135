//! Entry points for the host's entity and player events.

use crate::category::Category;
use crate::dispatch::Delivery;
use crate::host::{is_looking_at, Entity, EntityKind, Player, Server, Vec3};
use crate::plugin::TalkingMobs;

/// Minimum dot product between an eye direction and the line to the other
/// entity's eyes for the two to count as facing each other.
pub const LOOKING_THRESHOLD: f64 = 0.90;

impl TalkingMobs {
    /// `reason` is the server's spawn cause tag, e.g. `SPAWNER_EGG`.
    pub fn on_creature_spawn(
        &self,
        server: &dyn Server,
        entity: &dyn Entity,
        reason: &str,
    ) -> Vec<Delivery> {
        if !self.settings().is_allowed_spawn_reason(reason) {
            return Vec::new();
        }
        self.dispatch(server, entity, Category::Spawned, &[], None)
    }

    pub fn on_entity_damaged(
        &self,
        server: &dyn Server,
        victim: &dyn Entity,
        damager: &dyn Entity,
    ) -> Vec<Delivery> {
        if !self.settings().events.attacked || victim.is_dead() {
            return Vec::new();
        }
        let Some(player) = damager.as_player() else {
            return Vec::new();
        };
        self.dispatch(server, victim, Category::Attacked, &[], Some(player))
    }

    /// A player killer hears the mob's last words alone; any other death is
    /// announced to everyone.
    pub fn on_entity_death(
        &self,
        server: &dyn Server,
        entity: &dyn Entity,
        killer: Option<&dyn Entity>,
    ) -> Vec<Delivery> {
        let settings = self.settings();
        match killer.and_then(|killer| killer.as_player()) {
            Some(player) => {
                if !settings.killed_player_enabled() {
                    return Vec::new();
                }
                self.dispatch(
                    server,
                    entity,
                    Category::KilledPlayer,
                    &[Category::KilledPlayer, Category::Killed],
                    Some(player),
                )
            }
            None => {
                if !settings.events.killed_other {
                    return Vec::new();
                }
                self.dispatch(
                    server,
                    entity,
                    Category::KilledOther,
                    &[Category::KilledOther, Category::Killed],
                    None,
                )
            }
        }
    }

    pub fn on_player_interact_entity(
        &self,
        server: &dyn Server,
        player: &dyn Player,
        entity: &dyn Entity,
    ) -> Vec<Delivery> {
        if !self.settings().events.interacted {
            return Vec::new();
        }
        self.dispatch(server, entity, Category::Interacted, &[], Some(player))
    }

    pub fn on_entity_tame(
        &self,
        server: &dyn Server,
        entity: &dyn Entity,
        owner: &dyn Entity,
    ) -> Vec<Delivery> {
        if !self.settings().events.tamed {
            return Vec::new();
        }
        let Some(player) = owner.as_player() else {
            return Vec::new();
        };
        self.dispatch(server, entity, Category::Tamed, &[], Some(player))
    }

    /// Checks every creature around the player's new position for eye contact.
    pub fn on_player_move(&self, server: &dyn Server, player: &dyn Player, to: Vec3) -> Vec<Delivery> {
        let settings = self.settings();
        if !settings.events.looking {
            return Vec::new();
        }

        let mut deliveries = Vec::new();
        for entity in server.nearby_entities(player, settings.looking_scan_radius) {
            if entity.kind() != EntityKind::Living {
                continue;
            }
            if !server.has_line_of_sight(entity, player) {
                continue;
            }
            if to.distance(entity.location()) > settings.max_looking_distance {
                continue;
            }
            if is_looking_at(entity, player, LOOKING_THRESHOLD)
                && is_looking_at(player, entity, LOOKING_THRESHOLD)
            {
                deliveries.extend(self.dispatch(
                    server,
                    entity,
                    Category::Looking,
                    &[],
                    Some(player),
                ));
            }
        }
        deliveries
    }
}
