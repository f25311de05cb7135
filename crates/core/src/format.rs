//! Two stage message rendering.
//!
//! The body is rendered once per event and shared by all recipients; only the
//! `%player%` substitution and color translation happen per recipient. All
//! replacements are literal.

use crate::category::Category;
use talkingmobs_text::{translate_alternate_color_codes, ALTERNATE_COLOR_CHAR};

pub const MESSAGE_PLACEHOLDER: &str = "%message%";
pub const MOB_NAME_PLACEHOLDER: &str = "%mobname%";
pub const EVENT_PLACEHOLDER: &str = "%event%";
pub const PLAYER_PLACEHOLDER: &str = "%player%";

/// Substitutes the template into the format string, then the mob and event
/// names. Placeholders inside the template are therefore replaced too.
pub fn render(format: &str, template: &str, mob_type: &str, category: Category) -> String {
    format
        .replace(MESSAGE_PLACEHOLDER, template)
        .replace(MOB_NAME_PLACEHOLDER, &mob_type.to_lowercase())
        .replace(EVENT_PLACEHOLDER, category.key())
}

/// Produces the line sent to one player.
pub fn finalize(rendered: &str, player_name: &str) -> String {
    let message = rendered.replace(PLAYER_PLACEHOLDER, player_name);
    translate_alternate_color_codes(ALTERNATE_COLOR_CHAR, &message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_everything() {
        let body = render(
            "[&a%mobname%&r] (%event%) %message%",
            "Hi %player%, I am a %mobname%",
            "CAVE_SPIDER",
            Category::Interacted,
        );
        assert_eq!(
            body,
            "[&acave_spider&r] (interacted) Hi %player%, I am a cave_spider"
        );
        assert_eq!(
            finalize(&body, "Alice"),
            "[§acave_spider§r] (interacted) Hi Alice, I am a cave_spider"
        );
    }

    #[test]
    fn replacement_is_literal() {
        let body = render("%message%", "costs $1 or \\2", "cow", Category::Attacked);
        assert_eq!(finalize(&body, "$0"), "costs $1 or \\2");
        assert_eq!(finalize("%player%!", "$0"), "$0!");
    }

    #[test]
    fn format_without_message_slot() {
        assert_eq!(
            render("%mobname% growls", "ignored", "Wolf", Category::Looking),
            "wolf growls"
        );
    }
}
