#![allow(dead_code)]

pub mod monsters;

use bracket_random::prelude::DiceType;
use bracket_terminal::prelude::RGB;

use crate::ecs::components::CombatStats;
use crate::map::{Animation, Frame};

pub fn player_stats() -> CombatStats {
    CombatStats {
        max_hp: 20,
        hp: 20,
        to_hit: 4,
        defense: 2,
        damage: DiceType::new(1, 6, 1),
    }
}

pub fn player_animation() -> Animation {
    Animation::still(Frame::on_black('@', RGB::from_u8(126, 211, 33)))
}

/// Seed lines for the message log on a fresh game.
pub fn intro_lines() -> Vec<String> {
    vec![
        "You light your lantern at the mouth of the cave.".to_string(),
        "Move with the arrows, HJKL, or YUBN for diagonals.".to_string(),
        "F detaches the view. R raises what has fallen.".to_string(),
    ]
}
