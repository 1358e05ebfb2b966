#![allow(dead_code)]

use bracket_random::prelude::DiceType;
use bracket_terminal::prelude::RGB;

use crate::ecs::components::CombatStats;
use crate::map::{Animation, Frame};

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    /// Second animation color, for creatures that pulse.
    pub flicker: Option<RGB>,
    pub wander_chance: f32,
    pub hp: i32,
    pub to_hit: i32,
    pub defense: i32,
    pub damage: DiceType,
}

impl MonsterTemplate {
    pub fn cave_dwellers() -> Vec<Self> {
        vec![
            Self {
                name: "Cave Bat",
                glyph: 'b',
                color: RGB::from_u8(170, 140, 110),
                flicker: Some(RGB::from_u8(120, 95, 70)),
                wander_chance: 0.7,
                hp: 5,
                to_hit: 3,
                defense: 1,
                damage: DiceType::new(1, 3, 0),
            },
            Self {
                name: "Gloom Crawler",
                glyph: 'c',
                color: RGB::from_u8(110, 160, 200),
                flicker: None,
                wander_chance: 0.45,
                hp: 9,
                to_hit: 2,
                defense: 2,
                damage: DiceType::new(1, 4, 1),
            },
            Self {
                name: "Mire Troll",
                glyph: 'T',
                color: RGB::from_u8(110, 190, 100),
                flicker: Some(RGB::from_u8(80, 150, 75)),
                wander_chance: 0.25,
                hp: 16,
                to_hit: 4,
                defense: 3,
                damage: DiceType::new(2, 4, 0),
            },
        ]
    }

    pub fn animation(&self) -> Animation {
        match self.flicker {
            Some(dim) => Animation::cycle([
                Frame::on_black(self.glyph, self.color),
                Frame::on_black(self.glyph, dim),
            ]),
            None => Animation::still(Frame::on_black(self.glyph, self.color)),
        }
    }

    pub fn combat_stats(&self) -> CombatStats {
        CombatStats {
            max_hp: self.hp,
            hp: self.hp,
            to_hit: self.to_hit,
            defense: self.defense,
            damage: self.damage,
        }
    }
}
