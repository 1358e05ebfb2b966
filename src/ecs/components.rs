#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_random::prelude::DiceType;
use specs::prelude::{Component, NullStorage, VecStorage};

use crate::map::Animation;

#[derive(Clone, Debug)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

/// Appearance plus overlay priority. Higher order paints later during crop
/// and wins the cell.
#[derive(Clone, Debug)]
pub struct Renderable {
    pub animation: Animation,
    pub order: i32,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct CombatStats {
    pub max_hp: i32,
    pub hp: i32,
    pub to_hit: i32,
    pub defense: i32,
    pub damage: DiceType,
}

impl Component for CombatStats {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct IntentStep {
    pub delta: Point,
}

impl Default for IntentStep {
    fn default() -> Self {
        Self {
            delta: Point::new(0, 0),
        }
    }
}

impl Component for IntentStep {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

#[derive(Default)]
pub struct MonsterTag;

impl Component for MonsterTag {
    type Storage = NullStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Monster {
    pub name: String,
}

impl Component for Monster {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct MonsterBrain {
    pub wander_chance: f32,
}

impl Component for MonsterBrain {
    type Storage = VecStorage<Self>;
}

/// What a dead body needs to come back. The entity itself survives death;
/// its appearance and brain are swapped out and recorded here.
#[derive(Clone, Debug)]
pub struct Corpse {
    pub name: String,
    pub animation: Animation,
    pub order: i32,
    pub wander_chance: Option<f32>,
}

impl Component for Corpse {
    type Storage = VecStorage<Self>;
}
