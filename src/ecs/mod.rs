#![allow(dead_code)]

pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::{
    camera::EntityFrame,
    data::{self, monsters::MonsterTemplate},
    map::{Animation, Frame, Level},
};

use self::{
    components::{
        CombatStats, Corpse, IntentStep, Monster, MonsterBrain, MonsterTag, PlayerTag, Position,
        Renderable,
    },
    resources::{MessageLog, TerrainContext},
    systems::{MovementSystem, WanderSystem},
};

const PLAYER_DRAW_ORDER: i32 = 2;
const MONSTER_DRAW_ORDER: i32 = 1;
const CORPSE_DRAW_ORDER: i32 = 0;

pub struct EcsWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
    pub turn: u64,
}

pub struct AttackReport {
    pub lines: Vec<String>,
    pub slain: bool,
}

pub(crate) struct AttackOutcome {
    pub hit: bool,
    pub damage: i32,
}

/// d20 to-hit against `10 + defense`; damage from the attacker's dice,
/// floored at 1 on a hit.
pub(crate) fn resolve_attack(
    rng: &mut RandomNumberGenerator,
    attacker: &CombatStats,
    defender: &CombatStats,
) -> AttackOutcome {
    let roll = rng.roll_dice(1, 20);
    if roll + attacker.to_hit < 10 + defender.defense {
        return AttackOutcome {
            hit: false,
            damage: 0,
        };
    }
    let dice = attacker.damage;
    let damage = (rng.roll_dice(dice.n_dice, dice.die_type) + dice.bonus).max(1);
    AttackOutcome { hit: true, damage }
}

fn corpse_animation() -> Animation {
    Animation::still(Frame::on_black('%', RGB::from_u8(140, 110, 90)))
}

impl EcsWorld {
    pub fn new(spawn: Point) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(RandomNumberGenerator::seeded(0x5eed_cafe));
        specs_world.insert(MessageLog::default());
        let player = Self::spawn_player(&mut specs_world, spawn);
        let dispatcher = DispatcherBuilder::new()
            .with(WanderSystem::default(), "wander", &[])
            .with(MovementSystem::default(), "movement", &["wander"])
            .build();

        Self {
            specs_world,
            dispatcher,
            player,
            turn: 0,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<IntentStep>();
        world.register::<PlayerTag>();
        world.register::<Monster>();
        world.register::<MonsterBrain>();
        world.register::<MonsterTag>();
        world.register::<CombatStats>();
        world.register::<Corpse>();
    }

    fn spawn_player(world: &mut SpecsWorld, spawn: Point) -> Entity {
        world
            .create_entity()
            .with(Position { point: spawn })
            .with(Renderable {
                animation: data::player_animation(),
                order: PLAYER_DRAW_ORDER,
            })
            .with(data::player_stats())
            .with(PlayerTag)
            .build()
    }

    /// One cooperative tick: snapshot the terrain, run the dispatcher,
    /// apply lazy updates.
    pub fn advance(&mut self, level: &Level) {
        let context = TerrainContext::from_level(level, self.player_point());
        self.specs_world.insert(context);
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
        self.turn = self.turn.wrapping_add(1);
    }

    pub fn queue_player_step(&mut self, delta: Point) {
        let mut intents = self.specs_world.write_component::<IntentStep>();
        let _ = intents.insert(self.player, IntentStep { delta });
    }

    pub fn clear_player_intent(&mut self) {
        let mut intents = self.specs_world.write_component::<IntentStep>();
        let _ = intents.remove(self.player);
    }

    /// A living monster (brain still attached) standing on `point`.
    pub fn monster_at(&self, point: Point) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let brains = self.specs_world.read_component::<MonsterBrain>();
        (&entities, &positions, &brains)
            .join()
            .find(|(_, pos, _)| pos.point == point)
            .map(|(entity, _, _)| entity)
    }

    pub fn corpse_at(&self, point: Point) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let corpses = self.specs_world.read_component::<Corpse>();
        (&entities, &positions, &corpses)
            .join()
            .find(|(_, pos, _)| pos.point == point)
            .map(|(entity, _, _)| entity)
    }

    pub fn player_attack(&mut self, target_point: Point) -> Option<AttackReport> {
        let target = self.monster_at(target_point)?;
        let (outcome, name, slain) = {
            let mut stats = self.specs_world.write_component::<CombatStats>();
            let monsters = self.specs_world.read_component::<Monster>();
            let mut rng = self.specs_world.write_resource::<RandomNumberGenerator>();
            let attacker = stats.get(self.player)?.clone();
            let defender = stats.get_mut(target)?;
            let name = monsters
                .get(target)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| "foe".to_string());
            let outcome = resolve_attack(&mut rng, &attacker, defender);
            if outcome.hit {
                defender.hp = (defender.hp - outcome.damage).max(0);
            }
            let slain = outcome.hit && defender.hp == 0;
            (outcome, name, slain)
        };

        let mut lines = Vec::new();
        if !outcome.hit {
            lines.push(format!("You swing at the {name} and miss."));
        } else {
            lines.push(format!("You strike the {name} for {}.", outcome.damage));
            if slain {
                self.become_corpse(target);
                lines.push(format!("The {name} collapses into a heap."));
            }
        }
        Some(AttackReport { lines, slain })
    }

    /// Swap an entity's living appearance and brain out for a corpse,
    /// recording enough to bring it back.
    fn become_corpse(&mut self, entity: Entity) {
        let name = {
            let monsters = self.specs_world.read_component::<Monster>();
            monsters
                .get(entity)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| "adventurer".to_string())
        };
        let wander_chance = {
            let mut brains = self.specs_world.write_component::<MonsterBrain>();
            brains.remove(entity).map(|brain| brain.wander_chance)
        };
        let record = {
            let mut renderables = self.specs_world.write_component::<Renderable>();
            renderables.get_mut(entity).map(|renderable| {
                let living = renderable.animation.clone();
                let order = renderable.order;
                renderable.animation = corpse_animation();
                renderable.order = CORPSE_DRAW_ORDER;
                (living, order)
            })
        };
        if let Some((animation, order)) = record {
            let mut corpses = self.specs_world.write_component::<Corpse>();
            let _ = corpses.insert(
                entity,
                Corpse {
                    name,
                    animation,
                    order,
                    wander_chance,
                },
            );
        }
    }

    /// Restore a corpse: recorded appearance and brain back, half health.
    pub fn revive(&mut self, entity: Entity) -> Option<String> {
        let corpse = {
            let mut corpses = self.specs_world.write_component::<Corpse>();
            corpses.remove(entity)
        }?;
        {
            let mut renderables = self.specs_world.write_component::<Renderable>();
            if let Some(renderable) = renderables.get_mut(entity) {
                renderable.animation = corpse.animation.clone();
                renderable.order = corpse.order;
            }
        }
        {
            let mut stats = self.specs_world.write_component::<CombatStats>();
            if let Some(stat) = stats.get_mut(entity) {
                stat.hp = (stat.max_hp / 2).max(1);
            }
        }
        if let Some(wander_chance) = corpse.wander_chance {
            let mut brains = self.specs_world.write_component::<MonsterBrain>();
            let _ = brains.insert(entity, MonsterBrain { wander_chance });
        }
        Some(format!("The {} shudders back to its feet!", corpse.name))
    }

    /// Revive the first corpse on or next to `from` (the player's own corpse
    /// excluded; self-revival goes through `revive_player`).
    pub fn revive_adjacent(&mut self, from: Point) -> Option<String> {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let point = Point::new(from.x + dx, from.y + dy);
                if let Some(entity) = self.corpse_at(point) {
                    if entity == self.player {
                        continue;
                    }
                    return self.revive(entity);
                }
            }
        }
        None
    }

    pub fn is_player_dead(&self) -> bool {
        let corpses = self.specs_world.read_component::<Corpse>();
        corpses.contains(self.player)
    }

    pub fn mark_player_dead(&mut self) {
        if !self.is_player_dead() {
            self.become_corpse(self.player);
        }
    }

    pub fn revive_player(&mut self) -> Option<String> {
        if !self.is_player_dead() {
            return None;
        }
        self.revive(self.player)
            .map(|_| "You claw your way back from death.".to_string())
    }

    pub fn player_stats(&self) -> Option<CombatStats> {
        let stats = self.specs_world.read_component::<CombatStats>();
        stats.get(self.player).cloned()
    }

    pub fn player_point(&self) -> Point {
        let positions = self.specs_world.read_component::<Position>();
        positions
            .get(self.player)
            .map(|pos| pos.point)
            .unwrap_or(Point::new(0, 0))
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn set_player_position(&mut self, point: Point) {
        let mut positions = self.specs_world.write_component::<Position>();
        if let Some(pos) = positions.get_mut(self.player) {
            pos.point = point;
        }
    }

    pub fn drain_log(&mut self) -> Vec<String> {
        let mut log = self.specs_world.write_resource::<MessageLog>();
        std::mem::take(&mut log.entries)
    }

    /// One animation step for every entity. Driven by the render timer, not
    /// by game turns, so creatures keep pulsing while the player thinks.
    pub fn advance_animations(&mut self) {
        let mut renderables = self.specs_world.write_component::<Renderable>();
        for renderable in (&mut renderables).join() {
            if renderable.animation.frame_count() > 1 {
                renderable.animation.advance();
            }
        }
    }

    pub fn spawn_monster(&mut self, template: &MonsterTemplate, point: Point) {
        self.specs_world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                animation: template.animation(),
                order: MONSTER_DRAW_ORDER,
            })
            .with(Monster {
                name: template.name.to_string(),
            })
            .with(MonsterBrain {
                wander_chance: template.wander_chance,
            })
            .with(template.combat_stats())
            .with(MonsterTag::default())
            .build();
    }

    /// Current frame of every positioned entity, for the camera to overlay.
    pub fn renderable_snapshot(&self) -> Vec<EntityFrame> {
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        (&positions, &renderables)
            .join()
            .map(|(pos, renderable)| EntityFrame {
                point: pos.point,
                order: renderable.order,
                frame: renderable.animation.current(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_random::prelude::DiceType;
    use bracket_terminal::prelude::RGB;

    fn sure_hit_stats() -> CombatStats {
        CombatStats {
            max_hp: 10,
            hp: 10,
            to_hit: 30,
            defense: 0,
            damage: DiceType::new(1, 1, 3),
        }
    }

    fn sure_miss_stats() -> CombatStats {
        CombatStats {
            to_hit: -30,
            ..sure_hit_stats()
        }
    }

    fn frail_template() -> MonsterTemplate {
        MonsterTemplate {
            name: "Test Slime",
            glyph: 's',
            color: RGB::from_u8(120, 220, 120),
            flicker: None,
            wander_chance: 0.0,
            hp: 1,
            to_hit: -30,
            defense: -30,
            damage: DiceType::new(1, 1, 0),
        }
    }

    #[test]
    fn sure_hit_always_lands_with_fixed_damage() {
        let mut rng = RandomNumberGenerator::seeded(42);
        let attacker = sure_hit_stats();
        let defender = sure_hit_stats();
        for _ in 0..20 {
            let outcome = resolve_attack(&mut rng, &attacker, &defender);
            assert!(outcome.hit);
            // 1d1+3 is always 4.
            assert_eq!(outcome.damage, 4);
        }
    }

    #[test]
    fn sure_miss_never_lands() {
        let mut rng = RandomNumberGenerator::seeded(42);
        let attacker = sure_miss_stats();
        let defender = sure_hit_stats();
        for _ in 0..20 {
            let outcome = resolve_attack(&mut rng, &attacker, &defender);
            assert!(!outcome.hit);
            assert_eq!(outcome.damage, 0);
        }
    }

    #[test]
    fn queued_step_moves_the_player() {
        let level = Level::open(5, 5);
        let mut ecs = EcsWorld::new(Point::new(2, 2));
        ecs.queue_player_step(Point::new(1, 0));
        ecs.advance(&level);
        assert_eq!(ecs.player_point(), Point::new(3, 2));
        assert_eq!(ecs.turn, 1);
    }

    #[test]
    fn blocked_step_leaves_the_player_in_place() {
        let mut level = Level::open(5, 5);
        level.set_tile(Point::new(3, 2), crate::map::Tile::wall());
        let mut ecs = EcsWorld::new(Point::new(2, 2));
        ecs.queue_player_step(Point::new(1, 0));
        ecs.advance(&level);
        assert_eq!(ecs.player_point(), Point::new(2, 2));
    }

    #[test]
    fn slain_monster_becomes_a_corpse_and_can_be_revived() {
        let mut ecs = EcsWorld::new(Point::new(2, 2));
        let lair = Point::new(3, 2);
        ecs.spawn_monster(&frail_template(), lair);
        assert!(ecs.monster_at(lair).is_some());

        let report = ecs.player_attack(lair).expect("monster was adjacent");
        assert!(report.slain);
        assert!(ecs.monster_at(lair).is_none(), "brain removed on death");
        assert!(ecs.corpse_at(lair).is_some(), "body stays behind");

        let message = ecs.revive_adjacent(ecs.player_point());
        assert!(message.is_some());
        assert!(ecs.monster_at(lair).is_some(), "revival restores the brain");
        assert!(ecs.corpse_at(lair).is_none());
    }

    #[test]
    fn attacking_empty_space_reports_nothing() {
        let mut ecs = EcsWorld::new(Point::new(2, 2));
        assert!(ecs.player_attack(Point::new(3, 2)).is_none());
    }

    #[test]
    fn player_death_and_self_revival() {
        let mut ecs = EcsWorld::new(Point::new(2, 2));
        assert!(!ecs.is_player_dead());
        assert!(ecs.revive_player().is_none(), "cannot revive while alive");

        ecs.mark_player_dead();
        assert!(ecs.is_player_dead());

        let message = ecs.revive_player();
        assert!(message.is_some());
        assert!(!ecs.is_player_dead());
        let stats = ecs.player_stats().expect("player has stats");
        assert_eq!(stats.hp, (stats.max_hp / 2).max(1));
    }

    #[test]
    fn own_corpse_is_not_revived_as_adjacent() {
        let mut ecs = EcsWorld::new(Point::new(2, 2));
        ecs.mark_player_dead();
        assert!(ecs.revive_adjacent(Point::new(2, 2)).is_none());
        assert!(ecs.is_player_dead());
    }

    #[test]
    fn snapshot_orders_corpses_under_the_player() {
        let mut ecs = EcsWorld::new(Point::new(2, 2));
        ecs.spawn_monster(&frail_template(), Point::new(3, 2));
        let report = ecs.player_attack(Point::new(3, 2)).expect("adjacent");
        assert!(report.slain);

        let snapshot = ecs.renderable_snapshot();
        assert_eq!(snapshot.len(), 2);
        let corpse = snapshot
            .iter()
            .find(|frame| frame.point == Point::new(3, 2))
            .expect("corpse frame present");
        assert_eq!(corpse.order, CORPSE_DRAW_ORDER);
        assert_eq!(corpse.frame.glyph, b'%' as u16);
    }
}
