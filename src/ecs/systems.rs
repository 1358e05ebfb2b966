#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::*;

use super::{
    components::{
        CombatStats, IntentStep, Monster, MonsterBrain, MonsterTag, PlayerTag, Position,
    },
    resolve_attack,
    resources::{MessageLog, TerrainContext},
};

#[derive(Default)]
pub struct WanderSystem;

impl<'a> System<'a> for WanderSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, IntentStep>,
        ReadStorage<'a, Position>,
        ReadStorage<'a, MonsterTag>,
        ReadStorage<'a, MonsterBrain>,
        ReadStorage<'a, CombatStats>,
        ReadExpect<'a, TerrainContext>,
        WriteExpect<'a, RandomNumberGenerator>,
    );

    fn run(
        &mut self,
        (entities, mut intents, positions, monsters, brains, stats, terrain, mut rng): Self::SystemData,
    ) {
        let dirs = [
            Point::new(1, 0),
            Point::new(-1, 0),
            Point::new(0, 1),
            Point::new(0, -1),
        ];
        for (entity, pos, _, brain) in (&entities, &positions, &monsters, &brains).join() {
            let mut acted = false;

            if let Some(stat) = stats.get(entity) {
                let player_distance =
                    DistanceAlg::Pythagoras.distance2d(pos.point, terrain.player_point);
                let hp_ratio = stat.hp as f32 / stat.max_hp as f32;
                if hp_ratio <= 0.3 && player_distance < 6.0 {
                    if let Some(step) = step_away(pos.point, terrain.player_point, &terrain) {
                        let _ = intents.insert(entity, IntentStep { delta: step });
                        acted = true;
                    }
                } else if player_distance <= 8.0 {
                    if let Some(step) = step_towards(pos.point, terrain.player_point, &terrain) {
                        let _ = intents.insert(entity, IntentStep { delta: step });
                        acted = true;
                    }
                }
            }

            if acted {
                continue;
            }

            // Wander with probability `wander_chance`; a chance of 0 never
            // moves and 1 always does.
            let roll = rng.range(0, 100) as f32 / 100.0;
            if roll >= brain.wander_chance {
                continue;
            }
            let dir = dirs[rng.range(0, dirs.len() as i32) as usize];
            if terrain.can_step(pos.point, dir) {
                let _ = intents.insert(entity, IntentStep { delta: dir });
            }
        }
    }
}

#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Position>,
        WriteStorage<'a, IntentStep>,
        ReadExpect<'a, TerrainContext>,
        ReadStorage<'a, PlayerTag>,
        WriteStorage<'a, CombatStats>,
        ReadStorage<'a, Monster>,
        WriteExpect<'a, MessageLog>,
        WriteExpect<'a, RandomNumberGenerator>,
    );

    fn run(
        &mut self,
        (
            entities,
            mut positions,
            mut intents,
            terrain,
            players,
            mut stats,
            monsters,
            mut log,
            mut rng,
        ): Self::SystemData,
    ) {
        let mut player_snapshot = {
            let positions_ref: &WriteStorage<Position> = &positions;
            (&entities, positions_ref, &players)
                .join()
                .next()
                .map(|(entity, pos, _)| (entity, pos.point))
        };

        let mut to_clear = Vec::new();
        for (entity, pos, intent) in (&entities, &mut positions, &intents).join() {
            to_clear.push(entity);
            let target = Point::new(pos.point.x + intent.delta.x, pos.point.y + intent.delta.y);

            if let Some((player_entity, player_point)) = player_snapshot.as_mut() {
                if target == *player_point && entity != *player_entity {
                    // A monster bumping the player swings instead of moving.
                    if let (Some(attacker), Some(defender)) =
                        (stats.get(entity).cloned(), stats.get_mut(*player_entity))
                    {
                        if defender.hp == 0 {
                            continue;
                        }
                        let name = monsters
                            .get(entity)
                            .map(|m| m.name.clone())
                            .unwrap_or_else(|| "something".to_string());
                        let outcome = resolve_attack(&mut rng, &attacker, defender);
                        if outcome.hit {
                            defender.hp = (defender.hp - outcome.damage).max(0);
                            log.push(format!("The {name} claws you for {}.", outcome.damage));
                            if defender.hp == 0 {
                                log.push("You crumple to the cave floor.".to_string());
                            }
                        } else {
                            log.push(format!("The {name} lunges and misses."));
                        }
                    }
                    continue;
                }
            }

            if terrain.can_step(pos.point, intent.delta) {
                pos.point = target;
                if let Some((player_entity, player_point)) = player_snapshot.as_mut() {
                    if entity == *player_entity {
                        *player_point = pos.point;
                        if let Some(note) = terrain.step_note(pos.point) {
                            log.push(note);
                        }
                    }
                }
            }
        }

        for entity in to_clear {
            intents.remove(entity);
        }
    }
}

fn step_towards(from: Point, to: Point, terrain: &TerrainContext) -> Option<Point> {
    let dx = (to.x - from.x).clamp(-1, 1);
    let dy = (to.y - from.y).clamp(-1, 1);
    try_steps(from, dx, dy, terrain)
}

fn step_away(from: Point, to: Point, terrain: &TerrainContext) -> Option<Point> {
    let dx = (from.x - to.x).clamp(-1, 1);
    let dy = (from.y - to.y).clamp(-1, 1);
    try_steps(from, dx, dy, terrain)
}

fn try_steps(from: Point, dx: i32, dy: i32, terrain: &TerrainContext) -> Option<Point> {
    let axes = if dx.abs() >= dy.abs() {
        [Point::new(dx, 0), Point::new(0, dy)]
    } else {
        [Point::new(0, dy), Point::new(dx, 0)]
    };
    for dir in axes {
        if dir == Point::new(0, 0) {
            continue;
        }
        if terrain.can_step(from, dir) {
            return Some(dir);
        }
    }
    None
}
