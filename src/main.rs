mod camera;
mod data;
mod ecs;
mod input;
mod map;
mod render;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;
use camera::Camera;
use data::monsters::MonsterTemplate;
use ecs::EcsWorld;
use input::{Command, KeyBindings, scripted::ScriptedInput};
use map::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, Level};
use render::{Hud, draw_log, draw_viewport};

const SCREEN_HEIGHT: i32 = 50;
const VIEW_RADIUS: i32 = 8;
const MAP_ORIGIN_X: i32 = 4;
const MAP_ORIGIN_Y: i32 = 7;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 6;
const LOG_MAX_ENTRIES: usize = 8;
// Render ticks between animation frames, roughly 100 ms at vsync.
const ANIMATION_INTERVAL: u64 = 6;
const LEVEL_SEED: u64 = 0xca7e;

struct CavewardState {
    level: Level,
    ecs: EcsWorld,
    camera: Camera,
    hud: Hud,
    bindings: KeyBindings,
    script: Option<ScriptedInput>,
    frame: u64,
    message_log: Vec<String>,
    last_move_attempt: Option<(Point, Point)>,
    player_acted: bool,
}

impl CavewardState {
    fn new(bindings: KeyBindings, script: Option<ScriptedInput>) -> Self {
        let level = Level::cave(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, LEVEL_SEED);
        let mut rng = RandomNumberGenerator::seeded(LEVEL_SEED ^ 0xa5a5);
        let spawn = level.spawn_point(&mut rng);
        let ecs = EcsWorld::new(spawn);
        let camera = Camera::new(spawn, VIEW_RADIUS);
        let mut message_log = data::intro_lines();
        message_log.truncate(LOG_MAX_ENTRIES);

        let mut state = Self {
            level,
            ecs,
            camera,
            hud: Hud::new(),
            bindings,
            script,
            frame: 0,
            message_log,
            last_move_attempt: None,
            player_acted: false,
        };
        state.seed_monsters();
        state
    }

    fn handle_input(&mut self, ctx: &mut BTerm) {
        let command = if let Some(script) = self.script.as_mut() {
            script.next_command()
        } else {
            ctx.key.and_then(|key| self.bindings.command_for(key))
        };

        if let Some(command) = command {
            if self.apply_command(command) {
                ctx.quitting = true;
            }
        }
    }

    /// Route one command; returns true on quit. A dead player can only
    /// revive or quit, and the view stays with the body until then.
    fn apply_command(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return true,
            Command::FreeLook => {
                if self.ecs.is_player_dead() {
                    return false;
                }
                self.camera.toggle_free_look();
                if self.camera.free_look() {
                    self.push_log_entry("Your gaze drifts from your body.");
                } else {
                    self.push_log_entry("You snap back behind your own eyes.");
                }
            }
            Command::Revive => self.try_revive(),
            Command::Wait => {
                if !self.ecs.is_player_dead() && !self.camera.free_look() {
                    self.ecs.clear_player_intent();
                    self.player_acted = true;
                }
            }
            Command::Move(direction) => self.try_step(direction.delta()),
        }
        false
    }

    fn try_step(&mut self, delta: Point) {
        if self.ecs.is_player_dead() {
            return;
        }
        if self.camera.free_look() {
            if !self.camera.try_glide(delta, &self.level) {
                self.push_log_entry("The dark swallows your view there.");
            }
            return;
        }
        if delta.x == 0 && delta.y == 0 {
            return;
        }

        let current = self.ecs.player_point();
        let target = Point::new(current.x + delta.x, current.y + delta.y);
        if let Some(report) = self.ecs.player_attack(target) {
            for line in report.lines {
                self.push_log_entry(line);
            }
            if report.slain {
                // Step into the vacated cell, over the fresh corpse.
                self.ecs.queue_player_step(delta);
                self.last_move_attempt = Some((current, target));
            } else {
                self.last_move_attempt = None;
            }
            self.player_acted = true;
            return;
        }

        self.ecs.queue_player_step(delta);
        self.last_move_attempt = Some((current, target));
        self.player_acted = true;
    }

    fn try_revive(&mut self) {
        if self.ecs.is_player_dead() {
            if let Some(message) = self.ecs.revive_player() {
                self.push_log_entry(message);
                self.player_acted = true;
            }
            return;
        }
        match self.ecs.revive_adjacent(self.ecs.player_point()) {
            Some(message) => {
                self.push_log_entry(message);
                self.player_acted = true;
            }
            None => self.push_log_entry("Nothing here will rise."),
        }
    }

    fn resolve_move_attempt(&mut self, previous_point: Point) {
        if let Some((origin, target)) = self.last_move_attempt.take() {
            let current = self.ecs.player_point();
            if current != target && origin == previous_point {
                self.push_log_entry(format!("Blocked at {},{}.", target.x, target.y));
            }
        }
    }

    fn check_player_death(&mut self) {
        if let Some(stats) = self.ecs.player_stats() {
            if stats.hp == 0 && !self.ecs.is_player_dead() {
                self.ecs.mark_player_dead();
                self.push_log_entry("Your lantern gutters out. R to rise again.");
            }
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }

    fn draw_scene(&mut self, ctx: &mut BTerm) {
        let viewport = self
            .camera
            .crop(&self.level, &self.ecs.renderable_snapshot());
        draw_viewport(ctx, &viewport, Point::new(MAP_ORIGIN_X, MAP_ORIGIN_Y));
        self.hud.draw(
            ctx,
            self.ecs.player_stats().as_ref(),
            self.ecs.turn,
            self.camera.free_look(),
            self.ecs.is_player_dead(),
        );
        draw_log(ctx, &self.message_log, LOG_PANEL_START);
    }

    fn seed_monsters(&mut self) {
        let mut rng = RandomNumberGenerator::seeded(LEVEL_SEED.wrapping_mul(31));
        let mut walkable = self.level.walkable_points();
        let templates = MonsterTemplate::cave_dwellers();
        if walkable.is_empty() || templates.is_empty() {
            return;
        }
        let spawn_count = (walkable.len() / 60).clamp(4, 10);
        for _ in 0..spawn_count {
            if walkable.is_empty() {
                break;
            }
            let idx = rng.range(0, walkable.len() as i32) as usize;
            let point = walkable.swap_remove(idx);
            if point == self.ecs.player_point() {
                continue;
            }
            let template = &templates[rng.range(0, templates.len() as i32) as usize];
            self.ecs.spawn_monster(template, point);
        }
    }
}

impl GameState for CavewardState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        self.frame = self.frame.wrapping_add(1);

        if self.player_acted {
            self.player_acted = false;
            let previous_point = self.ecs.player_point();
            self.ecs.advance(&self.level);
            self.resolve_move_attempt(previous_point);
            self.check_player_death();
        }

        if self.frame % ANIMATION_INTERVAL == 0 {
            self.level.advance_animations();
            self.ecs.advance_animations();
        }

        self.camera.anchor_on(self.ecs.player_point());
        for entry in self.ecs.drain_log() {
            self.push_log_entry(entry);
        }

        ctx.cls();
        self.draw_scene(ctx);
    }
}

fn main() -> BError {
    let mut bindings = KeyBindings::default();
    let mut script = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--keys" => {
                if let Some(path) = args.next() {
                    bindings = KeyBindings::load_or_default(path);
                }
            }
            "--script" => {
                if let Some(path) = args.next() {
                    match ScriptedInput::from_file(&path) {
                        Ok(loaded) => script = Some(loaded),
                        Err(err) => eprintln!("Warning: could not read script {path}: {err}"),
                    }
                }
            }
            other => eprintln!("Warning: unknown argument {other}"),
        }
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Caveward · Lantern Descent")
        .build()?;
    let game_state = CavewardState::new(bindings, script);
    main_loop(context, game_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;

    #[test]
    fn dead_player_commands_are_limited_to_revive_and_quit() {
        let mut state = CavewardState::new(KeyBindings::default(), None);
        state.ecs.mark_player_dead();
        let body = state.ecs.player_point();

        state.apply_command(Command::FreeLook);
        assert!(!state.camera.free_look(), "no drifting out of a corpse");

        state.apply_command(Command::Move(Direction::East));
        assert!(!state.player_acted);
        assert_eq!(state.camera.position, body);

        state.apply_command(Command::Wait);
        assert!(!state.player_acted);

        assert!(state.apply_command(Command::Quit));

        state.apply_command(Command::Revive);
        assert!(!state.ecs.is_player_dead());
        state.apply_command(Command::FreeLook);
        assert!(state.camera.free_look());
    }
}
