#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::camera::Viewport;
use crate::ecs::components::CombatStats;

pub struct Hud;

impl Hud {
    pub const fn new() -> Self {
        Self
    }

    pub fn draw(
        &self,
        ctx: &mut BTerm,
        stats: Option<&CombatStats>,
        turn: u64,
        free_look: bool,
        player_dead: bool,
    ) {
        let (width, _) = ctx.get_char_size();
        ctx.draw_box(0, 0, width - 1, 5, RGB::named(GRAY), RGB::named(BLACK));
        ctx.print_color(
            2,
            1,
            RGB::named(WHITE),
            RGB::named(BLACK),
            format!("Caveward · Turn {turn}"),
        );

        if let Some(stats) = stats {
            let ratio = stats.hp as f32 / stats.max_hp.max(1) as f32;
            let hp_color = if ratio <= 0.3 {
                RGB::named(RED)
            } else if ratio <= 0.6 {
                RGB::named(ORANGE)
            } else {
                RGB::named(LIGHT_GREEN)
            };
            ctx.print_color(
                2,
                2,
                hp_color,
                RGB::named(BLACK),
                format!("HP {}/{}", stats.hp, stats.max_hp),
            );
        }

        let mode = if player_dead {
            "You are dead. R to rise again."
        } else if free_look {
            "Free-look · F to return"
        } else {
            "Lantern follows you"
        };
        ctx.print_color(2, 3, RGB::named(LIGHT_CYAN), RGB::named(BLACK), mode);
    }
}

/// Blit the cropped buffer, top-left corner at `origin`.
pub fn draw_viewport(ctx: &mut BTerm, viewport: &Viewport, origin: Point) {
    let radius = (viewport.side() - 1) / 2;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let frame = viewport.get(dx, dy);
            ctx.set(
                origin.x + dx + radius,
                origin.y + dy + radius,
                frame.fg,
                frame.bg,
                frame.glyph,
            );
        }
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len() as i32).min(5) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, top + 1, RGB::named(WHITE), RGB::named(BLACK), "Events");
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}
