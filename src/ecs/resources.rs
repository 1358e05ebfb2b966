#![allow(dead_code)]

use bracket_geometry::prelude::Point;

use crate::map::Level;

/// Passability snapshot of the level taken once per tick, so systems never
/// borrow the level itself.
#[derive(Clone)]
pub struct TerrainContext {
    pub width: i32,
    pub height: i32,
    pub player_point: Point,
    walkable: Vec<bool>,
    step_notes: Vec<Option<&'static str>>,
}

impl TerrainContext {
    pub fn from_level(level: &Level, player_point: Point) -> Self {
        let walkable = level
            .tiles
            .iter()
            .map(|tile| !tile.impassable())
            .collect::<Vec<bool>>();
        let step_notes = level
            .tiles
            .iter()
            .map(|tile| tile.kind.on_step())
            .collect::<Vec<Option<&'static str>>>();

        Self {
            width: level.width,
            height: level.height,
            player_point,
            walkable,
            step_notes,
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        if !self.in_bounds(point) {
            return false;
        }
        let idx = (point.y * self.width + point.x) as usize;
        self.walkable.get(idx).copied().unwrap_or(false)
    }

    /// Legality of a single step, including the corner rule: a diagonal is
    /// allowed only when at least one of the two orthogonal cells beside it
    /// is passable.
    pub fn can_step(&self, from: Point, delta: Point) -> bool {
        let target = Point::new(from.x + delta.x, from.y + delta.y);
        if !self.is_walkable(target) {
            return false;
        }
        if delta.x != 0 && delta.y != 0 {
            return self.is_walkable(Point::new(from.x + delta.x, from.y))
                || self.is_walkable(Point::new(from.x, from.y + delta.y));
        }
        true
    }

    pub fn step_note(&self, point: Point) -> Option<&'static str> {
        if !self.in_bounds(point) {
            return None;
        }
        let idx = (point.y * self.width + point.x) as usize;
        self.step_notes.get(idx).copied().flatten()
    }
}

/// In-game message stream. Systems push, the state drains once per tick.
#[derive(Default)]
pub struct MessageLog {
    pub entries: Vec<String>,
}

impl MessageLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Tile;

    #[test]
    fn corner_rule_blocks_diagonal_squeeze() {
        let mut level = Level::open(3, 3);
        level.set_tile(Point::new(1, 0), Tile::wall());
        level.set_tile(Point::new(0, 1), Tile::wall());
        let ctx = TerrainContext::from_level(&level, Point::new(0, 0));
        // (1, 1) itself is open but both flanking cells are walls.
        assert!(!ctx.can_step(Point::new(0, 0), Point::new(1, 1)));
    }

    #[test]
    fn corner_rule_allows_diagonal_past_one_wall() {
        let mut level = Level::open(3, 3);
        level.set_tile(Point::new(1, 0), Tile::wall());
        let ctx = TerrainContext::from_level(&level, Point::new(0, 0));
        assert!(ctx.can_step(Point::new(0, 0), Point::new(1, 1)));
    }

    #[test]
    fn orthogonal_step_onto_wall_is_refused() {
        let mut level = Level::open(3, 3);
        level.set_tile(Point::new(1, 0), Tile::wall());
        let ctx = TerrainContext::from_level(&level, Point::new(0, 0));
        assert!(!ctx.can_step(Point::new(0, 0), Point::new(1, 0)));
        assert!(ctx.can_step(Point::new(0, 0), Point::new(0, 1)));
    }

    #[test]
    fn stepping_off_grid_is_refused() {
        let level = Level::open(2, 2);
        let ctx = TerrainContext::from_level(&level, Point::new(0, 0));
        assert!(!ctx.can_step(Point::new(0, 0), Point::new(-1, 0)));
        assert!(!ctx.can_step(Point::new(1, 1), Point::new(0, 1)));
    }

    #[test]
    fn water_has_a_step_note() {
        let mut level = Level::open(2, 2);
        level.set_tile(Point::new(1, 1), Tile::water());
        let ctx = TerrainContext::from_level(&level, Point::new(0, 0));
        assert!(ctx.step_note(Point::new(1, 1)).is_some());
        assert!(ctx.step_note(Point::new(0, 0)).is_none());
        assert!(ctx.step_note(Point::new(9, 9)).is_none());
    }
}
