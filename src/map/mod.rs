#![allow(dead_code)]

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::{BLACK, RGB};
use smallvec::SmallVec;

pub const DEFAULT_MAP_WIDTH: i32 = 50;
pub const DEFAULT_MAP_HEIGHT: i32 = 50;

const WALL_FREQUENCY: i32 = 40;
const AUTOMATON_PASSES: usize = 3;
const WATER_FREQUENCY: i32 = 5;

/// One displayable cell: glyph plus foreground/background color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub glyph: u16,
    pub fg: RGB,
    pub bg: RGB,
}

impl Frame {
    /// The no-visible-content sentinel used for everything outside sight
    /// or outside the grid.
    pub const BLANK: Frame = Frame {
        glyph: b' ' as u16,
        fg: RGB {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        },
        bg: RGB {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        },
    };

    pub fn new(glyph: char, fg: RGB, bg: RGB) -> Self {
        Self {
            glyph: glyph as u16,
            fg,
            bg,
        }
    }

    pub fn on_black(glyph: char, fg: RGB) -> Self {
        Self::new(glyph, fg, RGB::named(BLACK))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::BLANK
    }
}

/// A cyclic frame sequence. Advancing is an explicit tick step; reading the
/// current frame never mutates.
#[derive(Clone, Debug)]
pub struct Animation {
    frames: SmallVec<[Frame; 4]>,
    index: usize,
}

impl Animation {
    pub fn still(frame: Frame) -> Self {
        let mut frames = SmallVec::new();
        frames.push(frame);
        Self { frames, index: 0 }
    }

    pub fn cycle<I: IntoIterator<Item = Frame>>(frames: I) -> Self {
        let frames: SmallVec<[Frame; 4]> = frames.into_iter().collect();
        debug_assert!(!frames.is_empty());
        Self { frames, index: 0 }
    }

    pub fn current(&self) -> Frame {
        self.frames[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.frames.len();
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Tile capabilities resolved by a single match instead of a class chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    Floor,
    Wall,
    Water,
}

impl TileKind {
    pub fn impassable(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    pub fn opaque(self) -> bool {
        matches!(self, TileKind::Wall)
    }

    pub fn on_step(self) -> Option<&'static str> {
        match self {
            TileKind::Water => Some("Cold water laps around your boots."),
            TileKind::Floor | TileKind::Wall => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub kind: TileKind,
    pub animation: Animation,
}

impl Tile {
    pub fn floor() -> Self {
        Self {
            kind: TileKind::Floor,
            animation: Animation::still(Frame::on_black('.', RGB::from_u8(130, 120, 100))),
        }
    }

    pub fn wall() -> Self {
        Self {
            kind: TileKind::Wall,
            animation: Animation::still(Frame::on_black('#', RGB::from_u8(90, 90, 90))),
        }
    }

    pub fn water() -> Self {
        Self {
            kind: TileKind::Water,
            animation: Animation::cycle([
                Frame::on_black('~', RGB::from_u8(70, 120, 220)),
                Frame::on_black('~', RGB::from_u8(100, 160, 255)),
                Frame::on_black('-', RGB::from_u8(80, 140, 240)),
            ]),
        }
    }

    pub fn impassable(&self) -> bool {
        self.kind.impassable()
    }

    pub fn opaque(&self) -> bool {
        self.kind.opaque()
    }

    pub fn current_frame(&self) -> Frame {
        self.animation.current()
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::wall()
    }
}

#[derive(Clone, Debug)]
pub struct Level {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
}

impl Level {
    pub fn empty(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::default(); size],
        }
    }

    /// Open field, no obstructions.
    pub fn open(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::floor(); size],
        }
    }

    /// Cave generation: uniform wall seeding followed by cellular automaton
    /// smoothing, then water pooled onto surviving floor.
    pub fn cave(width: i32, height: i32, seed: u64) -> Self {
        let mut rng = RandomNumberGenerator::seeded(seed);
        let mut level = Self::empty(width, height);

        for tile in level.tiles.iter_mut() {
            *tile = if rng.range(0, 100) < WALL_FREQUENCY {
                Tile::wall()
            } else {
                Tile::floor()
            };
        }

        for _ in 0..AUTOMATON_PASSES {
            level.automaton_pass();
        }

        for idx in 0..level.tiles.len() {
            if level.tiles[idx].kind == TileKind::Floor && rng.range(0, 100) < WATER_FREQUENCY {
                level.tiles[idx] = Tile::water();
            }
        }

        level
    }

    /// Any open cell with five or more wall neighbors (3x3 block, self
    /// included, off-grid counts as open) solidifies.
    pub fn automaton_pass(&mut self) {
        let mut solidify = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if !self.is_wall(point) && self.count_wall_neighbors(point) >= 5 {
                    solidify.push(point);
                }
            }
        }
        for point in solidify {
            self.set_tile(point, Tile::wall());
        }
    }

    pub fn count_wall_neighbors(&self, point: Point) -> i32 {
        let mut walls = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if self.is_wall(Point::new(point.x + dx, point.y + dy)) {
                    walls += 1;
                }
            }
        }
        walls
    }

    fn is_wall(&self, point: Point) -> bool {
        self.tile_at(point)
            .map_or(false, |tile| tile.kind == TileKind::Wall)
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn set_tile(&mut self, point: Point, tile: Tile) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.tiles[idx] = tile;
        }
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.idx(point.x, point.y).map(|idx| &self.tiles[idx])
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile_at(point).map_or(false, |tile| !tile.impassable())
    }

    pub fn walkable_points(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.is_walkable(point) {
                    points.push(point);
                }
            }
        }
        points
    }

    /// Rejection-sample a passable spawn cell.
    pub fn spawn_point(&self, rng: &mut RandomNumberGenerator) -> Point {
        for _ in 0..10_000 {
            let x = rng.range(0, self.width);
            let y = rng.range(0, self.height);
            let point = Point::new(x, y);
            if self.is_walkable(point) {
                return point;
            }
        }
        self.walkable_points()
            .first()
            .copied()
            .unwrap_or(Point::new(0, 0))
    }

    /// One animation step for every tile. Called once per render tick, never
    /// from inside cropping.
    pub fn advance_animations(&mut self) {
        for tile in self.tiles.iter_mut() {
            if tile.animation.frame_count() > 1 {
                tile.animation.advance();
            }
        }
    }
}
