use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use smallvec::SmallVec;

use crate::map::{Frame, Level};

/// Angular resolution of the visibility sweep, in radians. A full circle at
/// this step is ~126 rays. Coarser steps open gaps between rays at larger
/// radii; that undersampling artifact is part of the look and is kept
/// deliberately rather than swapped for shadow casting.
pub const ANGULAR_STEP: f32 = 0.05;

/// An entity snapshot handed to `crop` for overlay. Higher `order` paints
/// later and wins ties.
#[derive(Clone, Debug)]
pub struct EntityFrame {
    pub point: Point,
    pub order: i32,
    pub frame: Frame,
}

/// Square buffer of frames produced by a crop, side length `2 * radius + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    radius: i32,
    frames: Vec<Frame>,
}

impl Viewport {
    fn blank(radius: i32) -> Self {
        let side = (2 * radius + 1) as usize;
        Self {
            radius,
            frames: vec![Frame::BLANK; side * side],
        }
    }

    pub fn side(&self) -> i32 {
        2 * self.radius + 1
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at a centered offset. Offsets outside `[-radius, radius]` read
    /// as `Frame::BLANK`, same as any other cell with nothing visible.
    pub fn get(&self, dx: i32, dy: i32) -> Frame {
        if dx.abs() > self.radius || dy.abs() > self.radius {
            return Frame::BLANK;
        }
        self.frames[self.index(dx, dy)]
    }

    fn set(&mut self, dx: i32, dy: i32, frame: Frame) {
        let idx = self.index(dx, dy);
        self.frames[idx] = frame;
    }

    fn index(&self, dx: i32, dy: i32) -> usize {
        debug_assert!(dx.abs() <= self.radius && dy.abs() <= self.radius);
        ((dy + self.radius) * self.side() + (dx + self.radius)) as usize
    }
}

/// A bounded view of the level, centered on its own position, lit from its
/// anchor. The two coincide except in free-look: rays always originate at
/// the anchor, while cropping follows the camera position.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point,
    pub anchor: Point,
    pub radius: i32,
    free_look: bool,
}

impl Camera {
    pub fn new(anchor: Point, radius: i32) -> Self {
        debug_assert!(radius > 0);
        Self {
            position: anchor,
            anchor,
            radius,
            free_look: false,
        }
    }

    pub fn free_look(&self) -> bool {
        self.free_look
    }

    /// Re-center the light source on the tracked entity. Outside free-look
    /// the camera position follows along.
    pub fn anchor_on(&mut self, point: Point) {
        self.anchor = point;
        if !self.free_look {
            self.position = point;
        }
    }

    /// Toggle free-look. Leaving it snaps the camera back onto the anchor.
    pub fn toggle_free_look(&mut self) {
        if self.free_look {
            self.free_look = false;
            self.position = self.anchor;
        } else {
            self.free_look = true;
        }
    }

    /// Glide the detached camera one step. Refused outside free-look and
    /// refused when the destination is not currently visible from the anchor.
    pub fn try_glide(&mut self, delta: Point, level: &Level) -> bool {
        if !self.free_look {
            return false;
        }
        let target = Point::new(self.position.x + delta.x, self.position.y + delta.y);
        if !self.visible_set(level).contains(&target) {
            return false;
        }
        self.position = target;
        true
    }

    /// Walk a ray from `origin` toward `origin + (dx, dy)` in unit
    /// increments, `max(|dx|, |dy|)` of them (rounded up). Each accumulated
    /// position rounds half-away-from-zero onto a cell. The ray ends at,
    /// and includes, the first opaque cell; the grid edge ends it silently.
    pub fn cast_ray(level: &Level, origin: Point, dx: f32, dy: f32) -> SmallVec<[Point; 32]> {
        let mut cells = SmallVec::new();
        cells.push(origin);

        let steps = dx.abs().max(dy.abs()).ceil() as i32;
        if steps == 0 {
            return cells;
        }
        if level.tile_at(origin).map_or(true, |tile| tile.opaque()) {
            return cells;
        }

        let step_x = dx / steps as f32;
        let step_y = dy / steps as f32;
        let mut fx = origin.x as f32;
        let mut fy = origin.y as f32;

        for _ in 0..steps {
            fx += step_x;
            fy += step_y;
            let cell = Point::new(fx.round() as i32, fy.round() as i32);
            let Some(tile) = level.tile_at(cell) else {
                break;
            };
            cells.push(cell);
            if tile.opaque() {
                break;
            }
        }

        cells
    }

    /// Union of all rays around the anchor. Rebuilt in full on every call;
    /// nothing is carried between frames.
    pub fn visible_set(&self, level: &Level) -> HashSet<Point> {
        let mut visible = HashSet::new();
        let reach = self.radius as f32;
        let mut angle = 0.0f32;
        while angle < std::f32::consts::TAU {
            let dir_x = angle.cos() * reach;
            let dir_y = angle.sin() * reach;
            for cell in Self::cast_ray(level, self.anchor, dir_x, dir_y) {
                visible.insert(cell);
            }
            angle += ANGULAR_STEP;
        }
        visible
    }

    /// Produce a fresh `(2r+1) x (2r+1)` buffer: terrain frames for cells
    /// that are in bounds, inside the anchor's radius box, and visible;
    /// `Frame::BLANK` everywhere else. Entities overlay afterwards in
    /// ascending draw order. Pure with respect to the level: animation
    /// advancement is the caller's explicit tick step.
    pub fn crop(&self, level: &Level, entities: &[EntityFrame]) -> Viewport {
        let visible = self.visible_set(level);
        let mut viewport = Viewport::blank(self.radius);

        for dy in -self.radius..=self.radius {
            for dx in -self.radius..=self.radius {
                let world = Point::new(self.position.x + dx, self.position.y + dy);
                if !self.in_anchor_box(world) || !visible.contains(&world) {
                    continue;
                }
                if let Some(tile) = level.tile_at(world) {
                    viewport.set(dx, dy, tile.current_frame());
                }
            }
        }

        let mut overlay: Vec<&EntityFrame> = entities.iter().collect();
        overlay.sort_by_key(|entity| entity.order);
        for entity in overlay {
            let dx = entity.point.x - self.position.x;
            let dy = entity.point.y - self.position.y;
            if dx.abs() > self.radius || dy.abs() > self.radius {
                continue;
            }
            if !self.in_anchor_box(entity.point)
                || !level.in_bounds(entity.point)
                || !visible.contains(&entity.point)
            {
                continue;
            }
            viewport.set(dx, dy, entity.frame);
        }

        viewport
    }

    fn in_anchor_box(&self, world: Point) -> bool {
        (world.x - self.anchor.x).abs() <= self.radius
            && (world.y - self.anchor.y).abs() <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Tile;
    use bracket_terminal::prelude::RGB;

    fn open_5x5_with_block() -> Level {
        let mut level = Level::open(5, 5);
        level.set_tile(Point::new(2, 2), Tile::wall());
        level
    }

    #[test]
    fn ray_includes_blocker_and_nothing_beyond() {
        let level = open_5x5_with_block();
        let ray = Camera::cast_ray(&level, Point::new(0, 0), 4.0, 4.0);
        assert_eq!(*ray.last().unwrap(), Point::new(2, 2));
        assert!(!ray.contains(&Point::new(3, 3)));
        assert!(!ray.contains(&Point::new(4, 4)));
    }

    #[test]
    fn zero_length_ray_is_the_origin() {
        let level = Level::open(3, 3);
        let ray = Camera::cast_ray(&level, Point::new(1, 1), 0.0, 0.0);
        assert_eq!(ray.as_slice(), &[Point::new(1, 1)]);
    }

    #[test]
    fn ray_from_opaque_origin_stops_immediately() {
        let mut level = Level::open(3, 3);
        level.set_tile(Point::new(0, 0), Tile::wall());
        let ray = Camera::cast_ray(&level, Point::new(0, 0), 2.0, 0.0);
        assert_eq!(ray.as_slice(), &[Point::new(0, 0)]);
    }

    #[test]
    fn ray_stops_at_grid_edge() {
        let level = Level::open(3, 3);
        let ray = Camera::cast_ray(&level, Point::new(1, 1), 6.0, 0.0);
        assert_eq!(*ray.last().unwrap(), Point::new(2, 1));
    }

    #[test]
    fn open_grid_visible_set_approximates_clipped_disk() {
        let level = Level::open(21, 21);
        let camera = Camera::new(Point::new(10, 10), 5);
        let visible = camera.visible_set(&level);
        // Cardinal extremes of the disk are always hit by axis rays.
        for point in [
            Point::new(15, 10),
            Point::new(5, 10),
            Point::new(10, 15),
            Point::new(10, 5),
        ] {
            assert!(visible.contains(&point), "missing {:?}", point);
        }
        // Nothing beyond the radius box.
        for point in &visible {
            assert!((point.x - 10).abs() <= 5 + 1 && (point.y - 10).abs() <= 5 + 1);
        }
        assert!(visible.contains(&Point::new(10, 10)));
    }

    #[test]
    fn visible_set_clips_to_grid_bounds() {
        let level = Level::open(4, 4);
        let camera = Camera::new(Point::new(0, 0), 8);
        let visible = camera.visible_set(&level);
        for point in visible {
            assert!(level.in_bounds(point));
        }
    }

    #[test]
    fn crop_buffer_size_is_fixed() {
        let level = Level::open(3, 3);
        let camera = Camera::new(Point::new(5, 5), 10);
        let viewport = camera.crop(&level, &[]);
        assert_eq!(viewport.len(), 21 * 21);
        assert_eq!(viewport.side(), 21);
    }

    #[test]
    fn reads_outside_the_viewport_are_blank() {
        let level = Level::open(9, 9);
        let camera = Camera::new(Point::new(4, 4), 3);
        let viewport = camera.crop(&level, &[]);
        assert_ne!(viewport.get(0, 0), Frame::BLANK);
        assert_eq!(viewport.get(4, 0), Frame::BLANK);
        assert_eq!(viewport.get(0, -4), Frame::BLANK);
        assert_eq!(viewport.get(-99, 99), Frame::BLANK);
    }

    #[test]
    fn crop_blanks_everything_off_grid() {
        // Anchor far outside a 3x3 grid: every offset whose world cell is
        // outside [0,2]x[0,2] must come back blank.
        let level = Level::open(3, 3);
        let camera = Camera::new(Point::new(5, 5), 10);
        let viewport = camera.crop(&level, &[]);
        for dy in -10..=10 {
            for dx in -10..=10 {
                let world = Point::new(5 + dx, 5 + dy);
                if !level.in_bounds(world) {
                    assert_eq!(viewport.get(dx, dy), Frame::BLANK);
                }
            }
        }
    }

    #[test]
    fn crop_is_idempotent_between_animation_ticks() {
        let level = Level::cave(20, 20, 3);
        let mut rng = bracket_random::prelude::RandomNumberGenerator::seeded(5);
        let anchor = level.spawn_point(&mut rng);
        let camera = Camera::new(anchor, 6);
        assert_eq!(camera.crop(&level, &[]), camera.crop(&level, &[]));
    }

    #[test]
    fn crop_respects_anchor_bounding_box_in_free_look() {
        let level = Level::open(30, 30);
        let mut camera = Camera::new(Point::new(5, 5), 3);
        camera.toggle_free_look();
        // Drag the camera well away from the anchor without the visibility
        // constraint by writing the position directly.
        camera.position = Point::new(12, 5);
        let viewport = camera.crop(&level, &[]);
        // World cells under the far edge of the viewport are outside the
        // anchor's radius box and must be blank even though the grid is open.
        assert_eq!(viewport.get(3, 0), Frame::BLANK);
    }

    #[test]
    fn higher_draw_order_wins_the_cell() {
        let level = Level::open(9, 9);
        let camera = Camera::new(Point::new(4, 4), 3);
        let corpse = EntityFrame {
            point: Point::new(4, 4),
            order: 0,
            frame: Frame::on_black('%', RGB::from_u8(120, 120, 120)),
        };
        let player = EntityFrame {
            point: Point::new(4, 4),
            order: 2,
            frame: Frame::on_black('@', RGB::from_u8(0, 255, 0)),
        };
        // Deliberately pass them out of order.
        let viewport = camera.crop(&level, &[player.clone(), corpse]);
        assert_eq!(viewport.get(0, 0), player.frame);
    }

    #[test]
    fn hidden_entities_are_not_overlaid() {
        let mut level = Level::open(9, 9);
        // Wall off a pocket around (7, 4).
        for y in 3..=5 {
            level.set_tile(Point::new(6, y), Tile::wall());
        }
        level.set_tile(Point::new(7, 3), Tile::wall());
        level.set_tile(Point::new(7, 5), Tile::wall());
        level.set_tile(Point::new(8, 3), Tile::wall());
        level.set_tile(Point::new(8, 5), Tile::wall());
        let camera = Camera::new(Point::new(4, 4), 4);
        let lurker = EntityFrame {
            point: Point::new(7, 4),
            order: 1,
            frame: Frame::on_black('b', RGB::from_u8(200, 80, 80)),
        };
        let viewport = camera.crop(&level, &[lurker]);
        assert_ne!(viewport.get(3, 0), Frame::on_black('b', RGB::from_u8(200, 80, 80)));
    }

    #[test]
    fn glide_is_confined_to_the_visible_set() {
        let mut level = Level::open(9, 9);
        level.set_tile(Point::new(5, 4), Tile::wall());
        level.set_tile(Point::new(5, 3), Tile::wall());
        level.set_tile(Point::new(5, 5), Tile::wall());
        let mut camera = Camera::new(Point::new(4, 4), 4);

        // Not in free-look: refused outright.
        assert!(!camera.try_glide(Point::new(1, 0), &level));

        camera.toggle_free_look();
        // Onto the wall itself: the blocker is visible, so allowed.
        assert!(camera.try_glide(Point::new(1, 0), &level));
        // Past the wall: hidden, refused.
        assert!(!camera.try_glide(Point::new(1, 0), &level));
        assert_eq!(camera.position, Point::new(5, 4));

        // Leaving free-look snaps back to the anchor.
        camera.toggle_free_look();
        assert_eq!(camera.position, camera.anchor);
    }
}
