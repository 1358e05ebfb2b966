#![allow(dead_code)]

pub mod scripted;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::VirtualKeyCode;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::South => Point::new(0, 1),
            Direction::East => Point::new(1, 0),
            Direction::West => Point::new(-1, 0),
            Direction::NorthEast => Point::new(1, -1),
            Direction::NorthWest => Point::new(-1, -1),
            Direction::SouthEast => Point::new(1, 1),
            Direction::SouthWest => Point::new(-1, 1),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Wait,
    FreeLook,
    Revive,
    Quit,
}

/// The keybinding table: key names to commands. Serialized as a flat JSON
/// object so a bindings file reads `{"H": {"Move": "West"}, "Period": "Wait"}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: HashMap<String, Command>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        let entries: [(&str, Command); 26] = [
            ("Left", Command::Move(Direction::West)),
            ("Right", Command::Move(Direction::East)),
            ("Up", Command::Move(Direction::North)),
            ("Down", Command::Move(Direction::South)),
            ("H", Command::Move(Direction::West)),
            ("J", Command::Move(Direction::South)),
            ("K", Command::Move(Direction::North)),
            ("L", Command::Move(Direction::East)),
            ("Y", Command::Move(Direction::NorthWest)),
            ("U", Command::Move(Direction::NorthEast)),
            ("B", Command::Move(Direction::SouthWest)),
            ("N", Command::Move(Direction::SouthEast)),
            ("Numpad1", Command::Move(Direction::SouthWest)),
            ("Numpad2", Command::Move(Direction::South)),
            ("Numpad3", Command::Move(Direction::SouthEast)),
            ("Numpad4", Command::Move(Direction::West)),
            ("Numpad5", Command::Wait),
            ("Numpad6", Command::Move(Direction::East)),
            ("Numpad7", Command::Move(Direction::NorthWest)),
            ("Numpad8", Command::Move(Direction::North)),
            ("Numpad9", Command::Move(Direction::NorthEast)),
            ("Period", Command::Wait),
            ("F", Command::FreeLook),
            ("R", Command::Revive),
            ("Escape", Command::Quit),
            ("Q", Command::Quit),
        ];
        for (name, command) in entries {
            bindings.insert(name.to_string(), command);
        }
        Self { bindings }
    }
}

impl KeyBindings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    /// Bindings from `path`, or the built-in table when the file is absent
    /// or malformed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path.as_ref()) {
            Ok(bindings) => bindings,
            Err(err) => {
                eprintln!(
                    "Warning: could not read keybindings from {}: {err}",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    pub fn command_for(&self, key: VirtualKeyCode) -> Option<Command> {
        key_name(key).and_then(|name| self.bindings.get(name).copied())
    }

    pub fn bind<S: Into<String>>(&mut self, name: S, command: Command) {
        self.bindings.insert(name.into(), command);
    }
}

fn key_name(key: VirtualKeyCode) -> Option<&'static str> {
    let name = match key {
        VirtualKeyCode::Left => "Left",
        VirtualKeyCode::Right => "Right",
        VirtualKeyCode::Up => "Up",
        VirtualKeyCode::Down => "Down",
        VirtualKeyCode::H => "H",
        VirtualKeyCode::J => "J",
        VirtualKeyCode::K => "K",
        VirtualKeyCode::L => "L",
        VirtualKeyCode::Y => "Y",
        VirtualKeyCode::U => "U",
        VirtualKeyCode::B => "B",
        VirtualKeyCode::N => "N",
        VirtualKeyCode::F => "F",
        VirtualKeyCode::R => "R",
        VirtualKeyCode::Q => "Q",
        VirtualKeyCode::Period => "Period",
        VirtualKeyCode::Escape => "Escape",
        VirtualKeyCode::Numpad1 => "Numpad1",
        VirtualKeyCode::Numpad2 => "Numpad2",
        VirtualKeyCode::Numpad3 => "Numpad3",
        VirtualKeyCode::Numpad4 => "Numpad4",
        VirtualKeyCode::Numpad5 => "Numpad5",
        VirtualKeyCode::Numpad6 => "Numpad6",
        VirtualKeyCode::Numpad7 => "Numpad7",
        VirtualKeyCode::Numpad8 => "Numpad8",
        VirtualKeyCode::Numpad9 => "Numpad9",
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_movement_and_meta_keys() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.command_for(VirtualKeyCode::Left),
            Some(Command::Move(Direction::West))
        );
        assert_eq!(
            bindings.command_for(VirtualKeyCode::Numpad9),
            Some(Command::Move(Direction::NorthEast))
        );
        assert_eq!(bindings.command_for(VirtualKeyCode::Period), Some(Command::Wait));
        assert_eq!(bindings.command_for(VirtualKeyCode::F), Some(Command::FreeLook));
        assert_eq!(bindings.command_for(VirtualKeyCode::R), Some(Command::Revive));
        assert_eq!(bindings.command_for(VirtualKeyCode::Escape), Some(Command::Quit));
    }

    #[test]
    fn unbound_keys_do_nothing() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.command_for(VirtualKeyCode::Z), None);
        assert_eq!(bindings.command_for(VirtualKeyCode::Space), None);
    }

    #[test]
    fn bindings_parse_from_flat_json() {
        let json = r#"{"K": "Wait", "Space": {"Move": "North"}}"#;
        let bindings: KeyBindings = serde_json::from_str(json).expect("valid bindings");
        assert_eq!(bindings.command_for(VirtualKeyCode::K), Some(Command::Wait));
        // "Space" has no key name mapping, so it stays inert even when bound.
        assert_eq!(bindings.command_for(VirtualKeyCode::Space), None);
        // Keys absent from the file are unbound.
        assert_eq!(bindings.command_for(VirtualKeyCode::H), None);
    }

    #[test]
    fn rebinding_overrides_the_default() {
        let mut bindings = KeyBindings::default();
        bindings.bind("K", Command::Quit);
        assert_eq!(bindings.command_for(VirtualKeyCode::K), Some(Command::Quit));
    }

    #[test]
    fn directions_cover_the_eight_neighbors() {
        use std::collections::HashSet;
        let all = [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ];
        let deltas: HashSet<(i32, i32)> =
            all.iter().map(|dir| (dir.delta().x, dir.delta().y)).collect();
        assert_eq!(deltas.len(), 8);
        assert!(!deltas.contains(&(0, 0)));
    }
}
