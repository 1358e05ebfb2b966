use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use super::{Command, Direction};

/// Replays a text file of one-character commands, one keypress per tick.
/// Lines starting with `#` are comments.
pub struct ScriptedInput {
    commands: Vec<Command>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut commands = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            for ch in trimmed.chars() {
                if ch.is_whitespace() {
                    continue;
                }
                if let Some(command) = char_to_command(ch) {
                    commands.push(command);
                } else {
                    eprintln!("Warning: unknown key in script: {ch}");
                }
            }
        }

        Ok(Self {
            commands,
            cursor: 0,
        })
    }

    #[cfg(test)]
    fn from_line(line: &str) -> Self {
        let commands = line.chars().filter_map(char_to_command).collect();
        Self {
            commands,
            cursor: 0,
        }
    }

    pub fn next_command(&mut self) -> Option<Command> {
        let command = self.commands.get(self.cursor).copied();
        if command.is_some() {
            self.cursor += 1;
        }
        command
    }
}

fn char_to_command(ch: char) -> Option<Command> {
    match ch.to_ascii_lowercase() {
        'h' => Some(Command::Move(Direction::West)),
        'j' => Some(Command::Move(Direction::South)),
        'k' => Some(Command::Move(Direction::North)),
        'l' => Some(Command::Move(Direction::East)),
        'y' => Some(Command::Move(Direction::NorthWest)),
        'u' => Some(Command::Move(Direction::NorthEast)),
        'b' => Some(Command::Move(Direction::SouthWest)),
        'n' => Some(Command::Move(Direction::SouthEast)),
        '.' => Some(Command::Wait),
        'f' => Some(Command::FreeLook),
        'r' => Some(Command::Revive),
        'q' => Some(Command::Quit),
        _ => None,
    }
}
