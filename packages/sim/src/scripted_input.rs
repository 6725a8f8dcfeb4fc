use std::fs;
use std::path::Path;

use anyhow::Context;
use mq_engine::ActionInput;
use mq_engine::Direction;
use tracing::warn;

/// Walks the courtyard plate, heads through the north door and back.
pub const DEFAULT_SCRIPT: &str = "
# to the courtyard plate
wwwwwwwwwwwwwwwwww
# wait for the north door
..........
# through it and back
wwwwwwwwwwwwwwwwwwwwwwwwwwww
....
ssssssssssss
ffffff
";

/// One input per character: `wasd` hold a direction, `f` swings and `.`
/// waits. Whitespace is ignored and a `#` line is a comment.
pub struct ScriptedInput {
    inputs: Vec<ActionInput>,
    index: usize,
}

impl ScriptedInput {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut inputs = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            for c in line.chars().filter(|c| !c.is_whitespace()) {
                match input_for(c) {
                    Some(input) => inputs.push(input),
                    None => warn!("unknown key in script: {c:?}"),
                }
            }
        }
        Self { inputs, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::parse(DEFAULT_SCRIPT)
    }
}

impl Iterator for ScriptedInput {
    type Item = ActionInput;

    fn next(&mut self) -> Option<ActionInput> {
        let input = self.inputs.get(self.index).copied()?;
        self.index += 1;
        Some(input)
    }
}

fn input_for(c: char) -> Option<ActionInput> {
    match c.to_ascii_lowercase() {
        'w' => Some(ActionInput::moving(Direction::North)),
        'a' => Some(ActionInput::moving(Direction::West)),
        's' => Some(ActionInput::moving(Direction::South)),
        'd' => Some(ActionInput::moving(Direction::East)),
        'f' => Some(ActionInput::attacking()),
        '.' => Some(ActionInput::default()),
        _ => None,
    }
}
