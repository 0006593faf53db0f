use thiserror::Error;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    Space,
    Shift,
}

impl Button {
    /// Script character for this button, as accepted by [`ScriptedController`].
    pub const fn symbol(self) -> char {
        match self {
            Button::KeyW => 'W',
            Button::KeyA => 'A',
            Button::KeyS => 'S',
            Button::KeyD => 'D',
            Button::KeyQ => 'Q',
            Button::KeyE => 'E',
            Button::Space => 'U',
            Button::Shift => 'J',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Button::KeyW),
            'A' => Some(Button::KeyA),
            'S' => Some(Button::KeyS),
            'D' => Some(Button::KeyD),
            'Q' => Some(Button::KeyQ),
            'E' => Some(Button::KeyE),
            'U' => Some(Button::Space),
            'J' => Some(Button::Shift),
            _ => None,
        }
    }
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown key {0:?} in input script (expected one of W A S D Q E U J or '.')")]
pub struct UnknownKey(pub char);

/// Replays a fixed input script, one step per frame.
///
/// Each character holds one button for a frame; `.` is an idle frame. Once
/// the script runs out, no buttons are down.
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    steps: Vec<Option<Button>>,
    cursor: usize,
    down: Vec<Button>,
}

impl ScriptedController {
    pub fn parse(script: &str) -> Result<Self, UnknownKey> {
        let steps = script
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => Ok(None),
                c => Button::from_symbol(c).map(Some).ok_or(UnknownKey(c)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            steps,
            cursor: 0,
            down: Vec::new(),
        })
    }

    /// Moves to the next scripted step; returns `false` once exhausted.
    pub fn advance(&mut self) -> bool {
        self.down.clear();
        let Some(step) = self.steps.get(self.cursor) else {
            return false;
        };
        self.down.extend(*step);
        self.cursor += 1;
        true
    }

    pub fn remaining(&self) -> usize {
        self.steps.len() - self.cursor
    }
}

impl Controller for ScriptedController {
    fn is_down(&self, button: Button) -> bool {
        self.down.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.down
    }
}
