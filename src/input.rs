//! Input adapter
//!
//! The frame controller only asks "is this intent active right now?". The
//! keyboard implementation below turns crossterm key events into those
//! answers.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub trait InputAdapter {
    fn is_move_left_held(&self) -> bool;
    fn is_move_right_held(&self) -> bool;
    fn is_fire_held(&self) -> bool;
    fn is_start_pressed(&self) -> bool;

    /// Snapshot of every intent for this tick.
    fn poll(&mut self) -> Intents {
        Intents {
            left: self.is_move_left_held(),
            right: self.is_move_right_held(),
            fire: self.is_fire_held(),
            start: self.is_start_pressed(),
        }
    }
}

/// Discrete player intents sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intents {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub start: bool,
}

impl Intents {
    pub const NONE: Intents = Intents {
        left: false,
        right: false,
        fire: false,
        start: false,
    };

    pub fn any(&self) -> bool {
        self.left || self.right || self.fire || self.start
    }
}

/// A fixed set of intents is itself an input source; handy for scripted
/// play and tests.
impl InputAdapter for Intents {
    fn is_move_left_held(&self) -> bool {
        self.left
    }

    fn is_move_right_held(&self) -> bool {
        self.right
    }

    fn is_fire_held(&self) -> bool {
        self.fire
    }

    fn is_start_pressed(&self) -> bool {
        self.start
    }
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// OS key-repeat runs at 15 Hz or more, so 4 frames at 25 FPS (160 ms) is
/// always refreshed before expiry.
pub const HOLD_WINDOW: u64 = 4;

const LEFT_KEYS: [KeyCode; 5] = [
    KeyCode::Left,
    KeyCode::Char('o'),
    KeyCode::Char('O'),
    KeyCode::Char('a'),
    KeyCode::Char('A'),
];
const RIGHT_KEYS: [KeyCode; 5] = [
    KeyCode::Right,
    KeyCode::Char('p'),
    KeyCode::Char('P'),
    KeyCode::Char('d'),
    KeyCode::Char('D'),
];
const FIRE_KEY: KeyCode = KeyCode::Char(' ');

/// Held-key tracker fed from crossterm events.
///
/// Records the frame of the last press/repeat for every key. Keyboard-
/// enhancement terminals (kitty protocol) also deliver release events, which
/// drop the key at once; elsewhere keys expire after [`HOLD_WINDOW`] frames
/// of silence.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    quit: bool,
    restart: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame; keys age by one.
    pub fn next_frame(&mut self) {
        self.frame += 1;
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
        else {
            return;
        };

        match kind {
            KeyEventKind::Press => {
                self.key_frame.insert(*code, self.frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => self.restart = true,
                    _ => {}
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(*code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(code);
            }
        }
    }

    /// True if `key` was seen within the last [`HOLD_WINDOW`] frames.
    pub fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Returns and clears a pending restart request.
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart)
    }
}

impl InputAdapter for KeyboardInput {
    fn is_move_left_held(&self) -> bool {
        self.any_held(&LEFT_KEYS)
    }

    fn is_move_right_held(&self) -> bool {
        self.any_held(&RIGHT_KEYS)
    }

    fn is_fire_held(&self) -> bool {
        self.is_held(&FIRE_KEY)
    }

    fn is_start_pressed(&self) -> bool {
        self.is_held(&FIRE_KEY)
    }
}
