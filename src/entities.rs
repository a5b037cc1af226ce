/// All game entity types — pure data, no logic.

use crate::geometry::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        *self != Outcome::InProgress
    }
}

/// Horizontal heading of the formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Column delta of one formation step.
    pub fn dx(&self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

// ── Player & projectile ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// Left edge of the ship.
    pub x: i32,
    pub y: i32,
}

/// The player's single shot. Only one exists at a time, so the session
/// holds it as an `Option`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bullet {
    pub x: i32,
    pub y: i32,
}

impl Bullet {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invader {
    /// Slot in the formation grid.
    pub row: usize,
    pub column: usize,
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

impl Invader {
    /// Left edge of the sprite.
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

/// Rectangular grid of invaders moved as one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Formation {
    /// Row-major: slot `(row, column)` lives at `row * columns + column`.
    pub invaders: Vec<Invader>,
    pub rows: usize,
    pub columns: usize,
    /// Position of slot (0, 0); every invader sits at a fixed spacing from it.
    pub anchor: Cell,
    pub direction: Direction,
    /// Ticks since the last formation step.
    pub step_timer: u32,
}

impl Formation {
    pub fn get(&self, row: usize, column: usize) -> Option<&Invader> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.invaders.get(row * self.columns + column)
    }

    pub fn alive(&self) -> impl Iterator<Item = &Invader> {
        self.invaders.iter().filter(|i| i.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// One game from start to win or loss. Cloneable so the engine's pure
/// functions can return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    pub player: Player,
    pub bullet: Option<Bullet>,
    pub formation: Formation,
    pub score: u32,
    pub outcome: Outcome,
    /// Ticks simulated so far.
    pub frame: u64,
}
