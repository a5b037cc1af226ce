//! Render contract
//!
//! The engine never writes to a screen. Each frame is expressed as calls on a
//! [`RenderAdapter`]: clear the playfield, draw the score, then one
//! `draw_cell` per occupied cell. Any backend (terminal, headless buffer)
//! implements the trait.

use std::io;

use crate::config::GameConfig;
use crate::entities::{GameSession, Outcome};
use crate::geometry::{footprint, Cell, Playfield};

/// Logical sprite symbols. Mapping a glyph to pixels or characters is the
/// adapter's business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Glyph {
    Player,
    Invader,
    Bullet,
}

/// The eight-colour attribute palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colour {
    Black,
    Blue,
    Red,
    Magenta,
    Green,
    Cyan,
    Yellow,
    White,
}

/// Ink (foreground) and paper (background) of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Attr {
    pub ink: Colour,
    pub paper: Colour,
}

impl Attr {
    pub const fn new(ink: Colour, paper: Colour) -> Self {
        Self { ink, paper }
    }
}

pub const ATTR_PLAYER: Attr = Attr::new(Colour::Green, Colour::Black);
pub const ATTR_INVADER: Attr = Attr::new(Colour::Red, Colour::Black);
pub const ATTR_BULLET: Attr = Attr::new(Colour::Yellow, Colour::Black);

pub const TITLE_TEXT: &str = "SPACE INVADERS";
pub const CONTROLS_TEXT: &str = "O/P: MOVE, SPACE: FIRE";
pub const START_TEXT: &str = "PRESS SPACE TO START";
pub const WIN_TEXT: &str = "YOU WIN!";
pub const LOSE_TEXT: &str = "GAME OVER!";

pub trait RenderAdapter {
    /// Draw one glyph with its colour attribute.
    fn draw_cell(&mut self, cell: Cell, glyph: Glyph, attr: Attr) -> io::Result<()>;

    /// Blank every cell below the score header.
    fn clear_playfield(&mut self) -> io::Result<()>;

    fn draw_score_text(&mut self, score: u32) -> io::Result<()>;

    fn draw_message(&mut self, text: &str, at: Cell) -> io::Result<()>;

    /// Called once the frame is complete.
    fn present(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Column that horizontally centres `text` on the playfield.
fn centred(text: &str, width: u16, row: i32) -> Cell {
    let x = (width as i32 - text.chars().count() as i32).max(0) / 2;
    Cell::new(x, row)
}

/// Row of the win/lose banner.
pub fn banner_row(config: &GameConfig) -> i32 {
    config.height as i32 / 2
}

/// Where a win/lose banner starts: centred on `config.banner_centre`.
pub fn banner_cell(text: &str, config: &GameConfig) -> Cell {
    let x = config.banner_centre - text.chars().count() as i32 / 2;
    Cell::new(x.max(0), banner_row(config))
}

/// The attract screen shown while waiting for the start key.
pub fn render_title<R: RenderAdapter>(out: &mut R, config: &GameConfig) -> io::Result<()> {
    let mid = banner_row(config);
    out.clear_playfield()?;
    out.draw_message(TITLE_TEXT, centred(TITLE_TEXT, config.width, (mid - 7).max(1)))?;
    out.draw_message(CONTROLS_TEXT, centred(CONTROLS_TEXT, config.width, (mid - 4).max(1)))?;
    out.draw_message(START_TEXT, centred(START_TEXT, config.width, (mid - 1).max(1)))?;
    out.present()
}

/// Render one complete frame of a session, including the end-of-game banner
/// once the outcome is decided.
pub fn render_session<R: RenderAdapter>(
    out: &mut R,
    session: &GameSession,
    config: &GameConfig,
) -> io::Result<()> {
    out.clear_playfield()?;
    out.draw_score_text(session.score)?;

    for invader in session.formation.alive() {
        for cell in footprint(invader.cell(), config.footprint) {
            out.draw_cell(cell, Glyph::Invader, ATTR_INVADER)?;
        }
    }

    if let Some(bullet) = &session.bullet {
        out.draw_cell(bullet.cell(), Glyph::Bullet, ATTR_BULLET)?;
    }

    let ship = Cell::new(session.player.x, session.player.y);
    for cell in footprint(ship, config.player_width) {
        out.draw_cell(cell, Glyph::Player, ATTR_PLAYER)?;
    }

    match session.outcome {
        Outcome::Won => out.draw_message(WIN_TEXT, banner_cell(WIN_TEXT, config))?,
        Outcome::Lost => out.draw_message(LOSE_TEXT, banner_cell(LOSE_TEXT, config))?,
        Outcome::InProgress => {}
    }

    out.present()
}

// ── Headless adapter ─────────────────────────────────────────────────────────

/// In-memory render target: a cell map plus the header and messages.
/// Draws outside the grid are refused and counted rather than written.
#[derive(Clone, Debug)]
pub struct CellBuffer {
    playfield: Playfield,
    cells: Vec<Option<(Glyph, Attr)>>,
    pub score: Option<u32>,
    pub messages: Vec<(String, Cell)>,
    /// Out-of-bounds draw requests that were dropped.
    pub rejected: usize,
    /// Completed frames.
    pub frames: usize,
}

impl CellBuffer {
    pub fn new(playfield: Playfield) -> Self {
        Self {
            playfield,
            cells: vec![None; playfield.len()],
            score: None,
            messages: Vec::new(),
            rejected: 0,
            frames: 0,
        }
    }

    pub fn get(&self, cell: Cell) -> Option<(Glyph, Attr)> {
        self.playfield.address(cell).and_then(|a| self.cells[a])
    }

    /// Every cell currently showing `glyph`, in row-major order.
    pub fn cells_with(&self, glyph: Glyph) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Some((g, _)) if *g == glyph))
            .filter_map(|(a, _)| self.playfield.cell_at(a))
            .collect()
    }

    pub fn has_message(&self, text: &str) -> bool {
        self.messages.iter().any(|(m, _)| m == text)
    }
}

impl RenderAdapter for CellBuffer {
    fn draw_cell(&mut self, cell: Cell, glyph: Glyph, attr: Attr) -> io::Result<()> {
        match self.playfield.address(cell) {
            Some(a) if cell.y > 0 => self.cells[a] = Some((glyph, attr)),
            _ => self.rejected += 1,
        }
        Ok(())
    }

    fn clear_playfield(&mut self) -> io::Result<()> {
        let header = self.playfield.width as usize;
        for cell in self.cells.iter_mut().skip(header) {
            *cell = None;
        }
        self.messages.clear();
        Ok(())
    }

    fn draw_score_text(&mut self, score: u32) -> io::Result<()> {
        self.score = Some(score);
        Ok(())
    }

    fn draw_message(&mut self, text: &str, at: Cell) -> io::Result<()> {
        if self.playfield.contains(at) {
            self.messages.push((text.to_string(), at));
        } else {
            self.rejected += 1;
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}
