/// Terminal render adapter — all terminal I/O lives here.
///
/// Maps the game's cell grid onto the terminal inside a border, translating
/// glyphs to characters and attributes to terminal colours. No game logic is
/// performed; the adapter only turns draw requests into crossterm commands.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::geometry::{Cell, Playfield};
use crate::render::{Attr, Colour, Glyph, RenderAdapter};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_MESSAGE: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

const HINT_TEXT: &str = "O/P ← → : Move   SPACE : Fire   R : Restart   Q : Quit";

fn terminal_colour(colour: Colour) -> Color {
    match colour {
        Colour::Black => Color::Black,
        Colour::Blue => Color::DarkBlue,
        Colour::Red => Color::Red,
        Colour::Magenta => Color::Magenta,
        Colour::Green => Color::Green,
        Colour::Cyan => Color::Cyan,
        Colour::Yellow => Color::Yellow,
        Colour::White => Color::White,
    }
}

fn glyph_char(glyph: Glyph) -> char {
    match glyph {
        Glyph::Player => '▲',
        Glyph::Invader => '▼',
        Glyph::Bullet => '║',
    }
}

/// Terminal `(columns, rows)` needed to show a playfield with its border and
/// the controls hint.
pub fn required_size(playfield: Playfield) -> (u16, u16) {
    (playfield.width + 2, playfield.height + 3)
}

/// Crossterm-backed [`RenderAdapter`].
///
/// Layout: row 0 holds the score. The border occupies terminal row 1 and the
/// row below the last grid row; grid cell `(x, y)` for `y >= 1` is drawn at
/// terminal `(x + 1, y + 1)`.
pub struct TerminalDisplay<W: Write> {
    out: W,
    playfield: Playfield,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, playfield: Playfield) -> Self {
        Self { out, playfield }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn to_screen(&self, cell: Cell) -> (u16, u16) {
        ((cell.x + 1) as u16, (cell.y + 1) as u16)
    }

    /// Clear the terminal and draw the border and controls hint.
    pub fn draw_chrome(&mut self) -> io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()?;
        self.draw_controls_hint()?;
        self.out.flush()
    }

    fn draw_border(&mut self) -> io::Result<()> {
        let w = self.playfield.width as usize;
        let bottom = self.playfield.height + 1;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;

        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

        self.out.queue(cursor::MoveTo(0, bottom))?;
        self.out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

        for row in 2..bottom {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out.queue(cursor::MoveTo(self.playfield.width + 1, row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }

    fn draw_controls_hint(&mut self) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(0, self.playfield.height + 2))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(HINT_TEXT))?;
        Ok(())
    }

    /// Grid cells that may be drawn: on the playfield and below the header.
    fn drawable(&self, cell: Cell) -> bool {
        self.playfield.contains(cell) && cell.y >= 1
    }
}

impl<W: Write> RenderAdapter for TerminalDisplay<W> {
    fn draw_cell(&mut self, cell: Cell, glyph: Glyph, attr: Attr) -> io::Result<()> {
        if !self.drawable(cell) {
            log::warn!("Refused draw outside the playfield at {:?}", cell);
            return Ok(());
        }
        let (col, row) = self.to_screen(cell);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(terminal_colour(attr.ink)))?;
        self.out.queue(style::SetBackgroundColor(terminal_colour(attr.paper)))?;
        self.out.queue(Print(glyph_char(glyph)))?;
        Ok(())
    }

    fn clear_playfield(&mut self) -> io::Result<()> {
        let blank = " ".repeat(self.playfield.width as usize);
        self.out.queue(style::SetBackgroundColor(Color::Black))?;
        for y in 1..self.playfield.height as i32 {
            let (col, row) = self.to_screen(Cell::new(0, y));
            self.out.queue(cursor::MoveTo(col, row))?;
            self.out.queue(Print(&blank))?;
        }
        Ok(())
    }

    fn draw_score_text(&mut self, score: u32) -> io::Result<()> {
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
        self.out.queue(Print(format!("SCORE: {:<8}", score)))?;
        Ok(())
    }

    fn draw_message(&mut self, text: &str, at: Cell) -> io::Result<()> {
        if !self.drawable(at) {
            log::warn!("Refused message outside the playfield at {:?}", at);
            return Ok(());
        }
        // Never spill past the right edge of the grid.
        let room = (self.playfield.width as i32 - at.x) as usize;
        let clipped: String = text.chars().take(room).collect();
        let (col, row) = self.to_screen(at);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(C_MESSAGE))?;
        self.out.queue(style::SetBackgroundColor(Color::Black))?;
        self.out.queue(Print(clipped))?;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.playfield.height + 2))?;
        self.out.flush()
    }
}
