//! Frame controller
//!
//! Drives one session through AwaitingStart → Playing → Won | Lost. Each call
//! to [`FrameController::step`] runs one complete tick: poll input, update,
//! render. Pacing is separate so headless callers can run flat out.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::compute::{init_session, move_player_left, move_player_right, player_shoot, tick};
use crate::config::GameConfig;
use crate::entities::{GameSession, Outcome};
use crate::input::{InputAdapter, Intents};
use crate::render::{render_session, render_title, RenderAdapter};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Title screen. `armed` once the start key went down; play begins when
    /// every key is released again.
    AwaitingStart { armed: bool },
    Playing,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Waits out the remainder of a frame.
pub trait Pacer {
    fn pause(&mut self, frame: Duration);
}

/// Sleeps so that consecutive frames start `frame` apart.
#[derive(Debug)]
pub struct SleepPacer {
    frame_start: Instant,
}

impl SleepPacer {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
        }
    }
}

impl Default for SleepPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for SleepPacer {
    fn pause(&mut self, frame: Duration) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
        self.frame_start = Instant::now();
    }
}

/// Runs frames back to back.
#[derive(Debug, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _frame: Duration) {}
}

pub struct FrameController {
    config: GameConfig,
    phase: Phase,
    session: Option<GameSession>,
}

impl FrameController {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            phase: Phase::AwaitingStart { armed: false },
            session: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The running or finished session; `None` on the title screen.
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run one tick and render it. Returns the phase after the tick.
    pub fn step<I, R>(&mut self, input: &mut I, out: &mut R) -> io::Result<Phase>
    where
        I: InputAdapter,
        R: RenderAdapter,
    {
        let intents = input.poll();

        match self.phase {
            Phase::AwaitingStart { armed } => {
                if !armed && intents.start {
                    self.phase = Phase::AwaitingStart { armed: true };
                } else if armed && !intents.any() {
                    self.begin();
                }
            }
            Phase::Playing => {
                if let Some(session) = &self.session {
                    let next = play_tick(session, &intents, &self.config);
                    self.phase = match next.outcome {
                        Outcome::InProgress => Phase::Playing,
                        Outcome::Won => Phase::Won,
                        Outcome::Lost => Phase::Lost,
                    };
                    self.session = Some(next);
                }
            }
            Phase::Won | Phase::Lost => {}
        }

        match &self.session {
            Some(session) => render_session(out, session, &self.config)?,
            None => render_title(out, &self.config)?,
        }
        Ok(self.phase)
    }

    /// [`FrameController::step`] followed by the frame delay.
    pub fn run_frame<I, R, P>(&mut self, input: &mut I, out: &mut R, pacer: &mut P) -> io::Result<Phase>
    where
        I: InputAdapter,
        R: RenderAdapter,
        P: Pacer,
    {
        let phase = self.step(input, out)?;
        pacer.pause(self.config.frame_duration());
        Ok(phase)
    }

    fn begin(&mut self) {
        log::info!(
            "Session started: {}x{} formation, footprint {}",
            self.config.rows,
            self.config.columns,
            self.config.footprint
        );
        self.session = Some(init_session(&self.config));
        self.phase = Phase::Playing;
    }
}

/// One Playing tick in fixed order: movement, fire, then the engine tick
/// (bullet, collisions, formation, outcome).
pub fn play_tick(session: &GameSession, intents: &Intents, config: &GameConfig) -> GameSession {
    // Opposite directions cancel before clamping, so an edge cannot break the tie.
    let mut next = match (intents.left, intents.right) {
        (true, false) => move_player_left(session, config),
        (false, true) => move_player_right(session, config),
        _ => session.clone(),
    };
    if intents.fire {
        next = player_shoot(&next, config);
    }
    tick(&next, config)
}
