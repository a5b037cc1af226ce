use std::time::Duration;

use space_invaders::compute::init_session;
use space_invaders::config::GameConfig;
use space_invaders::entities::{Bullet, Outcome};
use space_invaders::frame::{play_tick, FrameController, NoPacing, Pacer, Phase};
use space_invaders::geometry::Cell;
use space_invaders::input::Intents;
use space_invaders::render::{CellBuffer, Glyph, LOSE_TEXT, START_TEXT, TITLE_TEXT, WIN_TEXT};

const NONE: Intents = Intents::NONE;
const START: Intents = Intents {
    start: true,
    fire: true,
    ..Intents::NONE
};
const FIRE: Intents = Intents {
    fire: true,
    ..Intents::NONE
};
const LEFT: Intents = Intents {
    left: true,
    ..Intents::NONE
};

fn step(c: &mut FrameController, intents: Intents, buf: &mut CellBuffer) -> Phase {
    let mut input = intents;
    c.step(&mut input, buf).unwrap()
}

fn started(config: GameConfig) -> (FrameController, CellBuffer) {
    let mut buf = CellBuffer::new(config.playfield());
    let mut c = FrameController::new(config);
    step(&mut c, START, &mut buf);
    assert_eq!(step(&mut c, NONE, &mut buf), Phase::Playing);
    (c, buf)
}

/// One invader at (4, 2) that never moves, ship directly below it.
fn sitting_duck() -> GameConfig {
    GameConfig {
        rows: 1,
        columns: 1,
        step_delay: 1000,
        player_start: 4,
        ..GameConfig::default()
    }
}

// ── AwaitingStart ─────────────────────────────────────────────────────────────

#[test]
fn title_screen_until_start() {
    let config = GameConfig::default();
    let mut buf = CellBuffer::new(config.playfield());
    let mut c = FrameController::new(config);

    assert_eq!(step(&mut c, NONE, &mut buf), Phase::AwaitingStart { armed: false });
    assert!(c.session().is_none());
    assert!(buf.has_message(TITLE_TEXT));
    assert!(buf.has_message(START_TEXT));
    assert_eq!(buf.score, None);
    assert!(buf.cells_with(Glyph::Invader).is_empty());
}

#[test]
fn start_waits_for_every_key_release() {
    let config = GameConfig::default();
    let mut buf = CellBuffer::new(config.playfield());
    let mut c = FrameController::new(config.clone());

    assert_eq!(step(&mut c, START, &mut buf), Phase::AwaitingStart { armed: true });
    assert_eq!(step(&mut c, START, &mut buf), Phase::AwaitingStart { armed: true });
    let held = Intents {
        left: true,
        ..Intents::NONE
    };
    assert_eq!(step(&mut c, held, &mut buf), Phase::AwaitingStart { armed: true });
    assert!(c.session().is_none());

    assert_eq!(step(&mut c, NONE, &mut buf), Phase::Playing);
    // The start key does not also fire a shot.
    assert_eq!(c.session(), Some(&init_session(&config)));
}

#[test]
fn movement_alone_does_not_arm() {
    let config = GameConfig::default();
    let mut buf = CellBuffer::new(config.playfield());
    let mut c = FrameController::new(config);
    step(&mut c, LEFT, &mut buf);
    assert_eq!(step(&mut c, NONE, &mut buf), Phase::AwaitingStart { armed: false });
}

// ── Playing ───────────────────────────────────────────────────────────────────

#[test]
fn playing_frame_draws_every_entity() {
    let (mut c, mut buf) = started(GameConfig::default());
    step(&mut c, FIRE, &mut buf);

    assert_eq!(buf.cells_with(Glyph::Invader).len(), 24);
    assert_eq!(buf.cells_with(Glyph::Player), vec![Cell::new(15, 22)]);
    assert_eq!(buf.cells_with(Glyph::Bullet), vec![Cell::new(15, 20)]);
    assert_eq!(buf.score, Some(0));
    assert!(buf.messages.is_empty());
    assert_eq!(buf.rejected, 0);
}

#[test]
fn movement_applies_before_fire() {
    let (mut c, mut buf) = started(GameConfig::default());
    let intents = Intents {
        left: true,
        fire: true,
        ..Intents::NONE
    };
    step(&mut c, intents, &mut buf);
    let s = c.session().unwrap();
    assert_eq!(s.player.x, 14);
    assert_eq!(s.bullet, Some(Bullet { x: 14, y: 20 }));
}

#[test]
fn opposite_directions_cancel() {
    let (mut c, mut buf) = started(GameConfig::default());
    let both = Intents {
        left: true,
        right: true,
        ..Intents::NONE
    };
    step(&mut c, both, &mut buf);
    assert_eq!(c.session().unwrap().player.x, 15);
}

#[test]
fn opposite_directions_cancel_at_either_edge() {
    let config = GameConfig::default();
    let both = Intents {
        left: true,
        right: true,
        ..Intents::NONE
    };
    for edge in [0, 31] {
        let mut s = init_session(&config);
        s.player.x = edge;
        assert_eq!(play_tick(&s, &both, &config).player.x, edge);
    }
}

#[test]
fn holding_fire_keeps_one_bullet() {
    let (mut c, mut buf) = started(GameConfig::default());
    for expected_row in (16..=20).rev() {
        step(&mut c, FIRE, &mut buf);
        assert_eq!(buf.cells_with(Glyph::Bullet), vec![Cell::new(15, expected_row)]);
    }
}

#[test]
fn idle_ticks_only_advance_step_timer() {
    let config = GameConfig::default();
    let (mut c, mut buf) = started(config.clone());
    let before = c.session().unwrap().clone();
    for _ in 0..5 {
        step(&mut c, NONE, &mut buf);
    }
    let after = c.session().unwrap();
    assert_eq!(after.player, before.player);
    assert_eq!(after.bullet, before.bullet);
    assert_eq!(after.formation.invaders, before.formation.invaders);
    assert_eq!(after.formation.step_timer, 5);
}

// ── Won / Lost ────────────────────────────────────────────────────────────────

#[test]
fn shooting_the_last_invader_wins() {
    let (mut c, mut buf) = started(sitting_duck());

    let mut ticks = 1;
    let mut phase = step(&mut c, FIRE, &mut buf);
    while phase == Phase::Playing && ticks < 50 {
        phase = step(&mut c, NONE, &mut buf);
        ticks += 1;
    }

    // Spawned on row 21, the shot reaches row 2 on its 19th tick.
    assert_eq!(phase, Phase::Won);
    assert_eq!(ticks, 19);
    let s = c.session().unwrap();
    assert_eq!(s.outcome, Outcome::Won);
    assert_eq!(s.score, 10);
    assert!(buf.has_message(WIN_TEXT));
    assert!(buf.cells_with(Glyph::Invader).is_empty());
    assert_eq!(buf.messages, vec![(WIN_TEXT.to_string(), Cell::new(10, 12))]);
}

#[test]
fn won_is_terminal() {
    let (mut c, mut buf) = started(sitting_duck());
    let mut phase = step(&mut c, FIRE, &mut buf);
    while !phase.is_terminal() {
        phase = step(&mut c, NONE, &mut buf);
    }
    let frozen = c.session().unwrap().clone();

    assert_eq!(step(&mut c, LEFT, &mut buf), Phase::Won);
    assert_eq!(step(&mut c, START, &mut buf), Phase::Won);
    assert_eq!(c.session(), Some(&frozen));
    assert!(buf.has_message(WIN_TEXT));
}

#[test]
fn landing_formation_loses() {
    let config = GameConfig {
        rows: 1,
        columns: 1,
        step_delay: 1,
        ..GameConfig::default()
    };
    let (mut c, mut buf) = started(config);

    let mut phase = Phase::Playing;
    for _ in 0..5000 {
        phase = step(&mut c, NONE, &mut buf);
        if phase.is_terminal() {
            break;
        }
    }

    assert_eq!(phase, Phase::Lost);
    let s = c.session().unwrap();
    assert_eq!(s.outcome, Outcome::Lost);
    assert_eq!(s.formation.invaders[0].y, 22);
    assert_eq!(buf.messages, vec![(LOSE_TEXT.to_string(), Cell::new(9, 12))]);
    assert_eq!(buf.rejected, 0);

    let frame = s.frame;
    step(&mut c, FIRE, &mut buf);
    assert_eq!(c.session().unwrap().frame, frame);
    assert!(c.session().unwrap().bullet.is_none());
}

// ── Pacing ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingPacer {
    pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, frame: Duration) {
        self.pauses.push(frame);
    }
}

#[test]
fn run_frame_paces_every_frame() {
    let config = GameConfig::default();
    let mut buf = CellBuffer::new(config.playfield());
    let mut c = FrameController::new(config);
    let mut pacer = RecordingPacer::default();
    let mut input = NONE;

    c.run_frame(&mut input, &mut buf, &mut pacer).unwrap();
    c.run_frame(&mut input, &mut buf, &mut pacer).unwrap();
    assert_eq!(pacer.pauses, vec![Duration::from_millis(40); 2]);
    assert_eq!(buf.frames, 2);
}

#[test]
fn unpaced_frames_still_render() {
    let config = GameConfig::default();
    let mut buf = CellBuffer::new(config.playfield());
    let mut c = FrameController::new(config);
    let mut input = NONE;
    c.run_frame(&mut input, &mut buf, &mut NoPacing).unwrap();
    assert_eq!(buf.frames, 1);
}
