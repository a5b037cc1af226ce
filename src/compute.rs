/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameSession` (and the `GameConfig` it runs under) and returns a brand-new
/// `GameSession`. Nothing here touches the display or the keyboard.

use crate::config::GameConfig;
use crate::entities::{
    Bullet, Direction, Formation, GameSession, Invader, Outcome, Player,
};
use crate::geometry::{footprint_contains, slot_cell, Cell};

// ── Constructors ─────────────────────────────────────────────────────────────

/// A full formation at its starting position, heading right.
pub fn new_formation(config: &GameConfig) -> Formation {
    let anchor = Cell::new(config.column_offset, config.row_offset);
    let mut invaders = Vec::with_capacity(config.invader_count());
    for row in 0..config.rows {
        for column in 0..config.columns {
            let cell = slot_cell(anchor, row, column, config.h_spacing, config.v_spacing);
            invaders.push(Invader {
                row,
                column,
                x: cell.x,
                y: cell.y,
                alive: true,
            });
        }
    }
    Formation {
        invaders,
        rows: config.rows,
        columns: config.columns,
        anchor,
        direction: Direction::Right,
        step_timer: 0,
    }
}

/// Build the initial session: fresh formation, ship at its start column,
/// no bullet, zero score.
pub fn init_session(config: &GameConfig) -> GameSession {
    GameSession {
        player: Player {
            x: config.player_start,
            y: config.player_row,
        },
        bullet: None,
        formation: new_formation(config),
        score: 0,
        outcome: Outcome::InProgress,
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn move_player_left(state: &GameSession, config: &GameConfig) -> GameSession {
    let new_x = (state.player.x - 1).max(config.player_span().left);
    GameSession {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_right(state: &GameSession, config: &GameConfig) -> GameSession {
    let max_x = config.player_span().right - config.player_width + 1;
    let new_x = (state.player.x + 1).min(max_x);
    GameSession {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire from the ship — ignored while a bullet is already in flight.
pub fn player_shoot(state: &GameSession, config: &GameConfig) -> GameSession {
    if state.bullet.is_some() {
        return state.clone();
    }
    GameSession {
        bullet: Some(Bullet {
            x: state.player.x + config.bullet_spawn_offset,
            y: config.bullet_spawn_row(),
        }),
        ..state.clone()
    }
}

// ── Collision & formation queries ───────────────────────────────────────────

/// Index of the first alive invader (row-major) whose footprint covers
/// `target`.
pub fn invader_at(formation: &Formation, target: Cell, footprint: i32) -> Option<usize> {
    formation
        .invaders
        .iter()
        .position(|inv| inv.alive && footprint_contains(inv.cell(), footprint, target))
}

/// True when one more step in the current direction would carry an alive
/// invader's sprite outside the invader bounds.
pub fn edge_hit(formation: &Formation, config: &GameConfig) -> bool {
    let span = config.invader_span();
    let dx = formation.direction.dx();
    formation
        .alive()
        .any(|inv| !span.holds(inv.x + dx, config.footprint))
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Move the bullet up one row, then resolve it against the formation.
/// At most one invader dies per call.
pub fn advance_bullet(state: &GameSession, config: &GameConfig) -> GameSession {
    let Some(bullet) = &state.bullet else {
        return state.clone();
    };

    let moved = Bullet {
        y: bullet.y - 1,
        ..bullet.clone()
    };
    if moved.y < config.top_row {
        return GameSession {
            bullet: None,
            ..state.clone()
        };
    }

    match invader_at(&state.formation, moved.cell(), config.footprint) {
        Some(index) => {
            let mut formation = state.formation.clone();
            let invader = &mut formation.invaders[index];
            invader.alive = false;
            let score = state.score.saturating_add(config.reward);
            log::debug!(
                "Invader ({}, {}) destroyed at {:?}, score {}",
                invader.row,
                invader.column,
                moved.cell(),
                score
            );
            GameSession {
                formation,
                bullet: None,
                score,
                ..state.clone()
            }
        }
        None => GameSession {
            bullet: Some(moved),
            ..state.clone()
        },
    }
}

/// Count down to the next formation step; on the step either turn and
/// descend (edge hit) or shift one column. The whole formation moves at once.
pub fn advance_formation(state: &GameSession, config: &GameConfig) -> GameSession {
    let mut formation = state.formation.clone();
    formation.step_timer += 1;
    if formation.step_timer < config.step_delay {
        return GameSession {
            formation,
            ..state.clone()
        };
    }
    formation.step_timer = 0;

    let mut outcome = state.outcome;
    if edge_hit(&formation, config) {
        formation.direction = formation.direction.reversed();
        formation.anchor = formation.anchor.offset(0, 1);
        for invader in formation.invaders.iter_mut().filter(|i| i.alive) {
            invader.y += 1;
        }
        log::debug!(
            "Formation turned {:?}, anchor now {:?}",
            formation.direction,
            formation.anchor
        );

        if formation.alive().any(|i| i.y >= state.player.y) {
            log::info!("Invaders landed at frame {}", state.frame);
            outcome = Outcome::Lost;
        }
    } else {
        let dx = formation.direction.dx();
        formation.anchor = formation.anchor.offset(dx, 0);
        for invader in formation.invaders.iter_mut().filter(|i| i.alive) {
            invader.x += dx;
        }
        log::trace!("Formation stepped to {:?}", formation.anchor);
    }

    GameSession {
        formation,
        outcome,
        ..state.clone()
    }
}

/// Declare the session won once nothing is left alive.
pub fn check_cleared(state: &GameSession) -> GameSession {
    if state.outcome == Outcome::InProgress && state.formation.alive_count() == 0 {
        log::info!("Formation cleared at frame {}, score {}", state.frame, state.score);
        return GameSession {
            outcome: Outcome::Won,
            ..state.clone()
        };
    }
    state.clone()
}

/// Advance the simulation by one frame: bullet, win check, formation.
/// A finished session is returned unchanged.
pub fn tick(state: &GameSession, config: &GameConfig) -> GameSession {
    if state.outcome.is_over() {
        return state.clone();
    }

    let state = check_cleared(&advance_bullet(state, config));
    let state = if state.outcome.is_over() {
        state
    } else {
        advance_formation(&state, config)
    };

    GameSession {
        frame: state.frame + 1,
        ..state
    }
}
