use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};

use space_invaders::display::{required_size, TerminalDisplay};
use space_invaders::frame::{FrameController, SleepPacer};
use space_invaders::input::KeyboardInput;
use space_invaders::{GameConfig, Preset};

/// Space Invaders on a 32x24 character grid.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Starting configuration
    #[arg(long, value_enum, default_value_t = Preset::Classic)]
    preset: Preset,

    /// JSON file whose fields override the preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<GameConfig> {
    let base = GameConfig::from_preset(cli.preset);
    let config = match &cli.config {
        Some(path) => GameConfig::load(path, &base)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => base,
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Play sessions until the player quits. `R` after a win or loss starts a
/// fresh session from the title screen.
fn run<W: Write>(
    display: &mut TerminalDisplay<W>,
    config: &GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut keyboard = KeyboardInput::new();
    let mut pacer = SleepPacer::new();
    let mut controller = FrameController::new(config.clone());

    display.draw_chrome()?;

    loop {
        keyboard.next_frame();
        // Drain all pending input events (non-blocking)
        while let Ok(ev) = rx.try_recv() {
            keyboard.handle_event(&ev);
        }
        if keyboard.quit_requested() {
            return Ok(());
        }
        if keyboard.take_restart() && controller.phase().is_terminal() {
            log::info!("Restarting");
            controller = FrameController::new(config.clone());
        }

        controller.run_frame(&mut keyboard, display, &mut pacer)?;
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; redirect it (2>invaders.log) to keep the screen clean.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let (need_w, need_h) = required_size(config.playfield());
    let (width, height) = terminal::size().context("querying terminal size")?;
    if width < need_w || height < need_h {
        bail!("terminal is {width}x{height}, need at least {need_w}x{need_h}");
    }
    log::info!("Starting with preset {} ({}x{} grid)", cli.preset.as_str(), config.width, config.height);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("enabling raw mode")?;
    let mut keyboard_enhanced = false;
    let result = play(&mut out, &config, &mut keyboard_enhanced);

    // Always restore the terminal, even if setup failed part-way
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

/// Everything that runs in raw mode. The caller restores the terminal.
fn play<W: Write>(out: &mut W, config: &GameConfig, keyboard_enhanced: &mut bool) -> anyhow::Result<()> {
    out.execute(terminal::EnterAlternateScreen)
        .context("entering the alternate screen")?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    *keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut display = TerminalDisplay::new(out, config.playfield());
    run(&mut display, config, &rx).context("game loop failed")
}
