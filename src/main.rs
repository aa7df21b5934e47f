//! Arc Defense headless driver
//!
//! Runs the simulation with the autopilot at a fixed timestep and logs what
//! happens. Rendering and audio live elsewhere; this binary only exercises the
//! core end to end.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use arc_defense::consts::*;
use arc_defense::sim::{GameEvent, GameState, ManualSource, MonotonicSource, TickInput, tick};
use arc_defense::{JsonFileStore, Tuning};

/// Headless Arc Defense driver
#[derive(Parser, Debug)]
#[command(name = "arc-defense")]
#[command(about = "Run the Arc Defense simulation headless with the autopilot")]
struct Options {
    /// Tuning JSON file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulated seconds to run
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// RNG seed
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    /// High-score file
    #[arg(long, default_value = JsonFileStore::DEFAULT_FILE)]
    store: PathBuf,
    /// Follow the wall clock instead of fast-forwarding
    #[arg(long)]
    realtime: bool,
}

/// Running totals across sessions
#[derive(Debug, Default)]
struct Summary {
    sessions: u32,
    intercepts: u32,
    lives_lost: u32,
    best_wave: u32,
}

/// Game instance holding all state
struct Game {
    state: GameState,
    /// Present in fast-forward mode; advanced once per substep
    manual_clock: Option<ManualSource>,
    accumulator: f32,
    input: TickInput,
    summary: Summary,
}

impl Game {
    fn new(options: &Options) -> Self {
        let tuning = options
            .config
            .as_ref()
            .map(Tuning::load)
            .unwrap_or_default();
        log::info!(
            "Shield model: {}, lives: {}",
            tuning.shield_model.as_str(),
            tuning.lives
        );

        let store = Box::new(JsonFileStore::new(&options.store));
        let (state, manual_clock) = if options.realtime {
            let state = GameState::new(options.seed, tuning, Box::new(MonotonicSource::new()), store);
            (state, None)
        } else {
            let source = ManualSource::new();
            let state = GameState::new(options.seed, tuning, Box::new(source.clone()), store);
            (state, Some(source))
        };

        Self {
            state,
            manual_clock,
            accumulator: 0.0,
            input: TickInput {
                idle_mode: true,
                ..Default::default()
            },
            summary: Summary::default(),
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if let Some(clock) = &self.manual_clock {
                clock.advance(Duration::from_secs_f32(SIM_DT));
            }
            if let Err(e) = tick(&mut self.state, &self.input, SIM_DT) {
                log::warn!("High score not saved: {}", e);
            }
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.restart = false;
            self.input.toggle_pause = false;

            self.handle_events();
        }
    }

    fn handle_events(&mut self) {
        for event in self.state.take_events() {
            match event {
                GameEvent::Intercepted { .. } => self.summary.intercepts += 1,
                GameEvent::LifeLost { remaining, .. } => {
                    self.summary.lives_lost += 1;
                    log::info!("Core hit, {} lives left", remaining);
                }
                GameEvent::NewHighScore { score } => log::debug!("New high score {}", score),
                GameEvent::GameOver { score } => {
                    self.summary.sessions += 1;
                    self.summary.best_wave = self
                        .summary
                        .best_wave
                        .max(self.state.scheduler.wave_count());
                    log::info!("Session {} over with {} points", self.summary.sessions, score);
                    // Start the next session on the following tick
                    self.input.restart = true;
                }
                _ => {}
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();
    log::info!("Arc Defense starting: {:?}", options);

    let mut game = Game::new(&options);
    let frame = Duration::from_secs_f32(1.0 / 60.0);

    if options.realtime {
        let start = Instant::now();
        let mut last = start;
        while start.elapsed().as_secs_f32() < options.seconds {
            std::thread::sleep(frame);
            let now = Instant::now();
            game.update((now - last).as_secs_f32());
            last = now;
        }
    } else {
        let frames = (options.seconds / frame.as_secs_f32()).ceil() as u32;
        for _ in 0..frames {
            game.update(frame.as_secs_f32());
        }
    }

    let summary = &game.summary;
    let best_wave = summary.best_wave.max(game.state.scheduler.wave_count());
    log::info!(
        "Done: {} finished sessions, {} intercepts, {} lives lost, best wave {}, score {}, high score {}",
        summary.sessions,
        summary.intercepts,
        summary.lives_lost,
        best_wave,
        game.state.score,
        game.state.high_score
    );
    ExitCode::SUCCESS
}
