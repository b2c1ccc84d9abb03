//! Headless driver: plays one scripted session per game through the
//! controller and prints the record log as JSON.
//!
//! ```text
//! simulate [--game clock|trail|nback|maze] [--seed N]
//! ```
//!
//! Scripts read the generated layouts from engines built with the same
//! seed, relying on generation being deterministic.

use cognitive_games::core::Key;
use cognitive_games::{
    init_logging, AngleTarget, ClockTime, DisplayList, GameController, GameKind, GameOptions, GameRng, InputEvent,
    ManualClock, MazeGame, NBackGame, Point, Result, SessionHandle, TrailGame,
};
use cognitive_games::games::GameEngine;

struct Args {
    game: Option<GameKind>,
    seed: u64,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut game = None;
    let mut seed = 42u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--game" => {
                i += 1;
                if i < args.len() {
                    game = Some(args[i].parse().unwrap_or_else(|e| {
                        eprintln!("Invalid --game value: {}", e);
                        std::process::exit(1);
                    }));
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or_else(|_| {
                        eprintln!("Invalid --seed value: {}", args[i]);
                        std::process::exit(1);
                    });
                }
            }
            "--help" | "-h" => {
                println!("Usage: simulate [--game clock|trail|nback|maze] [--seed N]");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args { game, seed }
}

struct Driver {
    controller: GameController,
    clock: ManualClock,
    surface: DisplayList,
}

impl Driver {
    fn new() -> Self {
        let clock = ManualClock::with_epoch(chrono::Utc::now());
        Self {
            controller: GameController::new(clock.clone()),
            clock,
            surface: DisplayList::new(400.0, 520.0),
        }
    }

    fn init(&mut self, kind: GameKind, options: GameOptions) -> Result<SessionHandle> {
        self.controller.try_init(kind.id(), &mut self.surface, options, move |results| {
            tracing::info!(game = %kind, ?results, "completion callback");
        })
    }

    /// Move time forward, firing due tasks.
    fn wait(&mut self, ms: u64) {
        self.clock.advance(ms);
        self.controller.tick();
    }

    fn send(&mut self, handle: SessionHandle, event: InputEvent) -> Result<()> {
        self.controller.handle_input(handle, &event)?;
        Ok(())
    }

    fn drag(&mut self, handle: SessionHandle, from: Point, to: Point) -> Result<()> {
        self.send(handle, InputEvent::PointerDown(from))?;
        self.wait(120);
        self.send(handle, InputEvent::PointerMove(to))?;
        self.send(handle, InputEvent::PointerUp(to))?;
        self.wait(300);
        Ok(())
    }

    fn finish(&mut self, handle: SessionHandle) -> Result<()> {
        self.controller.render(handle, &mut self.surface)?;
        tracing::info!(
            session = %handle,
            complete = self.controller.is_complete(handle)?,
            draw_commands = self.surface.commands().len(),
            "session finished"
        );
        self.controller.end_session(handle)
    }
}

fn play_clock(driver: &mut Driver, options: GameOptions) -> Result<()> {
    let target = AngleTarget::from(options.clock.target_time.parse::<ClockTime>()?);
    let radius = options.clock.clock_size / 2.0;
    let center = Point::new(radius, radius);
    let handle = driver.init(GameKind::Clock, options)?;

    // Both hands start at 12: grab the hour hand below its tip, then the
    // minute hand above it
    driver.drag(handle, Point::new(radius, radius * 0.6), center.polar(target.hour, radius * 0.4))?;
    driver.drag(handle, Point::new(radius, radius * 0.25), center.polar(target.minute, radius * 0.7))?;
    driver.send(handle, InputEvent::KeyDown(Key::Enter))?;
    driver.finish(handle)
}

fn play_trail(driver: &mut Driver, options: GameOptions, seed: u64) -> Result<()> {
    let preview = TrailGame::new(options.trail.clone(), GameRng::new(seed))?;
    let dots: Vec<Point> = preview.layout().dots().iter().map(|d| d.center).collect();
    let handle = driver.init(GameKind::Trail, options)?;

    for pair in dots.windows(2) {
        driver.drag(handle, pair[0], pair[1])?;
    }
    driver.finish(handle)
}

fn play_nback(driver: &mut Driver, options: GameOptions, seed: u64) -> Result<()> {
    let config = options.nback.clone();
    let mut preview = NBackGame::new(config.clone(), GameRng::new(seed))?;
    preview.start(driver.controller.now());
    let matches: Vec<bool> = match preview.sequence() {
        Some(sequence) => (0..sequence.len()).map(|i| sequence.is_match(i)).collect(),
        None => Vec::new(),
    };

    let handle = driver.init(GameKind::NBack, options)?;
    driver.controller.start(handle)?;
    driver.wait(config.start_delay);
    for is_match in matches {
        // Answer mid-stimulus
        driver.wait(config.stimulus_duration / 2);
        if is_match {
            driver.send(handle, InputEvent::KeyDown(Key::Space))?;
        }
        driver.wait(config.stimulus_duration - config.stimulus_duration / 2);
        driver.wait(config.inter_stimulus_interval);
    }
    driver.finish(handle)
}

fn play_maze(driver: &mut Driver, options: GameOptions, seed: u64) -> Result<()> {
    let mut preview = MazeGame::new(options.maze.clone(), GameRng::new(seed))?;
    preview.generate();
    let path = preview.solution().unwrap_or_default();

    let handle = driver.init(GameKind::Maze, options)?;
    driver.controller.start(handle)?;
    for step in path.windows(2) {
        if let Some(direction) = step[0].direction_to(step[1]) {
            driver.wait(250);
            driver.send(handle, InputEvent::KeyDown(Key::Arrow(direction)))?;
        }
    }
    driver.finish(handle)
}

fn run(args: &Args) -> Result<String> {
    let mut driver = Driver::new();
    let options = GameOptions::default().with_seed(args.seed);
    let games = match args.game {
        Some(kind) => vec![kind],
        None => GameKind::ALL.to_vec(),
    };

    for kind in games {
        tracing::info!(game = %kind, seed = args.seed, "playing scripted session");
        match kind {
            GameKind::Clock => play_clock(&mut driver, options.clone())?,
            GameKind::Trail => play_trail(&mut driver, options.clone(), args.seed)?,
            GameKind::NBack => play_nback(&mut driver, options.clone(), args.seed)?,
            GameKind::Maze => play_maze(&mut driver, options.clone(), args.seed)?,
        }
    }

    driver.controller.sink().to_json()
}

fn main() {
    init_logging();
    let args = parse_args();

    match run(&args) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    }
}
