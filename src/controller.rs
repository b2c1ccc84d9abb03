//! Session lifecycle: game selection, dispatch and the completion funnel.
//!
//! ## Sessions
//!
//! `GameController` keeps its sessions in a small generational arena. A
//! `SessionHandle` names a slot and the generation it was issued under, so a
//! handle kept past `end_session` (or past the next `init`, which replaces
//! the active session) is rejected with `GameError::UnknownSession` instead
//! of reaching a newer game.
//!
//! ## Completion
//!
//! Engines signal completion by returning `Some(GameResults)`. Every such
//! result passes through one place: it is stamped with the time source's
//! wall-clock time, appended to the results sink, and handed to the host's
//! callback for that session.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{
    GameError, GameKind, GameOptions, GameResults, GameRng, InputEvent, Millis, RecordLog, Result, ResultRecord,
    ResultsSink, Surface, TimeSource,
};
use crate::games::{ClockGame, GameEngine, MazeGame, NBackGame, TrailGame};

/// Host callback invoked once per completed session.
pub type CompletionCallback = Box<dyn FnMut(&GameResults)>;

/// Identifies one session within a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle {
    index: u32,
    generation: u32,
}

impl SessionHandle {
    /// Slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation the handle was issued under.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session({}v{})", self.index, self.generation)
    }
}

struct Session {
    kind: GameKind,
    engine: Box<dyn GameEngine>,
    on_complete: CompletionCallback,
    completions: u32,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    session: Option<Session>,
}

/// Creates game sessions and routes host events to them.
pub struct GameController<S: ResultsSink = RecordLog> {
    clock: Box<dyn TimeSource>,
    sink: S,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl GameController<RecordLog> {
    /// Controller writing to a fresh `RecordLog`.
    pub fn new(clock: impl TimeSource + 'static) -> Self {
        Self::with_sink(clock, RecordLog::new())
    }
}

impl<S: ResultsSink> GameController<S> {
    pub fn with_sink(clock: impl TimeSource + 'static, sink: S) -> Self {
        Self {
            clock: Box::new(clock),
            sink,
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    // === Session Creation ===

    /// Build the engine named by `game_id` into a cleared surface.
    ///
    /// Any session already running is ended first; only one game is active
    /// at a time. Ids are matched case-insensitively.
    pub fn try_init(
        &mut self,
        game_id: &str,
        surface: &mut dyn Surface,
        options: GameOptions,
        on_complete: impl FnMut(&GameResults) + 'static,
    ) -> Result<SessionHandle> {
        let kind: GameKind = game_id.parse()?;
        let engine = build_engine(kind, options)?;

        self.end_all();
        let now = self.clock.now();
        surface.clear();
        engine.render(surface, now);

        let handle = self.insert(Session {
            kind,
            engine,
            on_complete: Box::new(on_complete),
            completions: 0,
        });
        tracing::info!(game = %kind, session = %handle, "game initialised");
        Ok(handle)
    }

    /// Like `try_init`, but logs the failure and returns `None` so a host
    /// loop can carry on.
    pub fn init(
        &mut self,
        game_id: &str,
        surface: &mut dyn Surface,
        options: GameOptions,
        on_complete: impl FnMut(&GameResults) + 'static,
    ) -> Option<SessionHandle> {
        match self.try_init(game_id, surface, options, on_complete) {
            Ok(handle) => Some(handle),
            Err(error) => {
                tracing::error!(%error, game_id, "failed to initialise game");
                None
            }
        }
    }

    // === Dispatch ===

    /// Leave the pre-session state (maze generation and timer, n-back lead-in).
    pub fn start(&mut self, handle: SessionHandle) -> Result<()> {
        let now = self.clock.now();
        self.session_mut(handle)?.engine.start(now);
        tracing::info!(session = %handle, "session started");
        Ok(())
    }

    /// Feed one input event. Returns the results if it completed the session.
    pub fn handle_input(&mut self, handle: SessionHandle, event: &InputEvent) -> Result<Option<GameResults>> {
        let now = self.clock.now();
        let clock = &*self.clock;
        let sink = &mut self.sink;
        let session = slot_session(&mut self.slots, handle)?;
        let outcome = session.engine.handle_input(event, now);
        if let Some(results) = &outcome {
            finish(sink, clock, session, handle, results);
        }
        Ok(outcome)
    }

    /// Fire due tasks on every live session, returning any completions.
    pub fn tick(&mut self) -> Vec<(SessionHandle, GameResults)> {
        let now = self.clock.now();
        let clock = &*self.clock;
        let sink = &mut self.sink;
        let mut completed = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let generation = slot.generation;
            let Some(session) = slot.session.as_mut() else { continue };
            if let Some(results) = session.engine.advance(now) {
                let handle = SessionHandle {
                    index: index as u32,
                    generation,
                };
                finish(sink, clock, session, handle, &results);
                completed.push((handle, results));
            }
        }
        completed
    }

    /// Cancel pending work and start the session's game over.
    pub fn reset(&mut self, handle: SessionHandle) -> Result<()> {
        let now = self.clock.now();
        self.session_mut(handle)?.engine.reset(now);
        tracing::info!(session = %handle, "session reset");
        Ok(())
    }

    /// Clear `surface` and draw the current frame.
    pub fn render(&self, handle: SessionHandle, surface: &mut dyn Surface) -> Result<()> {
        let session = self.session(handle)?;
        surface.clear();
        session.engine.render(surface, self.clock.now());
        Ok(())
    }

    /// Current raw metric of the session.
    pub fn results(&self, handle: SessionHandle) -> Result<GameResults> {
        Ok(self.session(handle)?.engine.results(self.clock.now()))
    }

    pub fn is_complete(&self, handle: SessionHandle) -> Result<bool> {
        Ok(self.session(handle)?.engine.is_complete())
    }

    pub fn kind(&self, handle: SessionHandle) -> Result<GameKind> {
        Ok(self.session(handle)?.kind)
    }

    /// Scheduled tasks still pending for the session.
    pub fn pending_tasks(&self, handle: SessionHandle) -> Result<usize> {
        Ok(self.session(handle)?.engine.pending_tasks())
    }

    /// Drop the session. Its handle is invalid afterwards.
    pub fn end_session(&mut self, handle: SessionHandle) -> Result<()> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation && s.session.is_some())
            .ok_or(GameError::UnknownSession)?;
        slot.session = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        tracing::debug!(session = %handle, "session ended");
        Ok(())
    }

    // === Accessors ===

    #[must_use]
    pub fn live_sessions(&self) -> usize {
        self.slots.iter().filter(|s| s.session.is_some()).count()
    }

    #[must_use]
    pub fn now(&self) -> Millis {
        self.clock.now()
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // === Internals ===

    fn insert(&mut self, session: Session) -> SessionHandle {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.session = Some(session);
        SessionHandle {
            index,
            generation: slot.generation,
        }
    }

    fn end_all(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.session.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
    }

    fn session(&self, handle: SessionHandle) -> Result<&Session> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.session.as_ref())
            .ok_or(GameError::UnknownSession)
    }

    fn session_mut(&mut self, handle: SessionHandle) -> Result<&mut Session> {
        slot_session(&mut self.slots, handle)
    }
}

fn slot_session(slots: &mut [Slot], handle: SessionHandle) -> Result<&mut Session> {
    slots
        .get_mut(handle.index as usize)
        .filter(|s| s.generation == handle.generation)
        .and_then(|s| s.session.as_mut())
        .ok_or(GameError::UnknownSession)
}

/// The completion funnel.
fn finish<S: ResultsSink>(
    sink: &mut S,
    clock: &dyn TimeSource,
    session: &mut Session,
    handle: SessionHandle,
    results: &GameResults,
) {
    session.completions += 1;
    sink.append(ResultRecord::new(results.clone(), clock.timestamp()));
    tracing::info!(
        game = %session.kind,
        session = %handle,
        completions = session.completions,
        ?results,
        "game completed"
    );
    (session.on_complete)(results);
}

fn build_engine(kind: GameKind, options: GameOptions) -> Result<Box<dyn GameEngine>> {
    let rng = options.seed.map_or_else(GameRng::from_entropy, GameRng::new);
    // Logged so an unseeded session can be replayed with `GameOptions::with_seed`
    tracing::debug!(game = %kind, seed = rng.seed(), "building engine");
    Ok(match kind {
        GameKind::Clock => Box::new(ClockGame::new(options.clock)?),
        GameKind::Trail => Box::new(TrailGame::new(options.trail, rng)?),
        GameKind::NBack => Box::new(NBackGame::new(options.nback, rng)?),
        GameKind::Maze => {
            let mut maze = MazeGame::new(options.maze, rng)?;
            maze.generate();
            Box::new(maze)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::core::{DisplayList, Key, ManualClock, NBackConfig};

    fn controller() -> (GameController, ManualClock) {
        let clock = ManualClock::new();
        (GameController::new(clock.clone()), clock)
    }

    #[test]
    fn test_unknown_game_is_rejected() {
        let (mut controller, _) = controller();
        let mut surface = DisplayList::new(300.0, 300.0);
        let err = controller
            .try_init("chess", &mut surface, GameOptions::default(), |_| {})
            .unwrap_err();
        assert!(matches!(err, GameError::UnsupportedGame(ref id) if id == "chess"));
        assert!(controller.init("chess", &mut surface, GameOptions::default(), |_| {}).is_none());
        assert_eq!(controller.live_sessions(), 0);
        assert_eq!(surface.clear_count(), 0);
    }

    #[test]
    fn test_init_clears_and_renders() {
        let (mut controller, _) = controller();
        let mut surface = DisplayList::new(300.0, 500.0);
        let handle = controller
            .init("CLOCK", &mut surface, GameOptions::default(), |_| {})
            .unwrap();
        assert_eq!(surface.clear_count(), 1);
        assert!(surface.has_text("10 past 10"));
        assert_eq!(controller.kind(handle).unwrap(), GameKind::Clock);
    }

    #[test]
    fn test_completion_funnel_records_once_and_calls_back() {
        let (mut controller, clock) = controller();
        let mut surface = DisplayList::new(300.0, 500.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let options = GameOptions::default().with_clock(crate::core::ClockConfig::default().with_target("12:00"));
        let handle = controller
            .try_init("clock", &mut surface, options, move |r| sink.borrow_mut().push(r.clone()))
            .unwrap();

        clock.advance(1500);
        let outcome = controller.handle_input(handle, &InputEvent::KeyDown(Key::Enter)).unwrap();
        assert_eq!(outcome, Some(GameResults::Clock { score: 100 }));
        assert!(controller
            .handle_input(handle, &InputEvent::KeyDown(Key::Enter))
            .unwrap()
            .is_none());

        assert_eq!(seen.borrow().as_slice(), &[GameResults::Clock { score: 100 }]);
        let log = controller.sink();
        assert_eq!(log.len(), 1);
        let record = log.latest().unwrap();
        assert_eq!(record.game, GameKind::Clock);
        assert_eq!(record.timestamp.timestamp_millis(), 1500);
    }

    #[test]
    fn test_tick_completes_timed_sessions() {
        let (mut controller, clock) = controller();
        let mut surface = DisplayList::new(300.0, 400.0);
        let options = GameOptions::default()
            .with_seed(3)
            .with_nback(NBackConfig::default().with_length(4));
        let handle = controller.try_init("nback", &mut surface, options, |_| {}).unwrap();
        controller.start(handle).unwrap();

        clock.advance(8999);
        assert!(controller.tick().is_empty());
        clock.advance(1);
        let completed = controller.tick();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].0, handle);
        assert!(controller.is_complete(handle).unwrap());
        assert_eq!(controller.sink().for_game(GameKind::NBack).count(), 1);
    }

    #[test]
    fn test_stale_handles_are_rejected() {
        let (mut controller, _) = controller();
        let mut surface = DisplayList::new(400.0, 460.0);
        let first = controller.try_init("trail", &mut surface, GameOptions::default().with_seed(1), |_| {}).unwrap();
        let second = controller.try_init("maze", &mut surface, GameOptions::default().with_seed(1), |_| {}).unwrap();

        // The second init replaced the first session in the same slot
        assert_eq!(first.index(), second.index());
        assert_ne!(first.generation(), second.generation());
        assert!(matches!(controller.results(first), Err(GameError::UnknownSession)));
        assert_eq!(controller.live_sessions(), 1);

        controller.end_session(second).unwrap();
        assert!(matches!(controller.end_session(second), Err(GameError::UnknownSession)));
        assert!(matches!(controller.start(second), Err(GameError::UnknownSession)));
        assert_eq!(controller.live_sessions(), 0);
    }

    #[test]
    fn test_reset_cancels_pending_tasks() {
        let (mut controller, clock) = controller();
        let mut surface = DisplayList::new(400.0, 460.0);
        let handle = controller
            .try_init("maze", &mut surface, GameOptions::default().with_seed(9), |_| {})
            .unwrap();
        controller.start(handle).unwrap();
        assert_eq!(controller.pending_tasks(handle).unwrap(), 1);

        clock.advance(500);
        controller.reset(handle).unwrap();
        assert_eq!(controller.pending_tasks(handle).unwrap(), 0);
        clock.advance(10_000);
        assert!(controller.tick().is_empty());
        assert_eq!(controller.results(handle).unwrap(), GameResults::Maze { time: 0.0 });
    }

    #[test]
    fn test_invalid_options_fail_without_replacing_session() {
        let (mut controller, _) = controller();
        let mut surface = DisplayList::new(300.0, 500.0);
        let handle = controller.try_init("clock", &mut surface, GameOptions::default(), |_| {}).unwrap();

        let bad = GameOptions::default().with_clock(crate::core::ClockConfig::default().with_target("99:99"));
        assert!(matches!(
            controller.try_init("clock", &mut surface, bad, |_| {}),
            Err(GameError::InvalidTargetTime(_))
        ));
        assert!(controller.results(handle).is_ok());
    }

    #[test]
    fn test_render_clears_first() {
        let (mut controller, _) = controller();
        let mut surface = DisplayList::new(300.0, 400.0);
        let handle = controller.try_init("nback", &mut surface, GameOptions::default(), |_| {}).unwrap();
        controller.render(handle, &mut surface).unwrap();
        controller.render(handle, &mut surface).unwrap();
        assert_eq!(surface.clear_count(), 3);
        assert_eq!(surface.texts().filter(|t| *t == "Match!").count(), 1);
    }
}
