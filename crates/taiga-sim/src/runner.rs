//! Background-thread controller boundary.
//!
//! [`SessionHandle`] runs a [`Session`] on a dedicated tick thread. The
//! controller submits [`ControlCommand`]s through a bounded channel; the
//! thread drains them at tick boundaries only, so no command ever
//! preempts a tick in flight. The latest [`Snapshot`] is published into
//! a shared slot that renderers read at their own pace.
//!
//! Pausing stops tick calls entirely. Since simulation time only
//! advances inside [`Session::tick`], every in-world timer freezes with
//! it — there are no background timers to leak elapsed time.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, warn};

use taiga_core::{ControlCommand, InputError, SessionStatus, WindowSpec};

use crate::config::{ConfigError, SessionConfig};
use crate::session::Session;
use crate::snapshot::Snapshot;

/// Capacity of the command channel. Controllers are human-paced; a
/// small bound is plenty and keeps a runaway caller from queueing
/// unbounded work.
const COMMAND_QUEUE_CAPACITY: usize = 64;

/// Handle to a session running on its own tick thread.
///
/// Dropping the handle shuts the thread down.
pub struct SessionHandle {
    cmd_tx: Sender<ControlCommand>,
    latest: Arc<Mutex<Option<Snapshot>>>,
    window: Mutex<Option<WindowSpec>>,
    thread: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Validate `config` and spawn the tick thread.
    ///
    /// The world itself is not built until [`start`](SessionHandle::start)
    /// arrives; until then [`snapshot`](SessionHandle::snapshot) returns
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for invalid configuration or a failed
    /// thread spawn.
    pub fn launch(config: SessionConfig) -> Result<SessionHandle, ConfigError> {
        config.validate()?;
        let (cmd_tx, cmd_rx) = bounded(COMMAND_QUEUE_CAPACITY);
        let latest = Arc::new(Mutex::new(None));
        let thread_latest = Arc::clone(&latest);
        let thread = thread::Builder::new()
            .name("taiga-session".into())
            .spawn(move || run(config, cmd_rx, thread_latest))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
        Ok(SessionHandle {
            cmd_tx,
            latest,
            window: Mutex::new(None),
            thread: Some(thread),
        })
    }

    /// Validate dimension text and start (or restart) the session.
    ///
    /// Returns the clamped window geometry on success. A running session
    /// ignores the command; a finished one restarts in place.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidDimensions`] for malformed text.
    /// Nothing is queued and no state changes on rejection.
    pub fn start(
        &self,
        dims: &str,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<WindowSpec, InputError> {
        let window = WindowSpec::parse(dims, screen_width, screen_height)?;
        if let Ok(mut slot) = self.window.lock() {
            *slot = Some(window);
        }
        self.send(ControlCommand::Start { window });
        Ok(window)
    }

    /// Suspend tick advancement.
    pub fn pause(&self) {
        self.send(ControlCommand::Pause);
    }

    /// Resume tick advancement.
    pub fn resume(&self) {
        self.send(ControlCommand::Resume);
    }

    /// Rebuild the world. Learned policy tables persist.
    pub fn reset(&self) {
        self.send(ControlCommand::Reset);
    }

    /// The latest published snapshot, if a session has started.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.latest.lock().ok().and_then(|slot| slot.clone())
    }

    /// The window geometry from the most recent accepted `start`.
    pub fn window(&self) -> Option<WindowSpec> {
        self.window.lock().ok().and_then(|slot| *slot)
    }

    /// Current score, or 0 before the first session.
    pub fn score(&self) -> u64 {
        self.snapshot().map_or(0, |s| s.score)
    }

    /// Current lives, or 0 before the first session.
    pub fn lives(&self) -> u32 {
        self.snapshot().map_or(0, |s| s.lives)
    }

    /// Whether the session ended with all lives lost.
    pub fn game_over(&self) -> bool {
        self.snapshot().is_some_and(|s| s.game_over())
    }

    /// Whether the session ended with every food cell collected.
    pub fn game_won(&self) -> bool {
        self.snapshot().is_some_and(|s| s.game_won())
    }

    /// Stop the tick thread and wait for it to exit.
    pub fn shutdown(mut self) {
        self.send(ControlCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    fn send(&self, cmd: ControlCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("session runner is gone; command dropped");
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(ControlCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// ── Tick thread ────────────────────────────────────────────────────

fn run(
    config: SessionConfig,
    cmd_rx: Receiver<ControlCommand>,
    latest: Arc<Mutex<Option<Snapshot>>>,
) {
    let period = Duration::from_millis(config.tick_ms);
    let mut session: Option<Session> = None;
    let mut paused = false;
    let mut next_tick = Instant::now() + period;

    loop {
        // Drain commands up to the tick deadline.
        loop {
            let now = Instant::now();
            if now >= next_tick {
                break;
            }
            match cmd_rx.recv_timeout(next_tick - now) {
                Ok(cmd) => {
                    if !apply(cmd, &config, &mut session, &mut paused, &latest) {
                        return;
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        if let Some(s) = session.as_mut() {
            if !paused {
                s.tick();
                publish(&latest, s.snapshot());
            }
        }

        next_tick += period;
        let now = Instant::now();
        if next_tick < now {
            // Fell behind (host stall); rebase instead of bursting.
            next_tick = now + period;
        }
    }
}

/// Apply one command. Returns `false` on shutdown.
fn apply(
    cmd: ControlCommand,
    config: &SessionConfig,
    session: &mut Option<Session>,
    paused: &mut bool,
    latest: &Arc<Mutex<Option<Snapshot>>>,
) -> bool {
    match cmd {
        ControlCommand::Start { window: _ } => match session {
            Some(s) if s.status() == SessionStatus::Running => {
                debug!("start ignored: session already running");
            }
            Some(s) => match s.reset() {
                Ok(()) => {
                    *paused = false;
                    publish(latest, s.snapshot());
                }
                Err(e) => warn!(error = %e, "session restart failed"),
            },
            None => match Session::new(config.clone()) {
                Ok(s) => {
                    publish(latest, s.snapshot());
                    *session = Some(s);
                    *paused = false;
                }
                Err(e) => warn!(error = %e, "session construction failed"),
            },
        },
        ControlCommand::Pause => *paused = true,
        ControlCommand::Resume => *paused = false,
        ControlCommand::Reset => {
            if let Some(s) = session.as_mut() {
                match s.reset() {
                    Ok(()) => {
                        *paused = false;
                        publish(latest, s.snapshot());
                    }
                    Err(e) => warn!(error = %e, "session reset failed"),
                }
            }
        }
        ControlCommand::Shutdown => return false,
    }
    true
}

fn publish(latest: &Arc<Mutex<Option<Snapshot>>>, snapshot: Snapshot) {
    if let Ok(mut slot) = latest.lock() {
        *slot = Some(snapshot);
    }
}
