//! Controller boundary types: commands, window geometry, session status.
//!
//! The controller never mutates simulation state directly. It submits
//! [`ControlCommand`]s through a queue that the tick loop drains at tick
//! boundaries, and reads results back from immutable snapshots.

use crate::error::InputError;
use std::fmt;

/// Number of grid cells per axis. The playfield is always `GRID_SIDE` ×
/// `GRID_SIDE` cells regardless of the requested pixel size.
pub const GRID_SIDE: u32 = 20;

/// Pixel margin reserved around the playfield when clamping the
/// requested window to the screen bounds.
const SCREEN_MARGIN: u32 = 200;

/// Validated window geometry for a session.
///
/// Produced by [`WindowSpec::parse`] from controller-supplied dimension
/// text. Purely presentational: the simulation itself only ever sees the
/// fixed `GRID_SIDE` × `GRID_SIDE` cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSpec {
    /// Window width in pixels, after clamping to the screen.
    pub width: u32,
    /// Window height in pixels, after clamping to the screen.
    pub height: u32,
    /// Side length of one rendered grid cell, in pixels.
    pub cell_size: u32,
}

impl WindowSpec {
    /// Parse dimension text like `"800x600"` into a validated window.
    ///
    /// Whitespace is stripped and the separator is case-insensitive.
    /// The requested size is clamped to the screen bounds minus a fixed
    /// margin, and the cell size is derived from the clamped size.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidDimensions`] when the text is not two
    /// unsigned integers joined by `x`. No state is touched on rejection.
    pub fn parse(
        text: &str,
        screen_width: u32,
        screen_height: u32,
    ) -> Result<WindowSpec, InputError> {
        let reject = || InputError::InvalidDimensions {
            input: text.to_string(),
        };

        let cleaned: String = text
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let mut parts = cleaned.split('x');
        let w: u32 = parts
            .next()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
            .ok_or_else(reject)?;
        let h: u32 = parts
            .next()
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
            .ok_or_else(reject)?;
        if parts.next().is_some() {
            return Err(reject());
        }

        let width = w.min(screen_width.saturating_sub(SCREEN_MARGIN));
        let height = h.min(screen_height.saturating_sub(SCREEN_MARGIN));
        let cell_size = (width / GRID_SIDE).min(height / GRID_SIDE);
        Ok(WindowSpec {
            width,
            height,
            cell_size,
        })
    }
}

/// A command submitted to the session runner.
///
/// Commands are queued and applied at tick boundaries only; there is no
/// mid-tick preemption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    /// Begin a session with the given window geometry.
    ///
    /// Ignored while a session is already running; restarts the world
    /// when the previous session has ended.
    Start {
        /// Validated window geometry for the renderer.
        window: WindowSpec,
    },
    /// Suspend tick advancement. All simulation timers freeze.
    Pause,
    /// Resume tick advancement.
    Resume,
    /// Tear down and rebuild the world. Learned policy tables persist.
    Reset,
    /// Stop the runner thread.
    Shutdown,
}

/// Lifecycle state of a session, visible to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The session is advancing.
    Running,
    /// Every food cell has been collected. Terminal.
    Won,
    /// All lives have been lost. Terminal.
    Lost,
}

impl SessionStatus {
    /// Whether the session has ended. Terminal sessions ignore further
    /// tick calls.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Won => write!(f, "won"),
            Self::Lost => write!(f, "lost"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Parsing ─────────────────────────────────────────────────

    #[test]
    fn parse_accepts_plain_dimensions() {
        let w = WindowSpec::parse("800x600", 1920, 1080).unwrap();
        assert_eq!(w.width, 800);
        assert_eq!(w.height, 600);
        assert_eq!(w.cell_size, 30); // min(800, 600) / 20
    }

    #[test]
    fn parse_tolerates_spaces_and_case() {
        let w = WindowSpec::parse(" 800 X 600 ", 1920, 1080).unwrap();
        assert_eq!((w.width, w.height), (800, 600));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for bad in ["", "800", "800x", "x600", "800x600x400", "800xsix", "-5x600"] {
            assert!(
                matches!(
                    WindowSpec::parse(bad, 1920, 1080),
                    Err(InputError::InvalidDimensions { .. })
                ),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn parse_clamps_to_screen_minus_margin() {
        let w = WindowSpec::parse("5000x5000", 1920, 1080).unwrap();
        assert_eq!(w.width, 1720);
        assert_eq!(w.height, 880);
        assert_eq!(w.cell_size, 44); // 880 / 20
    }

    #[test]
    fn cell_size_uses_smaller_axis() {
        let w = WindowSpec::parse("400x1000", 1920, 1080).unwrap();
        assert_eq!(w.cell_size, 20); // 400 / 20
    }

    // ── Status ──────────────────────────────────────────────────

    #[test]
    fn terminal_statuses() {
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Won.is_terminal());
        assert!(SessionStatus::Lost.is_terminal());
    }
}
