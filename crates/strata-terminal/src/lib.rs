//! Terminal backend abstraction (`SPEC_FULL.md` §4.6).
//!
//! Grounded on the teacher's `core-terminal::CrosstermBackend` /
//! `TerminalGuard`, trimmed of raw-mode and keyboard concerns — this spec's
//! core is render-only, so the backend's job shrinks to the alternate
//! screen, cursor visibility, size query, and the write sink the renderer
//! uses during a render call.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Abstracts the process's standard output and the external terminal-size
/// callback consulted by `RectManager::fit_to_terminal`.
pub trait TerminalBackend {
    fn enter(&mut self, alternate_screen: bool) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn size(&self) -> Result<(u16, u16)>;
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
    alternate_screen: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false, alternate_screen: false }
    }

    /// Enters and returns a guard that leaves on drop, so a panicking caller
    /// never stands the terminal in alternate-screen/hidden-cursor state.
    pub fn enter_guard(&mut self, alternate_screen: bool) -> Result<TerminalGuard<'_>> {
        self.enter(alternate_screen)?;
        Ok(TerminalGuard { backend: self, active: true })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self, alternate_screen: bool) -> Result<()> {
        if self.entered {
            return Ok(());
        }
        if alternate_screen {
            execute!(io::stdout(), EnterAlternateScreen)?;
        }
        execute!(io::stdout(), Hide)?;
        self.entered = true;
        self.alternate_screen = alternate_screen;
        tracing::debug!(alternate_screen, "terminal entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        execute!(io::stdout(), Show)?;
        if self.alternate_screen {
            execute!(io::stdout(), LeaveAlternateScreen)?;
        }
        self.entered = false;
        tracing::debug!("terminal left");
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(terminal::size()?)
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::stdout().write_all(bytes)?;
        io::stdout().flush()
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// RAII guard ensuring `leave()` runs even if the caller early-returns or
/// panics between `enter()` and the matching `kill()`.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

/// A backend that never touches a real terminal: used by the demonstration
/// binary's tests and anywhere the `size()` callback is unavailable.
pub struct FallbackBackend {
    width: u16,
    height: u16,
    pub buffer: Vec<u8>,
}

impl FallbackBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height, buffer: Vec::new() }
    }
}

impl TerminalBackend for FallbackBackend {
    fn enter(&mut self, _alternate_screen: bool) -> Result<()> {
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_backend_reports_configured_size() {
        let backend = FallbackBackend::new(80, 24);
        assert_eq!(backend.size().unwrap(), (80, 24));
    }

    #[test]
    fn fallback_backend_accumulates_writes() {
        let mut backend = FallbackBackend::new(10, 10);
        backend.write(b"hello").unwrap();
        backend.write(b" world").unwrap();
        assert_eq!(backend.buffer, b"hello world");
    }
}
