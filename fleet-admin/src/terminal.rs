//! Terminal setup and teardown with panic safety.

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};

/// Set by the panic hook once it has restored the terminal. A panic caught
/// further up (a failing cell renderer) leaves the app running, so the next
/// draw has to set the screen up again.
static SCREEN_LOST: AtomicBool = AtomicBool::new(false);

fn mark_screen_lost() {
    SCREEN_LOST.store(true, Ordering::SeqCst);
}

fn take_screen_lost() -> bool {
    SCREEN_LOST.swap(false, Ordering::SeqCst)
}

/// How a line is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Title,
    Muted,
    Cursor,
    Error,
}

/// One line of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub tone: Tone,
}

impl Line {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Normal)
    }
}

/// A wrapper around the terminal that ensures proper cleanup on drop.
pub struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    /// Initialize the terminal: raw mode, alternate screen, hidden cursor.
    pub fn new() -> io::Result<Self> {
        // Restore the terminal before the default hook prints the panic
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            mark_screen_lost();
            original_hook(panic_info);
        }));

        take_screen_lost();
        let mut stdout = io::stdout();
        enter_screen(&mut stdout)?;

        Ok(Self { stdout })
    }

    /// Terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Draw a full frame, one line per terminal row.
    pub fn draw(&mut self, lines: &[Line]) -> io::Result<()> {
        if take_screen_lost() {
            enter_screen(&mut self.stdout)?;
        }

        let (_, height) = self.size()?;
        queue!(self.stdout, Clear(ClearType::All))?;

        for (y, line) in lines.iter().take(usize::from(height)).enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, y as u16))?;
            match line.tone {
                Tone::Normal => {}
                Tone::Title => queue!(self.stdout, SetAttribute(Attribute::Bold))?,
                Tone::Muted => queue!(self.stdout, SetForegroundColor(Color::DarkGrey))?,
                Tone::Cursor => queue!(self.stdout, SetAttribute(Attribute::Reverse))?,
                Tone::Error => queue!(self.stdout, SetForegroundColor(Color::Red))?,
            }
            queue!(
                self.stdout,
                Print(&line.text),
                SetAttribute(Attribute::Reset),
                ResetColor
            )?;
        }

        self.stdout.flush()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn enter_screen(stdout: &mut Stdout) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    Ok(())
}
