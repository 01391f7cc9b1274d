use crate::error::Result;
use crate::event::{Event, TerminalEvent};
use crate::page::Page;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture, EventStream, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// Configuration options for a [`Program`].
///
/// All fields have sensible defaults (see [`Default`] impl).  Use struct
/// update syntax to override only the options you need:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     fps: 30,
///     title: Some("Settings".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, max: 120).
    pub fps: u32,
    /// Start in alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse events so clicks reach the page (default: true).
    pub mouse_capture: bool,
    /// Set terminal title.
    pub title: Option<String>,
    /// Key that ends the program before it reaches the page
    /// (default: Ctrl+C). Only code and modifiers are compared.
    pub quit_key: Option<KeyEvent>,
    /// Whether to exit on SIGINT (default: true).
    pub handle_signals: bool,
    /// Whether to catch panics and restore terminal (default: true).
    pub catch_panics: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: true,
            title: None,
            quit_key: Some(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            handle_signals: true,
            catch_panics: true,
        }
    }
}

/// Drives a [`Page`] on a real terminal.
///
/// The event loop waits on terminal input, the next pending stylesheet
/// transition and the frame timer. Terminal input is translated by
/// [`Page::dispatch_terminal`]; due transitions become transition-end events.
/// The page is redrawn at most once per frame, and only after something was
/// dispatched.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> drape_core::Result<()> {
///     let page = Program::new(build_page())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program {
    page: Page,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    options: ProgramOptions,
    needs_redraw: bool,
}

impl Program {
    /// Create a program with default options.
    ///
    /// Returns an error if terminal initialization fails.
    pub fn new(page: Page) -> Result<Self> {
        Self::with_options(page, ProgramOptions::default())
    }

    /// Create a program with custom options.
    ///
    /// Returns an error if terminal initialization fails.
    pub fn with_options(mut page: Page, options: ProgramOptions) -> Result<Self> {
        let terminal = init_terminal(&options)?;
        // Widgets that depend on the viewport size evaluate it before the
        // first frame.
        let size = restore_on_err(terminal.size(), || {
            let _ = restore_terminal_minimal(options.alt_screen);
        })?;
        let body = page.document().body();
        page.dispatch(Event::resize(body, size.width, size.height));
        log::debug!("program initialized at {}x{}", size.width, size.height);
        Ok(Self {
            page,
            terminal,
            options,
            needs_redraw: true,
        })
    }

    /// Run until the quit key or a signal. Returns the page in its final
    /// state.
    pub async fn run(mut self) -> Result<Page> {
        let result = self.event_loop().await;
        log::debug!("shutting down");
        restore_terminal(&self.options)?;
        result.map(|()| self.page)
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut events = EventStream::new();
        let handle_signals = self.options.handle_signals;

        loop {
            let deadline = self.page.document().next_transition_deadline();
            let transition = async move {
                match deadline {
                    Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    log::debug!("received ctrl+c signal");
                    return Ok(());
                }

                next = events.next() => {
                    let Some(event) = next else {
                        return Ok(());
                    };
                    let event = TerminalEvent::from(event?);
                    if self.is_quit(&event) {
                        return Ok(());
                    }
                    self.page.dispatch_terminal(event);
                    self.needs_redraw = true;
                }

                _ = transition => {
                    let fired = self.page.fire_due_transitions(Instant::now());
                    log::trace!("{fired} transitions ended");
                    self.needs_redraw = true;
                }

                _ = frame_interval.tick() => {
                    if self.page.poll() {
                        self.needs_redraw = true;
                    }
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn is_quit(&self, event: &TerminalEvent) -> bool {
        match (event, &self.options.quit_key) {
            (TerminalEvent::Key(key), Some(quit)) => {
                key.code == quit.code && key.modifiers == quit.modifiers
            }
            _ => false,
        }
    }

    fn render(&mut self) -> Result<()> {
        let page = &self.page;
        self.terminal.draw(|frame| page.view(frame))?;
        Ok(())
    }
}

/// Run `page` with default options.
pub async fn run(page: Page) -> Result<Page> {
    Program::new(page)?.run().await
}

/// Run `page` with custom options.
pub async fn run_with(page: Page, options: ProgramOptions) -> Result<Page> {
    Program::with_options(page, options)?.run().await
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Stdout>>> {
    // Install panic hook that restores terminal (only once to avoid stacking)
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal_minimal(alt_screen);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = stdout();
    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if options.mouse_capture {
        execute!(writer, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;

    let backend = CrosstermBackend::new(writer);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Run `restore` when a setup step after `init_terminal` fails, so the
/// error does not leave raw mode and the alternate screen behind.
fn restore_on_err<T, E>(
    result: std::result::Result<T, E>,
    restore: impl FnOnce(),
) -> std::result::Result<T, E> {
    if result.is_err() {
        restore();
    }
    result
}

fn restore_terminal(options: &ProgramOptions) -> Result<()> {
    restore_terminal_minimal(options.alt_screen)?;
    Ok(())
}

fn restore_terminal_minimal(alt_screen: bool) -> std::io::Result<()> {
    // Best effort: keep restoring even if a step fails.
    let r1 = disable_raw_mode();
    let mut writer = stdout();
    execute!(writer, DisableMouseCapture).ok();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    r1
}
