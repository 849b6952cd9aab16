//! Crossterm terminal driver for stepfind.
//!
//! Provides a [`CrosstermDriver`] that implements [`stepfind_core::Driver`],
//! mapping the canvas rendering model to a terminal via crossterm.

use std::io::{self, Write};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind},
    execute, queue,
    style::{self, Attribute, Color as CtColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use stepfind_core::{
    app::{Context, Driver},
    canvas::Frame,
    messages::{Key, ModMask, Msg, MouseAction},
    style::{AttrMask, Color},
    Point,
};

/// Maps a [`stepfind_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    if c == Color::DEFAULT {
        CtColor::Reset
    } else {
        let (r, g, b) = (c.r(), c.g(), c.b());
        CtColor::Rgb { r, g, b }
    }
}

/// Maps crossterm key modifiers to a [`ModMask`].
fn to_mod_mask(mods: KeyModifiers) -> ModMask {
    let mut m = ModMask::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        m = m | ModMask::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        m = m | ModMask::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        m = m | ModMask::ALT;
    }
    m
}

/// Maps a crossterm [`KeyCode`] to a [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        _ => None,
    }
}

/// A terminal back-end using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
}

impl CrosstermDriver {
    /// Create a new driver with mouse capture enabled.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        log::debug!("terminal initialized (mouse capture: {})", self.mouse_enabled);
        Ok(())
    }

    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        // Non-blocking poll: check for an event with a short timeout.
        if !event::poll(Duration::from_millis(16))? {
            return Ok(());
        }

        while event::poll(Duration::ZERO)? {
            if ctx.is_done() {
                return Ok(());
            }

            let ev = event::read()?;

            let msg = match ev {
                Event::Key(KeyEvent {
                    code, modifiers, ..
                }) => to_key(code).map(|key| Msg::KeyDown {
                    key,
                    modifiers: to_mod_mask(modifiers),
                    time: Instant::now(),
                }),
                Event::Mouse(me) => {
                    let pos = Point::new(me.column as i32, me.row as i32);
                    let modifiers = to_mod_mask(me.modifiers);
                    let action = match me.kind {
                        MouseEventKind::Down(MouseButton::Left) => Some(MouseAction::Main),
                        MouseEventKind::Down(MouseButton::Right) => Some(MouseAction::Secondary),
                        MouseEventKind::Down(MouseButton::Middle) => Some(MouseAction::Auxiliary),
                        MouseEventKind::Up(_) => Some(MouseAction::Release),
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(MouseAction::Move),
                        _ => None,
                    };
                    action.map(|action| Msg::Mouse {
                        action,
                        pos,
                        modifiers,
                        time: Instant::now(),
                    })
                }
                Event::Resize(w, h) => Some(Msg::Screen {
                    width: w as i32,
                    height: h as i32,
                    time: Instant::now(),
                }),
                _ => None,
            };

            if let Some(m) = msg {
                tx.send(m).ok();
            }
        }

        Ok(())
    }

    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mut stdout = io::stdout();

        for fc in &frame.cells {
            let p = fc.pos;
            let cell = &fc.cell;

            queue!(
                stdout,
                cursor::MoveTo(p.x as u16, p.y as u16),
                SetForegroundColor(to_ct_color(cell.style.fg)),
                SetBackgroundColor(to_ct_color(cell.style.bg))
            )?;

            let attrs = cell.style.attrs;
            if attrs.contains(AttrMask::BOLD) {
                queue!(stdout, style::SetAttribute(Attribute::Bold))?;
            }
            if attrs.contains(AttrMask::ITALIC) {
                queue!(stdout, style::SetAttribute(Attribute::Italic))?;
            }
            if attrs.contains(AttrMask::UNDERLINE) {
                queue!(stdout, style::SetAttribute(Attribute::Underlined))?;
            }
            if attrs.contains(AttrMask::REVERSE) {
                queue!(stdout, style::SetAttribute(Attribute::Reverse))?;
            }
            if attrs.contains(AttrMask::DIM) {
                queue!(stdout, style::SetAttribute(Attribute::Dim))?;
            }

            write!(stdout, "{}", cell.ch)?;

            if attrs != AttrMask::NONE {
                queue!(stdout, style::SetAttribute(Attribute::Reset))?;
            }
        }

        stdout.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        log::debug!("terminal restored");
    }
}
