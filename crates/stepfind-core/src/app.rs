//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::canvas::{compute_frame, Canvas, Frame};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
pub enum Effect {
    /// A one-shot command that produces an optional follow-up message.
    Cmd(Box<dyn FnOnce() -> Option<Msg> + Send>),
    /// Multiple effects batched together.
    Batch(Vec<Effect>),
    /// Signal the application loop to stop.
    End,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cmd(_) => f.write_str("Effect::Cmd(..)"),
            Self::Batch(v) => f.debug_tuple("Effect::Batch").field(&v.len()).finish(),
            Self::End => f.write_str("Effect::End"),
        }
    }
}

/// Convenience constructor for an [`Effect::Cmd`].
pub fn cmd<F>(f: F) -> Effect
where
    F: FnOnce() -> Option<Msg> + Send + 'static,
{
    Effect::Cmd(Box::new(f))
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `canvas`.
    fn draw(&self, canvas: &mut Canvas);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input messages, sending them through `tx`.
    /// The implementation should honour `ctx.is_done()` and return when it
    /// becomes `true`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Enters the event loop: poll → update → draw → diff → flush.
    /// 4. Stops when the model returns `Effect::End` or the driver signals
    ///    quit.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();

        // Seed with Init.
        tx.send(Msg::Init).ok();

        let mut prev_canvas = Canvas::new(self.width, self.height);
        let mut curr_canvas = Canvas::new(self.width, self.height);

        // Process the Init message first.
        self.process_pending(&rx, &ctx, &tx, &mut prev_canvas, &mut curr_canvas)?;

        // Main loop: poll then process. Commands run on background threads
        // and feed their follow-up messages back through `tx`.
        while !ctx.is_done() {
            match self.driver.poll_msgs(&ctx, tx.clone()) {
                Ok(()) => {}
                Err(e) => {
                    ctx.cancel();
                    self.driver.close();
                    return Err(e);
                }
            }

            if ctx.is_done() {
                break;
            }

            self.process_pending(&rx, &ctx, &tx, &mut prev_canvas, &mut curr_canvas)?;
        }

        self.driver.close();
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        tx: &Sender<Msg>,
        prev_canvas: &mut Canvas,
        curr_canvas: &mut Canvas,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        // Drain all currently available messages.
        while let Ok(msg) = rx.try_recv() {
            if let Some(effect) = self.model.update(msg) {
                if handle_effect(effect, ctx, tx) {
                    return Ok(());
                }
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr_canvas);
            let frame = compute_frame(prev_canvas, curr_canvas);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            // Swap: copy current into previous.
            prev_canvas.copy_from(curr_canvas);
        }

        Ok(())
    }
}

/// Execute an effect. Returns `true` if the app should stop.
///
/// `Cmd` closures run on a background thread; a produced message is fed back
/// through `tx` so timers and other deferred work re-enter the loop.
fn handle_effect(effect: Effect, ctx: &Context, tx: &Sender<Msg>) -> bool {
    match effect {
        Effect::End => {
            ctx.cancel();
            true
        }
        Effect::Cmd(f) => {
            let cmd_tx = tx.clone();
            let cmd_ctx = ctx.clone();
            thread::spawn(move || {
                if let Some(msg) = f() {
                    if !cmd_ctx.is_done() {
                        cmd_tx.send(msg).ok();
                    }
                }
            });
            false
        }
        Effect::Batch(effects) => {
            for e in effects {
                if handle_effect(e, ctx, tx) {
                    return true;
                }
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn context_cancel() {
        let ctx = Context::new();
        assert!(!ctx.is_done());
        let clone = ctx.clone();
        clone.cancel();
        assert!(ctx.is_done());
    }

    #[test]
    fn cmd_feeds_message_back() {
        let ctx = Context::new();
        let (tx, rx) = mpsc::channel();
        let stop = handle_effect(cmd(|| Some(Msg::Quit)), &ctx, &tx);
        assert!(!stop);
        let msg = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(msg, Msg::Quit));
    }

    #[test]
    fn end_cancels_context() {
        let ctx = Context::new();
        let (tx, _rx) = mpsc::channel();
        assert!(handle_effect(Effect::End, &ctx, &tx));
        assert!(ctx.is_done());
    }

    #[test]
    fn batch_stops_at_end() {
        let ctx = Context::new();
        let (tx, rx) = mpsc::channel();
        let effects = Effect::Batch(vec![Effect::End, cmd(|| Some(Msg::Quit))]);
        assert!(handle_effect(effects, &ctx, &tx));
        // the command after End never ran
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
