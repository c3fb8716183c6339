//! Typed event channel between the top bar and the screens below it.
//!
//! The top bar only emits [`ShellEvent`]s. Whoever subscribed decides what
//! they mean: the layout answers `Close` with an exit confirmation, the
//! screen stack answers `Back`. Handlers run newest-first and the first
//! one that reports [`Propagation::Handled`] stops dispatch.

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    Back,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Handled,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<C> = Box<dyn FnMut(&mut C, ShellEvent) -> Propagation>;

/// Event emitter owned by the application shell. `C` is the context handed
/// to every handler, normally the app state.
pub struct Shell<C> {
    handlers: Vec<(SubscriptionId, Handler<C>)>,
    next_id: u64,
}

impl<C> Default for Shell<C> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<C> fmt::Debug for Shell<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<C> Shell<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut C, ShellEvent) -> Propagation + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Deliver `event`. Returns true if some handler took it.
    pub fn emit(&mut self, ctx: &mut C, event: ShellEvent) -> bool {
        for (id, handler) in self.handlers.iter_mut().rev() {
            if handler(ctx, event) == Propagation::Handled {
                debug!(?event, handler = id.0, "shell event handled");
                return true;
            }
        }
        debug!(?event, "shell event ignored");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_handler_runs_first_and_can_stop_dispatch() {
        let mut shell: Shell<Vec<&'static str>> = Shell::new();
        shell.subscribe(|log, _| {
            log.push("layout");
            Propagation::Handled
        });
        shell.subscribe(|log, ev| {
            log.push("screen");
            if ev == ShellEvent::Back {
                Propagation::Handled
            } else {
                Propagation::Ignored
            }
        });

        let mut log = Vec::new();
        assert!(shell.emit(&mut log, ShellEvent::Back));
        assert_eq!(log, ["screen"]);

        log.clear();
        assert!(shell.emit(&mut log, ShellEvent::Close));
        assert_eq!(log, ["screen", "layout"]);
    }

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let mut shell: Shell<u32> = Shell::new();
        let id = shell.subscribe(|n, _| {
            *n += 1;
            Propagation::Handled
        });
        let mut count = 0;
        shell.emit(&mut count, ShellEvent::Close);
        assert!(shell.unsubscribe(id));
        assert!(!shell.unsubscribe(id));
        assert!(!shell.emit(&mut count, ShellEvent::Close));
        assert_eq!(count, 1);
        assert!(shell.is_empty());
    }
}
