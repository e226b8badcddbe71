use super::{ArSession, EventSink, SessionEvent, SessionKind};
use crate::error::{ArError, SessionError};
use futures::future::join_all;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Front door for AR: availability across all configured sessions and
/// priority-ordered entry with fallback.
pub struct ArManager {
    sessions: Vec<Box<dyn ArSession>>,
    active: Option<usize>,
    listeners: Rc<RefCell<Vec<EventSink>>>,
}

impl ArManager {
    /// Keep only candidates whose kind appears in `priority`, in that order.
    pub fn new(priority: &[SessionKind], candidates: Vec<Box<dyn ArSession>>) -> Self {
        let mut pool: Vec<Option<Box<dyn ArSession>>> = candidates.into_iter().map(Some).collect();
        let mut sessions = Vec::new();
        for kind in priority {
            let found = pool
                .iter()
                .position(|s| matches!(s, Some(c) if c.kind() == *kind));
            if let Some(i) = found {
                sessions.extend(pool[i].take());
            }
        }

        let listeners: Rc<RefCell<Vec<EventSink>>> = Rc::new(RefCell::new(Vec::new()));
        for session in sessions.iter_mut() {
            let listeners = Rc::clone(&listeners);
            session.set_event_sink(Rc::new(move |event| broadcast(&listeners, event)));
        }
        log::debug!(
            "[ar] session order: {:?}",
            sessions.iter().map(|s| s.kind()).collect::<Vec<_>>()
        );
        Self {
            sessions,
            active: None,
            listeners,
        }
    }

    pub fn kinds(&self) -> Vec<SessionKind> {
        self.sessions.iter().map(|s| s.kind()).collect()
    }

    pub fn on_event(&self, listener: impl Fn(SessionEvent) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// True when any configured session is available. Checks run concurrently.
    pub async fn is_available(&self) -> bool {
        join_all(self.sessions.iter().map(|s| s.is_available()))
            .await
            .into_iter()
            .any(|available| available)
    }

    pub fn is_presenting(&self) -> bool {
        self.active
            .and_then(|i| self.sessions.get(i))
            .map(|s| s.is_active())
            .unwrap_or(false)
    }

    pub fn active_kind(&self) -> Option<SessionKind> {
        self.active.and_then(|i| self.sessions.get(i)).map(|s| s.kind())
    }

    /// Enter the first available session that starts. Individual failures
    /// fall through to the next candidate and are not reported.
    pub async fn enter(&mut self) -> Result<SessionKind, ArError> {
        if self.is_presenting() {
            return Err(SessionError::AlreadyActive.into());
        }
        self.active = None;

        let mut entered = None;
        for (i, session) in self.sessions.iter_mut().enumerate() {
            let kind = session.kind();
            if !session.is_available().await {
                log::debug!("[ar] {} unavailable", kind);
                continue;
            }
            log::info!("[ar] entering {}", kind);
            match session.enter().await {
                Ok(()) => {
                    entered = Some((i, kind));
                    break;
                }
                Err(e) => log::warn!("[ar] {} failed to start, trying next: {}", kind, e),
            }
        }

        match entered {
            Some((i, kind)) => {
                self.active = Some(i);
                broadcast(&self.listeners, SessionEvent::Entered(kind));
                Ok(kind)
            }
            None => {
                log::warn!("[ar] no session entered");
                broadcast(&self.listeners, SessionEvent::Failed);
                Err(ArError::NoSessionEntered)
            }
        }
    }

    pub fn exit(&mut self) {
        if let Some(session) = self.active.take().and_then(|i| self.sessions.get_mut(i)) {
            log::info!("[ar] exiting {}", session.kind());
            session.exit();
        }
    }
}

/// Shared home for the manager while async calls borrow it out.
///
/// `enter` and the availability check hold the manager across awaits, so
/// it is taken out of the slot for their duration. An exit requested in
/// that window is remembered and runs as soon as the manager is put back.
#[derive(Default)]
pub struct ManagerSlot {
    manager: RefCell<Option<ArManager>>,
    exit_pending: Cell<bool>,
}

impl ManagerSlot {
    pub fn new(manager: ArManager) -> Self {
        Self {
            manager: RefCell::new(Some(manager)),
            exit_pending: Cell::new(false),
        }
    }

    /// Borrow the manager out; `None` while another call holds it.
    pub fn take(&self) -> Option<ArManager> {
        self.manager.borrow_mut().take()
    }

    /// Return the manager, running any exit requested while it was out.
    pub fn restore(&self, mut manager: ArManager) {
        if self.exit_pending.take() {
            log::info!("[ar] running deferred exit");
            manager.exit();
        }
        *self.manager.borrow_mut() = Some(manager);
    }

    pub fn exit(&self) {
        match self.manager.try_borrow_mut() {
            Ok(mut slot) => match slot.as_mut() {
                Some(manager) => manager.exit(),
                None => self.exit_pending.set(true),
            },
            Err(_) => self.exit_pending.set(true),
        }
    }

    pub fn is_exit_pending(&self) -> bool {
        self.exit_pending.get()
    }
}

fn broadcast(listeners: &RefCell<Vec<EventSink>>, event: SessionEvent) {
    let listeners: Vec<EventSink> = listeners.borrow().clone();
    for listener in listeners {
        listener(event);
    }
}
