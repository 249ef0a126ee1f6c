//! Lifecycle events
//!
//! Every platform signal and every collaborator notification reaches the
//! manager through one ordered channel, so a window's close is always
//! handled before any activation or creation queued after it.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use casement_session::SessionOptions;

use crate::registry::WindowId;

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// The platform finished launching; fires once per process
    Ready,
    /// The app was brought to the foreground (dock click and the like)
    Activate,
    /// The platform reports it has no windows left
    WindowAllClosed,
    /// Shutdown has begun
    BeforeQuit,
    /// The platform is about to close every remaining window
    WillQuit,
    /// Shutdown completed
    Exited,
    /// Open (or focus) a window
    CreateWindow(SessionOptions),
    /// The user asked to close a window
    CloseRequested(WindowId),
    /// A window surface finished tearing down
    WindowClosed(WindowId),
    /// Quit from a menu, shortcut, or signal
    Quit,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Ready => "ready",
            LifecycleEvent::Activate => "activate",
            LifecycleEvent::WindowAllClosed => "window-all-closed",
            LifecycleEvent::BeforeQuit => "before-quit",
            LifecycleEvent::WillQuit => "will-quit",
            LifecycleEvent::Exited => "exited",
            LifecycleEvent::CreateWindow(_) => "create-window",
            LifecycleEvent::CloseRequested(_) => "close-requested",
            LifecycleEvent::WindowClosed(_) => "window-closed",
            LifecycleEvent::Quit => "quit",
        }
    }
}

/// Cloneable sender handed to window surfaces and the host application
#[derive(Debug, Clone)]
pub struct LifecycleHandle {
    tx: UnboundedSender<LifecycleEvent>,
}

impl LifecycleHandle {
    /// Queue an event. Returns false once the manager has gone away.
    pub fn send(&self, event: LifecycleEvent) -> bool {
        let name = event.name();
        match self.tx.send(event) {
            Ok(()) => true,
            Err(_) => {
                tracing::debug!(event = name, "Lifecycle loop closed; dropping event");
                false
            }
        }
    }
}

/// Receiving end, owned by whoever drives the manager
#[derive(Debug)]
pub struct LifecycleEvents {
    rx: UnboundedReceiver<LifecycleEvent>,
}

impl LifecycleEvents {
    pub async fn recv(&mut self) -> Option<LifecycleEvent> {
        self.rx.recv().await
    }

    /// Next queued event without waiting
    pub fn try_next(&mut self) -> Option<LifecycleEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

pub fn lifecycle_channel() -> (LifecycleHandle, LifecycleEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (LifecycleHandle { tx }, LifecycleEvents { rx })
}
