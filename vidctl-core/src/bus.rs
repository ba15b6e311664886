//! Process-wide event fan-out with scoped listeners.
//!
//! Hosts publish raw input and engine notifications here. A listener only
//! receives events while its [`Subscription`] is alive; dropping the guard
//! removes it from the bus.

use std::sync::{Arc, Mutex, Weak};

use crossbeam_channel::{Receiver, Sender, TryIter, unbounded};

use crate::commands::EngineEvent;
use crate::input::KeyInput;

/// Everything a controller listens to
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Key(KeyInput),
    Engine(EngineEvent),
}

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Sender<T>)>,
}

/// Broadcast bus: every live subscription gets its own copy of each event
pub struct EventBus<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: Clone> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> EventBus<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register a listener. It stays registered until the guard is dropped.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = unbounded();
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, tx));
        log::debug!("Bus listener {} registered", id);

        Subscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every live listener
    pub fn publish(&self, event: T) {
        let registry = self.lock();
        for (_, tx) in &registry.listeners {
            // Receiver lives inside the guard, which deregisters before dropping it
            let _ = tx.send(event.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry<T>> {
        // A panicked publisher cannot leave the listener list half-written
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Registration guard returned by [`EventBus::subscribe`]
pub struct Subscription<T> {
    id: u64,
    rx: Receiver<T>,
    registry: Weak<Mutex<Registry<T>>>,
}

impl<T> Subscription<T> {
    /// Drain pending events without blocking
    pub fn try_iter(&self) -> TryIter<'_, T> {
        self.rx.try_iter()
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            registry.listeners.retain(|(id, _)| *id != self.id);
            log::debug!("Bus listener {} released", self.id);
        }
    }
}
