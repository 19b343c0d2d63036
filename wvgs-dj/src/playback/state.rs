//! Shared playback state
//!
//! Thread-safe control cell coordinating command handlers and the engine.
//! The engine reads `playing` and `paused` before every frame; command
//! handlers write them from their own tasks. Every control write signals
//! `wake`, so a paused engine observes the change without waiting out a
//! full poll tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, Notify};
use wvgs_common::events::RadioEvent;

/// Shared state accessible by the engine task and command handlers
pub struct SharedState {
    /// A session is live (set for the whole Speaking span, paused included)
    playing: AtomicBool,

    /// Frame streaming is held; only meaningful while `playing`
    paused: AtomicBool,

    /// Song a transition has scheduled for the next song slot
    forced_next_song: Mutex<Option<String>>,

    /// Signaled on every control write
    wake: Notify,

    /// Event broadcaster
    event_tx: broadcast::Sender<RadioEvent>,
}

impl SharedState {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100); // Buffer up to 100 events
        Self {
            playing: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            forced_next_song: Mutex::new(None),
            wake: Notify::new(),
            event_tx,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Claim the idle to playing transition
    ///
    /// Returns false when a session is already live. A paused session keeps
    /// `playing` set, so the claim covers both conditions; concurrent joins
    /// cannot start two engines.
    pub fn begin_session(&self) -> bool {
        self.playing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::SeqCst);
        self.wake.notify_waiters();
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
        self.wake.notify_waiters();
    }

    /// Record the song that must follow the current transition
    ///
    /// Overwrites any pending value. Transitions without a link entry never
    /// clear a pending song; it survives until a song slot consumes it.
    pub fn set_forced_song(&self, name: String) {
        *self.lock_forced() = Some(name);
    }

    /// Consume the pending forced song, if any
    pub fn take_forced_song(&self) -> Option<String> {
        self.lock_forced().take()
    }

    /// Peek at the pending forced song without consuming it
    pub fn forced_song(&self) -> Option<String> {
        self.lock_forced().clone()
    }

    /// Reset to the idle, all-clear state (session teardown)
    pub fn reset(&self) {
        self.playing.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        *self.lock_forced() = None;
        self.wake.notify_waiters();
    }

    /// Wait for a control write, or one tick, whichever comes first
    ///
    /// The tick bound keeps the wait latency bounded even if a wake is
    /// missed between the caller's flag check and this call.
    pub async fn control_changed(&self, tick: Duration) {
        let _ = tokio::time::timeout(tick, self.wake.notified()).await;
    }

    /// Broadcast an event to all listeners
    pub fn broadcast_event(&self, event: RadioEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<RadioEvent> {
        self.event_tx.subscribe()
    }

    fn lock_forced(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.forced_next_song
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
