//! Shared fixtures for wvgs-dj integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use wvgs_common::ids::{ChannelId, GuildId, UserId};
use wvgs_dj::error::{Error, Result};
use wvgs_dj::library::{Clip, ClipLibrary, LinkTable};
use wvgs_dj::playback::Picker;
use wvgs_dj::voice::{VoiceDirectory, VoiceGateway, VoiceTransport};

/// Everything a transport saw, shared with the test body
#[derive(Debug, Default)]
pub struct TransportLog {
    pub frames: Vec<Vec<u8>>,
    pub speaking: Vec<bool>,
    pub disconnected: bool,
}

pub fn lock_log(log: &Arc<Mutex<TransportLog>>) -> std::sync::MutexGuard<'_, TransportLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport that records every call; optionally gated by a semaphore so
/// tests can hold the engine at an exact frame
pub struct RecordingTransport {
    log: Arc<Mutex<TransportLog>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingTransport {
    pub fn new() -> (Self, Arc<Mutex<TransportLog>>) {
        let log = Arc::new(Mutex::new(TransportLog::default()));
        (Self::with_log(Arc::clone(&log)), log)
    }

    pub fn with_log(log: Arc<Mutex<TransportLog>>) -> Self {
        Self { log, gate: None }
    }

    /// Each send consumes one permit; the engine blocks when the gate runs dry
    pub fn gated(gate: Arc<Semaphore>) -> (Self, Arc<Mutex<TransportLog>>) {
        let log = Arc::new(Mutex::new(TransportLog::default()));
        (
            Self {
                log: Arc::clone(&log),
                gate: Some(gate),
            },
            log,
        )
    }
}

#[async_trait]
impl VoiceTransport for RecordingTransport {
    async fn set_speaking(&mut self, speaking: bool) -> Result<()> {
        lock_log(&self.log).speaking.push(speaking);
        Ok(())
    }

    async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| Error::Transport("gate closed".to_string()))?
                .forget();
        }
        lock_log(&self.log).frames.push(frame.to_vec());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        lock_log(&self.log).disconnected = true;
        Ok(())
    }
}

/// Transport whose sink fails after a fixed number of frames
pub struct FailingTransport {
    log: Arc<Mutex<TransportLog>>,
    fail_after: usize,
}

impl FailingTransport {
    pub fn new(fail_after: usize) -> (Self, Arc<Mutex<TransportLog>>) {
        let log = Arc::new(Mutex::new(TransportLog::default()));
        (
            Self {
                log: Arc::clone(&log),
                fail_after,
            },
            log,
        )
    }
}

#[async_trait]
impl VoiceTransport for FailingTransport {
    async fn set_speaking(&mut self, speaking: bool) -> Result<()> {
        lock_log(&self.log).speaking.push(speaking);
        Ok(())
    }

    async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        let mut log = lock_log(&self.log);
        if log.frames.len() >= self.fail_after {
            return Err(Error::Transport("sink rejected frame".to_string()));
        }
        log.frames.push(frame.to_vec());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        lock_log(&self.log).disconnected = true;
        Ok(())
    }
}

/// Gateway handing out recording transports that share one log
pub struct TestGateway {
    log: Arc<Mutex<TransportLog>>,
    joins: AtomicUsize,
    fail: bool,
}

impl TestGateway {
    pub fn new() -> (Arc<Self>, Arc<Mutex<TransportLog>>) {
        let log = Arc::new(Mutex::new(TransportLog::default()));
        (
            Arc::new(Self {
                log: Arc::clone(&log),
                joins: AtomicUsize::new(0),
                fail: false,
            }),
            log,
        )
    }

    /// Gateway whose joins always fail (channel unreachable/full)
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(Mutex::new(TransportLog::default())),
            joins: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn join_count(&self) -> usize {
        self.joins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceGateway for TestGateway {
    async fn join(&self, _guild: GuildId, _channel: ChannelId) -> Result<Box<dyn VoiceTransport>> {
        if self.fail {
            return Err(Error::Join("channel is full".to_string()));
        }
        self.joins.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingTransport::with_log(Arc::clone(&self.log))))
    }
}

/// Member list with fixed contents
#[derive(Default)]
pub struct StaticDirectory {
    map: HashMap<(GuildId, UserId), ChannelId>,
}

impl StaticDirectory {
    /// Nobody is in voice
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with(guild: GuildId, user: UserId, channel: ChannelId) -> Self {
        let mut map = HashMap::new();
        map.insert((guild, user), channel);
        Self { map }
    }
}

impl VoiceDirectory for StaticDirectory {
    fn voice_channel_of(&self, guild: GuildId, user: UserId) -> Option<ChannelId> {
        self.map.get(&(guild, user)).copied()
    }
}

/// Always picks the first clip of the (sorted) pool
pub struct FirstPicker;

impl Picker for FirstPicker {
    fn pick(&mut self, _pool_len: usize) -> usize {
        0
    }
}

/// Always picks the last clip of the (sorted) pool
pub struct LastPicker;

impl Picker for LastPicker {
    fn pick(&mut self, pool_len: usize) -> usize {
        pool_len - 1
    }
}

/// Distinct frames: payload = [tag, frame index]
pub fn frames(tag: u8, count: usize) -> Vec<Vec<u8>> {
    (0..count).map(|i| vec![tag, i as u8]).collect()
}

/// The worked-example store: opening (2 frames), songs S1 (3) and S2 (2),
/// one story (3), one transition T1 (1) linked to S1
pub fn scenario_library() -> ClipLibrary {
    let mut links = HashMap::new();
    links.insert("T1.dca".to_string(), "S1.dca".to_string());

    ClipLibrary::from_parts(
        vec![
            Clip::new("S1.dca", frames(1, 3)),
            Clip::new("S2.dca", frames(2, 2)),
        ],
        vec![Clip::new("Story.dca", frames(3, 3))],
        vec![Clip::new("T1.dca", frames(4, 1))],
        Clip::new("Opening.dca", frames(0, 2)),
        LinkTable::new(links),
    )
    .expect("scenario library is valid")
}

/// Poll `cond` until it holds or the deadline passes
pub async fn wait_until<F: Fn() -> bool>(deadline: Duration, cond: F) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}
