//! Shared fakes for unit tests.

use crate::cache::{CacheKey, CacheKeyGenerator, DistributedCache, MemoryCache, NullCache};
use crate::coordinator::CacheCoordinator;
use crate::gateway::{GatewayConfig, TranslationGateway, TranslationProvider};
use crate::language::TargetLanguage;
use crate::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};

/// Provider that renders `text[TARGET]`, records every call and fails on chosen inputs.
#[derive(Default)]
pub(crate) struct FakeProvider {
    failing: HashSet<String>,
    latency: Duration,
    calls: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
    seen: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, texts: &[&str]) -> Self {
        self.failing = texts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl TranslationProvider for FakeProvider {
    async fn translate(&self, text: &str, target: &TargetLanguage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().push(text.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(text) {
            return Err(Error::provider(format!("rejected '{}'", text)));
        }
        Ok(format!("{}[{}]", text, target))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// In-process stand-in for a shared store.
#[derive(Default)]
pub(crate) struct MapCache {
    entries: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl DistributedCache for MapCache {
    async fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries.lock().get(key.as_str()).cloned()
    }
    async fn set(&self, key: &CacheKey, value: &str, _ttl: Duration) {
        self.entries
            .lock()
            .insert(key.as_str().to_string(), value.to_string());
    }
    async fn delete_by_prefix(&self, prefix: &str) -> u64 {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        (before - entries.len()) as u64
    }
    async fn is_reachable(&self) -> bool {
        true
    }
    fn name(&self) -> &'static str {
        "map"
    }
}

/// Coordinator with zero backoff and a memory-only cache.
pub(crate) fn coordinator(provider: Arc<FakeProvider>) -> Arc<CacheCoordinator> {
    coordinator_with(provider, Arc::new(NullCache::new()))
}

pub(crate) fn coordinator_with(
    provider: Arc<FakeProvider>,
    distributed: Arc<dyn DistributedCache>,
) -> Arc<CacheCoordinator> {
    let gateway = TranslationGateway::new(
        provider,
        GatewayConfig::new().with_base_delay(Duration::ZERO),
    );
    Arc::new(CacheCoordinator::new(
        CacheKeyGenerator::new(),
        MemoryCache::new(100, Duration::from_secs(60)),
        distributed,
        gateway,
        Duration::from_secs(60),
    ))
}

/// How [`spawn_flaky_redis`] treats data commands once the connection handshake is done.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FlakyRedis {
    /// Never answer.
    Stall,
    /// Answer with a RESP error.
    Reject,
}

/// A local TCP server speaking just enough RESP for a client to connect; every data command
/// then stalls or fails. Returns a `redis://` URL pointing at it.
pub(crate) async fn spawn_flaky_redis(mode: FlakyRedis) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(serve_flaky(socket, mode));
        }
    });
    format!("redis://{}", addr)
}

async fn serve_flaky(socket: TcpStream, mode: FlakyRedis) {
    let (read, mut write) = socket.into_split();
    let mut reader = BufReader::new(read);
    while let Some(command) = read_command(&mut reader).await {
        let reply: &[u8] = match command.as_str() {
            "PING" => b"+PONG\r\n",
            "CLIENT" | "AUTH" | "SELECT" | "HELLO" => b"+OK\r\n",
            _ => match mode {
                FlakyRedis::Stall => continue,
                FlakyRedis::Reject => b"-ERR simulated backend failure\r\n",
            },
        };
        if write.write_all(reply).await.is_err() {
            return;
        }
    }
}

/// Read one RESP array command and return its upper-cased name; `None` on EOF or garbage.
async fn read_command(reader: &mut BufReader<OwnedReadHalf>) -> Option<String> {
    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;
    let argc: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;
    let mut name = None;
    for _ in 0..argc {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf).await.ok()?;
        if name.is_none() {
            name = Some(String::from_utf8_lossy(&buf[..len]).to_uppercase());
        }
    }
    name
}
