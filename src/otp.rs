use moka::Expiry;
use moka::sync::Cache;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MAX_PENDING_CODES: u64 = 10_000;

/// Short-lived keyed values with expiry.
///
/// `take` is one-shot: a value is returned at most once and never after its
/// TTL has elapsed.
pub trait TokenStore: Send + Sync {
    fn put(&self, key: &str, value: String, ttl: Duration);
    fn take(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
    expires_at: Instant,
}

struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process [`TokenStore`] on a moka cache with per-entry expiry.
pub struct MemoryTokenStore {
    cache: Cache<String, Entry>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_PENDING_CODES)
                .expire_after(EntryTtl)
                .build(),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn put(&self, key: &str, value: String, ttl: Duration) {
        let entry = Entry {
            value,
            ttl,
            expires_at: Instant::now() + ttl,
        };
        self.cache.insert(key.to_string(), entry);
    }

    fn take(&self, key: &str) -> Option<String> {
        let entry = self.cache.remove(key)?;
        (entry.expires_at > Instant::now()).then_some(entry.value)
    }
}

/// Issues and checks six-digit one-time codes keyed by email.
#[derive(Clone)]
pub struct OtpService {
    store: Arc<dyn TokenStore>,
    ttl: Duration,
}

impl OtpService {
    pub fn new(store: Arc<dyn TokenStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn issue(&self, email: &str) -> String {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        self.store.put(&normalize_email(email), code.clone(), self.ttl);
        code
    }

    /// Consumes the pending code for `email`; a wrong guess also burns it.
    pub fn verify(&self, email: &str, code: &str) -> bool {
        self.store
            .take(&normalize_email(email))
            .is_some_and(|expected| expected == code.trim())
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
