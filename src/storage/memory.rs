//! In-process object store.
//!
//! Keeps objects in a sorted map and pages listings by key. Used by tests
//! and for dry runs; contents vanish with the process.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::{KeyPage, ObjectHead, ObjectStore, PutObject};

#[derive(Debug, Clone)]
struct StoredObject {
    body: Vec<u8>,
    head: ObjectHead,
}

/// Object store backed by process memory.
#[derive(Debug)]
pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    page_size: usize,
    unavailable: AtomicBool,
    fail_puts: AtomicBool,
    puts: AtomicUsize,
    heads: AtomicUsize,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::with_page_size(1000)
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that lists at most `page_size` keys per page.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size: page_size.max(1),
            unavailable: AtomicBool::new(false),
            fail_puts: AtomicBool::new(false),
            puts: AtomicUsize::new(0),
            heads: AtomicUsize::new(0),
        }
    }

    /// Seed an object directly, bypassing `put_object` accounting.
    pub fn insert(&self, key: &str, body: Vec<u8>, metadata: HashMap<String, String>) {
        let head = ObjectHead {
            metadata,
            content_type: None,
            content_language: None,
        };
        self.lock().insert(key.to_string(), StoredObject { body, head });
    }

    /// Make every subsequent operation fail as if the store were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make only `put_object` fail; reads keep working.
    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `put_object` calls.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of `head` calls, successful or not.
    pub fn head_count(&self) -> usize {
        self.heads.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of an object's head, if present.
    pub fn peek(&self, key: &str) -> Option<ObjectHead> {
        self.lock().get(key).map(|o| o.head.clone())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StoredObject>> {
        // A poisoned map still holds consistent objects; each write is a single insert.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage("memory store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStorage {
    async fn list_page(&self, token: Option<String>) -> Result<KeyPage> {
        self.check_available()?;

        let objects = self.lock();
        let mut keys: Vec<String> = match &token {
            Some(after) => objects
                .range::<String, _>((
                    std::ops::Bound::Excluded(after),
                    std::ops::Bound::Unbounded,
                ))
                .map(|(k, _)| k.clone())
                .take(self.page_size + 1)
                .collect(),
            None => objects.keys().take(self.page_size + 1).cloned().collect(),
        };

        let next_token = if keys.len() > self.page_size {
            keys.truncate(self.page_size);
            keys.last().cloned()
        } else {
            None
        };

        Ok(KeyPage { keys, next_token })
    }

    async fn head(&self, key: &str) -> Result<ObjectHead> {
        self.heads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.lock()
            .get(key)
            .map(|o| o.head.clone())
            .ok_or_else(|| AppError::NotFound(key.to_string()))
    }

    async fn get_body(&self, key: &str) -> Result<Vec<u8>> {
        self.check_available()?;

        self.lock()
            .get(key)
            .map(|o| o.body.clone())
            .ok_or_else(|| AppError::NotFound(key.to_string()))
    }

    async fn put_object(&self, object: PutObject) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) || self.fail_puts.load(Ordering::SeqCst) {
            return Err(AppError::storage_write("memory store rejected write"));
        }

        let stored = StoredObject {
            body: object.body,
            head: ObjectHead {
                metadata: object.metadata,
                content_type: Some(object.content_type),
                content_language: Some(object.content_language),
            },
        };
        self.lock().insert(object.key, stored);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
