//! Instrumented store wrapper.

use std::{
    io,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use bytes::Bytes;
use parking_lot::{Condvar, Mutex};
use quadrant_share_api::ShareKey;
use quadrant_share_store::{ShareStore, StoreError, StoreResult};

fn injected(what: &str) -> StoreError {
    StoreError::Io(io::Error::other(format!("injected {what} failure")))
}

/// Wraps a [`ShareStore`], counting reads and writes.
///
/// Reads and writes can be made to fail independently.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    inner: S,
    gets: AtomicUsize,
    puts: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl<S: ShareStore> CountingStore<S> {
    /// Wrap `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent `get` and `contains` calls fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `get` calls.
    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of successful `put` calls.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl<S: ShareStore> ShareStore for CountingStore<S> {
    fn put(&self, key: &ShareKey, data: &[u8]) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, data)
    }

    fn get(&self, key: &ShareKey) -> StoreResult<Option<Bytes>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        self.inner.get(key)
    }

    fn contains(&self, key: &ShareKey) -> StoreResult<bool> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        self.inner.contains(key)
    }

    fn delete(&self, key: &ShareKey) -> StoreResult<()> {
        self.inner.delete(key)
    }

    fn count(&self) -> StoreResult<u64> {
        self.inner.count()
    }
}

/// Wraps a [`ShareStore`] whose reads park the calling thread until
/// [`release`](Self::release) is called, like a stalled disk.
#[derive(Debug, Default)]
pub struct BlockingStore<S> {
    inner: S,
    released: Mutex<bool>,
    wake: Condvar,
}

impl<S: ShareStore> BlockingStore<S> {
    /// Wrap `inner` with reads held.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            released: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    /// Let held and future reads through.
    pub fn release(&self) {
        *self.released.lock() = true;
        self.wake.notify_all();
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn wait(&self) {
        let mut released = self.released.lock();
        while !*released {
            self.wake.wait(&mut released);
        }
    }
}

impl<S: ShareStore> ShareStore for BlockingStore<S> {
    fn put(&self, key: &ShareKey, data: &[u8]) -> StoreResult<()> {
        self.inner.put(key, data)
    }

    fn get(&self, key: &ShareKey) -> StoreResult<Option<Bytes>> {
        self.wait();
        self.inner.get(key)
    }

    fn contains(&self, key: &ShareKey) -> StoreResult<bool> {
        self.wait();
        self.inner.contains(key)
    }

    fn delete(&self, key: &ShareKey) -> StoreResult<()> {
        self.inner.delete(key)
    }

    fn count(&self) -> StoreResult<u64> {
        self.inner.count()
    }
}
