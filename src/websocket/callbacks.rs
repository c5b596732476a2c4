use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Ordered listeners for one event kind
pub(crate) struct CallbackSet<T> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Callback<T>)>>,
}

impl<T> Default for CallbackSet<T> {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl<T: 'static> CallbackSet<T> {
    pub fn register<F>(self: &Arc<Self>, callback: F) -> Disposer
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).push((id, Arc::new(callback)));
        let target: Weak<dyn Unregister> = Arc::downgrade(self) as Weak<dyn Unregister>;
        Disposer {
            target,
            id,
            disposed: AtomicBool::new(false),
        }
    }

    /// Invoke every listener in registration order
    ///
    /// Runs over a snapshot, so listeners may dispose themselves or others
    /// while being invoked.
    pub fn dispatch(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = lock(&self.entries)
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in snapshot {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }
}

trait Unregister: Send + Sync {
    fn unregister(&self, id: u64);
}

impl<T> Unregister for CallbackSet<T> {
    fn unregister(&self, id: u64) {
        lock(&self.entries).retain(|(entry, _)| *entry != id);
    }
}

/// Removes exactly the listener it was returned for
///
/// Dropping a `Disposer` keeps the listener registered.
pub struct Disposer {
    target: Weak<dyn Unregister>,
    id: u64,
    disposed: AtomicBool,
}

impl Disposer {
    /// Remove the listener; later calls do nothing
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(target) = self.target.upgrade() {
            target.unregister(self.id);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
