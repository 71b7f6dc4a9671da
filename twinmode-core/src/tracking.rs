//! Output tracking for infrastructure wrappers.
//!
//! A wrapper owns an [`OutputListener`] and emits one value per observable
//! side effect. Tests call `track()` before exercising the code under test and
//! read the resulting [`OutputTracker`], which keeps growing as more output is
//! emitted.

use std::sync::Arc;

use parking_lot::Mutex;

type Shared<T> = Arc<Mutex<Vec<T>>>;

/// Fan-out point for emitted output. Cloning shares the same set of trackers.
pub struct OutputListener<T> {
    trackers: Arc<Mutex<Vec<Shared<T>>>>,
}

impl<T> Clone for OutputListener<T> {
    fn clone(&self) -> Self {
        Self {
            trackers: Arc::clone(&self.trackers),
        }
    }
}

impl<T: Clone> Default for OutputListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> OutputListener<T> {
    pub fn new() -> Self {
        Self {
            trackers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Starts recording output emitted from now on.
    pub fn track(&self) -> OutputTracker<T> {
        let data = Arc::new(Mutex::new(Vec::new()));
        self.trackers.lock().push(Arc::clone(&data));
        OutputTracker {
            data,
            listener: self.clone(),
        }
    }

    /// Appends `value` to every active tracker.
    pub fn emit(&self, value: T) {
        for tracker in self.trackers.lock().iter() {
            tracker.lock().push(value.clone());
        }
    }
}

/// Live view of the output emitted since tracking started.
pub struct OutputTracker<T> {
    data: Shared<T>,
    listener: OutputListener<T>,
}

impl<T: Clone> OutputTracker<T> {
    /// Everything recorded so far, in emission order.
    pub fn data(&self) -> Vec<T> {
        self.data.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }

    /// Returns what was recorded and starts over with an empty log.
    pub fn clear(&self) -> Vec<T> {
        std::mem::take(&mut *self.data.lock())
    }

    /// Detaches from the listener. Recorded data is returned.
    pub fn stop(self) -> Vec<T> {
        self.listener
            .trackers
            .lock()
            .retain(|tracker| !Arc::ptr_eq(tracker, &self.data));
        self.clear()
    }
}
