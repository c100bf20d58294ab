//! Shared state container
//!
//! RwLock-guarded state with closure-based access. Many concurrent readers,
//! one writer. Poisoned locks surface as [`EngineError::Storage`] instead
//! of panicking, so a bad request can never take the process down.

use std::sync::{Arc, RwLock};

use crate::error::{EngineError, Result};

/// Cheap-to-clone handle to shared mutable state
pub struct StateCell<S> {
    inner: Arc<RwLock<S>>,
}

impl<S> StateCell<S> {
    pub fn new(initial: S) -> Self {
        Self { inner: Arc::new(RwLock::new(initial)) }
    }

    /// Run a read-only closure against the state
    pub fn with_state<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&S) -> R,
    {
        let guard = self
            .inner
            .read()
            .map_err(|e| EngineError::Storage(format!("read lock failed: {}", e)))?;
        Ok(f(&guard))
    }

    /// Run a mutating closure against the state, with exclusive access
    pub fn with_state_mut<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut S) -> R,
    {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| EngineError::Storage(format!("write lock failed: {}", e)))?;
        Ok(f(&mut guard))
    }
}

impl<S> Clone for StateCell<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_read_and_write() {
        let cell = StateCell::new(vec![1, 2, 3]);
        assert_eq!(cell.with_state(|s| s.len()).unwrap(), 3);
        cell.with_state_mut(|s| s.push(4)).unwrap();
        assert_eq!(cell.with_state(|s| s.len()).unwrap(), 4);
    }

    #[test]
    fn test_clones_share_state() {
        let cell = StateCell::new(0u32);
        let other = cell.clone();
        other.with_state_mut(|s| *s += 1).unwrap();
        assert_eq!(cell.with_state(|s| *s).unwrap(), 1);
    }

    #[test]
    fn test_concurrent_readers() {
        let cell = StateCell::new(vec![1, 2, 3, 4, 5]);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = cell.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let sum = cell.with_state(|s| s.iter().sum::<i32>()).unwrap();
                        assert_eq!(sum, 15);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
