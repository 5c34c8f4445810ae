//! Change notification: observers learn about cell assignments as they
//! happen.
//!
//! The contract is deliberately narrow: exactly one event per successful
//! assignment, delivered synchronously in assignment order. The engine never
//! depends on who is listening, and a panicking observer must not corrupt
//! the solve in progress.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Observer of cell assignments.
///
/// Implementations may be shared across threads; the values delivered are
/// plain copies, so an observer never reads grid internals mid-mutation.
pub trait CellObserver: Send + Sync {
    /// Called once per assignment, with the cell position and the value set.
    fn on_assign(&self, row: usize, col: usize, value: u8);
}

/// Closures work as observers directly.
impl<F> CellObserver for F
where
    F: Fn(usize, usize, u8) + Send + Sync,
{
    fn on_assign(&self, row: usize, col: usize, value: u8) {
        self(row, col, value)
    }
}

/// Dispatch an assignment event to every observer, isolating panics.
pub(crate) fn dispatch(observers: &[Arc<dyn CellObserver>], row: usize, col: usize, value: u8) {
    for observer in observers {
        // A misbehaving observer must not abort the solve loop.
        let _ = catch_unwind(AssertUnwindSafe(|| observer.on_assign(row, col, value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_closure_observer() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_observer = Arc::clone(&seen);
        let observer: Arc<dyn CellObserver> = Arc::new(move |row, col, value| {
            seen_by_observer.lock().unwrap().push((row, col, value));
        });

        dispatch(&[observer], 4, 7, 2);
        assert_eq!(*seen.lock().unwrap(), vec![(4, 7, 2)]);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_observer = Arc::clone(&seen);

        let panicking: Arc<dyn CellObserver> =
            Arc::new(|_row: usize, _col: usize, _value: u8| panic!("observer bug"));
        let recording: Arc<dyn CellObserver> = Arc::new(move |row, col, value| {
            seen_by_observer.lock().unwrap().push((row, col, value));
        });

        // The panic is swallowed and later observers still run.
        dispatch(&[panicking, recording], 0, 0, 5);
        assert_eq!(*seen.lock().unwrap(), vec![(0, 0, 5)]);
    }
}
