//! Typed handles over the untyped reactive runtime.

use std::fmt;
use std::marker::PhantomData;

pub use trellis_reactivity::{NodeId, create_scope, dispose, effect, on_cleanup, untrack};

/// A `Copy` handle to an observable value in the reactive runtime.
///
/// Reading through [`get`](Observable::get) subscribes the running effect;
/// writing re-runs subscribers. Handles stay valid until the scope that
/// created them is disposed, after which reads return `None` through the
/// `try_` variants.
pub struct Observable<T> {
    id: NodeId,
    marker: PhantomData<T>,
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Observable({:?})", self.id)
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Observable<T> {}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            id: trellis_reactivity::signal(value),
            marker: PhantomData,
        }
    }

    /// Tracked read; `None` once the backing value is disposed.
    pub fn try_get(&self) -> Option<T> {
        trellis_reactivity::try_with_signal(self.id, T::clone)
    }

    /// Tracked read.
    ///
    /// # Panics
    /// Panics if the backing value has been disposed.
    pub fn get(&self) -> T {
        match self.try_get() {
            Some(value) => value,
            None => panic!("Observable::get: value has been disposed"),
        }
    }

    /// Untracked read; never subscribes the running effect.
    pub fn try_get_untracked(&self) -> Option<T> {
        trellis_reactivity::try_with_signal_untracked(self.id, T::clone)
    }

    pub fn get_untracked(&self) -> T {
        match self.try_get_untracked() {
            Some(value) => value,
            None => panic!("Observable::get_untracked: value has been disposed"),
        }
    }

    pub fn set(&self, value: T) {
        self.update(|v| *v = value);
    }

    /// Mutates in place and notifies subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        trellis_reactivity::update_signal(self.id, f);
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn set_and_get() {
        let count = Observable::new(1i32);
        assert_eq!(count.get_untracked(), 1);
        count.set(5);
        assert_eq!(count.get_untracked(), 5);
    }

    #[test]
    fn effect_tracks_typed_reads() {
        let count = Observable::new(0i32);
        let seen = Rc::new(Cell::new(-1i32));
        let sink = seen.clone();
        effect(move || sink.set(count.get()));
        assert_eq!(seen.get(), 0);
        count.update(|v| *v += 10);
        assert_eq!(seen.get(), 10);
    }

    #[test]
    fn dispose_by_id_invalidates_the_handle() {
        let count = Observable::new(3i32);
        assert_eq!(count.try_get_untracked(), Some(3));
        dispose(count.id());
        assert_eq!(count.try_get_untracked(), None);
    }

    #[test]
    fn read_after_scope_dispose_is_none() {
        let mut slot = None;
        let scope = create_scope(|| {
            slot = Some(Observable::new(1i32));
        });
        let count = slot.unwrap();
        dispose(scope);
        assert_eq!(count.try_get_untracked(), None);
    }
}
