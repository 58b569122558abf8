//! Declarative parallel/sequential execution over lock-guarded subjects.
//!
//! The registry stores every subject behind its own `Mutex`, so a per-subject
//! step can run on any thread while readers still see each subject update as
//! one unit. The helpers here hide whether that fan-out goes through rayon
//! (the `parallel` feature) or a plain iterator. The `cfg` logic lives here in
//! ONE place, keeping call sites clean.
//!
//! # Runtime Override
//!
//! All functions accept a `force_sequential` parameter. When `true`, execution
//! is sequential even if the `parallel` feature is enabled. Handy for
//! profiling and for tests that want a fixed visiting order.
//!
//! # Example
//!
//! ```ignore
//! // Instead of:
//! // #[cfg(feature = "parallel")]
//! // let out: Vec<_> = subjects.par_iter().map(|m| m.lock().tick()).collect();
//! // #[cfg(not(feature = "parallel"))]
//! // let out: Vec<_> = subjects.iter().map(|m| m.lock().tick()).collect();
//!
//! // Just write:
//! let out = parallel::map_mutex_slice(&subjects, |s| s.tick(), false);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use parking_lot::Mutex;

/// Map over a slice of Mutex-wrapped items with mutable access.
///
/// Each item is locked for the whole duration of `f`. Results keep input order.
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if parallel feature is enabled
#[inline]
pub fn map_mutex_slice<T, F, R>(slice: &[Mutex<T>], f: F, force_sequential: bool) -> Vec<R>
where
    T: Send,
    F: Fn(&mut T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(|m| f(&mut *m.lock())).collect()
        } else {
            slice.par_iter().map(|m| f(&mut *m.lock())).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(|m| f(&mut *m.lock())).collect()
    }
}

/// Map over a slice of Mutex-wrapped items with immutable access.
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if parallel feature is enabled
#[inline]
pub fn map_mutex_slice_ref<T, F, R>(slice: &[Mutex<T>], f: F, force_sequential: bool) -> Vec<R>
where
    T: Send,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(|m| f(&*m.lock())).collect()
        } else {
            slice.par_iter().map(|m| f(&*m.lock())).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(|m| f(&*m.lock())).collect()
    }
}
