//! Debug-only critical-section guard for the index triple.
//!
//! A mutation of the dictionary touches the entry table and the namespace
//! index one after the other; between those two writes the indices disagree.
//! The guard marks that window. In debug builds, entering it while it is
//! already held panics. In release builds, this compiles to a zero-cost no-op.

use core::cell::Cell;
#[cfg(not(debug_assertions))]
use core::marker::PhantomData;

/// Per-instance critical-section tracker. Embed this in structs and open it
/// with `let _g = self.section.enter();` at every entry-point.
///
/// `Send` but not `Sync`: a dictionary may move across threads, shared
/// access goes through `SharedActionDictionary`.
#[derive(Debug)]
pub struct CriticalSection {
    #[cfg(debug_assertions)]
    depth: Cell<u32>,
    #[cfg(not(debug_assertions))]
    _not_sync: PhantomData<Cell<()>>,
}

impl CriticalSection {
    pub const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: Cell::new(0),
            #[cfg(not(debug_assertions))]
            _not_sync: PhantomData,
        }
    }

    /// Enter the section. In debug builds, panics if already entered.
    #[inline]
    pub fn enter(&self) -> SectionGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let d = self.depth.get();
            assert!(
                d == 0,
                "reentrancy detected: nested entry into action dictionary indices"
            );
            self.depth.set(d + 1);
            SectionGuard { owner: self }
        }

        #[cfg(not(debug_assertions))]
        {
            SectionGuard { _z: PhantomData }
        }
    }

    /// True while a guard is alive. Always false in release builds.
    #[inline]
    pub fn is_held(&self) -> bool {
        #[cfg(debug_assertions)]
        {
            self.depth.get() > 0
        }
        #[cfg(not(debug_assertions))]
        {
            false
        }
    }
}

impl Default for CriticalSection {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `CriticalSection::enter`.
pub struct SectionGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a CriticalSection,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for SectionGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let d = self.owner.depth.get();
            debug_assert!(d > 0);
            self.owner.depth.set(d - 1);
        }
    }
}
