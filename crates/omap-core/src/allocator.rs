//! Identifier allocation.
//!
//! New oids are handed out sequentially from a cursor. The cursor starts at a
//! random point of the configured [`IdFamily`] and is re-drawn whenever it
//! leaves the family's range or lands on an identifier that is already live,
//! so consecutive additions usually get consecutive oids.

use omap_types::{IdFamily, ObjectId};
use rand::Rng;
use tracing::trace;

/// Cursor-based oid allocator.
///
/// The cursor is scratch state. It is never persisted, and dropping it
/// (via [`reset`](Self::reset)) only costs a fresh random draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdAllocator {
    cursor: Option<i64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An allocator whose next candidate is `start`.
    pub fn with_cursor(start: i64) -> Self {
        Self {
            cursor: Some(start),
        }
    }

    /// The next candidate, if one has been drawn.
    pub fn cursor(&self) -> Option<i64> {
        self.cursor
    }

    /// Forget the cursor; the next allocation draws a random start.
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Allocate an oid that `is_live` reports as free, drawing from the
    /// thread-local RNG when the cursor needs a new start.
    pub fn allocate<F>(&mut self, family: IdFamily, is_live: F) -> ObjectId
    where
        F: Fn(ObjectId) -> bool,
    {
        self.allocate_with(family, is_live, &mut rand::thread_rng())
    }

    /// Like [`allocate`](Self::allocate) with an explicit RNG.
    ///
    /// Never returns [`ObjectId::RESERVED`] and never returns an oid outside
    /// `family`. Does not terminate if every identifier of the family is
    /// live.
    pub fn allocate_with<F, R>(&mut self, family: IdFamily, is_live: F, rng: &mut R) -> ObjectId
    where
        F: Fn(ObjectId) -> bool,
        R: Rng + ?Sized,
    {
        loop {
            let candidate = match self.cursor {
                Some(next) => next,
                None => rng.gen_range(family.min()..family.max()),
            };
            if !family.contains(candidate) {
                trace!(candidate, "cursor left the id family; redrawing");
                self.cursor = None;
                continue;
            }
            self.cursor = candidate.checked_add(1);
            let oid = ObjectId::new(candidate);
            if !oid.is_reserved() && !is_live(oid) {
                return oid;
            }
            trace!(candidate, "candidate unavailable; redrawing");
            self.cursor = None;
        }
    }
}
