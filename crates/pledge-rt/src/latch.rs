// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! One-shot latch shared by a thenable's resolve/reject callback pair.
//!
//! Whichever callback trips it first wins. Every later trip reports false.

use std::cell::Cell;

#[derive(Debug, Default)]
pub(crate) struct OnceLatch {
    tripped: Cell<bool>,
}

impl OnceLatch {
    pub fn new() -> Self {
        Self {
            tripped: Cell::new(false),
        }
    }

    /// Trip the latch. True only for the first caller.
    pub fn trip(&self) -> bool {
        !self.tripped.replace(true)
    }
}
