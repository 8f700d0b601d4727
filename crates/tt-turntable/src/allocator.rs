//! Category allocators owned by a single turn-table pass.
//!
//! Two independent sequences are drawn from:
//!
//! - **rows**: one id per turn-table row, which is also the category the
//!   row's lines receive in the turn layer;
//! - **ucats**: one id per arc line on first encounter, then continued for
//!   the node points written after the line pass.
//!
//! Both start at 1 and never hand out the same value twice.

use tt_core::NodeId;

/// Monotonic counter of category values.
#[derive(Clone, Debug)]
pub struct CatSequence {
    next:   i64,
    issued: u64,
}

impl CatSequence {
    pub fn new() -> Self {
        Self { next: 1, issued: 0 }
    }

    /// Hand out the next value.
    #[inline]
    pub fn issue(&mut self) -> i64 {
        let v = self.next;
        self.next += 1;
        self.issued += 1;
        v
    }

    /// How many values have been handed out so far.
    #[inline]
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Skip ahead so the next value is at least `value`.  Skipped values are
    /// never issued and do not count as issued.
    pub fn advance_to(&mut self, value: i64) {
        self.next = self.next.max(value);
    }
}

impl Default for CatSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// The pair of sequences used by one pass.
#[derive(Clone, Debug, Default)]
pub struct Allocators {
    pub rows:  CatSequence,
    pub ucats: CatSequence,
}

impl Allocators {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maps topological nodes to their intersection marker (`isec`).
///
/// Markers live above every ucat: node `n` gets `n + offset`, where `offset`
/// is the number of arc-type lines in the input.  The node point written for
/// `n` carries the same value in the ucat layer.
#[derive(Copy, Clone, Debug)]
pub struct IsecMarkers {
    offset: i64,
}

impl IsecMarkers {
    pub fn new(arc_lines: usize) -> Self {
        Self { offset: arc_lines as i64 }
    }

    #[inline]
    pub fn at(&self, node: NodeId) -> i64 {
        node.as_cat() + self.offset
    }

    /// First marker value, i.e. the one for node 1.
    pub fn first(&self) -> i64 {
        self.offset + 1
    }
}
