//! `tt-turntable`: turn-graph construction for line networks.
//!
//! Every arc line becomes a turn-graph node (its *ucat*), used signed:
//! `+ucat` travels the line from its first vertex to its last, `-ucat` the
//! other way.  Every possible transition at a network node becomes a row in
//! the turn table:
//!
//! | cat | ln_from | ln_to | cost | isec | angle          |
//! |-----|---------|-------|------|------|----------------|
//! | 1   | 1       | -1    | 0    | 4    | π (U-turn)     |
//! | 5   | 1       | 2     | 0    | 4    | 0 (straight)   |
//! | 6   | -2      | -1    | 0    | 4    | -0             |
//!
//! Lines carry the ids of the rows they take part in (turn layer) and their
//! ucat (ucat layer); each network node gets a point carrying its `isec`
//! marker in the ucat layer.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`allocator`] | `CatSequence`, `Allocators`, `IsecMarkers`                |
//! | [`cache`]     | `FeatureCache`, the per-line `LineState` machine          |
//! | [`turntable`] | `TurnTable`, the pass itself                              |
//! | [`builder`]   | `TurnTableBuilder`                                        |
//! | [`observer`]  | `PassObserver`, `NoopObserver`, `LogProgress`             |
//! | [`summary`]   | `TurnTableSummary`                                        |
//!
//! # Cargo features
//!
//! | Feature  | Effect                                      |
//! |----------|---------------------------------------------|
//! | `sqlite` | Enables `tt_output::SqliteSink`.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tt_core::TurnTableConfig;
//! use tt_output::MemorySink;
//! use tt_turntable::{NoopObserver, TurnTableBuilder};
//! use tt_vector::{load_map_csv, VectorMap};
//!
//! let input = load_map_csv(Path::new("roads.csv"), 0.0)?;
//! let mut output = VectorMap::new();
//! let mut sink = MemorySink::new();
//! let summary = TurnTableBuilder::new(&input, &mut output, &mut sink)
//!     .config(TurnTableConfig::default())
//!     .build()?
//!     .run(&mut NoopObserver)?;
//! ```

pub mod allocator;
pub mod builder;
pub mod cache;
pub mod error;
pub mod observer;
pub mod summary;
pub mod turntable;

#[cfg(test)]
mod tests;

pub use allocator::{Allocators, CatSequence, IsecMarkers};
pub use builder::TurnTableBuilder;
pub use cache::{FeatureCache, LineState, WorkingLine};
pub use error::{TurnTableError, TurnTableResult};
pub use observer::{LogProgress, NoopObserver, PassObserver};
pub use summary::TurnTableSummary;
pub use turntable::{populate_turntable, TurnTable};
