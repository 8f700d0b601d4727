//! `tt-vector`: vector maps with node topology.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                      |
//! |-----------|---------------------------------------------------------------|
//! | [`cats`]  | `Cats`: `(layer, category)` sets on features                 |
//! | [`store`] | `Feature`, `VectorSource`, `VectorSink`                       |
//! | [`map`]   | `VectorMap` (in memory), `VectorMapBuilder` (R-tree snapping) |
//! | [`io`]    | CSV map loader and writer                                     |
//! | [`error`] | `VectorError`, `VectorResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `tt-core` types.        |

pub mod cats;
pub mod error;
pub mod io;
pub mod map;
pub mod store;


pub use cats::Cats;
pub use error::{VectorError, VectorResult};
pub use io::{load_map_csv, load_map_reader, write_map_csv, write_map_writer};
pub use map::{Node, VectorMap, VectorMapBuilder};
pub use store::{Feature, VectorSink, VectorSource};
