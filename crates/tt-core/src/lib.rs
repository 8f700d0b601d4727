//! `tt-core`: foundational types for the turntable workspace.
//!
//! This crate is a dependency of every other `tt-*` crate.  It has no `tt-*`
//! dependencies and a single required external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`ids`]          | `FeatureId`, `NodeId`, `Layer`                        |
//! | [`direction`]    | `Direction`, `DirectedLine`, `TurnNode`               |
//! | [`geo`]          | `Point`, `Polyline`, `heading`, `turn_angle`          |
//! | [`feature_type`] | `FeatureType` enum                                    |
//! | [`config`]       | `TurnTableConfig`                                     |
//! | [`error`]        | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod direction;
pub mod error;
pub mod feature_type;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::TurnTableConfig;
pub use direction::{DirectedLine, Direction, TurnNode};
pub use error::{CoreError, CoreResult};
pub use feature_type::FeatureType;
pub use geo::{heading, normalize_angle, turn_angle, Point, Polyline};
pub use ids::{FeatureId, Layer, NodeId};
