//! Turn-table configuration.
//!
//! # Layers
//!
//! Categories on vector features are grouped in numbered layers.  The turn
//! table pass reads one layer and writes two:
//!
//! | Field        | Default | Role                                              |
//! |--------------|---------|---------------------------------------------------|
//! | `arc_layer`  | 1       | a category here marks a line as part of the network |
//! | `turn_layer` | 3       | receives the turn-table row ids a line takes part in |
//! | `ucat_layer` | 4       | receives each line's ucat and each node point's id  |
//!
//! Any categories already present in the two output layers of the input map
//! are discarded so they cannot collide with freshly issued ids.

use crate::{CoreError, CoreResult, FeatureType, Layer};

/// Top-level configuration of a turn-table pass.
///
/// Typically built by the command-line tool and handed to the turn-table
/// builder, which calls [`validate`](Self::validate) before running.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnTableConfig {
    /// Layer whose categories mark network arcs.
    pub arc_layer: Layer,

    /// Feature types treated as arcs.  Only linear types are allowed.
    pub arc_types: Vec<FeatureType>,

    /// Layer for turn-table row categories.
    pub turn_layer: Layer,

    /// Layer for line ucats and node point ids.
    pub ucat_layer: Layer,
}

impl Default for TurnTableConfig {
    fn default() -> Self {
        Self {
            arc_layer:  Layer(1),
            arc_types:  vec![FeatureType::Line, FeatureType::Boundary],
            turn_layer: Layer(3),
            ucat_layer: Layer(4),
        }
    }
}

impl TurnTableConfig {
    /// Reject configurations the pass cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.arc_types.is_empty() {
            return Err(CoreError::Config("no arc feature types selected".into()));
        }
        if let Some(t) = self.arc_types.iter().find(|t| !t.is_linear()) {
            return Err(CoreError::Config(format!("{t} features cannot be arcs")));
        }
        for (name, layer) in [
            ("arc", self.arc_layer),
            ("turn", self.turn_layer),
            ("ucat", self.ucat_layer),
        ] {
            if layer.0 == 0 {
                return Err(CoreError::Config(format!("{name} layer must be greater than 0")));
            }
        }
        if self.turn_layer == self.ucat_layer {
            return Err(CoreError::Config(format!(
                "turn layer and ucat layer must differ (both {})",
                self.turn_layer
            )));
        }
        if self.arc_layer == self.turn_layer || self.arc_layer == self.ucat_layer {
            return Err(CoreError::Config(format!(
                "arc {} is also used as an output layer",
                self.arc_layer
            )));
        }
        Ok(())
    }

    /// `true` if features of `kind` count as arcs.
    #[inline]
    pub fn is_arc_type(&self, kind: FeatureType) -> bool {
        self.arc_types.contains(&kind)
    }

    /// Default turn-table name for an output map called `output`.
    pub fn default_table_name(&self, output: &str) -> String {
        format!(
            "{output}_turntable_t_{}_tuc_{}_a_{}",
            self.turn_layer.0, self.ucat_layer.0, self.arc_layer.0
        )
    }
}
