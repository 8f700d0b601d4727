//! Fluent builder for constructing a [`TurnTable`] pass.

use log::debug;

use tt_core::TurnTableConfig;
use tt_output::TurnTableSink;
use tt_vector::{VectorSink, VectorSource};

use crate::{TurnTable, TurnTableResult};

/// Fluent builder for [`TurnTable`].
///
/// # Required inputs
///
/// - `S: VectorSource`: the input map with node topology
/// - `O: VectorSink`: the output map receiving annotated lines, node points
///   and copied features
/// - `T: TurnTableSink`: the destination of the turn-table rows
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                       |
/// |---------------|-------------------------------|
/// | `.config(c)`  | `TurnTableConfig::default()`  |
///
/// # Example
///
/// ```rust,ignore
/// let input = load_map_csv(Path::new("roads.csv"), 0.0)?;
/// let mut output = VectorMap::new();
/// let mut sink = MemorySink::new();
/// let summary = TurnTableBuilder::new(&input, &mut output, &mut sink)
///     .config(config)
///     .build()?
///     .run(&mut NoopObserver)?;
/// ```
pub struct TurnTableBuilder<'a, S, O, T>
where
    S: VectorSource + ?Sized,
    O: VectorSink + ?Sized,
    T: TurnTableSink + ?Sized,
{
    config: Option<TurnTableConfig>,
    input:  &'a S,
    output: &'a mut O,
    sink:   &'a mut T,
}

impl<'a, S, O, T> TurnTableBuilder<'a, S, O, T>
where
    S: VectorSource + ?Sized,
    O: VectorSink + ?Sized,
    T: TurnTableSink + ?Sized,
{
    /// Create a builder with all required inputs.
    pub fn new(input: &'a S, output: &'a mut O, sink: &'a mut T) -> Self {
        Self { config: None, input, output, sink }
    }

    /// Supply the layer and feature-type configuration.
    pub fn config(mut self, config: TurnTableConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validate the configuration, count the arc-type lines, and return a
    /// ready-to-run [`TurnTable`].
    pub fn build(self) -> TurnTableResult<TurnTable<'a, S, O, T>> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let arc_lines = self.input.count_of(&config.arc_types);
        debug!(
            "turntable over {} features ({arc_lines} arc-type lines), {} nodes",
            self.input.feature_count(),
            self.input.node_count()
        );

        Ok(TurnTable::new(config, self.input, self.output, self.sink, arc_lines))
    }
}
