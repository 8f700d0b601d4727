//! Category sets attached to vector features.
//!
//! A feature carries any number of `(layer, cat)` pairs.  The same layer may
//! hold several categories (a line taking part in many turns carries one
//! turn-layer category per turn), but a given pair is stored only once.

use std::fmt;
use std::str::FromStr;

use tt_core::Layer;

use crate::VectorError;

/// Ordered set of `(layer, category)` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cats {
    pairs: Vec<(Layer, i64)>,
}

impl Cats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// First category in `layer`, if any.
    pub fn get(&self, layer: Layer) -> Option<i64> {
        self.pairs.iter().find(|(l, _)| *l == layer).map(|&(_, c)| c)
    }

    /// All categories in `layer`, in insertion order.
    pub fn cats(&self, layer: Layer) -> impl Iterator<Item = i64> + '_ {
        self.pairs
            .iter()
            .filter(move |(l, _)| *l == layer)
            .map(|&(_, c)| c)
    }

    pub fn has_layer(&self, layer: Layer) -> bool {
        self.pairs.iter().any(|(l, _)| *l == layer)
    }

    pub fn contains(&self, layer: Layer, cat: i64) -> bool {
        self.pairs.contains(&(layer, cat))
    }

    /// Add `cat` to `layer`.  Returns `false` if the pair was already present.
    pub fn set(&mut self, layer: Layer, cat: i64) -> bool {
        if self.contains(layer, cat) {
            return false;
        }
        self.pairs.push((layer, cat));
        true
    }

    /// Remove every category in `layer`; returns how many were removed.
    pub fn delete_layer(&mut self, layer: Layer) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|(l, _)| *l != layer);
        before - self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Layer, i64)> + '_ {
        self.pairs.iter().copied()
    }
}

impl FromIterator<(Layer, i64)> for Cats {
    fn from_iter<I: IntoIterator<Item = (Layer, i64)>>(iter: I) -> Self {
        let mut cats = Cats::new();
        for (layer, cat) in iter {
            cats.set(layer, cat);
        }
        cats
    }
}

/// `layer:cat` pairs joined by `;`, e.g. `1:5;3:1;3:2`.
impl fmt::Display for Cats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (layer, cat)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}:{}", layer.0, cat)?;
        }
        Ok(())
    }
}

impl FromStr for Cats {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|pair| {
                let (layer, cat) = pair.split_once(':').ok_or_else(|| {
                    VectorError::Parse(format!("invalid category {pair:?}: expected layer:cat"))
                })?;
                let layer = layer.trim().parse::<u32>().map_err(|_| {
                    VectorError::Parse(format!("invalid layer in {pair:?}"))
                })?;
                let cat = cat.trim().parse::<i64>().map_err(|_| {
                    VectorError::Parse(format!("invalid category value in {pair:?}"))
                })?;
                Ok((Layer(layer), cat))
            })
            .collect()
    }
}
