//! Spec fields drawn from the factory's master generator.
//!
//! A [`RandomProperty`] or [`RandomLocation`] sits in a spec in place of a
//! fixed value and is sampled once per built world. Sampling only ever uses
//! the factory's [`StdRng`], so the drawn values are reproducible from the
//! master seed.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::Deserialize;
use tickgrid_types::{Location, PropertyValue};

/// Errors raised while sampling a random field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RandomError {
    /// Weights were given but do not line up with the values.
    #[error("{values} values but {weights} weights")]
    WeightCount {
        /// Number of values.
        values: usize,
        /// Number of weights.
        weights: usize,
    },

    /// Nothing can be drawn: no values, or no positive weight.
    #[error("no value can be drawn")]
    NoChoice,

    /// The area to draw a location from has no cells.
    #[error("empty area of {width}x{height}")]
    EmptyArea {
        /// Area width.
        width: u64,
        /// Area height.
        height: u64,
    },
}

/// A property value picked from a list, uniformly or by weight.
///
/// Weights need not sum to one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RandomProperty {
    /// Candidate values.
    pub values: Vec<PropertyValue>,
    /// Relative weight per value. Default: uniform.
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

impl RandomProperty {
    /// Pick uniformly from `values`.
    pub const fn uniform(values: Vec<PropertyValue>) -> Self {
        Self {
            values,
            weights: None,
        }
    }

    /// Pick from `values` with the given relative weights.
    pub const fn weighted(values: Vec<PropertyValue>, weights: Vec<f64>) -> Self {
        Self {
            values,
            weights: Some(weights),
        }
    }

    /// Draw one value.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::WeightCount`] when the weights and values
    /// differ in length and [`RandomError::NoChoice`] when there is nothing
    /// to draw.
    pub fn sample(&self, rng: &mut StdRng) -> Result<PropertyValue, RandomError> {
        let picked = match &self.weights {
            None => self.values.choose(rng),
            Some(weights) => {
                if weights.len() != self.values.len() {
                    return Err(RandomError::WeightCount {
                        values: self.values.len(),
                        weights: weights.len(),
                    });
                }
                let pairs: Vec<_> = self.values.iter().zip(weights).collect();
                pairs
                    .choose_weighted(rng, |(_, weight)| **weight)
                    .ok()
                    .map(|(value, _)| *value)
            }
        };
        picked.cloned().ok_or(RandomError::NoChoice)
    }
}

/// A cell drawn uniformly from a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RandomLocation {
    /// Top-left cell of the rectangle.
    pub top_left: Location,
    /// Columns covered.
    pub width: u64,
    /// Rows covered.
    pub height: u64,
}

impl RandomLocation {
    /// Draw one cell.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError::EmptyArea`] when either side is zero.
    pub fn sample(&self, rng: &mut StdRng) -> Result<Location, RandomError> {
        if self.width == 0 || self.height == 0 {
            return Err(RandomError::EmptyArea {
                width: self.width,
                height: self.height,
            });
        }
        let dx = rng.random_range(0..self.width);
        let dy = rng.random_range(0..self.height);
        Ok(offset(self.top_left, dx, dy))
    }
}

/// `origin` moved `dx` columns right and `dy` rows down, saturating.
pub(crate) fn offset(origin: Location, dx: u64, dy: u64) -> Location {
    let step = |by: u64| i64::try_from(by).unwrap_or(i64::MAX);
    Location::new(
        origin.x.saturating_add(step(dx)),
        origin.y.saturating_add(step(dy)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;

    use super::*;

    fn colours() -> Vec<PropertyValue> {
        vec!["red".into(), "green".into(), "blue".into()]
    }

    #[test]
    fn same_seed_draws_same_values() {
        let property = RandomProperty::uniform(colours());
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| property.sample(&mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(4), draw(4));
    }

    #[test]
    fn zero_weight_values_are_never_drawn() {
        let property = RandomProperty::weighted(colours(), vec![0.0, 3.0, 0.0]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(property.sample(&mut rng).unwrap(), PropertyValue::from("green"));
        }
    }

    #[test]
    fn bad_weights_and_empty_lists_fail() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            RandomProperty::weighted(colours(), vec![1.0]).sample(&mut rng),
            Err(RandomError::WeightCount {
                values: 3,
                weights: 1
            })
        );
        assert_eq!(
            RandomProperty::weighted(colours(), vec![0.0; 3]).sample(&mut rng),
            Err(RandomError::NoChoice)
        );
        assert_eq!(
            RandomProperty::uniform(Vec::new()).sample(&mut rng),
            Err(RandomError::NoChoice)
        );
    }

    #[test]
    fn locations_stay_inside_the_area() {
        let area = RandomLocation {
            top_left: Location::new(2, 3),
            width: 2,
            height: 1,
        };
        let mut rng = StdRng::seed_from_u64(9);
        let seen: BTreeSet<Location> = (0..40).map(|_| area.sample(&mut rng).unwrap()).collect();
        assert_eq!(
            seen,
            BTreeSet::from([Location::new(2, 3), Location::new(3, 3)])
        );
    }

    #[test]
    fn empty_area_fails() {
        let area = RandomLocation {
            top_left: Location::new(0, 0),
            width: 0,
            height: 4,
        };
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(
            area.sample(&mut rng),
            Err(RandomError::EmptyArea {
                width: 0,
                height: 4
            })
        );
    }
}
