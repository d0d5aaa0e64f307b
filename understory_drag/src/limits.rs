// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional min/max clamping for one axis.

use crate::error::DragSetupError;

/// Inclusive limits for one axis; either side may be open.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Limits {
    /// Lower limit.
    pub min: Option<f64>,
    /// Upper limit.
    pub max: Option<f64>,
}

impl Limits {
    /// No limits on either side.
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    /// Creates limits, rejecting a minimum above the maximum.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Self, DragSetupError> {
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(DragSetupError::InvertedLimits { min, max });
        }
        Ok(Self { min, max })
    }

    /// Clamps `value` into the limits.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let value = self.max.map_or(value, |max| value.min(max));
        self.min.map_or(value, |min| value.max(min))
    }

    /// Returns `true` if `value` lies within the limits.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_limits_pass_values_through() {
        assert_eq!(Limits::UNBOUNDED.clamp(-1.0e9), -1.0e9);
        assert!(Limits::UNBOUNDED.contains(f64::MAX));
    }

    #[test]
    fn closed_limits_clamp_both_sides() {
        let limits = Limits::new(Some(0.0), Some(10.0)).unwrap();
        assert_eq!(limits.clamp(-5.0), 0.0);
        assert_eq!(limits.clamp(15.0), 10.0);
        assert_eq!(limits.clamp(4.0), 4.0);
    }

    #[test]
    fn inverted_limits_are_rejected() {
        assert_eq!(
            Limits::new(Some(5.0), Some(1.0)),
            Err(DragSetupError::InvertedLimits { min: 5.0, max: 1.0 })
        );
    }
}
