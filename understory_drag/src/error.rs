// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture setup errors.

use core::fmt;

use crate::moving::MoveStrategy;

/// A gesture could not be started.
///
/// Everything past setup is infallible; once a gesture state exists every
/// pointer position maps to a change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DragSetupError {
    /// The pointer-down input carried no usable position.
    NoPointer,
    /// The requested strategy needs a coordinate system the element lacks,
    /// e.g. [`MoveStrategy::Svg`] on an element without an SVG transform.
    UnsupportedStrategy(MoveStrategy),
    /// The SVG move ratio is not a positive finite number, typically because
    /// the element has no rendered width yet.
    InvalidMoveRatio(f64),
    /// A minimum limit exceeds its maximum.
    InvertedLimits {
        /// The configured minimum.
        min: f64,
        /// The configured maximum.
        max: f64,
    },
}

impl fmt::Display for DragSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPointer => f.write_str("pointer-down input carried no position"),
            Self::UnsupportedStrategy(strategy) => {
                write!(f, "element does not support the {strategy:?} move strategy")
            }
            Self::InvalidMoveRatio(ratio) => {
                write!(f, "move ratio {ratio} is not a positive finite number")
            }
            Self::InvertedLimits { min, max } => {
                write!(f, "minimum {min} exceeds maximum {max}")
            }
        }
    }
}

impl core::error::Error for DragSetupError {}
