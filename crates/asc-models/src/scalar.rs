//! Scalar behavior models.

use crate::error::ModelResult;
use crate::field::{lookup, FieldMap};
use crate::lut::{Lut1d, Lut2d};

/// Scalar-valued behavior model, dispatched by variant.
///
/// Inputs are resolved by field name, searching the caller's state first and
/// its static parameters second.
#[derive(Clone, Debug)]
pub enum ScalarModel {
    /// Ignores its input entirely.
    Constant(f64),
    /// `y = gain * input + offset`
    Linear {
        gain: f64,
        offset: f64,
        input: String,
    },
    /// Linear interpolation, extrapolating beyond the table span.
    Lut1d { input: String, table: Lut1d },
    /// Bilinear interpolation; range discipline set on the table itself.
    Lut2d {
        x_input: String,
        y_input: String,
        table: Lut2d,
    },
}

impl ScalarModel {
    pub fn apply(&self, state: &dyn FieldMap, params: &dyn FieldMap) -> ModelResult<f64> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::Linear {
                gain,
                offset,
                input,
            } => Ok(gain * lookup(state, params, input)? + offset),
            Self::Lut1d { input, table } => Ok(table.eval(lookup(state, params, input)?)),
            Self::Lut2d {
                x_input,
                y_input,
                table,
            } => table.eval(
                lookup(state, params, x_input)?,
                lookup(state, params, y_input)?,
            ),
        }
    }
}
