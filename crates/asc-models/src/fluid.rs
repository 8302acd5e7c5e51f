//! Fluid state records and fluid-flow behavior models.

/// Fluid state at a node's output: the record handed down a pull chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidState {
    pub massflow_kg_s: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
}

impl FluidState {
    pub const ZERO: Self = Self {
        massflow_kg_s: 0.0,
        temperature_k: 0.0,
        pressure_pa: 0.0,
    };

    pub fn new(massflow_kg_s: f64, temperature_k: f64, pressure_pa: f64) -> Self {
        Self {
            massflow_kg_s,
            temperature_k,
            pressure_pa,
        }
    }
}

/// Affine map `y = gain * x + offset` on one fluid-state field.
#[derive(Clone, Copy, Debug)]
pub struct Affine {
    pub gain: f64,
    pub offset: f64,
}

impl Affine {
    /// Identity map, the default for fields a component leaves untouched.
    pub const IDENTITY: Self = Self {
        gain: 1.0,
        offset: 0.0,
    };

    fn eval(&self, x: f64) -> f64 {
        self.gain * x + self.offset
    }
}

/// Behavior model producing a fluid state record from an input record.
#[derive(Clone, Debug)]
pub enum FluidModel {
    /// Fixed output, independent of the input (tank outflow at design point).
    Constant(FluidState),
    /// Independent affine maps per field; a fixed fractional pressure loss is
    /// `pressure: Affine { gain: 1.0 - loss, offset: 0.0 }`.
    Linear {
        massflow: Affine,
        temperature: Affine,
        pressure: Affine,
    },
}

impl FluidModel {
    /// Pressure derated by a fixed loss fraction, everything else passed through.
    pub fn pressure_loss(fraction: f64) -> Self {
        Self::Linear {
            massflow: Affine::IDENTITY,
            temperature: Affine::IDENTITY,
            pressure: Affine {
                gain: 1.0 - fraction,
                offset: 0.0,
            },
        }
    }

    pub fn apply(&self, input: &FluidState) -> FluidState {
        match self {
            Self::Constant(output) => *output,
            Self::Linear {
                massflow,
                temperature,
                pressure,
            } => FluidState {
                massflow_kg_s: massflow.eval(input.massflow_kg_s),
                temperature_k: temperature.eval(input.temperature_k),
                pressure_pa: pressure.eval(input.pressure_pa),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ignores_input() {
        let model = FluidModel::Constant(FluidState::new(2.0, 290.0, 4e6));
        let out = model.apply(&FluidState::ZERO);
        assert_eq!(out, FluidState::new(2.0, 290.0, 4e6));
    }

    #[test]
    fn pressure_loss_derates_only_pressure() {
        let model = FluidModel::pressure_loss(0.05);
        let out = model.apply(&FluidState::new(1.5, 300.0, 1e6));
        assert!((out.massflow_kg_s - 1.5).abs() < 1e-12);
        assert!((out.temperature_k - 300.0).abs() < 1e-12);
        assert!((out.pressure_pa - 0.95e6).abs() < 1e-6);
    }

    #[test]
    fn input_is_not_mutated() {
        let input = FluidState::new(1.0, 300.0, 5e5);
        let model = FluidModel::pressure_loss(0.5);
        let _ = model.apply(&input);
        assert_eq!(input, FluidState::new(1.0, 300.0, 5e5));
    }
}
