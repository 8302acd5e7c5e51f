//! Stateless-inventory feed parts: lines, regen cooling jackets, injectors.

use asc_models::{FluidModel, FluidState};

use crate::error::{ComponentError, ComponentResult};
use crate::node::{FluidNode, SharedNode};

/// A wetted part with no stored inventory.
///
/// On each pull it asks its upstream for fluid state and runs the result
/// through its behavior model (typically a pressure loss). Several of these
/// chain between a tank and an injector.
pub struct Passthrough {
    name: String,
    dry_mass_kg: f64,
    length_m: f64,
    model: FluidModel,
    upstream: SharedNode,

    time_s: f64,
    massflow_kg_s: f64,
    temperature_k: f64,
    pressure_pa: f64,

    memo: Option<(f64, FluidState)>,
}

impl Passthrough {
    pub fn new(
        name: impl Into<String>,
        dry_mass_kg: f64,
        length_m: f64,
        model: FluidModel,
        upstream: SharedNode,
    ) -> ComponentResult<Self> {
        if !(dry_mass_kg.is_finite() && dry_mass_kg >= 0.0) {
            return Err(ComponentError::Config {
                what: "passthrough dry mass must be finite and non-negative".to_string(),
            });
        }
        if !(length_m.is_finite() && length_m >= 0.0) {
            return Err(ComponentError::Config {
                what: "passthrough length must be finite and non-negative".to_string(),
            });
        }
        Ok(Self {
            name: name.into(),
            dry_mass_kg,
            length_m,
            model,
            upstream,
            time_s: 0.0,
            massflow_kg_s: 0.0,
            temperature_k: 0.0,
            pressure_pa: 0.0,
            memo: None,
        })
    }
}

impl FluidNode for Passthrough {
    fn name(&self) -> &str {
        &self.name
    }

    fn fluid(&self) -> String {
        self.upstream.borrow().fluid()
    }

    fn pull(&mut self, time_s: f64) -> ComponentResult<FluidState> {
        if let Some((memo_time, output)) = self.memo {
            if memo_time == time_s {
                return Ok(output);
            }
        }

        let incoming = self.upstream.borrow_mut().pull(time_s)?;
        let output = self.model.apply(&incoming);

        self.time_s = time_s;
        self.massflow_kg_s = output.massflow_kg_s;
        self.temperature_k = output.temperature_k;
        self.pressure_pa = output.pressure_pa;

        self.memo = Some((time_s, output));
        Ok(output)
    }

    fn dry_mass_kg(&self) -> f64 {
        self.dry_mass_kg
    }

    fn length_m(&self) -> f64 {
        self.length_m
    }

    fn sample(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("time", self.time_s),
            ("massflow", self.massflow_kg_s),
            ("temperature", self.temperature_k),
            ("pressure", self.pressure_pa),
        ]
    }
}

impl std::fmt::Debug for Passthrough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passthrough")
            .field("name", &self.name)
            .field("dry_mass_kg", &self.dry_mass_kg)
            .field("model", &self.model)
            .field("time_s", &self.time_s)
            .finish()
    }
}
