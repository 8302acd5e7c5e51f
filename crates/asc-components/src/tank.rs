//! Storage nodes (tanks) with depletion arithmetic.

use asc_models::{FluidModel, FluidState};

use crate::error::{ComponentError, ComponentResult};
use crate::node::{FluidNode, SharedNode};

/// What a propellant tank does about its pressurant while depleted.
///
/// The default leaves the pressurant alone: once the propellant is gone its
/// branch produces no thrust, so the pressurant draw stops mattering for the
/// flight. `DrainWhileDepleted` keeps forwarding the pull (and discards the
/// result) so the pressurant inventory keeps draining.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PressurantPolicy {
    #[default]
    Idle,
    DrainWhileDepleted,
}

/// A tank: the only node kind holding finite inventory.
///
/// A tank without an upstream is a pressurant tank; with an upstream it is a
/// propellant tank fed by a pressurant. Depletion is a normal terminal
/// condition, not an error: once the requested flow cannot be met for the
/// current step the tank zeroes out and stays empty.
pub struct Tank {
    name: String,
    dry_mass_kg: f64,
    volume_m3: f64,
    fluid: String,
    length_m: f64,
    model: FluidModel,
    upstream: Option<SharedNode>,
    policy: PressurantPolicy,

    // Live state, mutated once per distinct caller time.
    time_s: f64,
    fluid_mass_kg: f64,
    pressure_pa: f64,
    temperature_k: f64,
    massflow_kg_s: f64,

    // Same-tick memo: (caller time, output). Repeated pulls at an identical
    // time return this verbatim so shared tanks deplete once per step.
    memo: Option<(f64, FluidState)>,
}

impl Tank {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        dry_mass_kg: f64,
        volume_m3: f64,
        fluid: impl Into<String>,
        fluid_mass_kg: f64,
        pressure_pa: f64,
        temperature_k: f64,
        length_m: f64,
        model: FluidModel,
        upstream: Option<SharedNode>,
    ) -> ComponentResult<Self> {
        if !(fluid_mass_kg.is_finite() && fluid_mass_kg >= 0.0) {
            return Err(ComponentError::Config {
                what: "tank fluid mass must be finite and non-negative".to_string(),
            });
        }
        if !(dry_mass_kg.is_finite() && dry_mass_kg >= 0.0) {
            return Err(ComponentError::Config {
                what: "tank dry mass must be finite and non-negative".to_string(),
            });
        }
        if !(temperature_k.is_finite() && temperature_k > 0.0) {
            return Err(ComponentError::Config {
                what: "tank temperature must be positive".to_string(),
            });
        }
        if !(pressure_pa.is_finite() && pressure_pa >= 0.0) {
            return Err(ComponentError::Config {
                what: "tank pressure must be finite and non-negative".to_string(),
            });
        }
        Ok(Self {
            name: name.into(),
            dry_mass_kg,
            volume_m3,
            fluid: fluid.into(),
            length_m,
            model,
            upstream,
            policy: PressurantPolicy::default(),
            time_s: 0.0,
            fluid_mass_kg,
            pressure_pa,
            temperature_k,
            massflow_kg_s: 0.0,
            memo: None,
        })
    }

    pub fn with_policy(mut self, policy: PressurantPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn volume_m3(&self) -> f64 {
        self.volume_m3
    }

    pub fn is_pressurant(&self) -> bool {
        self.upstream.is_none()
    }

    pub fn pressure_pa(&self) -> f64 {
        self.pressure_pa
    }

    fn deplete(&mut self, time_s: f64) -> ComponentResult<FluidState> {
        self.massflow_kg_s = 0.0;
        self.fluid_mass_kg = 0.0;
        self.pressure_pa = 0.0;
        self.temperature_k = 0.0;
        if self.policy == PressurantPolicy::DrainWhileDepleted {
            if let Some(upstream) = self.upstream.clone() {
                // Pressurant bookkeeping only; nothing downstream of a dry
                // propellant tank produces thrust, so the output is dropped.
                let _ = upstream.borrow_mut().pull(time_s)?;
            }
        }
        Ok(FluidState::ZERO)
    }
}

impl std::fmt::Debug for Tank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tank")
            .field("name", &self.name)
            .field("fluid", &self.fluid)
            .field("fluid_mass_kg", &self.fluid_mass_kg)
            .field("pressure_pa", &self.pressure_pa)
            .field("policy", &self.policy)
            .field("has_upstream", &self.upstream.is_some())
            .finish()
    }
}

impl FluidNode for Tank {
    fn name(&self) -> &str {
        &self.name
    }

    fn fluid(&self) -> String {
        self.fluid.clone()
    }

    fn pull(&mut self, time_s: f64) -> ComponentResult<FluidState> {
        if let Some((memo_time, output)) = self.memo {
            if memo_time == time_s {
                return Ok(output);
            }
        }

        // Adaptive integrators re-sample earlier times after a rejected
        // step; a backward pull consumes nothing rather than refilling.
        let dt = (time_s - self.time_s).max(0.0);
        self.time_s = time_s;

        // Depletion test with the last-applied massflow as the candidate:
        // strict `<`, so an exact exhaustion over the step counts as dry.
        let output = if self.massflow_kg_s * dt < self.fluid_mass_kg {
            let view = FluidState::new(self.massflow_kg_s, self.temperature_k, self.pressure_pa);
            let out = self.model.apply(&view);
            self.fluid_mass_kg = (self.fluid_mass_kg - out.massflow_kg_s * dt).max(0.0);
            self.massflow_kg_s = out.massflow_kg_s;
            self.temperature_k = out.temperature_k;
            self.pressure_pa = out.pressure_pa;
            out
        } else {
            self.deplete(time_s)?
        };

        self.memo = Some((time_s, output));
        Ok(output)
    }

    fn dry_mass_kg(&self) -> f64 {
        self.dry_mass_kg
    }

    fn fluid_mass_kg(&self) -> f64 {
        self.fluid_mass_kg
    }

    fn length_m(&self) -> f64 {
        self.length_m
    }

    fn sample(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("time", self.time_s),
            ("fluid_mass", self.fluid_mass_kg),
            ("pressure", self.pressure_pa),
            ("temperature", self.temperature_k),
            ("massflow", self.massflow_kg_s),
        ]
    }
}
