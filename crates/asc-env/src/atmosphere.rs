//! Atmosphere provider contract and a table-backed adapter.

use crate::error::{EnvError, EnvResult};

/// Altitude above which the reference-altitude fallback is evaluated when a
/// query leaves the modeled domain (Mach number only; see the sim crate).
pub const FALLBACK_REFERENCE_ALTITUDE_M: f64 = 80_000.0;

/// Ambient pressure substituted when the provider rejects an altitude.
pub const AMBIENT_PRESSURE_FALLBACK_PA: f64 = 0.1;

/// Air density substituted when the provider rejects an altitude.
pub const AIR_DENSITY_FALLBACK_KG_M3: f64 = 1e-5;

/// Speed of sound substituted when the reference altitude is itself outside
/// the provider's span. Roughly the high-altitude value of the standard
/// atmosphere.
pub const SPEED_OF_SOUND_FALLBACK_M_S: f64 = 282.0;

/// Atmosphere property provider.
///
/// Out-of-domain altitudes return [`EnvError::OutOfDomain`]; the caller
/// recovers locally with the fallback constants above. An implementation must
/// never panic on any finite altitude.
pub trait Atmosphere {
    fn pressure_pa(&self, altitude_m: f64) -> EnvResult<f64>;
    fn density_kg_m3(&self, altitude_m: f64) -> EnvResult<f64>;
    fn speed_of_sound_m_s(&self, altitude_m: f64) -> EnvResult<f64>;
}

/// One altitude sample of a tabulated atmosphere.
#[derive(Clone, Copy, Debug)]
pub struct AtmosphereSample {
    pub altitude_m: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub speed_of_sound_m_s: f64,
}

/// Adapter over externally supplied atmosphere data.
///
/// Interpolates linearly between samples and treats anything outside the
/// tabulated altitude span as out of domain.
#[derive(Clone, Debug)]
pub struct TableAtmosphere {
    samples: Vec<AtmosphereSample>,
}

impl TableAtmosphere {
    /// Samples must be sorted by strictly increasing altitude.
    pub fn new(samples: Vec<AtmosphereSample>) -> EnvResult<Self> {
        if samples.len() < 2 {
            return Err(EnvError::Backend {
                message: "atmosphere table needs at least two samples".to_string(),
            });
        }
        if samples
            .windows(2)
            .any(|w| w[1].altitude_m <= w[0].altitude_m)
        {
            return Err(EnvError::Backend {
                message: "atmosphere table altitudes must be strictly increasing".to_string(),
            });
        }
        Ok(Self { samples })
    }

    fn interpolate(
        &self,
        altitude_m: f64,
        value: impl Fn(&AtmosphereSample) -> f64,
    ) -> EnvResult<f64> {
        let first = &self.samples[0];
        let last = &self.samples[self.samples.len() - 1];
        if !altitude_m.is_finite() || altitude_m < first.altitude_m || altitude_m > last.altitude_m
        {
            return Err(EnvError::OutOfDomain {
                what: "altitude_m",
                value: altitude_m,
            });
        }

        let idx = self
            .samples
            .partition_point(|s| s.altitude_m <= altitude_m)
            .min(self.samples.len() - 1);
        let hi = &self.samples[idx];
        let lo = &self.samples[idx - 1];
        let frac = (altitude_m - lo.altitude_m) / (hi.altitude_m - lo.altitude_m);
        Ok(value(lo) + frac * (value(hi) - value(lo)))
    }
}

impl Atmosphere for TableAtmosphere {
    fn pressure_pa(&self, altitude_m: f64) -> EnvResult<f64> {
        self.interpolate(altitude_m, |s| s.pressure_pa)
    }

    fn density_kg_m3(&self, altitude_m: f64) -> EnvResult<f64> {
        self.interpolate(altitude_m, |s| s.density_kg_m3)
    }

    fn speed_of_sound_m_s(&self, altitude_m: f64) -> EnvResult<f64> {
        self.interpolate(altitude_m, |s| s.speed_of_sound_m_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point_table() -> TableAtmosphere {
        TableAtmosphere::new(vec![
            AtmosphereSample {
                altitude_m: 0.0,
                pressure_pa: 101_325.0,
                density_kg_m3: 1.225,
                speed_of_sound_m_s: 340.3,
            },
            AtmosphereSample {
                altitude_m: 10_000.0,
                pressure_pa: 26_500.0,
                density_kg_m3: 0.413,
                speed_of_sound_m_s: 299.5,
            },
        ])
        .unwrap()
    }

    #[test]
    fn interpolates_between_samples() {
        let atm = two_point_table();
        let p = atm.pressure_pa(5_000.0).unwrap();
        assert!((p - 0.5 * (101_325.0 + 26_500.0)).abs() < 1e-6);
    }

    #[test]
    fn exact_sample_altitudes() {
        let atm = two_point_table();
        assert!((atm.density_kg_m3(0.0).unwrap() - 1.225).abs() < 1e-12);
        assert!((atm.density_kg_m3(10_000.0).unwrap() - 0.413).abs() < 1e-12);
    }

    #[test]
    fn out_of_domain_is_recoverable_error() {
        let atm = two_point_table();
        assert!(matches!(
            atm.speed_of_sound_m_s(-1.0),
            Err(EnvError::OutOfDomain { .. })
        ));
        assert!(matches!(
            atm.speed_of_sound_m_s(90_000.0),
            Err(EnvError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn rejects_unsorted_table() {
        let result = TableAtmosphere::new(vec![
            AtmosphereSample {
                altitude_m: 100.0,
                pressure_pa: 1.0,
                density_kg_m3: 1.0,
                speed_of_sound_m_s: 1.0,
            },
            AtmosphereSample {
                altitude_m: 0.0,
                pressure_pa: 1.0,
                density_kg_m3: 1.0,
                speed_of_sound_m_s: 1.0,
            },
        ]);
        assert!(result.is_err());
    }
}
