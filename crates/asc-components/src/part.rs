//! Inert structural parts.

use asc_core::units::{kg, m, Length, Mass};

use crate::error::{ComponentError, ComponentResult};

/// Mass/length contributor with no state evolution (hull section, avionics,
/// recovery hardware, payload).
#[derive(Clone, Debug)]
pub struct StructuralPart {
    name: String,
    mass: Mass,
    length: Length,
}

impl StructuralPart {
    pub fn new(name: impl Into<String>, mass_kg: f64, length_m: f64) -> ComponentResult<Self> {
        if !(mass_kg.is_finite() && mass_kg >= 0.0) {
            return Err(ComponentError::Config {
                what: "structural part mass must be finite and non-negative".to_string(),
            });
        }
        if !(length_m.is_finite() && length_m >= 0.0) {
            return Err(ComponentError::Config {
                what: "structural part length must be finite and non-negative".to_string(),
            });
        }
        Ok(Self {
            name: name.into(),
            mass: kg(mass_kg),
            length: m(length_m),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass.value
    }

    pub fn length_m(&self) -> f64 {
        self.length.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_mass() {
        assert!(StructuralPart::new("fin can", -1.0, 0.3).is_err());
        assert!(StructuralPart::new("fin can", f64::NAN, 0.3).is_err());
    }

    #[test]
    fn zero_length_is_fine() {
        let part = StructuralPart::new("avionics", 1.2, 0.0).unwrap();
        assert_eq!(part.mass_kg(), 1.2);
        assert_eq!(part.length_m(), 0.0);
    }
}
