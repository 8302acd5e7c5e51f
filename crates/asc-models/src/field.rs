//! Named-field access into component state and parameter mappings.

use crate::error::{ModelError, ModelResult};

/// Read-only view of named scalar fields.
///
/// Implemented by component state snapshots so models can reference their
/// inputs by field name without knowing the concrete state type.
pub trait FieldMap {
    fn field(&self, name: &str) -> Option<f64>;
}

impl FieldMap for [(&str, f64)] {
    fn field(&self, name: &str) -> Option<f64> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

impl FieldMap for Vec<(&str, f64)> {
    fn field(&self, name: &str) -> Option<f64> {
        self.as_slice().field(name)
    }
}

/// Empty mapping for models that take no static parameters.
pub struct NoParams;

impl FieldMap for NoParams {
    fn field(&self, _name: &str) -> Option<f64> {
        None
    }
}

/// Resolve a field by name, searching the state first, then the static
/// parameters. Absence from both is a configuration error.
pub fn lookup(state: &dyn FieldMap, params: &dyn FieldMap, name: &str) -> ModelResult<f64> {
    state
        .field(name)
        .or_else(|| params.field(name))
        .ok_or_else(|| ModelError::MissingField {
            field: name.to_string(),
        })
}
