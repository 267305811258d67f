//! The scoring pipeline's input schema, declared once.
//!
//! Both the feature-record assembler and the artifact loader derive from
//! [`FEATURE_SCHEMA`], so a renamed or reordered column is a construction- or
//! load-time failure instead of a silent mis-scored prediction.

use thiserror::Error;

/// Placeholder model choice shown when dependent filtering finds nothing.
/// Must never reach the pipeline.
pub const NO_MODELS_SENTINEL: &str = "No models available";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Categorical,
    Int,
    Float,
}

pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Training-time column order of the scoring pipeline, verbatim.
pub const FEATURE_SCHEMA: [FieldSpec; 13] = [
    FieldSpec { name: "Fuel type", kind: FieldKind::Categorical },
    FieldSpec { name: "body type", kind: FieldKind::Categorical },
    FieldSpec { name: "transmission", kind: FieldKind::Categorical },
    FieldSpec { name: "ownerNo", kind: FieldKind::Int },
    FieldSpec { name: "Brand", kind: FieldKind::Categorical },
    FieldSpec { name: "model", kind: FieldKind::Categorical },
    FieldSpec { name: "modelYear", kind: FieldKind::Int },
    FieldSpec { name: "Insurance Type", kind: FieldKind::Categorical },
    FieldSpec { name: "Kms Driven", kind: FieldKind::Int },
    FieldSpec { name: "Mileage", kind: FieldKind::Float },
    FieldSpec { name: "Seats", kind: FieldKind::Int },
    FieldSpec { name: "Color", kind: FieldKind::Categorical },
    FieldSpec { name: "City", kind: FieldKind::Categorical },
];

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Categorical,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Float(_) => FieldKind::Float,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("expected {expected} fields, got {got}")]
    FieldCount { expected: usize, got: usize },
    #[error("field '{field}' expects {expected:?}, got {got:?}")]
    KindMismatch {
        field: &'static str,
        expected: FieldKind,
        got: FieldKind,
    },
}

/// One fully assembled scoring input: the 13 schema fields, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl FeatureRecord {
    /// Build from values given in [`FEATURE_SCHEMA`] order. Field names come
    /// from the schema descriptor alone; every value is kind-checked against
    /// its spec.
    pub fn from_ordered_values(values: Vec<FieldValue>) -> Result<Self, SchemaError> {
        if values.len() != FEATURE_SCHEMA.len() {
            return Err(SchemaError::FieldCount {
                expected: FEATURE_SCHEMA.len(),
                got: values.len(),
            });
        }
        let mut fields = Vec::with_capacity(values.len());
        for (spec, value) in FEATURE_SCHEMA.iter().zip(values) {
            if value.kind() != spec.kind {
                return Err(SchemaError::KindMismatch {
                    field: spec.name,
                    expected: spec.kind,
                    got: value.kind(),
                });
            }
            fields.push((spec.name, value));
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
