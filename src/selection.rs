//! The user's in-progress form choices: domain constants, submit-time
//! validation, and assembly into a [`FeatureRecord`].

use serde::Deserialize;

use crate::dataset::ReferenceData;
use crate::error::AppError;
use crate::schema::{FeatureRecord, FieldValue, NO_MODELS_SENTINEL};

pub const FUEL_TYPES: [&str; 5] = ["Petrol", "Diesel", "Lpg", "Cng", "Electric"];

pub const BODY_TYPES: [&str; 10] = [
    "Hatchback",
    "SUV",
    "Sedan",
    "MUV",
    "Coupe",
    "Minivans",
    "Convertibles",
    "Hybrids",
    "Wagon",
    "Pickup Trucks",
];

pub const TRANSMISSIONS: [&str; 2] = ["Manual", "Automatic"];

// The digit labels ("2", "1") come from the source data as-is; their meaning
// relative to the named tiers is an open product question.
pub const INSURANCE_TYPES: [&str; 7] = [
    "Third Party insurance",
    "Comprehensive",
    "Third Party",
    "Zero Dep",
    "2",
    "1",
    "Not Available",
];

pub const MODEL_YEAR_RANGE: (i64, i64) = (1980, 2025);
pub const MILEAGE_RANGE: (f64, f64) = (1.0, 50.0);
pub const OWNER_RANGE: (i64, i64) = (1, 5);
pub const KMS_RANGE: (i64, i64) = (100, 1_000_000);

/// One complete set of form inputs. Wire names match the pipeline's
/// training-time column names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Selection {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Fuel type")]
    pub fuel_type: String,
    #[serde(rename = "body type")]
    pub body_type: String,
    #[serde(rename = "model")]
    pub model: String,
    #[serde(rename = "transmission")]
    pub transmission: String,
    #[serde(rename = "Seats")]
    pub seats: i64,
    #[serde(rename = "Insurance Type")]
    pub insurance_type: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "modelYear")]
    pub model_year: i64,
    #[serde(rename = "Mileage")]
    pub mileage: f64,
    #[serde(rename = "ownerNo")]
    pub owner_no: i64,
    #[serde(rename = "Kms Driven")]
    pub kms_driven: i64,
}

fn in_range<T: PartialOrd + std::fmt::Display + Copy>(
    label: &str,
    value: T,
    range: (T, T),
) -> Result<(), AppError> {
    if value < range.0 || value > range.1 {
        return Err(AppError::InvalidSelection(format!(
            "{label} {value} outside [{}, {}]",
            range.0, range.1
        )));
    }
    Ok(())
}

impl Selection {
    /// Check every field against its declared domain.
    ///
    /// The model check re-runs the dependent filter against the current
    /// Brand/Body/Fuel keys, so a model picked under an earlier key
    /// combination cannot slip through.
    pub fn validate(&self, data: &ReferenceData) -> Result<(), AppError> {
        if self.model.is_empty() || self.model == NO_MODELS_SENTINEL {
            return Err(AppError::IncompleteSelection);
        }

        let unknown = |label: &str, value: &str| {
            AppError::InvalidSelection(format!("unknown {label} '{value}'"))
        };
        if !FUEL_TYPES.contains(&self.fuel_type.as_str()) {
            return Err(unknown("fuel type", &self.fuel_type));
        }
        if !BODY_TYPES.contains(&self.body_type.as_str()) {
            return Err(unknown("body type", &self.body_type));
        }
        if !TRANSMISSIONS.contains(&self.transmission.as_str()) {
            return Err(unknown("transmission", &self.transmission));
        }
        if !INSURANCE_TYPES.contains(&self.insurance_type.as_str()) {
            return Err(unknown("insurance type", &self.insurance_type));
        }
        if !data.brands().iter().any(|b| b == &self.brand) {
            return Err(unknown("brand", &self.brand));
        }
        if !data.colors().iter().any(|c| c == &self.color) {
            return Err(unknown("color", &self.color));
        }
        if !data.cities().iter().any(|c| c == &self.city) {
            return Err(unknown("city", &self.city));
        }
        if !data.seats().contains(&self.seats) {
            return Err(AppError::InvalidSelection(format!(
                "unknown seat count {}",
                self.seats
            )));
        }

        in_range("manufacturing year", self.model_year, MODEL_YEAR_RANGE)?;
        in_range("mileage", self.mileage, MILEAGE_RANGE)?;
        in_range("owner number", self.owner_no, OWNER_RANGE)?;
        in_range("kilometers driven", self.kms_driven, KMS_RANGE)?;

        if !data
            .models_for(&self.brand, &self.body_type, &self.fuel_type)
            .iter()
            .any(|m| m == &self.model)
        {
            return Err(AppError::InvalidSelection(format!(
                "model '{}' does not match the selected brand, body type and fuel type",
                self.model
            )));
        }
        Ok(())
    }

    /// Field values in pipeline column order. Names live in the schema
    /// descriptor; this list only supplies the values to zip against it.
    fn ordered_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.fuel_type.clone()),
            FieldValue::Text(self.body_type.clone()),
            FieldValue::Text(self.transmission.clone()),
            FieldValue::Int(self.owner_no),
            FieldValue::Text(self.brand.clone()),
            FieldValue::Text(self.model.clone()),
            FieldValue::Int(self.model_year),
            FieldValue::Text(self.insurance_type.clone()),
            FieldValue::Int(self.kms_driven),
            FieldValue::Float(self.mileage),
            FieldValue::Int(self.seats),
            FieldValue::Text(self.color.clone()),
            FieldValue::Text(self.city.clone()),
        ]
    }

    /// Pure transform into the one record handed to the scoring pipeline.
    /// Refuses the sentinel; the kind check against the schema descriptor
    /// cannot fail for a well-typed `Selection`, but is kept as a hard stop.
    pub fn assemble(&self) -> Result<FeatureRecord, AppError> {
        if self.model.is_empty() || self.model == NO_MODELS_SENTINEL {
            return Err(AppError::IncompleteSelection);
        }
        FeatureRecord::from_ordered_values(self.ordered_values())
            .map_err(|e| AppError::InvalidSelection(e.to_string()))
    }
}
