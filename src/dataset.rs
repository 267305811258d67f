//! Reference dataset: historical car records backing the form's dropdown
//! domains and the dependent Brand/Body/Fuel -> Model filter.
//!
//! Loaded once per process and never mutated afterwards, so it can be shared
//! behind an `Arc` with no locking.

use std::path::Path;

use tracing::info;

use crate::error::AppError;

/// One row of the historical dataset. Only the columns the form needs are
/// kept; everything else in the file is ignored.
#[derive(Debug, Clone)]
pub struct ReferenceRecord {
    pub brand: String,
    pub model: String,
    pub body_type: String,
    pub fuel_type: String,
    pub seats: i64,
    pub color: String,
    pub city: String,
}

#[derive(Debug)]
pub struct ReferenceData {
    records: Vec<ReferenceRecord>,
}

struct ColumnIndex {
    brand: usize,
    model: usize,
    body_type: usize,
    fuel_type: usize,
    seats: usize,
    color: usize,
    city: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, path: &Path) -> Result<Self, AppError> {
        // exact, case-sensitive header match
        let col = |name: &str| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                AppError::DataUnavailable(format!(
                    "missing column '{}' in {}",
                    name,
                    path.display()
                ))
            })
        };
        Ok(Self {
            brand: col("Brand")?,
            model: col("model")?,
            body_type: col("body type")?,
            fuel_type: col("Fuel type")?,
            seats: col("Seats")?,
            color: col("Color")?,
            city: col("City")?,
        })
    }
}

/// Seats may be written as "5" or, after a float-typed export, "5.0".
fn parse_seats(raw: &str) -> Option<i64> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(n);
    }
    let f: f64 = raw.parse().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

impl ReferenceData {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            AppError::DataUnavailable(format!("failed to open {}: {e}", path.display()))
        })?;
        let headers = reader
            .headers()
            .map_err(|e| {
                AppError::DataUnavailable(format!("failed to read headers of {}: {e}", path.display()))
            })?
            .clone();
        let idx = ColumnIndex::resolve(&headers, path)?;

        let mut records = Vec::new();
        for (i, row) in reader.records().enumerate() {
            // +2: one for the header row, one for 1-based line numbers
            let line = i + 2;
            let row = row.map_err(|e| {
                AppError::DataUnavailable(format!("bad record at line {line}: {e}"))
            })?;
            let field = |c: usize| row.get(c).unwrap_or("").trim().to_string();
            let seats_raw = field(idx.seats);
            let seats = parse_seats(&seats_raw).ok_or_else(|| {
                AppError::DataUnavailable(format!(
                    "non-integer Seats value '{seats_raw}' at line {line}"
                ))
            })?;
            records.push(ReferenceRecord {
                brand: field(idx.brand),
                model: field(idx.model),
                body_type: field(idx.body_type),
                fuel_type: field(idx.fuel_type),
                seats,
                color: field(idx.color),
                city: field(idx.city),
            });
        }
        if records.is_empty() {
            return Err(AppError::DataUnavailable(format!(
                "{} contains no data rows",
                path.display()
            )));
        }

        info!(rows = records.len(), "reference dataset loaded");
        Ok(Self { records })
    }

    fn distinct<'a, F>(&'a self, pick: F) -> Vec<String>
    where
        F: Fn(&'a ReferenceRecord) -> &'a str,
    {
        let mut out: Vec<String> = Vec::new();
        for record in &self.records {
            let value = pick(record);
            if !out.iter().any(|v| v == value) {
                out.push(value.to_string());
            }
        }
        out
    }

    /// Distinct brands, first-seen order.
    pub fn brands(&self) -> Vec<String> {
        self.distinct(|r| &r.brand)
    }

    /// Distinct colors, first-seen order.
    pub fn colors(&self) -> Vec<String> {
        self.distinct(|r| &r.color)
    }

    /// Distinct cities, first-seen order.
    pub fn cities(&self) -> Vec<String> {
        self.distinct(|r| &r.city)
    }

    /// Distinct seat counts, sorted ascending.
    pub fn seats(&self) -> Vec<i64> {
        let mut out: Vec<i64> = Vec::new();
        for record in &self.records {
            if !out.contains(&record.seats) {
                out.push(record.seats);
            }
        }
        out.sort_unstable();
        out
    }

    /// Dependent option filter: the distinct `model` values of records that
    /// match all three keys exactly, in first-seen dataset order.
    ///
    /// Pure query over the loaded records, recomputed per call; an empty
    /// result means no valid combination exists and the caller presents the
    /// sentinel option instead.
    pub fn models_for(&self, brand: &str, body_type: &str, fuel_type: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for record in &self.records {
            if record.brand == brand
                && record.body_type == body_type
                && record.fuel_type == fuel_type
                && !out.iter().any(|m| m == &record.model)
            {
                out.push(record.model.clone());
            }
        }
        out
    }

    pub fn records(&self) -> &[ReferenceRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
Brand,model,body type,Fuel type,Seats,Color,City,price
Maruti,Swift,Hatchback,Petrol,5,White,Chennai,450000
Maruti,Brezza,SUV,Diesel,5,Red,Delhi,900000
Hyundai,i20,Hatchback,Petrol,5,White,Chennai,600000
Maruti,Swift,Hatchback,Petrol,5.0,Blue,Mumbai,470000
Toyota,Innova,MUV,Diesel,7,Silver,Bangalore,1500000
";

    fn load_sample() -> ReferenceData {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        ReferenceData::load(file.path()).unwrap()
    }

    #[test]
    fn loads_rows_and_distinct_domains() {
        let data = load_sample();
        assert_eq!(data.records().len(), 5);
        // first-seen order, no duplicates
        assert_eq!(data.brands(), ["Maruti", "Hyundai", "Toyota"]);
        assert_eq!(data.colors(), ["White", "Red", "Blue", "Silver"]);
        assert_eq!(data.cities(), ["Chennai", "Delhi", "Mumbai", "Bangalore"]);
        // seats sorted ascending, "5.0" parsed as 5
        assert_eq!(data.seats(), [5, 7]);
    }

    #[test]
    fn filter_matches_all_three_keys_exactly() {
        let data = load_sample();
        assert_eq!(
            data.models_for("Maruti", "Hatchback", "Petrol"),
            ["Swift"]
        );
        assert_eq!(data.models_for("Maruti", "SUV", "Diesel"), ["Brezza"]);
        // no record matches this combination
        assert!(data.models_for("Maruti", "Sedan", "Cng").is_empty());
        // case-sensitive match: lowercased brand finds nothing
        assert!(data.models_for("maruti", "Hatchback", "Petrol").is_empty());
    }

    #[test]
    fn filter_is_deterministic() {
        let data = load_sample();
        let first = data.models_for("Maruti", "Hatchback", "Petrol");
        let second = data.models_for("Maruti", "Hatchback", "Petrol");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let err = ReferenceData::load("/nonexistent/cars.csv").unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[test]
    fn missing_column_is_data_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"Brand,model,body type,Fuel type,Seats,Color\nMaruti,Swift,Hatchback,Petrol,5,White\n")
            .unwrap();
        let err = ReferenceData::load(file.path()).unwrap_err();
        match err {
            AppError::DataUnavailable(msg) => assert!(msg.contains("City")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_seats_value_is_data_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"Brand,model,body type,Fuel type,Seats,Color,City\nMaruti,Swift,Hatchback,Petrol,five,White,Chennai\n",
        )
        .unwrap();
        let err = ReferenceData::load(file.path()).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }
}
