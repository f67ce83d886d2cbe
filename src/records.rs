use lazy_static::lazy_static;
use polars::prelude::{DataType, Field, Schema};
use serde::{Deserialize, Serialize};

/// Feature columns, in the order every fitted artifact expects them.
pub const FEATURES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

pub const TARGET: &str = "target";

lazy_static! {
    static ref RAW_SCHEMA: Schema = {
        let mut fields: Vec<Field> = FEATURES
            .iter()
            .map(|name| Field::new(name, DataType::Float64))
            .collect();
        fields.push(Field::new(TARGET, DataType::Int32));
        Schema::from_iter(fields)
    };
}

/// One patient's clinical measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeartRecord {
    pub age: f64,
    pub sex: f64,
    pub cp: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl HeartRecord {
    pub fn raw_schema() -> Schema {
        RAW_SCHEMA.clone()
    }

    /// Values in `FEATURES` order.
    pub fn to_vector(&self) -> Vec<f64> {
        vec![
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_features_then_target() {
        let schema = HeartRecord::raw_schema();
        assert_eq!(schema.len(), 14);
        assert_eq!(schema.get(TARGET), Some(&DataType::Int32));
        for name in FEATURES {
            assert_eq!(schema.get(name), Some(&DataType::Float64));
        }
    }

    #[test]
    fn test_vector_follows_feature_order() {
        let record = HeartRecord {
            age: 1.0,
            sex: 2.0,
            cp: 3.0,
            trestbps: 4.0,
            chol: 5.0,
            fbs: 6.0,
            restecg: 7.0,
            thalach: 8.0,
            exang: 9.0,
            oldpeak: 10.0,
            slope: 11.0,
            ca: 12.0,
            thal: 13.0,
        };
        let expected: Vec<f64> = (1..=13).map(f64::from).collect();
        assert_eq!(record.to_vector(), expected);
    }
}
