use std::ops::RangeInclusive;

use crate::error::{HeartRiskError, Result};
use crate::records::HeartRecord;

/// Raw user-supplied fields; `None` means the field was left unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientInput {
    pub age: Option<f64>,
    pub sex: Option<f64>,
    pub cp: Option<f64>,
    pub trestbps: Option<f64>,
    pub chol: Option<f64>,
    pub fbs: Option<f64>,
    pub restecg: Option<f64>,
    pub thalach: Option<f64>,
    pub exang: Option<f64>,
    pub oldpeak: Option<f64>,
    pub slope: Option<f64>,
    pub ca: Option<f64>,
    pub thal: Option<f64>,
}

#[derive(Clone, Copy)]
enum Kind {
    Decimal,
    Whole,
}

fn check(
    field: &'static str,
    value: Option<f64>,
    range: RangeInclusive<f64>,
    kind: Kind,
) -> Result<f64> {
    let value = value.ok_or_else(|| HeartRiskError::InvalidField {
        field,
        reason: "value is required".to_string(),
    })?;
    if !value.is_finite() || !range.contains(&value) {
        return Err(HeartRiskError::InvalidField {
            field,
            reason: format!(
                "{value} is outside {}..={}",
                range.start(),
                range.end()
            ),
        });
    }
    if let Kind::Whole = kind {
        if value.fract() != 0.0 {
            return Err(HeartRiskError::InvalidField {
                field,
                reason: format!("{value} must be a whole number"),
            });
        }
    }
    Ok(value)
}

impl PatientInput {
    /// Check every field against its accepted domain. Zero is a valid code
    /// for all categorical fields.
    pub fn validate(&self) -> Result<HeartRecord> {
        use Kind::*;

        Ok(HeartRecord {
            age: check("age", self.age, 0.0..=120.0, Whole)?,
            sex: check("sex", self.sex, 0.0..=1.0, Whole)?,
            cp: check("cp", self.cp, 0.0..=3.0, Whole)?,
            trestbps: check("trestbps", self.trestbps, 50.0..=200.0, Whole)?,
            chol: check("chol", self.chol, 100.0..=600.0, Whole)?,
            fbs: check("fbs", self.fbs, 0.0..=1.0, Whole)?,
            restecg: check("restecg", self.restecg, 0.0..=2.0, Whole)?,
            thalach: check("thalach", self.thalach, 50.0..=220.0, Whole)?,
            exang: check("exang", self.exang, 0.0..=1.0, Whole)?,
            oldpeak: check("oldpeak", self.oldpeak, 0.0..=10.0, Decimal)?,
            slope: check("slope", self.slope, 0.0..=2.0, Whole)?,
            ca: check("ca", self.ca, 0.0..=4.0, Whole)?,
            thal: check("thal", self.thal, 0.0..=3.0, Whole)?,
        })
    }
}
