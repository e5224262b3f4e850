use serde::{Deserialize, Serialize};

/// Inclusive bounds accepted by the intake form, one per vital.
pub const AGE_RANGE: (i64, i64) = (15, 50);
pub const SYSTOLIC_BP_RANGE: (i64, i64) = (80, 200);
pub const DIASTOLIC_BP_RANGE: (i64, i64) = (50, 130);
pub const HEART_RATE_RANGE: (i64, i64) = (40, 180);
pub const OXYGEN_LEVEL_RANGE: (i64, i64) = (70, 100);
pub const TEMPERATURE_RANGE: (f64, f64) = (35.0, 42.0);

/// Raw vitals as captured from a form or request body, before bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalsInput {
    pub age: i64,
    pub systolic_bp: i64,
    pub diastolic_bp: i64,
    pub heart_rate: i64,
    pub oxygen_level: i64,
    pub temperature: f64,
}

impl VitalsInput {
    pub fn validate(self) -> Result<VitalsSample, ValidationError> {
        VitalsSample::new(
            self.age,
            self.systolic_bp,
            self.diastolic_bp,
            self.heart_rate,
            self.oxygen_level,
            self.temperature,
        )
    }
}

/// A bounds-checked set of vitals, ready for classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VitalsSample {
    age: u8,
    systolic_bp: u16,
    diastolic_bp: u16,
    heart_rate: u16,
    oxygen_level: u8,
    temperature: f64,
}

impl VitalsSample {
    pub fn new(
        age: i64,
        systolic_bp: i64,
        diastolic_bp: i64,
        heart_rate: i64,
        oxygen_level: i64,
        temperature: f64,
    ) -> Result<Self, ValidationError> {
        let age = within(VitalField::Age, age, AGE_RANGE)?;
        let systolic_bp = within(VitalField::SystolicBp, systolic_bp, SYSTOLIC_BP_RANGE)?;
        let diastolic_bp = within(VitalField::DiastolicBp, diastolic_bp, DIASTOLIC_BP_RANGE)?;
        let heart_rate = within(VitalField::HeartRate, heart_rate, HEART_RATE_RANGE)?;
        let oxygen_level = within(VitalField::OxygenLevel, oxygen_level, OXYGEN_LEVEL_RANGE)?;

        let (min, max) = TEMPERATURE_RANGE;
        if !temperature.is_finite() || temperature < min || temperature > max {
            return Err(ValidationError::OutOfRange {
                field: VitalField::Temperature,
                value: temperature,
                min,
                max,
            });
        }

        Ok(Self {
            age: age as u8,
            systolic_bp: systolic_bp as u16,
            diastolic_bp: diastolic_bp as u16,
            heart_rate: heart_rate as u16,
            oxygen_level: oxygen_level as u8,
            temperature,
        })
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn systolic_bp(&self) -> u16 {
        self.systolic_bp
    }

    pub fn diastolic_bp(&self) -> u16 {
        self.diastolic_bp
    }

    pub fn heart_rate(&self) -> u16 {
        self.heart_rate
    }

    pub fn oxygen_level(&self) -> u8 {
        self.oxygen_level
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Model input in the fixed order: age, systolic, diastolic, heart rate, oxygen, temperature.
    pub fn features(&self) -> [f64; 6] {
        [
            f64::from(self.age),
            f64::from(self.systolic_bp),
            f64::from(self.diastolic_bp),
            f64::from(self.heart_rate),
            f64::from(self.oxygen_level),
            self.temperature,
        ]
    }
}

fn within(field: VitalField, value: i64, (min, max): (i64, i64)) -> Result<i64, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VitalField {
    Age,
    SystolicBp,
    DiastolicBp,
    HeartRate,
    OxygenLevel,
    Temperature,
}

impl VitalField {
    pub const fn label(self) -> &'static str {
        match self {
            VitalField::Age => "age",
            VitalField::SystolicBp => "systolic_bp",
            VitalField::DiastolicBp => "diastolic_bp",
            VitalField::HeartRate => "heart_rate",
            VitalField::OxygenLevel => "oxygen_level",
            VitalField::Temperature => "temperature",
        }
    }
}

/// Raised when a vital falls outside its documented inclusive range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} must be between {min} and {max} (got {value})", .field.label())]
    OutOfRange {
        field: VitalField,
        value: f64,
        min: f64,
        max: f64,
    },
}
