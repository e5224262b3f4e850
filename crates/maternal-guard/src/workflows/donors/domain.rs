use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inclusive donor age bounds accepted at registration.
pub const DONOR_AGE_RANGE: (i64, i64) = (18, 65);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// ABO/Rh blood group; serialized with its clinical spelling (`"AB-"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

/// Whether the donor may currently donate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Eligibility {
    Yes,
    No,
}

impl Eligibility {
    pub const fn label(self) -> &'static str {
        match self {
            Eligibility::Yes => "Yes",
            Eligibility::No => "No",
        }
    }

    pub const fn is_eligible(self) -> bool {
        matches!(self, Eligibility::Yes)
    }
}

macro_rules! labelled_enum {
    ($ty:ty, $kind:literal, $variants:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnrecognizedValue;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $variants
                    .into_iter()
                    .find(|candidate| candidate.label() == value)
                    .ok_or_else(|| UnrecognizedValue {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }
    };
}

labelled_enum!(Gender, "gender", [Gender::Male, Gender::Female]);
labelled_enum!(Eligibility, "eligibility", [Eligibility::Yes, Eligibility::No]);
labelled_enum!(BloodGroup, "blood group", BloodGroup::ALL);

/// A closed-enumeration field received a value outside its set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} '{value}'")]
pub struct UnrecognizedValue {
    pub kind: &'static str,
    pub value: String,
}

/// Donor registration form as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorRegistration {
    pub donor_id: i64,
    pub age: i64,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub city: String,
    pub eligible: Eligibility,
}

impl DonorRegistration {
    /// Coerce the form into a record. `donor_id` uniqueness is not checked.
    pub fn into_record(self) -> Result<DonorRecord, DonorValidationError> {
        let donor_id = u64::try_from(self.donor_id)
            .ok()
            .filter(|id| *id >= 1)
            .ok_or(DonorValidationError::InvalidDonorId(self.donor_id))?;

        let (min, max) = DONOR_AGE_RANGE;
        if !(min..=max).contains(&self.age) {
            return Err(DonorValidationError::AgeOutOfRange {
                age: self.age,
                min,
                max,
            });
        }

        Ok(DonorRecord {
            donor_id,
            age: self.age as u8,
            gender: self.gender,
            blood_group: self.blood_group,
            city: self.city,
            eligible: self.eligible,
        })
    }
}

/// One registered donor, as persisted in the donor table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorRecord {
    pub donor_id: u64,
    pub age: u8,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub city: String,
    pub eligible: Eligibility,
}

/// Registration values rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DonorValidationError {
    #[error("donor id must be a positive integer (got {0})")]
    InvalidDonorId(i64),
    #[error("donor age must be between {min} and {max} (got {age})")]
    AgeOutOfRange { age: i64, min: i64, max: i64 },
}

/// Donor records in registration order. Duplicate ids are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DonorTable {
    records: Vec<DonorRecord>,
}

impl DonorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[DonorRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DonorRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&DonorRecord> {
        self.records.last()
    }

    pub fn push(&mut self, record: DonorRecord) {
        self.records.push(record);
    }

    pub fn into_records(self) -> Vec<DonorRecord> {
        self.records
    }
}

impl From<Vec<DonorRecord>> for DonorTable {
    fn from(records: Vec<DonorRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<DonorRecord> for DonorTable {
    fn from_iter<I: IntoIterator<Item = DonorRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DonorTable {
    type Item = &'a DonorRecord;
    type IntoIter = std::slice::Iter<'a, DonorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
