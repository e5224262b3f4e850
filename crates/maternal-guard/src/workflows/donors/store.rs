use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::domain::{BloodGroup, DonorRecord, DonorTable, Eligibility, Gender};

/// Header row of the donor storage file.
pub const DONOR_CSV_HEADER: [&str; 6] = ["Donor_ID", "Age", "Gender", "Blood_Group", "City", "Eligible"];

/// Append-only persistence for donor records.
pub trait DonorStore: Send + Sync {
    /// Append one record, creating the storage (with its header) on first use.
    fn append(&self, record: &DonorRecord) -> Result<(), StorageError>;

    /// Read the whole table; `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<DonorTable>, StorageError>;

    /// Read the whole table, treating absent storage as an empty table.
    fn load_all(&self) -> Result<DonorTable, StorageError> {
        Ok(self.load()?.unwrap_or_default())
    }
}

impl<S: DonorStore + ?Sized> DonorStore for Arc<S> {
    fn append(&self, record: &DonorRecord) -> Result<(), StorageError> {
        (**self).append(record)
    }

    fn load(&self) -> Result<Option<DonorTable>, StorageError> {
        (**self).load()
    }
}

/// Donor storage failures; terminal for the current request.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("donor storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("donor storage holds invalid data: {0}")]
    Csv(#[from] csv::Error),
}

/// Flat-file donor table with a `Donor_ID,Age,Gender,Blood_Group,City,Eligible` header.
///
/// Appends never rewrite existing rows. Writers within this process are serialised;
/// separate processes writing the same file are not coordinated.
#[derive(Debug)]
pub struct CsvDonorStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvDonorStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DonorStore for CsvDonorStore {
    fn append(&self, record: &DonorRecord) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer.write_record(DONOR_CSV_HEADER)?;
        }
        writer.serialize(DonorRow::from(record))?;
        writer.flush()?;
        Ok(())
    }

    fn load(&self) -> Result<Option<DonorTable>, StorageError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        parse_table(file).map(Some)
    }
}

/// Parse a donor table; city values are kept exactly as stored.
pub fn parse_table<R: Read>(reader: R) -> Result<DonorTable, StorageError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut table = DonorTable::new();
    for row in csv_reader.deserialize::<DonorRow>() {
        table.push(row?.into());
    }
    Ok(table)
}

#[derive(Debug, Serialize, Deserialize)]
struct DonorRow {
    #[serde(rename = "Donor_ID")]
    donor_id: u64,
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Gender")]
    gender: Gender,
    #[serde(rename = "Blood_Group")]
    blood_group: BloodGroup,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "Eligible")]
    eligible: Eligibility,
}

impl From<&DonorRecord> for DonorRow {
    fn from(record: &DonorRecord) -> Self {
        Self {
            donor_id: record.donor_id,
            age: record.age,
            gender: record.gender,
            blood_group: record.blood_group,
            city: record.city.clone(),
            eligible: record.eligible,
        }
    }
}

impl From<DonorRow> for DonorRecord {
    fn from(row: DonorRow) -> Self {
        Self {
            donor_id: row.donor_id,
            age: row.age,
            gender: row.gender,
            blood_group: row.blood_group,
            city: row.city,
            eligible: row.eligible,
        }
    }
}
