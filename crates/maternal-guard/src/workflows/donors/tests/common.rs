use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::donors::domain::{
    BloodGroup, DonorRecord, DonorRegistration, DonorTable, Eligibility, Gender,
};
use crate::workflows::donors::service::DonorRegistry;
use crate::workflows::donors::store::{DonorStore, StorageError};

/// In-memory store; `None` until the first append, like a missing file.
#[derive(Default)]
pub(super) struct MemoryStore {
    table: Mutex<Option<DonorTable>>,
}

impl MemoryStore {
    pub(super) fn seeded(records: Vec<DonorRecord>) -> Self {
        Self {
            table: Mutex::new(Some(DonorTable::from(records))),
        }
    }
}

impl DonorStore for MemoryStore {
    fn append(&self, record: &DonorRecord) -> Result<(), StorageError> {
        let mut guard = self.table.lock().expect("store mutex poisoned");
        guard.get_or_insert_with(DonorTable::new).push(record.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<DonorTable>, StorageError> {
        Ok(self.table.lock().expect("store mutex poisoned").clone())
    }
}

/// Store recording the thread each call runs on.
#[derive(Default)]
pub(super) struct ThreadTrackingStore {
    inner: MemoryStore,
    pub(super) threads: Mutex<Vec<std::thread::ThreadId>>,
}

impl ThreadTrackingStore {
    fn record_thread(&self) {
        self.threads
            .lock()
            .expect("thread log poisoned")
            .push(std::thread::current().id());
    }
}

impl DonorStore for ThreadTrackingStore {
    fn append(&self, record: &DonorRecord) -> Result<(), StorageError> {
        self.record_thread();
        self.inner.append(record)
    }

    fn load(&self) -> Result<Option<DonorTable>, StorageError> {
        self.record_thread();
        self.inner.load()
    }
}

/// Store whose backing file cannot be opened.
pub(super) struct UnwritableStore;

impl DonorStore for UnwritableStore {
    fn append(&self, _record: &DonorRecord) -> Result<(), StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "donors.csv is read-only",
        )))
    }

    fn load(&self) -> Result<Option<DonorTable>, StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "donors.csv is unreadable",
        )))
    }
}

pub(super) fn registration() -> DonorRegistration {
    DonorRegistration {
        donor_id: 1,
        age: 30,
        gender: Gender::Female,
        blood_group: BloodGroup::OPositive,
        city: "Pune".to_string(),
        eligible: Eligibility::Yes,
    }
}

pub(super) fn donor(
    donor_id: u64,
    blood_group: BloodGroup,
    city: &str,
    eligible: Eligibility,
) -> DonorRecord {
    DonorRecord {
        donor_id,
        age: 34,
        gender: Gender::Male,
        blood_group,
        city: city.to_string(),
        eligible,
    }
}

pub(super) fn build_registry() -> (DonorRegistry<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    (DonorRegistry::new(store.clone()), store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
