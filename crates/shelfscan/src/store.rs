//! The session scoped, append-only record store.

use log::trace;

use crate::record::BookRecord;

/// The confirmed records of the current session, in the order they were saved.
///
/// Records can only be appended; once in the store a record is only ever handed out by shared
/// reference.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<BookRecord>,
}

impl RecordStore {
    /// An empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends `record` and returns a reference to the stored copy.
    pub fn append(&mut self, record: BookRecord) -> &BookRecord {
        trace!("Appending record for ISBN '{}'", record.isbn);
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Every record in insertion order.
    #[must_use]
    pub fn all(&self) -> &[BookRecord] {
        &self.records
    }

    /// The number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing has been saved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
