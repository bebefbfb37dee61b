//! Rolling window of daily records keyed by calendar date

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use super::record::{day_label, DailyRecord, RecordField};

/// Most records the store will hold
pub const WINDOW_LIMIT: usize = 30;

/// Smallest window `ensure_defaults` fills
pub const MIN_WINDOW_DAYS: usize = 7;

/// The rolling window of [`DailyRecord`]s.
///
/// Eviction is by date: once the window grows past [`WINDOW_LIMIT`] the
/// oldest-dated records are dropped, whatever order they were written in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyRecordStore {
    records: BTreeMap<NaiveDate, DailyRecord>,
}

impl DailyRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already decoded records, re-keying each one by its date
    pub fn from_records(records: impl IntoIterator<Item = DailyRecord>) -> Self {
        let mut store = Self::new();
        for mut record in records {
            record.day_label = day_label(record.date);
            store.records.insert(record.date, record);
        }
        store.trim();
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Guarantee a record exists for each of the `n` days ending at `reference`.
    ///
    /// `n` is the current record count, at least [`MIN_WINDOW_DAYS`] and at
    /// most [`WINDOW_LIMIT`]. Existing values are never reset.
    pub fn ensure_defaults(&mut self, reference: NaiveDate) {
        let days = self.records.len().max(MIN_WINDOW_DAYS).min(WINDOW_LIMIT);

        for offset in 0..days {
            let date = reference - Duration::days(offset as i64);
            self.records
                .entry(date)
                .or_insert_with(|| DailyRecord::new(date));
        }

        for (date, record) in self.records.iter_mut() {
            record.day_label = day_label(*date);
        }

        self.trim();
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    /// Write one field on the record for `date`, creating it if absent.
    ///
    /// Returns `true` when the record had to be created.
    pub fn upsert(&mut self, date: NaiveDate, field: RecordField) -> bool {
        self.update(date, |record| record.apply(field))
    }

    /// Mutate the record for `date` in place, creating it if absent.
    ///
    /// Returns `true` when the record had to be created.
    pub fn update<F>(&mut self, date: NaiveDate, f: F) -> bool
    where
        F: FnOnce(&mut DailyRecord),
    {
        let created = !self.records.contains_key(&date);
        let record = self
            .records
            .entry(date)
            .or_insert_with(|| DailyRecord::new(date));
        f(record);
        self.trim();
        created
    }

    /// Records ordered newest date first. The iterator can be cloned to restart it.
    pub fn sorted_descending(
        &self,
    ) -> impl Iterator<Item = (&NaiveDate, &DailyRecord)> + Clone + '_ {
        self.records.iter().rev()
    }

    /// Records whose date falls in `[from, to]`, oldest first
    pub fn range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = &DailyRecord> + '_ {
        self.records.range(from..=to).map(|(_, record)| record)
    }

    pub fn records(&self) -> impl Iterator<Item = &DailyRecord> + '_ {
        self.records.values()
    }

    /// Drop the oldest-dated records until the window fits
    fn trim(&mut self) {
        while self.records.len() > WINDOW_LIMIT {
            self.records.pop_first();
        }
    }
}
