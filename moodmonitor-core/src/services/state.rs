//! State repository - loads and saves the app state under fixed keys
//!
//! Decoding is forgiving: a key that fails to decode falls back to its fresh
//! value and is reported in the load warnings, it never blocks start-up.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::Value as JsonValue;

use crate::domain::{
    AchievementCatalogue, DailyRecord, DailyRecordStore, MoodState, ReminderSettings,
    ReminderWindow, RollingCounters, TipDeck,
};
use crate::ports::KeyValueStore;

pub const KEY_USER_DATA: &str = "userDataDictionary";
pub const KEY_ENCOURAGEMENTS: &str = "encouragements";
pub const KEY_TOTAL_MOODS: &str = "totalMoodsLogged";
pub const KEY_TIPS: &str = "tipsList";
pub const KEY_HAS_LAUNCHED: &str = "hasAlreadyLaunched";

/// What was restored and what had to fall back
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records_loaded: usize,
    pub warnings: Vec<String>,
}

pub struct StateRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl StateRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &str {
        self.kv.name()
    }

    /// Restore everything. Only a failing backend is an error.
    pub fn load(&self) -> Result<(MoodState, LoadReport)> {
        let mut report = LoadReport::default();

        let store = match self.kv.get(KEY_USER_DATA)? {
            Some(value) => decode_store(&value, &mut report),
            None => DailyRecordStore::new(),
        };
        report.records_loaded = store.len();

        let achievements = match self.kv.get(KEY_ENCOURAGEMENTS)? {
            Some(value) => {
                let (catalogue, skipped) = AchievementCatalogue::from_persisted(&value);
                for key in skipped {
                    report
                        .warnings
                        .push(format!("{}: dropped entry '{}'", KEY_ENCOURAGEMENTS, key));
                }
                catalogue
            }
            None => AchievementCatalogue::new(),
        };

        let total = self.decode_or(KEY_TOTAL_MOODS, 0u64, &mut report)?;
        let tips: Vec<String> = self.decode_or(KEY_TIPS, Vec::new(), &mut report)?;
        let has_already_launched = self.decode_or(KEY_HAS_LAUNCHED, false, &mut report)?;

        let mut reminders = ReminderSettings::default();
        for window in ReminderWindow::ALL {
            let enabled = self.decode_or(&window.switch_key(), false, &mut report)?;
            reminders.set(window, enabled);
        }

        let state = MoodState {
            store,
            achievements,
            counters: RollingCounters::with_total(total),
            tips: TipDeck::from_remaining(tips),
            reminders,
            has_already_launched,
        };

        Ok((state, report))
    }

    /// Write every key
    pub fn save(&self, state: &MoodState) -> Result<()> {
        self.kv.set(KEY_USER_DATA, &encode_store(&state.store)?)?;
        self.kv
            .set(KEY_ENCOURAGEMENTS, &state.achievements.to_persisted())?;
        self.kv.set(
            KEY_TOTAL_MOODS,
            &JsonValue::from(state.counters.total_moods_logged),
        )?;
        self.kv.set(KEY_TIPS, &serde_json::to_value(&state.tips)?)?;
        self.kv
            .set(KEY_HAS_LAUNCHED, &JsonValue::Bool(state.has_already_launched))?;
        for window in ReminderWindow::ALL {
            self.kv.set(
                &window.switch_key(),
                &JsonValue::Bool(state.reminders.is_enabled(window)),
            )?;
        }
        Ok(())
    }

    fn decode_or<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
        fallback: T,
        report: &mut LoadReport,
    ) -> Result<T> {
        let Some(value) = self.kv.get(key)? else {
            return Ok(fallback);
        };
        match serde_json::from_value(value) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                report.warnings.push(format!("{}: {}", key, e));
                Ok(fallback)
            }
        }
    }
}

/// Records are stored as an object keyed by `yyyy-MM-dd`
fn encode_store(store: &DailyRecordStore) -> Result<JsonValue> {
    let mut object = serde_json::Map::new();
    for record in store.records() {
        object.insert(
            record.date.format("%Y-%m-%d").to_string(),
            serde_json::to_value(record)?,
        );
    }
    Ok(JsonValue::Object(object))
}

fn decode_store(value: &JsonValue, report: &mut LoadReport) -> DailyRecordStore {
    let Some(object) = value.as_object() else {
        report
            .warnings
            .push(format!("{}: not an object, starting empty", KEY_USER_DATA));
        return DailyRecordStore::new();
    };

    let mut records = Vec::with_capacity(object.len());
    for (key, raw) in object {
        let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") else {
            report
                .warnings
                .push(format!("{}: bad date key '{}'", KEY_USER_DATA, key));
            continue;
        };

        // The key is authoritative; older payloads may omit the inner date
        let mut raw = raw.clone();
        if let Some(fields) = raw.as_object_mut() {
            fields.insert("date".to_string(), JsonValue::String(key.clone()));
        }

        match serde_json::from_value::<DailyRecord>(raw) {
            Ok(mut record) => {
                record.date = date;
                records.push(record);
            }
            Err(e) => report
                .warnings
                .push(format!("{}: record {} skipped: {}", KEY_USER_DATA, key, e)),
        }
    }

    DailyRecordStore::from_records(records)
}
