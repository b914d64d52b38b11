#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use daybook::{
    daybook_core::{Clock, StaticRateTable},
    AppStore,
};
use daybook_storage_json::JsonStateStorage;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A clock the test moves by hand.
#[derive(Debug)]
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn at(date: NaiveDate, hour: u32) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(at(date, hour)),
        })
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().expect("clock lock") = instant;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(date: NaiveDate, hour: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(hour, 0, 0).expect("valid hour"))
}

/// A fresh directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// A JSON-backed store in its own directory, driven by `clock`.
pub fn setup_store(clock: Arc<TestClock>) -> (AppStore, PathBuf) {
    let dir = temp_dir();
    (open_store(&dir, clock), dir)
}

pub fn open_store(dir: &Path, clock: Arc<TestClock>) -> AppStore {
    let storage = JsonStateStorage::new(dir.to_path_buf()).expect("create json storage");
    AppStore::open(Box::new(storage), clock, Arc::new(StaticRateTable::new()))
}
