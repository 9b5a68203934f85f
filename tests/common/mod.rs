#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};
use crashscan::{Config, EvaluationMode, FieldId, RecordRef, RecordStore, Row, ScalarValue};

pub fn date(year: i32, month: u32, day: u32) -> ScalarValue {
    ScalarValue::date(year, month, day).expect("valid date")
}

pub fn time(hour: u32, minute: u32) -> ScalarValue {
    ScalarValue::time(hour, minute).expect("valid time")
}

/// Three collisions: BROOKLYN/1, BROOKLYN/2, QUEENS/3
pub fn borough_store() -> RecordStore {
    RecordStore::ingest(vec![
        Row::new().with(FieldId::Borough, "BROOKLYN").with(FieldId::CollisionId, 1u64),
        Row::new().with(FieldId::Borough, "BROOKLYN").with(FieldId::CollisionId, 2u64),
        Row::new().with(FieldId::Borough, "QUEENS").with(FieldId::CollisionId, 3u64),
    ])
    .expect("valid rows")
}

/// Index 0 has no date, index 1 is 2021-09-11, index 2 is 2022-03-26
pub fn date_store() -> RecordStore {
    RecordStore::ingest(vec![
        Row::new().with(FieldId::CollisionId, 10u64),
        Row::new().with(FieldId::CollisionId, 11u64).set_date(2021, 9, 11).with(FieldId::CrashTime, time(8, 30)),
        Row::new().with(FieldId::CollisionId, 12u64).set_date(2022, 3, 26).with(FieldId::CrashTime, time(23, 5)),
    ])
    .expect("valid rows")
}

trait RowExt {
    fn set_date(self, year: i32, month: u32, day: u32) -> Row;
}

impl RowExt for Row {
    fn set_date(self, year: i32, month: u32, day: u32) -> Row {
        self.with(FieldId::CrashDate, date(year, month, day))
    }
}

const BOROUGHS: [&str; 5] = ["BROOKLYN", "QUEENS", "MANHATTAN", "BRONX", "STATEN ISLAND"];
const FACTORS: [&str; 4] = ["Driver Inattention/Distraction", "Unspecified", "Following Too Closely", "Unsafe Speed"];

/// Deterministic mixed store of `n` rows with regular gaps
pub fn mixed_store(n: usize) -> RecordStore {
    let rows = (0..n).map(|i| {
        let mut row = Row::new().with(FieldId::CollisionId, i as u64);
        if i % 7 != 0 {
            row = row.with(FieldId::Borough, BOROUGHS[i % BOROUGHS.len()]);
        }
        if i % 5 != 0 {
            row = row.with(FieldId::ZipCode, 11200u64 + (i % 13) as u64);
        }
        if i % 11 != 3 {
            row = row.with(FieldId::CrashDate, date(2020 + (i % 4) as i32, 1 + (i % 12) as u32, 1 + (i % 28) as u32));
        }
        if i % 3 != 1 {
            row = row.with(FieldId::CrashTime, time((i % 24) as u32, (i * 7 % 60) as u32));
        }
        if i % 4 != 2 {
            row = row.with(FieldId::Latitude, 40.5 + (i % 50) as f64 / 100.0);
        }
        row = row.with(FieldId::NumberOfPersonsInjured, (i % 4) as u64);
        if i % 2 == 0 {
            row = row.with(FieldId::ContributingFactorVehicle1, FACTORS[i % FACTORS.len()]);
        }
        row
    });
    RecordStore::ingest(rows).expect("valid rows")
}

pub fn ids(records: &[RecordRef<'_>]) -> Vec<u64> {
    records.iter().map(|r| r.collision_id().expect("collision id")).collect()
}

pub fn indices(records: &[RecordRef<'_>]) -> Vec<usize> {
    records.iter().map(|r| r.index()).collect()
}

pub fn config(workers: usize, evaluation: EvaluationMode) -> Config {
    Config::default()
        .with_worker_threads(workers)
        .with_evaluation(evaluation)
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return its formatted events
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buffer.0.lock().expect("log buffer")).into_owned();
    (out, text)
}
