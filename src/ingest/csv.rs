use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;
use chrono::{NaiveDate, NaiveTime};
use csv::{ByteRecord, ReaderBuilder};
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{info, warn};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::types::{ScalarKind, ScalarValue};
use crate::mmap::mmap_file::MmapFile;
use crate::schema::schema::{FieldId, FIELD_COUNT};
use crate::storage::record_store::{RecordStore, RecordStoreBuilder, Row};

fn reader_builder(has_headers: bool) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(has_headers).flexible(true);
    builder
}

fn cell_text(cell: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(cell)
}

/// Split one CSV record into cells. Quoted cells may hold commas, escaped
/// `""` quotes and line breaks; the enclosing quotes are dropped.
pub fn split_line(line: &str) -> Vec<String> {
    let mut reader = reader_builder(false).from_reader(line.as_bytes());
    let mut record = ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => record.iter().map(|cell| cell_text(cell).into_owned()).collect(),
        _ => vec![String::new()],
    }
}

/// `M/D/YYYY`
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let mut parts = cell.splitn(3, '/');
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;
    let year: i32 = parts.next()?.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `H:MM`
fn parse_time(cell: &str) -> Option<NaiveTime> {
    let (hour, minute) = cell.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Convert one cell to the field's kind. Blank cells are absent; cells
/// that do not parse are absent too, with a warning.
pub fn convert_cell(field: FieldId, cell: &str) -> Option<ScalarValue> {
    let text = cell.trim();
    if text.is_empty() {
        return None;
    }

    let value = match field.kind() {
        ScalarKind::Text => Some(ScalarValue::Text(cell.to_string())),
        ScalarKind::Unsigned => text.parse::<u64>().ok().map(ScalarValue::Unsigned),
        ScalarKind::Numeric => text.parse::<f64>().ok().map(ScalarValue::Numeric),
        ScalarKind::Date => parse_date(text).map(ScalarValue::Date),
        ScalarKind::Time => parse_time(text).map(ScalarValue::Time),
    };

    if value.is_none() {
        warn!(field = field.name(), cell = text, "unparseable cell stored as absent");
    }
    value
}

/// Convert one parsed record into a row. Missing trailing cells are absent
/// and extra cells are ignored.
fn record_to_row(record: &ByteRecord) -> Row {
    if record.len() < FIELD_COUNT {
        warn!(cells = record.len(), expected = FIELD_COUNT, "short csv record");
    }

    let mut row = Row::new();
    for (field, cell) in FieldId::ALL.into_iter().zip(record.iter()) {
        row.set(field, convert_cell(field, &cell_text(cell)));
    }
    row
}

/// Parse one data record (without a header) into a row
pub fn parse_line(line: &str) -> Row {
    let mut reader = reader_builder(false).from_reader(line.as_bytes());
    let mut record = ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => record_to_row(&record),
        _ => {
            warn!("empty csv record");
            Row::new()
        }
    }
}

/// Cut the records into batches of roughly `target` bytes each
fn record_batches(data: &[u8], target: usize) -> Result<Vec<Vec<ByteRecord>>> {
    let mut reader = reader_builder(true).from_reader(data);
    let mut batches = Vec::new();
    let mut batch = Vec::new();
    let mut batch_bytes = 0;

    for record in reader.byte_records() {
        let record = record?;
        batch_bytes += record.as_slice().len() + record.len();
        batch.push(record);
        if batch_bytes >= target {
            batches.push(std::mem::take(&mut batch));
            batch_bytes = 0;
        }
    }
    if !batch.is_empty() {
        batches.push(batch);
    }
    Ok(batches)
}

fn convert_batch(batch: &[ByteRecord]) -> Result<RecordStoreBuilder> {
    let mut builder = RecordStoreBuilder::new();
    for record in batch {
        builder.push_row(record_to_row(record))?;
    }
    Ok(builder)
}

/// Loads the collision CSV export (header line first) into a record store
pub struct CsvLoader {
    chunk_bytes: usize,
    pool: ThreadPool,
}

impl CsvLoader {
    pub fn new(config: &Config) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads.max(1))
            .thread_name(|i| format!("crashscan-csv-{}", i))
            .build()?;

        Ok(CsvLoader {
            chunk_bytes: config.csv_chunk_bytes.max(1),
            pool,
        })
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RecordStore> {
        let start = Instant::now();
        let file = MmapFile::open_read_only(&path)?;
        let store = self.load_bytes(file.data())?;

        info!(
            path = %path.as_ref().display(),
            bytes = file.len,
            records = store.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "csv loaded"
        );
        Ok(store)
    }

    /// Parse CSV text already in memory. Records are framed by one
    /// sequential reader, then converted to typed rows in parallel batches
    /// and merged in file order.
    pub fn load_bytes(&self, data: &[u8]) -> Result<RecordStore> {
        let batches = record_batches(data, self.chunk_bytes)?;
        let builders: Vec<RecordStoreBuilder> = self.pool.install(|| {
            batches
                .par_iter()
                .map(|batch| convert_batch(batch))
                .collect::<Result<Vec<_>>>()
        })?;

        let mut merged = RecordStoreBuilder::new();
        for builder in builders {
            merged.merge(builder);
        }
        Ok(merged.finish())
    }
}
