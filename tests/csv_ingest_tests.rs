mod common;

use std::io::Write;
use common::{config, date, time};
use crashscan::ingest::csv::{convert_cell, parse_line, split_line, CsvLoader};
use crashscan::schema::schema::fields;
use crashscan::{
    CollisionDatabase, Config, ErrorKind, EvaluationMode, FieldId, Predicate, Query, ScalarValue,
};
use tempfile::NamedTempFile;

fn header() -> String {
    fields().iter().map(|d| d.name.to_uppercase()).collect::<Vec<_>>().join(",")
}

/// One data line with the given cells set and every other cell blank
fn line(cells: &[(FieldId, &str)]) -> String {
    let mut out = vec![String::new(); FieldId::ALL.len()];
    for (field, cell) in cells {
        out[field.position()] = cell.to_string();
    }
    out.join(",")
}

fn sample_line(i: usize) -> String {
    let boroughs = ["BROOKLYN", "QUEENS", "", "BRONX"];
    line(&[
        (FieldId::CrashDate, &format!("{}/{}/2021", 1 + i % 12, 1 + i % 28)),
        (FieldId::CrashTime, &format!("{}:{:02}", i % 24, i % 60)),
        (FieldId::Borough, boroughs[i % boroughs.len()]),
        (FieldId::ZipCode, &(11200 + i % 9).to_string()),
        (FieldId::Latitude, "40.6"),
        (FieldId::Location, "\"(40.6, -73.9)\""),
        (FieldId::NumberOfPersonsInjured, &(i % 3).to_string()),
        (FieldId::CollisionId, &(4_000_000 + i).to_string()),
        (FieldId::VehicleTypeCode5, if i % 2 == 0 { "Sedan" } else { "" }),
    ])
}

fn write_csv(lines: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", header()).unwrap();
    for i in 0..lines {
        writeln!(file, "{}", sample_line(i)).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn split_line_respects_quotes() {
    let cells = split_line("a,\"(40.6, -73.9)\",,c\r");
    assert_eq!(cells, vec!["a", "(40.6, -73.9)", "", "c"]);

    assert_eq!(split_line(""), vec![""]);
    assert_eq!(split_line("x,"), vec!["x", ""]);
}

#[test]
fn cells_convert_to_field_kinds() {
    assert_eq!(convert_cell(FieldId::CrashDate, "09/11/2021"), Some(date(2021, 9, 11)));
    assert_eq!(convert_cell(FieldId::CrashDate, "3/26/2022"), Some(date(2022, 3, 26)));
    assert_eq!(convert_cell(FieldId::CrashTime, "2:39"), Some(time(2, 39)));
    assert_eq!(convert_cell(FieldId::CrashTime, "23:05"), Some(time(23, 5)));
    assert_eq!(convert_cell(FieldId::ZipCode, "11208"), Some(ScalarValue::Unsigned(11208)));
    assert_eq!(convert_cell(FieldId::Latitude, "40.667202"), Some(ScalarValue::Numeric(40.667202)));
    assert_eq!(convert_cell(FieldId::Borough, "BROOKLYN"), Some(ScalarValue::from("BROOKLYN")));
    assert_eq!(convert_cell(FieldId::Borough, "   "), None);
    assert_eq!(convert_cell(FieldId::ZipCode, ""), None);
}

#[test]
fn unparseable_cells_are_absent() {
    assert_eq!(convert_cell(FieldId::ZipCode, "N/A"), None);
    assert_eq!(convert_cell(FieldId::ZipCode, "-5"), None);
    assert_eq!(convert_cell(FieldId::Latitude, "north"), None);
    assert_eq!(convert_cell(FieldId::CrashDate, "13/40/2021"), None);
    assert_eq!(convert_cell(FieldId::CrashDate, "2021-09-11"), None);
    assert_eq!(convert_cell(FieldId::CrashTime, "25:00"), None);
    assert_eq!(convert_cell(FieldId::CrashTime, "noon"), None);

    let row = parse_line(&line(&[(FieldId::ZipCode, "ABC"), (FieldId::Borough, "QUEENS")]));
    assert_eq!(row.get(FieldId::ZipCode), None);
    assert_eq!(row.get(FieldId::Borough), Some(&ScalarValue::from("QUEENS")));
}

#[test]
fn parse_line_reads_every_column() {
    let row = parse_line(&sample_line(2));
    assert_eq!(row.get(FieldId::CrashDate), Some(&date(2021, 3, 3)));
    assert_eq!(row.get(FieldId::CrashTime), Some(&time(2, 2)));
    assert_eq!(row.get(FieldId::Borough), None);
    assert_eq!(row.get(FieldId::Location), Some(&ScalarValue::from("(40.6, -73.9)")));
    assert_eq!(row.get(FieldId::CollisionId), Some(&ScalarValue::Unsigned(4_000_002)));
    assert_eq!(row.get(FieldId::VehicleTypeCode5), Some(&ScalarValue::from("Sedan")));
    assert_eq!(row.get(FieldId::Longitude), None);
}

#[test]
fn short_lines_fill_absent() {
    let row = parse_line("1/2/2021,3:04,BRONX");
    assert_eq!(row.get(FieldId::CrashDate), Some(&date(2021, 1, 2)));
    assert_eq!(row.get(FieldId::CrashTime), Some(&time(3, 4)));
    assert_eq!(row.get(FieldId::Borough), Some(&ScalarValue::from("BRONX")));
    assert_eq!(row.values().count(), 3);
}

#[test]
fn chunked_load_matches_single_chunk() {
    let file = write_csv(250);

    let single = CsvLoader::new(&Config::default()).unwrap().load(file.path()).unwrap();
    let mut small = config(4, EvaluationMode::Mask);
    small.csv_chunk_bytes = 97;
    let chunked = CsvLoader::new(&small).unwrap().load(file.path()).unwrap();

    assert_eq!(single.len(), 250);
    assert_eq!(chunked.len(), 250);
    for (a, b) in single.records().zip(chunked.records()) {
        assert_eq!(a.to_row(), b.to_row());
    }
    for (i, record) in chunked.records().enumerate() {
        assert_eq!(record.collision_id(), Some(4_000_000 + i as u64));
    }
}

#[test]
fn load_bytes_handles_header_only_and_blank_lines() {
    let loader = CsvLoader::new(&Config::default()).unwrap();

    assert!(loader.load_bytes(b"").unwrap().is_empty());
    assert!(loader.load_bytes(header().as_bytes()).unwrap().is_empty());

    let text = format!("{}\r\n{}\r\n\r\n{}\r\n", header(), sample_line(0), sample_line(1));
    let store = loader.load_bytes(text.as_bytes()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.record(1).unwrap().borough(), Some("QUEENS"));
}

#[test]
fn open_csv_builds_a_queryable_database() {
    let file = write_csv(40);
    let db = CollisionDatabase::open_csv(file.path(), config(2, EvaluationMode::Mask)).unwrap();
    assert_eq!(db.len(), 40);

    let query = Query::create(Predicate::equals("borough", "BRONX").unwrap());
    let hits: Vec<u64> = db.search(&query).iter().filter_map(|r| r.collision_id()).collect();
    let expected: Vec<u64> = (0..40).filter(|i| i % 4 == 3).map(|i| 4_000_000 + i).collect();
    assert_eq!(hits, expected);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");

    let err = CsvLoader::new(&Config::default()).unwrap().load(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    let err = CollisionDatabase::open_csv(&path, Config::default()).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn empty_file_loads_nothing() {
    let file = NamedTempFile::new().unwrap();
    let store = CsvLoader::new(&Config::default()).unwrap().load(file.path()).unwrap();
    assert!(store.is_empty());
}

#[test]
fn escaped_quotes_stay_in_the_cell() {
    assert_eq!(split_line(r#"a,"He said ""hi""",c"#), vec!["a", "He said \"hi\"", "c"]);

    let row = parse_line(&line(&[(FieldId::OnStreetName, r#""O""BRIEN AVE""#), (FieldId::CollisionId, "7")]));
    assert_eq!(row.get(FieldId::OnStreetName), Some(&ScalarValue::from("O\"BRIEN AVE")));
    assert_eq!(row.get(FieldId::CollisionId), Some(&ScalarValue::Unsigned(7)));
}

#[test]
fn quoted_line_breaks_stay_in_one_record() {
    let loader = CsvLoader::new(&Config::default()).unwrap();
    let record = line(&[(FieldId::OnStreetName, "\"MAIN\nST\""), (FieldId::CollisionId, "42")]);
    let text = format!("{}\n{}\n", header(), record);

    let store = loader.load_bytes(text.as_bytes()).unwrap();
    assert_eq!(store.len(), 1);
    let collision = store.record(0).unwrap();
    assert_eq!(collision.collision_id(), Some(42));
    assert_eq!(collision.field("on_street_name").unwrap().and_then(|v| v.as_text()), Some("MAIN\nST"));
}

#[test]
fn multi_line_records_align_across_small_batches() {
    let mut text = header();
    text.push('\n');
    for i in 0..60u64 {
        let street = format!("\"{} AVE\nAPT \"\"{}\"\"\"", i, i % 3);
        text.push_str(&line(&[(FieldId::OnStreetName, &street), (FieldId::CollisionId, &i.to_string())]));
        text.push_str("\r\n");
    }

    let mut small = config(3, EvaluationMode::Mask);
    small.csv_chunk_bytes = 40;
    let store = CsvLoader::new(&small).unwrap().load_bytes(text.as_bytes()).unwrap();

    assert_eq!(store.len(), 60);
    for (i, record) in store.records().enumerate() {
        assert_eq!(record.collision_id(), Some(i as u64));
        let expected = format!("{} AVE\nAPT \"{}\"", i, i % 3);
        assert_eq!(record.field("on_street_name").unwrap().and_then(|v| v.as_text()), Some(expected.as_str()));
    }
}
