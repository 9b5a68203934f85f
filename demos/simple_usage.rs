//! crashscan API walkthrough
//!
//! Loads a collision CSV export (path as the first argument) and runs a few
//! queries against it:
//! - equality, inverted and case-insensitive predicates
//! - date ranges and compound queries
//! - index lookups and planned search
//! - result summaries

use crashscan::search::aggregate::{date_span, summarize, value_counts};
use crashscan::{CollisionDatabase, Config, FieldId, Operator, Predicate, Query, ScalarValue};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .ok_or("usage: simple_usage <Motor_Vehicle_Collisions_-_Crashes.csv>")?;

    println!("Loading {}...", path);
    let config = Config::default().with_indexed_fields(vec![FieldId::Borough, FieldId::ZipCode]);
    let db = CollisionDatabase::open_csv(&path, config)?;
    println!("  {} collisions, {} workers\n", db.len(), db.config().worker_threads);

    // Equality, served by the borough index
    let brooklyn = Query::create(Predicate::equals("borough", "BROOKLYN")?);
    println!("Plan for borough = BROOKLYN: {:?}", db.plan(&brooklyn));
    let results = db.search_parallel(&brooklyn);
    println!("  {} results", results.len());
    if let Some(first) = results.first() {
        println!("  first: {}\n", first);
    }

    // No borough recorded
    let unknown = Query::create(Predicate::has_value("borough")?.inverted());
    println!("Without borough: {}", db.search_parallel(&unknown).len());

    // Case-insensitive substring
    let speeding = Query::create(Predicate::new(
        "contributing_factor_vehicle_1", Operator::Contains, "speed", false, true,
    )?);
    let speeding = db.search_parallel(&speeding);
    println!("Speed-related: {}", speeding.len());

    // Compound: a date range inside one zip code
    let compound = Query::new()
        .add(Predicate::equals("zip_code", 11207u64)?)
        .add(Predicate::new("crash_date", Operator::GreaterThan, ScalarValue::date(2021, 12, 31).ok_or("bad date")?, false, false)?)
        .add(Predicate::new("crash_date", Operator::LessThan, ScalarValue::date(2023, 1, 1).ok_or("bad date")?, false, false)?);
    let in_2022 = db.search(&compound);
    println!("11207 during 2022: {}", in_2022.len());

    // Summaries over a result set
    let injured = summarize(&in_2022, FieldId::NumberOfPersonsInjured)?;
    println!("  injured: total {} mean {:?}", injured.sum, injured.mean);
    if let Some((first, last)) = date_span(&in_2022) {
        println!("  span: {} .. {}", first, last);
    }
    for (borough, count) in value_counts(&speeding, FieldId::Borough)?.iter().take(5) {
        println!("  {:>15}: {}", borough, count);
    }

    println!("\nStats: {}", serde_json::to_string_pretty(&db.stats())?);
    Ok(())
}
