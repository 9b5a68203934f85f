pub mod core;
pub mod schema;
pub mod storage;
pub mod query;
pub mod index;
pub mod search;
pub mod parallel;
pub mod ingest;
pub mod mmap;

pub use crate::core::config::{Config, EvaluationMode};
pub use crate::core::database::CollisionDatabase;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{ScalarKind, ScalarRef, ScalarValue};
pub use crate::index::secondary::SecondaryIndex;
pub use crate::query::ast::{Operator, Predicate, Query};
pub use crate::schema::schema::FieldId;
pub use crate::search::executor::ScanExecutor;
pub use crate::storage::proxy::RecordRef;
pub use crate::storage::record_store::{RecordStore, RecordStoreBuilder, Row};

/*
┌──────────────────────────────── CRASHSCAN LAYOUT ────────────────────────────────┐
│                                                                                  │
│  ingest::csv::CsvLoader ──rows──▶ storage::RecordStoreBuilder ──finish──▶        │
│                                                                                  │
│        storage::RecordStore (immutable, one Column per FieldId)                  │
│              │                         │                                         │
│              ▼                         ▼                                         │
│   index::SecondaryIndex        search::ScanExecutor                              │
│   (value -> indices,           ├─ search()          sequential, ascending        │
│    built once)                 └─ search_parallel() parallel::ParallelScanner    │
│              │                         ▲            chunked, merged in order     │
│              └──── query::planner ─────┘                                         │
│                    IndexSeek | FullScan                                          │
│                                                                                  │
│  query::ast::{Predicate, Query} ──▶ query::matcher (per-kind dispatch)           │
│  storage::proxy::RecordRef = (&RecordStore, index), no copies                    │
│                                                                                  │
│  core::database::CollisionDatabase ties store, executor and indexes together     │
└──────────────────────────────────────────────────────────────────────────────────┘
*/
