//! pcszero - Merge PCS measurement logs and highlight zero readings
//!
//! This crate merges a batch of power-conditioner (PCS) measurement workbooks into
//! a single `Result` workbook. Header rows are taken from the first file, data rows
//! from every file are appended in order, and channel readings equal to zero inside
//! a configurable time window are highlighted. The number of channels checked per
//! row comes from a device master table.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pcszero::{InputFile, MasterTable, MergerBuilder, NoProgress};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a merger with default settings (09:00-18:00)
//!     let merger = MergerBuilder::new().build()?;
//!
//!     // Load the device master
//!     let master = MasterTable::from_json_reader(std::fs::File::open("pcs_master.json")?)?;
//!
//!     // Input files are processed in the given order
//!     let files = vec![
//!         InputFile::open("0901.xlsx")?,
//!         InputFile::open("0902.xlsx")?,
//!     ];
//!
//!     let outcome = merger.run(&files, Some(&master), &mut NoProgress)?;
//!     std::fs::write("result.xlsx", &outcome.buffer)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Progress and Cancellation
//!
//! ```rust,no_run
//! use pcszero::{CancelToken, InputFile, MasterTable, MergerBuilder, ProgressEvent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let token = CancelToken::new();
//! let merger = MergerBuilder::new()
//!     .with_time_range("23:00", "05:00") // night shift, crosses midnight
//!     .with_cancel_token(token.clone())
//!     .build()?;
//!
//! let master = MasterTable::default();
//! let files = vec![InputFile::open("night.xlsx")?];
//!
//! let mut on_progress = |event: &ProgressEvent| {
//!     println!("{:?} {}/{} {}", event.phase, event.current, event.total, event.filename);
//! };
//! let outcome = merger.run(&files, Some(&master), &mut on_progress)?;
//! println!("{}", serde_json::to_string(&outcome.summary())?);
//! # Ok(())
//! # }
//! ```
//!
//! # Building Blocks
//!
//! The pieces the merger uses are public on their own:
//!
//! ```rust
//! use pcszero::{extract_minutes, is_zero, CellValue, DeviceKeyResolver, TimeWindow};
//!
//! let resolver = DeviceKeyResolver::default();
//! assert_eq!(resolver.resolve("Site A/PCS1-3-4").as_deref(), Some("PCS 1-3-4"));
//!
//! let window = TimeWindow::parse("09:00", "18:00").unwrap();
//! let minutes = extract_minutes(&CellValue::String("2024/05/01 10:15".to_string()));
//! assert!(minutes.is_some_and(|m| window.contains(m)));
//!
//! assert!(is_zero(&CellValue::String("0.00".to_string())));
//! assert!(!is_zero(&CellValue::String("-".to_string())));
//! ```

mod api;
mod builder;
mod device;
mod error;
mod merge;
mod output;
mod parser;
mod report;
mod security;
mod timestamp;
mod types;
mod window;
mod zero;

// 公開API
pub use api::{
    CancelToken, InputFile, LayoutPolicy, NoProgress, ProgressEvent, ProgressPhase, ProgressSink,
    TimeRange,
};
pub use builder::{
    Merger, MergerBuilder, DEFAULT_CIRCUIT_COUNT, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_YIELD_INTERVAL,
};
pub use device::{DeviceKeyResolver, MasterEntry, MasterTable, DEFAULT_DEVICE_PREFIX};
pub use error::MergeError;
pub use merge::{
    last_channel_column, CIRCUIT_COUNT_COLUMN, CIRCUIT_COUNT_HEADER, FIRST_CHANNEL_COLUMN,
    FIRST_DATA_ROW, HEADER_ROWS, LABEL_COLUMN, LAST_CHANNEL_COLUMN, MIN_COLUMNS,
    NARROW_CIRCUIT_COUNT, TIMESTAMP_COLUMN,
};
pub use output::{MergedSheet, OUTPUT_SHEET_NAME};
pub use report::{
    FileWarning, MergeOutcome, MergeReport, RunStats, RunSummary, UnknownKeys,
    UNKNOWN_KEYS_SAMPLE_LIMIT,
};
pub use security::SecurityConfig;
pub use timestamp::extract_minutes;
pub use types::{
    column_letter, Alignment, BorderEdge, BorderLine, BorderStyle, Cell, CellCoord, CellStyle,
    CellValue, FontStyle, HorizontalAlign, Row, StyleRef, VerticalAlign,
};
pub use window::{parse_time_of_day, TimeWindow, MINUTES_PER_DAY};
pub use zero::{is_zero, NO_MEASUREMENT};
