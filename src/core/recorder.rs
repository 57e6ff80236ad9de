//! CSV recorder for persisted readings
//!
//! One row per saved reading: timestamp, five flex values, three
//! accelerometer axes, three gyroscope axes. The row shape is fixed, so
//! arity is validated here at the persistence boundary — the core parser
//! stays arity-free and passes through whatever the device sent.

use crate::core::frame::{Channel, Reading};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Value counts the row shape expects per channel
const FLEX_ARITY: usize = 5;
const ACCEL_ARITY: usize = 3;
const GYRO_ARITY: usize = 3;

/// Header written when the dataset file is created
const HEADER: &str =
    "timestamp,flex1,flex2,flex3,flex4,flex5,accelX,accelY,accelZ,gyroX,gyroY,gyroZ";

/// Recorder error types
#[derive(Error, Debug)]
pub enum RecordError {
    /// Reading is missing at least one channel
    #[error("cannot record an incomplete reading (missing: {0})")]
    Incomplete(String),

    /// A channel's value count does not fit the fixed row shape
    #[error("{channel} has {got} values, row shape expects {expected}")]
    Arity {
        /// Offending channel
        channel: Channel,
        /// Expected value count
        expected: usize,
        /// Actual value count
        got: usize,
    },

    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Appending CSV writer with the fixed glove row shape
pub struct CsvRecorder {
    path: PathBuf,
    writer: BufWriter<File>,
    rows_written: usize,
}

impl CsvRecorder {
    /// Open (or create) the dataset file, writing the header if the file is
    /// new or empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let needs_header = std::fs::metadata(&path).map_or(true, |meta| meta.len() == 0);

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        if needs_header {
            writeln!(writer, "{HEADER}")?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            writer,
            rows_written: 0,
        })
    }

    /// Validate and append one complete reading, timestamped now.
    ///
    /// Returns the timestamp written into the row.
    pub fn append(&mut self, reading: &Reading) -> Result<String, RecordError> {
        let values = render_values(reading)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        writeln!(self.writer, "{timestamp},{values}")?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(timestamp)
    }

    /// Rows appended through this recorder instance
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Dataset file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn expect_arity(channel: Channel, values: &[f64], expected: usize) -> Result<(), RecordError> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(RecordError::Arity {
            channel,
            expected,
            got: values.len(),
        })
    }
}

/// Render the eleven value columns, validating completeness and arity
fn render_values(reading: &Reading) -> Result<String, RecordError> {
    let missing = reading.missing();
    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
        return Err(RecordError::Incomplete(names.join(", ")));
    }

    let flex = reading.flex.as_deref().unwrap_or(&[]);
    let accel = reading.accel.as_deref().unwrap_or(&[]);
    let gyro = reading.gyro.as_deref().unwrap_or(&[]);

    expect_arity(Channel::Flex, flex, FLEX_ARITY)?;
    expect_arity(Channel::Accel, accel, ACCEL_ARITY)?;
    expect_arity(Channel::Gyro, gyro, GYRO_ARITY)?;

    let columns: Vec<String> = flex
        .iter()
        .chain(accel)
        .chain(gyro)
        .map(ToString::to_string)
        .collect();
    Ok(columns.join(","))
}
