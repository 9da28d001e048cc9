//! Recorded Sensor Replay
//!
//! Reads one JSON-encoded `RawSample` per line. Timestamps in the file are
//! ignored; the sampling loop stamps each sample as it is read.

use sampling_loop::{PipelineError, SensorSource};
use signal_conditioner::RawSample;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use tracing::info;

/// Sensor source over a JSON-lines recording
pub struct JsonLinesSource<R = BufReader<File>> {
    lines: Lines<R>,
    line_number: usize,
}

impl JsonLinesSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!("Replaying sensor data from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> SensorSource for JsonLinesSource<R> {
    fn read(&mut self) -> Result<Option<RawSample>, PipelineError> {
        loop {
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            self.line_number += 1;

            let line = line.map_err(|e| {
                PipelineError::SensorUnavailable(format!("line {}: {}", self.line_number, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            return serde_json::from_str(&line).map(Some).map_err(|e| {
                PipelineError::SensorUnavailable(format!("line {}: {}", self.line_number, e))
            });
        }
    }
}
