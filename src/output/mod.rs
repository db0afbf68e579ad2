//! CSV output for simulation samples.
//!
//! Writes a `Time (s),Voltage (V)` header followed by one row per sample, in
//! emission order.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{CapSimError, Result};
use crate::model::Sample;

/// Header row of the sample log.
pub const CSV_HEADER: &str = "Time (s),Voltage (V)";

/// Sample writer for any byte sink.
pub struct CsvWriter<W: Write> {
    writer: W,
    rows: usize,
}

impl<W: Write> CsvWriter<W> {
    /// Create a new writer and emit the header row.
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{CSV_HEADER}")?;
        Ok(Self { writer, rows: 0 })
    }

    /// Write one sample row.
    ///
    /// Values use round-trip float formatting, so `0` is written as `0.0`.
    pub fn write_sample(&mut self, sample: &Sample) -> io::Result<()> {
        writeln!(self.writer, "{:?},{:?}", sample.time_s, sample.voltage_v)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of sample rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush the sink and hand it back.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write all samples to a CSV file, replacing any existing file.
pub fn write_csv_file(path: &Path, samples: &[Sample]) -> Result<()> {
    let path_str = path.display().to_string();
    let wrap = |e| CapSimError::output(path_str.clone(), e);

    let file = File::create(path).map_err(wrap)?;
    let mut csv = CsvWriter::new(BufWriter::new(file)).map_err(wrap)?;
    for sample in samples {
        csv.write_sample(sample).map_err(wrap)?;
    }
    let rows = csv.rows();
    csv.finish().map_err(wrap)?;

    info!(path = %path_str, rows, "wrote sample log");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_rows() {
        let mut csv = CsvWriter::new(Vec::new()).unwrap();
        csv.write_sample(&Sample::new(0.0, 5.3444)).unwrap();
        csv.write_sample(&Sample::new(0.1, 0.0)).unwrap();
        assert_eq!(csv.rows(), 2);

        let text = String::from_utf8(csv.finish().unwrap()).unwrap();
        assert_eq!(text, "Time (s),Voltage (V)\n0.0,5.3444\n0.1,0.0\n");
    }

    #[test]
    fn test_empty_log_has_header() {
        let csv = CsvWriter::new(Vec::new()).unwrap();
        let text = String::from_utf8(csv.finish().unwrap()).unwrap();
        assert_eq!(text, "Time (s),Voltage (V)\n");
    }

    #[test]
    fn test_write_csv_file() {
        let path = std::env::temp_dir().join(format!("solarcap_test_{}.csv", std::process::id()));
        let samples = [Sample::new(0.0, 1.5), Sample::new(0.5, 2.25)];
        write_csv_file(&path, &samples).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text, "Time (s),Voltage (V)\n0.0,1.5\n0.5,2.25\n");
    }

    #[test]
    fn test_round_trip_float_formatting() {
        let mut csv = CsvWriter::new(Vec::new()).unwrap();
        csv.write_sample(&Sample::new(1e-5, 1e16)).unwrap();
        let text = String::from_utf8(csv.finish().unwrap()).unwrap();
        assert_eq!(text, "Time (s),Voltage (V)\n1e-5,1e16\n");
    }

    #[test]
    fn test_write_csv_file_bad_path() {
        let path = Path::new("/nonexistent-solarcap-dir/log.csv");
        let err = write_csv_file(path, &[]).unwrap_err();
        assert!(matches!(err, CapSimError::OutputError { .. }));
    }
}
