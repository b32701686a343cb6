//! Classification stream I/O
//!
//! The classifier's sole downstream artifact is an ordered table of
//! [`ClassificationRecord`]s. This module reads and writes that table in the
//! formats the collaborators consume: CSV (the canonical contract), NDJSON,
//! and pretty-printed JSON.

use std::io::{Read, Write};

use crate::error::EthogramError;
use crate::types::ClassificationRecord;

/// Write the stream as the canonical CSV table.
pub fn write_csv<W: Write>(
    records: &[ClassificationRecord],
    writer: W,
) -> Result<(), EthogramError> {
    let mut out = csv::Writer::from_writer(writer);
    for record in records {
        out.serialize(record)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Read a stream previously written as CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ClassificationRecord>, EthogramError> {
    let mut input = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for result in input.deserialize::<ClassificationRecord>() {
        records.push(result?);
    }
    Ok(records)
}

/// Write the stream as newline-delimited JSON, one record per line.
pub fn write_ndjson<W: Write>(
    records: &[ClassificationRecord],
    mut writer: W,
) -> Result<(), EthogramError> {
    for record in records {
        let line = serde_json::to_string(record)?;
        writeln!(writer, "{}", line).map_err(|e| EthogramError::ParseError(e.to_string()))?;
    }
    Ok(())
}

/// Serialize the stream as a pretty-printed JSON array.
pub fn to_json_pretty(records: &[ClassificationRecord]) -> Result<String, EthogramError> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Label;
    use pretty_assertions::assert_eq;

    fn sample_records() -> Vec<ClassificationRecord> {
        vec![
            ClassificationRecord {
                frame: 1,
                sitting: 76.92307692307693,
                walking: 0.0,
                climbing: 23.076923076923077,
                label: Label::Sitting,
                confidence: 76.92307692307693,
            },
            ClassificationRecord {
                frame: 2,
                sitting: 0.0,
                walking: 0.0,
                climbing: 0.0,
                label: Label::Unknown,
                confidence: 0.0,
            },
        ]
    }

    #[test]
    fn csv_carries_the_contract_columns() {
        let mut buffer = Vec::new();
        write_csv(&sample_records(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "Frame,Sitting,Walking,Climbing,Classified Behavior,Confidence"
        );
        assert!(text.lines().nth(2).unwrap().contains("unknown"));
    }

    #[test]
    fn csv_reads_back_byte_equal_records() {
        let records = sample_records();
        let mut buffer = Vec::new();
        write_csv(&records, &mut buffer).unwrap();

        let reread = read_csv(buffer.as_slice()).unwrap();
        assert_eq!(reread, records);
    }

    #[test]
    fn ndjson_is_one_record_per_line() {
        let mut buffer = Vec::new();
        write_ndjson(&sample_records(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text.lines().count(), 2);
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["Classified Behavior"], "sitting");
        assert_eq!(first["Frame"], 1);
    }
}
