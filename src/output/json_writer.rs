//! JSON sink

use crate::error::Result;
use crate::record::ProjectedRecord;
use std::io::Write;

/// Serialize records as a JSON array
pub fn to_json_string(records: &[ProjectedRecord], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    Ok(json)
}

/// Write records as a JSON array followed by a newline
pub fn write_json<W: Write>(mut out: W, records: &[ProjectedRecord], pretty: bool) -> Result<()> {
    let json = to_json_string(records, pretty)?;
    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}
