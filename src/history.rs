//! Previous-reading file kept by the command line tool.

use crate::error::{ReadError, Result};
use std::path::Path;

/// Read the last stored value, `None` if the file does not exist yet
pub fn load_previous(path: &Path) -> Result<Option<f64>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let value = contents.trim().parse::<f64>().map_err(|e| {
        ReadError::InvalidConfig(format!("value file {} is not a number: {e}", path.display()))
    })?;
    Ok(Some(value))
}

pub fn store_value(path: &Path, value: f64) -> Result<()> {
    std::fs::write(path, value.to_string())?;
    Ok(())
}

/// Meters only count up, and by at most `max_threshold` between captures
pub fn check_sanity(result: f64, previous: Option<f64>, max_threshold: Option<f64>) -> Result<()> {
    let Some(previous) = previous else {
        return Ok(());
    };

    if result < previous {
        return Err(ReadError::SanityCheck(format!(
            "result {result} is less than previous {previous}"
        )));
    }
    if let Some(max) = max_threshold {
        if result > previous + max {
            return Err(ReadError::SanityCheck(format!(
                "result {result} exceeds previous + {max} ({})",
                previous + max
            )));
        }
    }
    Ok(())
}
