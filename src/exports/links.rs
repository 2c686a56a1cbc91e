// src/exports/links.rs
use crate::domain::listing::ListingSummary;
use crate::errors::AppError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// One URL per line.
pub fn write_links(path: &Path, links: &[String]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for link in links {
        writeln!(writer, "{link}").map_err(|e| AppError::io(path, e))?;
    }

    writer.flush().map_err(|e| AppError::io(path, e))
}

/// Reads a file written by `write_links`. Blank lines are skipped.
pub fn read_links(path: &Path) -> Result<Vec<String>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// One JSON object per line.
pub fn write_summaries(path: &Path, summaries: &[ListingSummary]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for summary in summaries {
        serde_json::to_writer(&mut writer, summary)?;
        writeln!(writer).map_err(|e| AppError::io(path, e))?;
    }

    writer.flush().map_err(|e| AppError::io(path, e))
}
