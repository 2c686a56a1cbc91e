// src/exports/details.rs
use crate::domain::listing::ListingDetail;
use crate::errors::AppError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pretty-printed JSON array of detail records.
pub fn write_details(path: &Path, details: &[ListingDetail]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| AppError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, details)?;
    writeln!(writer).map_err(|e| AppError::io(path, e))?;
    writer.flush().map_err(|e| AppError::io(path, e))
}

pub fn read_details(path: &Path) -> Result<Vec<ListingDetail>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}
