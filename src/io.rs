use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;
use polars::prelude::*;
use polars_io::parquet::ParquetWriter;

use crate::error::{HeartRiskError, Result};
use crate::records::HeartRecord;

#[derive(Debug, PartialEq, Eq, Clone, Copy, ValueEnum)]
pub enum WriteFormat {
    Csv,
    Parquet,
}

/// Read a heart dataset. Empty fields, `NA` and `?` are read as missing.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| HeartRiskError::io(path, e))?;

    let df = CsvReader::new(file)
        .has_header(true)
        .with_dtypes(Some(Arc::new(HeartRecord::raw_schema())))
        .with_null_values(Some(NullValues::AllColumns(vec![
            "NA".to_string(),
            "?".to_string(),
        ])))
        .finish()?;
    Ok(df)
}

pub fn write_csv<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|e| HeartRiskError::io(path, e))?;

    CsvWriter::new(&mut file).has_header(true).finish(df)?;

    Ok(())
}

pub fn write_parquet<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|e| HeartRiskError::io(path, e))?;

    ParquetWriter::new(&mut file).finish(df)?;

    Ok(())
}

pub fn write_dataset<P: AsRef<Path>>(
    path: P,
    df: &mut DataFrame,
    format: WriteFormat,
) -> Result<()> {
    match format {
        WriteFormat::Csv => write_csv(path, df),
        WriteFormat::Parquet => write_parquet(path, df),
    }
}
