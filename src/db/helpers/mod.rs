use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::detection::{parse_timestamp, Category, Detection};

pub fn parse_stored_timestamp(value: &str, field: &str) -> Result<NaiveDateTime> {
    parse_timestamp(value).with_context(|| format!("failed to parse {field}"))
}

pub fn parse_stored_category(value: &str) -> Result<Category> {
    value
        .parse()
        .with_context(|| format!("failed to parse detection type '{value}'"))
}

pub fn detection_from_columns(time: &str, kind: &str) -> Result<Detection> {
    Ok(Detection::new(
        parse_stored_timestamp(time, "time")?,
        parse_stored_category(kind)?,
    ))
}
