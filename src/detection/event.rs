//! Detection event record and its wire timestamp format.

use chrono::NaiveDateTime;

use crate::detection::category::{Category, SuperCategory};
use crate::error::{DetectionError, Result};

/// Seconds precision, no fractional part, no zone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        DetectionError::Parse {
            value: value.to_string(),
            source,
        }
    })
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// A single detection as delivered by the ingestion feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub timestamp: NaiveDateTime,
    pub category: Category,
}

impl Detection {
    pub fn new(timestamp: NaiveDateTime, category: Category) -> Self {
        Self {
            timestamp,
            category,
        }
    }

    /// Build a detection from the raw `(timestamp, category)` pair used at the
    /// persistence boundary.
    pub fn parse(timestamp: &str, category: &str) -> Result<Self> {
        Ok(Self {
            timestamp: parse_timestamp(timestamp)?,
            category: category.parse()?,
        })
    }

    pub fn super_category(&self) -> SuperCategory {
        self.category.super_category()
    }
}
