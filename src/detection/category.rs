use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::error::DetectionError;

/// Object class reported by the detector upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pedestrian,
    Bicycle,
    Car,
    Truck,
    Van,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Pedestrian,
        Category::Bicycle,
        Category::Car,
        Category::Truck,
        Category::Van,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pedestrian => "pedestrian",
            Category::Bicycle => "bicycle",
            Category::Car => "car",
            Category::Truck => "truck",
            Category::Van => "van",
        }
    }

    pub fn super_category(&self) -> SuperCategory {
        classify(*self)
    }
}

impl FromStr for Category {
    type Err = DetectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pedestrian" => Ok(Category::Pedestrian),
            "bicycle" => Ok(Category::Bicycle),
            "car" => Ok(Category::Car),
            "truck" => Ok(Category::Truck),
            "van" => Ok(Category::Van),
            other => Err(DetectionError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-way grouping used by both the run detector and the aggregator.
/// Serialized as the lowercase report key.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum SuperCategory {
    People,
    Vehicles,
}

impl SuperCategory {
    pub const ALL: [SuperCategory; 2] = [SuperCategory::People, SuperCategory::Vehicles];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuperCategory::People => "people",
            SuperCategory::Vehicles => "vehicles",
        }
    }
}

impl fmt::Display for SuperCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify(category: Category) -> SuperCategory {
    match category {
        Category::Pedestrian | Category::Bicycle => SuperCategory::People,
        Category::Car | Category::Truck | Category::Van => SuperCategory::Vehicles,
    }
}
