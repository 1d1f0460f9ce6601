//! Contact block

use serde::{Deserialize, Serialize};

pub(crate) const PATH: &str = "/api/contact";

/// Contact block content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactContent {
    /// Section heading
    pub heading: String,
    /// Text under the heading
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawContact {
    heading: Option<String>,
    description: Option<String>,
}

pub(crate) fn normalize(raw: RawContact) -> ContactContent {
    ContactContent {
        heading: raw.heading.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
    }
}
