//! Work and education timeline

use super::{Badge, RawBadge};
use serde::{Deserialize, Serialize};

pub(crate) const PATH: &str = "/api/experience?populate[items][populate]=badges";

/// Experience block content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceContent {
    /// Section title
    pub title: String,
    /// Text under the title
    pub subtitle: Option<String>,
    /// Timeline entries in CMS order
    pub items: Vec<ExperienceItem>,
}

/// Kind of timeline entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceKind {
    /// Employment
    #[default]
    Work,
    /// Studies
    Education,
}

/// Where the work happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    /// Fully remote
    Remote,
    /// Partly on site
    Hybrid,
    /// On site
    Onsite,
}

impl WorkMode {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Remote => "Remote",
            Self::Hybrid => "Hybrid",
            Self::Onsite => "On-site",
        }
    }
}

/// Grade point average as entered: a number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gpa {
    /// Numeric grade
    Number(f64),
    /// Free-form grade, e.g. "3.8/4.0"
    Text(String),
}

/// One timeline entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    /// Work or education
    pub kind: ExperienceKind,
    /// Role or degree
    pub role: String,
    /// Employer or school
    pub company: String,
    /// Location text
    pub location: String,
    /// Start date as entered
    pub start_date: String,
    /// End date; `None` while ongoing
    pub end_date: Option<String>,
    /// Work mode
    pub mode: Option<WorkMode>,
    /// Grade point average
    pub gpa: Option<Gpa>,
    /// Free-text description
    pub description: Option<String>,
    /// Technology tags
    pub badges: Vec<Badge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawExperience {
    heading: Option<String>,
    description: Option<String>,
    items: Option<Vec<RawItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawItem {
    experience_kind: Option<ExperienceKind>,
    role: Option<String>,
    company: Option<String>,
    location: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    mode: Option<WorkMode>,
    gpa: Option<Gpa>,
    description: Option<String>,
    badges: Option<Vec<RawBadge>>,
}

pub(crate) fn normalize(raw: RawExperience) -> ExperienceContent {
    ExperienceContent {
        title: raw.heading.unwrap_or_default(),
        subtitle: raw.description,
        items: raw
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|item| ExperienceItem {
                kind: item.experience_kind.unwrap_or_default(),
                role: item.role.unwrap_or_default(),
                company: item.company.unwrap_or_default(),
                location: item.location.unwrap_or_default(),
                start_date: item.start_date.unwrap_or_default(),
                end_date: item.end_date,
                mode: item.mode,
                gpa: item.gpa,
                description: item.description,
                badges: item
                    .badges
                    .unwrap_or_default()
                    .into_iter()
                    .map(Badge::from)
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, ContentKey};
    use serde_json::json;

    fn decode(envelope: serde_json::Value) -> ExperienceContent {
        match Content::decode(ContentKey::Experience, &envelope, None).unwrap() {
            Content::Experience(content) => content,
            other => panic!("expected experience content, got {:?}", other.key()),
        }
    }

    #[test]
    fn items_map_kind_mode_and_badges() {
        let content = decode(json!({
            "data": {
                "heading": "Experience",
                "items": [{
                    "experienceKind": "education",
                    "role": "BSc",
                    "company": "Uni",
                    "location": "Delft",
                    "startDate": "2015-09-01",
                    "mode": "onsite",
                    "gpa": 3.9,
                    "badges": [{ "label": "Rust" }, { "label": "SQL", "type": "backend" }]
                }]
            }
        }));

        let item = &content.items[0];
        assert_eq!(content.title, "Experience");
        assert_eq!(item.kind, ExperienceKind::Education);
        assert_eq!(item.mode.map(WorkMode::label), Some("On-site"));
        assert_eq!(item.gpa, Some(Gpa::Number(3.9)));
        assert_eq!(item.end_date, None);
        assert_eq!(item.badges[0].kind, "other");
        assert_eq!(item.badges[1].kind, "backend");
    }

    #[test]
    fn gpa_may_be_text() {
        let content = decode(json!({
            "data": { "heading": "E", "items": [{ "experienceKind": "work", "gpa": "3.8/4.0" }] }
        }));
        assert_eq!(content.items[0].gpa, Some(Gpa::Text("3.8/4.0".into())));
    }

    #[test]
    fn unknown_mode_is_a_decode_error() {
        let envelope = json!({ "data": { "items": [{ "mode": "spaceship" }] } });
        assert!(Content::decode(ContentKey::Experience, &envelope, None).is_err());
    }
}
