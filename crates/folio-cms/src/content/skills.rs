//! Skill categories

use super::{media_url, Media};
use serde::{Deserialize, Serialize};

pub(crate) const PATH: &str = "/api/skill?populate[categories][populate][items][populate]=icon";

/// Palette used when a category has none
pub const DEFAULT_PALETTE: &str = "sky";

/// Level used when an item has none
pub const DEFAULT_LEVEL: u8 = 3;

/// Skills block content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsContent {
    /// Section title
    pub title: String,
    /// Text under the title
    pub subtitle: Option<String>,
    /// Categories in CMS order
    pub categories: Vec<SkillsCategory>,
}

/// Group of related skills
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillsCategory {
    /// Category title
    pub title: String,
    /// Colour palette name
    pub palette: String,
    /// Skills in CMS order
    pub items: Vec<SkillItem>,
}

/// One skill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillItem {
    /// Skill name
    pub text: String,
    /// Proficiency, usually 1..=5
    pub level: u8,
    /// Absolute icon URL
    pub icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSkills {
    heading: Option<String>,
    description: Option<String>,
    categories: Option<Vec<RawCategory>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCategory {
    title: Option<String>,
    palette: Option<String>,
    items: Option<Vec<RawItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItem {
    label: Option<String>,
    level: Option<f64>,
    icon: Option<Media>,
}

pub(crate) fn normalize(raw: RawSkills, base: Option<&str>) -> SkillsContent {
    SkillsContent {
        title: raw.heading.unwrap_or_default(),
        subtitle: raw.description,
        categories: raw
            .categories
            .unwrap_or_default()
            .into_iter()
            .map(|category| SkillsCategory {
                title: category.title.unwrap_or_default(),
                palette: category
                    .palette
                    .unwrap_or_else(|| DEFAULT_PALETTE.to_string()),
                items: category
                    .items
                    .unwrap_or_default()
                    .into_iter()
                    .map(|item| map_item(item, base))
                    .collect(),
            })
            .collect(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn map_item(item: RawItem, base: Option<&str>) -> SkillItem {
    let level = item
        .level
        .map_or(DEFAULT_LEVEL, |level| level.round().clamp(0.0, f64::from(u8::MAX)) as u8);

    SkillItem {
        text: item.label.unwrap_or_default(),
        level,
        icon: item.icon.and_then(|icon| media_url(base, icon.url.as_deref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, ContentKey};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn skills_rename_fields_and_apply_defaults() {
        let envelope = json!({
            "data": {
                "heading": "Skills",
                "description": "What I use",
                "categories": [{
                    "title": "Languages",
                    "palette": null,
                    "items": [
                        { "label": "Rust", "level": 5, "icon": { "url": "/uploads/rust.svg" } },
                        { "label": "Go", "level": null, "icon": null }
                    ]
                }]
            }
        });

        let content = Content::decode(ContentKey::Skills, &envelope, Some("https://cms.test")).unwrap();
        let Content::Skills(skills) = content else {
            panic!("expected skills content");
        };

        assert_eq!(skills.title, "Skills");
        assert_eq!(skills.subtitle.as_deref(), Some("What I use"));
        let category = &skills.categories[0];
        assert_eq!(category.palette, "sky");
        assert_eq!(
            category.items,
            vec![
                SkillItem {
                    text: "Rust".into(),
                    level: 5,
                    icon: Some("https://cms.test/uploads/rust.svg".into()),
                },
                SkillItem {
                    text: "Go".into(),
                    level: 3,
                    icon: None,
                },
            ]
        );
    }
}
