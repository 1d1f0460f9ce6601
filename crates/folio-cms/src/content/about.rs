//! Biography block

use super::Media;
use serde::{Deserialize, Serialize};

pub(crate) const PATH: &str = "/api/about?\
populate[profileImage]=true&\
populate[socials][populate][iconSVG]=true&\
populate[socials][populate][file]=true&\
populate[bulletPoints][populate][iconSVG]=true";

/// Biography block content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    /// Section heading
    pub heading: Option<String>,
    /// Title of the introduction
    pub intro_title: Option<String>,
    /// First introduction paragraph
    pub intro_paragraph1: Option<String>,
    /// Second introduction paragraph
    pub intro_paragraph2: Option<String>,
    /// Portrait
    pub profile_image: Option<Media>,
    /// Social profiles and downloads
    pub socials: Vec<SocialMedia>,
    /// Short highlights
    pub bullet_points: Vec<BulletPoint>,
}

/// Social profile card on the about block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialMedia {
    /// Display label
    pub label: String,
    /// Target URL
    pub url: String,
    /// Optional blurb
    pub description: Option<String>,
    /// Optional button text
    pub button_text: Option<String>,
    /// Colour theme name
    #[serde(alias = "themes")]
    pub theme: Option<String>,
    /// Shown on the contact block
    pub show_in_contact: Option<bool>,
    /// Shown on the about block
    pub show_in_about: Option<bool>,
    /// Inline SVG icon upload
    #[serde(rename = "iconSVG")]
    pub icon_svg: Option<Media>,
    /// Attached file (e.g. a resume)
    pub file: Option<Media>,
}

/// One highlight with an icon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletPoint {
    /// Text
    pub text: String,
    /// Inline SVG icon upload
    #[serde(rename = "iconSVG")]
    pub icon_svg: Option<Media>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawAbout {
    heading: Option<String>,
    intro_title: Option<String>,
    intro_paragraph1: Option<String>,
    intro_paragraph2: Option<String>,
    profile_image: Option<Media>,
    socials: Option<Vec<SocialMedia>>,
    bullet_points: Option<Vec<BulletPoint>>,
}

pub(crate) fn normalize(raw: RawAbout) -> AboutContent {
    AboutContent {
        heading: raw.heading,
        intro_title: raw.intro_title,
        intro_paragraph1: raw.intro_paragraph1,
        intro_paragraph2: raw.intro_paragraph2,
        profile_image: raw.profile_image,
        socials: raw.socials.unwrap_or_default(),
        bullet_points: raw.bullet_points.unwrap_or_default(),
    }
}
