//! Typed section content
//!
//! Each CMS content endpoint returns its own JSON schema. The submodules map
//! those payloads onto typed values; [`Content`] is the sum of all of them
//! and is what the content cache stores.
//!
//! Six of the keys are versioned through the manifest ([`SectionKey`]). The
//! remaining two (projects, socials) are fetched on cache miss only.

pub mod about;
pub mod contact;
pub mod experience;
pub mod home;
pub mod projects;
pub mod skills;
pub mod socials;
pub mod testimonials;

pub use about::{AboutContent, BulletPoint, SocialMedia};
pub use contact::ContactContent;
pub use experience::{ExperienceContent, ExperienceItem, ExperienceKind, Gpa, WorkMode};
pub use home::HomeContent;
pub use projects::{BlogSection, Project, ProjectsContent};
pub use skills::{SkillItem, SkillsCategory, SkillsContent};
pub use socials::SocialLink;
pub use testimonials::{TestimonialItem, TestimonialQuote, TestimonialsContent};

use crate::error::CmsError;
use folio_manifest::{EntryShape, SectionKey};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Badge kind used when the CMS leaves it empty
pub const DEFAULT_BADGE_KIND: &str = "other";

/// Key of one content cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKey {
    /// Landing block
    Home,
    /// Biography block
    About,
    /// Contact block
    Contact,
    /// Skill categories
    Skills,
    /// Timeline
    Experience,
    /// Reviewer quotes
    Testimonials,
    /// Project cards (not versioned)
    Projects,
    /// Social links (not versioned)
    Socials,
}

impl ContentKey {
    /// Every cache key
    pub const ALL: [ContentKey; 8] = [
        ContentKey::Home,
        ContentKey::About,
        ContentKey::Contact,
        ContentKey::Skills,
        ContentKey::Experience,
        ContentKey::Testimonials,
        ContentKey::Projects,
        ContentKey::Socials,
    ];

    /// Lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Testimonials => "testimonials",
            Self::Projects => "projects",
            Self::Socials => "socials",
        }
    }

    /// Manifest section this key is versioned by, if any
    #[must_use]
    pub const fn section(self) -> Option<SectionKey> {
        match self {
            Self::Home => Some(SectionKey::Home),
            Self::About => Some(SectionKey::About),
            Self::Contact => Some(SectionKey::Contact),
            Self::Skills => Some(SectionKey::Skills),
            Self::Experience => Some(SectionKey::Experience),
            Self::Testimonials => Some(SectionKey::Testimonials),
            Self::Projects | Self::Socials => None,
        }
    }

    /// Request path, including populate parameters
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => home::PATH,
            Self::About => about::PATH,
            Self::Contact => contact::PATH,
            Self::Skills => skills::PATH,
            Self::Experience => experience::PATH,
            Self::Testimonials => testimonials::PATH,
            Self::Projects => projects::PATH,
            Self::Socials => socials::PATH,
        }
    }
}

impl From<SectionKey> for ContentKey {
    fn from(key: SectionKey) -> Self {
        match key {
            SectionKey::Home => Self::Home,
            SectionKey::About => Self::About,
            SectionKey::Contact => Self::Contact,
            SectionKey::Skills => Self::Skills,
            SectionKey::Experience => Self::Experience,
            SectionKey::Testimonials => Self::Testimonials,
        }
    }
}

impl Display for ContentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown content key '{s}'"))
    }
}

/// One cached content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "data", rename_all = "lowercase")]
pub enum Content {
    /// Landing block
    Home(HomeContent),
    /// Biography block
    About(AboutContent),
    /// Contact block
    Contact(ContactContent),
    /// Skill categories
    Skills(SkillsContent),
    /// Timeline
    Experience(ExperienceContent),
    /// Reviewer quotes
    Testimonials(TestimonialsContent),
    /// Project cards
    Projects(ProjectsContent),
    /// Visible social links, in display order
    Socials(Vec<SocialLink>),
}

impl Content {
    /// Cache key of this block
    #[must_use]
    pub const fn key(&self) -> ContentKey {
        match self {
            Self::Home(_) => ContentKey::Home,
            Self::About(_) => ContentKey::About,
            Self::Contact(_) => ContentKey::Contact,
            Self::Skills(_) => ContentKey::Skills,
            Self::Experience(_) => ContentKey::Experience,
            Self::Testimonials(_) => ContentKey::Testimonials,
            Self::Projects(_) => ContentKey::Projects,
            Self::Socials(_) => ContentKey::Socials,
        }
    }

    /// Decode a response envelope for `key`
    ///
    /// `base` is the CMS origin, used to absolutize media paths.
    ///
    /// # Errors
    ///
    /// Returns [`CmsError::Decode`] when the envelope has no usable `data`
    /// member or a field has the wrong type.
    pub fn decode(key: ContentKey, envelope: &Value, base: Option<&str>) -> Result<Self, CmsError> {
        let path = key.path();
        Ok(match key {
            ContentKey::Home => Self::Home(home::normalize(entry(path, envelope)?)),
            ContentKey::About => Self::About(about::normalize(entry(path, envelope)?)),
            ContentKey::Contact => Self::Contact(contact::normalize(entry(path, envelope)?)),
            ContentKey::Skills => Self::Skills(skills::normalize(entry(path, envelope)?, base)),
            ContentKey::Experience => Self::Experience(experience::normalize(entry(path, envelope)?)),
            ContentKey::Testimonials => {
                Self::Testimonials(testimonials::normalize(entry(path, envelope)?))
            }
            ContentKey::Projects => Self::Projects(projects::normalize(entry(path, envelope)?)),
            ContentKey::Socials => Self::Socials(socials::normalize(path, envelope, base)?),
        })
    }
}

/// Resolve a CMS media path against the CMS origin
///
/// Absolute `http(s)://` URLs pass through unchanged; relative paths are
/// prefixed with `base`. Empty paths resolve to `None`.
#[must_use]
pub fn media_url(base: Option<&str>, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(path.to_string());
    }
    Some(format!("{}{}", base.unwrap_or_default().trim_end_matches('/'), path))
}

/// Uploaded media reference as the CMS returns it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    /// Media path or absolute URL
    pub url: Option<String>,
}

/// Labelled tag on an experience entry, project or testimonial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Text shown on the tag
    pub label: String,
    /// Tag kind (`frontend`, `backend`, `tools`, `other`, ...)
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawBadge {
    label: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl From<RawBadge> for Badge {
    fn from(raw: RawBadge) -> Self {
        Self {
            label: raw.label.unwrap_or_default(),
            kind: raw
                .kind
                .filter(|k| !k.is_empty())
                .unwrap_or_else(|| DEFAULT_BADGE_KIND.to_string()),
        }
    }
}

/// Deserialize the entry fields of a single-type envelope, in either layout
fn entry<T: DeserializeOwned>(path: &str, envelope: &Value) -> Result<T, CmsError> {
    let fields = EntryShape::of_envelope(envelope)
        .and_then(|shape| shape.fields())
        .ok_or_else(|| CmsError::decode(path, "response has no data object"))?;

    serde_json::from_value(Value::Object(fields.clone())).map_err(|e| CmsError::decode(path, e))
}
