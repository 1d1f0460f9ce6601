//! Tracked content sections
//!
//! The set is closed: adding a section means adding a variant here, a field
//! in the CMS manifest entry, and a fetcher on the client side.

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One independently versioned unit of content
///
/// Variant order is the enumeration order used by diffs and by the global
/// version digest. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    /// Landing block: greeting, tagline, resume link
    Home,
    /// Biography, socials and bullet points
    About,
    /// Contact heading and description
    Contact,
    /// Skill categories
    Skills,
    /// Work and education timeline
    Experience,
    /// Reviewer quotes
    Testimonials,
}

impl SectionKey {
    /// Number of tracked sections
    pub const COUNT: usize = 6;

    /// All sections in enumeration order
    pub const ALL: [SectionKey; Self::COUNT] = [
        SectionKey::Home,
        SectionKey::About,
        SectionKey::Contact,
        SectionKey::Skills,
        SectionKey::Experience,
        SectionKey::Testimonials,
    ];

    /// Position in [`SectionKey::ALL`]
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, also used as the content cache key
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
        }
    }

    /// Name of this section's token field on the CMS manifest entry
    #[inline]
    #[must_use]
    pub const fn version_field(self) -> &'static str {
        match self {
            Self::Home => "homeVersion",
            Self::About => "aboutVersion",
            Self::Contact => "contactVersion",
            Self::Skills => "skillsVersion",
            Self::Experience => "experienceVersion",
            Self::Testimonials => "testimonialsVersion",
        }
    }

    /// Single-type API id on the CMS (`/api/{content_type}`)
    ///
    /// Note the singular forms for skills and testimonials.
    #[inline]
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Skills => "skill",
            Self::Experience => "experience",
            Self::Testimonials => "testimonial",
        }
    }

    /// Model uid reported by CMS webhooks for this section
    #[inline]
    #[must_use]
    pub const fn model_uid(self) -> &'static str {
        match self {
            Self::Home => "api::home.home",
            Self::About => "api::about.about",
            Self::Contact => "api::contact.contact",
            Self::Skills => "api::skill.skill",
            Self::Experience => "api::experience.experience",
            Self::Testimonials => "api::testimonial.testimonial",
        }
    }

    /// Map a webhook model uid back to its section
    #[must_use]
    pub fn from_model_uid(uid: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.model_uid() == uid)
    }
}

impl Display for SectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ManifestError::UnknownSection(s.to_string()))
    }
}
