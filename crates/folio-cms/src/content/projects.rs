//! Project cards

use super::{Badge, Media, RawBadge};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const PATH: &str = "/api/project\
?populate[projects][populate][cover]=true\
&populate[projects][populate][badges]=true\
&populate[projects][populate][highlights]=true\
&populate[projects][populate][blogSection]=true";

/// Projects block content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectsContent {
    /// Section title
    pub title: String,
    /// Text under the title
    pub subtitle: Option<String>,
    /// Cards in CMS order
    pub items: Vec<Project>,
}

/// Long-form write-up section of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogSection {
    /// Optional heading
    pub heading: Option<String>,
    /// Body text
    pub body: String,
}

/// One project card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// CMS id, stringified
    pub id: String,
    /// Title
    pub title: String,
    /// Short description
    pub description: String,
    /// First cover image
    pub cover: Option<Media>,
    /// Start date as entered
    pub start_date: Option<String>,
    /// End date as entered
    pub end_date: Option<String>,
    /// Live demo link
    pub demo_url: Option<String>,
    /// Source repository link
    pub repo_url: Option<String>,
    /// Technology tags
    pub badges: Vec<Badge>,
    /// One-line highlights
    pub highlights: Vec<String>,
    /// Title of the write-up
    pub blog_title: Option<String>,
    /// Write-up sections
    pub blog: Vec<BlogSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawProjects {
    heading: Option<String>,
    description: Option<String>,
    projects: Option<Vec<RawProject>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawProject {
    id: Value,
    title: Option<String>,
    description: Option<String>,
    cover: Option<Vec<Media>>,
    start_date: Option<String>,
    end_date: Option<String>,
    demo_url: Option<String>,
    repo_url: Option<String>,
    badges: Option<Vec<RawBadge>>,
    highlights: Option<Vec<RawHighlight>>,
    blog_title: Option<String>,
    blog_section: Option<Vec<RawBlogSection>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHighlight {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBlogSection {
    heading: Option<String>,
    body: Option<String>,
}

pub(crate) fn normalize(raw: RawProjects) -> ProjectsContent {
    ProjectsContent {
        title: raw.heading.unwrap_or_default(),
        subtitle: raw.description,
        items: raw
            .projects
            .unwrap_or_default()
            .into_iter()
            .map(map_project)
            .collect(),
    }
}

fn map_project(p: RawProject) -> Project {
    Project {
        id: match p.id {
            Value::String(id) => id,
            Value::Null => String::new(),
            other => other.to_string(),
        },
        title: p.title.unwrap_or_default(),
        description: p.description.unwrap_or_default(),
        cover: p.cover.and_then(|covers| covers.into_iter().next()),
        start_date: p.start_date,
        end_date: p.end_date,
        demo_url: p.demo_url,
        repo_url: p.repo_url,
        badges: p
            .badges
            .unwrap_or_default()
            .into_iter()
            .map(Badge::from)
            .collect(),
        highlights: p
            .highlights
            .unwrap_or_default()
            .into_iter()
            .filter_map(|h| h.text)
            .collect(),
        blog_title: p.blog_title,
        blog: p
            .blog_section
            .unwrap_or_default()
            .into_iter()
            .map(|s| BlogSection {
                heading: s.heading,
                body: s.body.unwrap_or_default(),
            })
            .collect(),
    }
}
