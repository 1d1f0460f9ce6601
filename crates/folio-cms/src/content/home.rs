//! Landing block

use super::Media;
use serde::{Deserialize, Serialize};

pub(crate) const PATH: &str = "/api/home?populate=resume";

/// Landing block content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    /// Greeting line
    pub greeting: String,
    /// Name shown highlighted
    pub highlighted_name: String,
    /// Job title
    pub job_title: String,
    /// Tagline under the title
    pub tag_line: String,
    /// Text logo
    pub name_logo: String,
    /// Label of the "view my work" button
    pub view_my_work_label: String,
    /// Label of the resume download button
    pub download_resume_label: String,
    /// Uploaded resume, if any
    pub resume: Option<Media>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct RawHome {
    greeting: Option<String>,
    highlighted_name: Option<String>,
    job_title: Option<String>,
    tag_line: Option<String>,
    name_logo: Option<String>,
    view_my_work_label: Option<String>,
    download_resume_label: Option<String>,
    resume: Option<Media>,
}

pub(crate) fn normalize(raw: RawHome) -> HomeContent {
    HomeContent {
        greeting: raw.greeting.unwrap_or_default(),
        highlighted_name: raw.highlighted_name.unwrap_or_default(),
        job_title: raw.job_title.unwrap_or_default(),
        tag_line: raw.tag_line.unwrap_or_default(),
        name_logo: raw.name_logo.unwrap_or_default(),
        view_my_work_label: raw.view_my_work_label.unwrap_or_default(),
        download_resume_label: raw.download_resume_label.unwrap_or_default(),
        resume: raw.resume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, ContentKey};
    use serde_json::json;

    #[test]
    fn home_maps_fields_and_resume() {
        let envelope = json!({
            "data": {
                "greeting": "Hi, I'm",
                "highlightedName": "Ada",
                "jobTitle": "Engineer",
                "tagLine": "Builds things",
                "nameLogo": "ADA",
                "viewMyWorkLabel": "Work",
                "downloadResumeLabel": "Resume",
                "resume": { "url": "/uploads/cv.pdf" }
            }
        });

        let Content::Home(home) = Content::decode(ContentKey::Home, &envelope, None).unwrap() else {
            panic!("expected home content");
        };
        assert_eq!(home.highlighted_name, "Ada");
        assert_eq!(home.resume.and_then(|m| m.url).as_deref(), Some("/uploads/cv.pdf"));
    }

    #[test]
    fn null_fields_become_empty() {
        let envelope = json!({ "data": { "greeting": null, "resume": null } });
        let Content::Home(home) = Content::decode(ContentKey::Home, &envelope, None).unwrap() else {
            panic!("expected home content");
        };
        assert_eq!(home, HomeContent::default());
    }
}
