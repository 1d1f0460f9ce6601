//! Reviewer quotes
//!
//! A card carries several dated quotes. Blank quotes are dropped, the rest
//! are ordered newest first; the newest becomes the headline quote. Cards
//! left without any quote are dropped entirely.

use super::{Badge, Media, RawBadge};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

pub(crate) const PATH: &str = "/api/testimonial\
?populate[testimonials][populate][0]=badge\
&populate[testimonials][populate][1]=quotes\
&populate[testimonials][populate][2]=profilePicture\
&populate[testimonials][populate][3]=socialIcon";

/// Testimonials block content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestimonialsContent {
    /// Section title
    pub title: String,
    /// Text under the title
    pub subtitle: Option<String>,
    /// Cards in CMS order
    pub items: Vec<TestimonialItem>,
}

/// Dated quote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialQuote {
    /// Quote text
    pub quote: String,
    /// Date as entered
    pub date: String,
}

/// One reviewer card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialItem {
    /// `"{reviewer}-{company}-{date of newest quote}"`
    pub id: String,
    /// Reviewer name
    pub reviewer: String,
    /// Reviewer role
    pub role: String,
    /// Reviewer company
    pub company: String,
    /// Reviewer profile link
    pub profile_url: Option<String>,
    /// Where the review was published
    pub source_url: Option<String>,
    /// Reviewer picture URL as stored
    pub avatar_url: Option<String>,
    /// Source platform icon URL as stored
    pub social_icon_url: Option<String>,
    /// Newest quote
    pub quote: String,
    /// Date of the newest quote
    pub date: String,
    /// Older quotes, newest first
    pub extra_quotes: Vec<TestimonialQuote>,
    /// Tags
    pub badges: Vec<Badge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawTestimonials {
    heading: Option<String>,
    description: Option<String>,
    testimonials: Option<Vec<RawCard>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCard {
    reviewer_name: Option<String>,
    role: Option<String>,
    company: Option<String>,
    profile_url: Option<String>,
    source_url: Option<String>,
    profile_picture: Option<Media>,
    social_icon: Option<Media>,
    badge: Option<Vec<RawBadge>>,
    quotes: Option<Vec<RawQuote>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawQuote {
    quote: Option<String>,
    date: Option<String>,
}

pub(crate) fn normalize(raw: RawTestimonials) -> TestimonialsContent {
    TestimonialsContent {
        title: raw.heading.unwrap_or_default(),
        subtitle: raw.description,
        items: raw
            .testimonials
            .unwrap_or_default()
            .into_iter()
            .filter_map(map_card)
            .collect(),
    }
}

fn map_card(card: RawCard) -> Option<TestimonialItem> {
    let mut quotes: Vec<TestimonialQuote> = card
        .quotes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|q| {
            let quote = q.quote.filter(|text| !text.trim().is_empty())?;
            Some(TestimonialQuote {
                quote,
                date: q.date.unwrap_or_default(),
            })
        })
        .collect();

    // stable: equal or unparseable dates keep CMS order, unparseable last
    quotes.sort_by_key(|q| Reverse(parse_date(&q.date)));

    let mut quotes = quotes.into_iter();
    let main = quotes.next()?;
    let reviewer = card.reviewer_name.unwrap_or_default();
    let company = card.company.unwrap_or_default();

    Some(TestimonialItem {
        id: format!("{}-{}-{}", reviewer, company, main.date),
        reviewer,
        role: card.role.unwrap_or_default(),
        company,
        profile_url: card.profile_url,
        source_url: card.source_url,
        avatar_url: card.profile_picture.and_then(|m| m.url),
        social_icon_url: card.social_icon.and_then(|m| m.url),
        quote: main.quote,
        date: main.date,
        extra_quotes: quotes.collect(),
        badges: card
            .badge
            .unwrap_or_default()
            .into_iter()
            .map(Badge::from)
            .collect(),
    })
}

fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(date) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Content, ContentKey};
    use serde_json::json;

    fn decode(envelope: &serde_json::Value) -> TestimonialsContent {
        match Content::decode(ContentKey::Testimonials, envelope, None).unwrap() {
            Content::Testimonials(content) => content,
            other => panic!("expected testimonials, got {:?}", other.key()),
        }
    }

    #[test]
    fn newest_quote_becomes_headline() {
        let content = decode(&json!({
            "data": {
                "heading": "Kind words",
                "testimonials": [{
                    "reviewerName": "Grace",
                    "role": "CTO",
                    "company": "Navy",
                    "profilePicture": { "url": "/uploads/grace.jpg" },
                    "badge": [{ "label": "Mentor", "type": null }],
                    "quotes": [
                        { "quote": "Older", "date": "2021-01-10" },
                        { "quote": "   ", "date": "2024-01-01" },
                        { "quote": "Newest", "date": "2023-06-01T09:00:00Z" },
                        { "quote": "Undated", "date": "someday" }
                    ]
                }]
            }
        }));

        let card = &content.items[0];
        assert_eq!(card.quote, "Newest");
        assert_eq!(card.id, "Grace-Navy-2023-06-01T09:00:00Z");
        assert_eq!(
            card.extra_quotes.iter().map(|q| q.quote.as_str()).collect::<Vec<_>>(),
            vec!["Older", "Undated"]
        );
        assert_eq!(card.avatar_url.as_deref(), Some("/uploads/grace.jpg"));
        assert_eq!(card.badges[0].kind, "other");
    }

    #[test]
    fn cards_without_quotes_are_dropped() {
        let content = decode(&json!({
            "data": {
                "heading": "Kind words",
                "testimonials": [
                    { "reviewerName": "A", "quotes": [] },
                    { "reviewerName": "B", "quotes": [{ "quote": "", "date": "2020-01-01" }] },
                    { "reviewerName": "C", "company": "X", "quotes": [{ "quote": "Great", "date": "2020-01-01" }] }
                ]
            }
        }));

        assert_eq!(content.items.len(), 1);
        assert_eq!(content.items[0].reviewer, "C");
        assert!(content.items[0].extra_quotes.is_empty());
    }
}
