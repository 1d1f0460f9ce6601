//! Social links collection
//!
//! Unlike the single-type sections this is a collection: `data` is an array
//! of entries, each in either entry layout. The icon relation may itself be
//! wrapped in `{ data: { attributes } }`.

use super::media_url;
use crate::error::CmsError;
use folio_manifest::EntryShape;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const PATH: &str = "/api/social-links?sort=order:asc&filters[show][$eq]=true&populate=icon";

/// Colour used when a link has none
pub const DEFAULT_COLOR: &str = "#0b2945";

/// One visible social link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    /// CMS id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Target URL
    pub url: String,
    /// Brand colour
    pub color: String,
    /// Absolute icon URL
    pub icon_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLink {
    name: Option<String>,
    url: Option<String>,
    color: Option<String>,
    icon: Option<Value>,
}

pub(crate) fn normalize(path: &str, envelope: &Value, base: Option<&str>) -> Result<Vec<SocialLink>, CmsError> {
    let entries = match envelope.get("data") {
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(Value::Null) | None => &[],
        Some(_) => return Err(CmsError::decode(path, "data is not an array")),
    };

    entries
        .iter()
        .map(|entry| {
            let fields = EntryShape::sniff(entry)
                .and_then(|shape| shape.fields())
                .ok_or_else(|| CmsError::decode(path, "social link entry is not an object"))?;
            let raw: RawLink =
                serde_json::from_value(Value::Object(fields.clone())).map_err(|e| CmsError::decode(path, e))?;

            let icon_path = raw.icon.as_ref().and_then(|icon| {
                icon.pointer("/data/attributes/url")
                    .or_else(|| icon.get("url"))
                    .and_then(Value::as_str)
            });

            Ok(SocialLink {
                id: entry.get("id").and_then(Value::as_i64).unwrap_or_default(),
                name: raw.name.unwrap_or_default(),
                url: raw.url.unwrap_or_default(),
                color: raw
                    .color
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                icon_url: media_url(base, icon_path),
            })
        })
        .collect()
}
