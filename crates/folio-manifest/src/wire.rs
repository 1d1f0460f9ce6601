//! CMS wire shapes
//!
//! The CMS answers single-type reads with an envelope `{ "data": … }`.
//! Depending on its schema version the entry fields are either nested under
//! `data.attributes` or flattened directly onto `data`. [`EntryShape`]
//! decides which one it is looking at; everything past this module sees a
//! normalized [`VersionManifest`].

use crate::manifest::{SectionVersions, VersionManifest};
use crate::section::SectionKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Manifest entry field holding the global token
pub const GLOBAL_VERSION_FIELD: &str = "globalVersion";

/// Entry timestamp field read by the recompute endpoint
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Comma-separated field list for `GET /api/manifest?fields=…`
#[must_use]
pub fn manifest_fields_query() -> String {
    std::iter::once(GLOBAL_VERSION_FIELD)
        .chain(SectionKey::ALL.into_iter().map(SectionKey::version_field))
        .collect::<Vec<_>>()
        .join(",")
}

/// Which of the two entry layouts a `data` object uses
#[derive(Debug, Clone, Copy)]
pub enum EntryShape<'a> {
    /// Fields under `data.attributes`; `None` when `attributes` is present but not an object
    Nested(Option<&'a Map<String, Value>>),
    /// Fields directly on `data`
    Flat(&'a Map<String, Value>),
}

impl<'a> EntryShape<'a> {
    /// Classify the `data` member of an envelope
    ///
    /// Returns `None` when `data` is absent or not an object.
    #[must_use]
    pub fn of_envelope(envelope: &'a Value) -> Option<Self> {
        Self::sniff(envelope.get("data")?)
    }

    /// Classify a `data` object
    #[must_use]
    pub fn sniff(data: &'a Value) -> Option<Self> {
        let object = data.as_object()?;
        Some(match object.get("attributes") {
            Some(attributes) => Self::Nested(attributes.as_object()),
            None => Self::Flat(object),
        })
    }

    /// The map the entry fields live in
    #[inline]
    #[must_use]
    pub fn fields(&self) -> Option<&'a Map<String, Value>> {
        match *self {
            Self::Nested(fields) => fields,
            Self::Flat(fields) => Some(fields),
        }
    }

    /// String value of one field; non-strings read as absent
    #[must_use]
    pub fn string(&self, name: &str) -> Option<String> {
        self.fields()?
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Normalize a manifest envelope into a [`VersionManifest`]
///
/// Missing fields become `None` (sections) or `""` (global token). An
/// envelope without a usable `data` object yields an all-unknown manifest.
#[must_use]
pub fn normalize_manifest(envelope: &Value) -> VersionManifest {
    let Some(shape) = EntryShape::of_envelope(envelope) else {
        return VersionManifest::default();
    };

    let mut sections = SectionVersions::new();
    for key in SectionKey::ALL {
        sections.set(key, shape.string(key.version_field()));
    }

    VersionManifest::new(
        shape.string(GLOBAL_VERSION_FIELD).unwrap_or_default(),
        sections,
    )
}

/// `updatedAt` of a single-type entry, from either layout
#[must_use]
pub fn extract_updated_at(envelope: &Value) -> Option<String> {
    EntryShape::of_envelope(envelope)?.string(UPDATED_AT_FIELD)
}

/// Manifest entry as written back to the CMS (`PUT /api/manifest`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFields {
    /// Derived global token
    pub global_version: String,
    /// Home section token
    pub home_version: Option<String>,
    /// About section token
    pub about_version: Option<String>,
    /// Contact section token
    pub contact_version: Option<String>,
    /// Skills section token
    pub skills_version: Option<String>,
    /// Experience section token
    pub experience_version: Option<String>,
    /// Testimonials section token
    pub testimonials_version: Option<String>,
}

impl ManifestFields {
    /// Wrap in the `{ "data": … }` envelope the CMS expects on writes
    #[must_use]
    pub fn into_write_body(self) -> WriteBody {
        WriteBody { data: self }
    }
}

impl From<&VersionManifest> for ManifestFields {
    fn from(manifest: &VersionManifest) -> Self {
        let token = |key| manifest.section(key).map(str::to_string);
        Self {
            global_version: manifest.global_version.clone(),
            home_version: token(SectionKey::Home),
            about_version: token(SectionKey::About),
            contact_version: token(SectionKey::Contact),
            skills_version: token(SectionKey::Skills),
            experience_version: token(SectionKey::Experience),
            testimonials_version: token(SectionKey::Testimonials),
        }
    }
}

impl From<ManifestFields> for VersionManifest {
    fn from(fields: ManifestFields) -> Self {
        let mut sections = SectionVersions::new();
        sections.set(SectionKey::Home, fields.home_version);
        sections.set(SectionKey::About, fields.about_version);
        sections.set(SectionKey::Contact, fields.contact_version);
        sections.set(SectionKey::Skills, fields.skills_version);
        sections.set(SectionKey::Experience, fields.experience_version);
        sections.set(SectionKey::Testimonials, fields.testimonials_version);
        VersionManifest::new(fields.global_version, sections)
    }
}

/// Body of a manifest write request
#[derive(Debug, Clone, Serialize)]
pub struct WriteBody {
    /// Entry fields
    pub data: ManifestFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn full_fields() -> Value {
        json!({
            "globalVersion": "abc-2024",
            "homeVersion": "h",
            "aboutVersion": "a",
            "contactVersion": "c",
            "skillsVersion": "s",
            "experienceVersion": "e",
            "testimonialsVersion": "t",
        })
    }

    #[test]
    fn fields_query_lists_global_then_sections() {
        assert_eq!(
            manifest_fields_query(),
            "globalVersion,homeVersion,aboutVersion,contactVersion,skillsVersion,experienceVersion,testimonialsVersion"
        );
    }

    #[test]
    fn nested_and_flat_shapes_normalize_identically() {
        let nested = json!({ "data": { "id": 1, "attributes": full_fields() } });
        let mut flat = full_fields();
        flat["id"] = json!(1);
        let flat = json!({ "data": flat });

        let a = normalize_manifest(&nested);
        let b = normalize_manifest(&flat);

        assert_eq!(a, b);
        assert_eq!(a.global_version, "abc-2024");
        assert_eq!(a.section(SectionKey::Testimonials), Some("t"));
    }

    #[test]
    fn missing_fields_default() {
        let manifest = normalize_manifest(&json!({ "data": { "homeVersion": "h" } }));

        assert_eq!(manifest.global_version, "");
        assert_eq!(manifest.section(SectionKey::Home), Some("h"));
        assert_eq!(manifest.section(SectionKey::About), None);
    }

    #[test]
    fn non_string_values_read_as_unknown() {
        let manifest = normalize_manifest(&json!({
            "data": { "homeVersion": 42, "aboutVersion": null, "globalVersion": {} }
        }));

        assert_eq!(manifest.section(SectionKey::Home), None);
        assert_eq!(manifest.section(SectionKey::About), None);
        assert_eq!(manifest.global_version, "");
    }

    #[test]
    fn unusable_envelopes_yield_empty_manifest() {
        assert_eq!(normalize_manifest(&json!({})), VersionManifest::default());
        assert_eq!(normalize_manifest(&json!({ "data": null })), VersionManifest::default());
        assert_eq!(
            normalize_manifest(&json!({ "data": { "attributes": null, "homeVersion": "h" } })),
            VersionManifest::default()
        );
    }

    #[test]
    fn updated_at_from_both_shapes() {
        let flat = json!({ "data": { "updatedAt": "2024-05-01T10:00:00.000Z" } });
        let nested = json!({ "data": { "attributes": { "updatedAt": "2024-05-02T10:00:00.000Z" } } });

        assert_eq!(extract_updated_at(&flat).as_deref(), Some("2024-05-01T10:00:00.000Z"));
        assert_eq!(extract_updated_at(&nested).as_deref(), Some("2024-05-02T10:00:00.000Z"));
        assert_eq!(extract_updated_at(&json!({ "data": null })), None);
    }

    #[test]
    fn write_body_serializes_nulls() {
        let manifest = VersionManifest::uniform("g", "1").without_section(SectionKey::Home);
        let body = serde_json::to_value(ManifestFields::from(&manifest).into_write_body()).unwrap();

        assert_eq!(body["data"]["globalVersion"], "g");
        assert!(body["data"]["homeVersion"].is_null());
        assert_eq!(body["data"]["aboutVersion"], "1");
    }

    proptest! {
        #[test]
        fn prop_fields_conversion_preserves_manifest(
            global in "[a-z0-9-]{0,16}",
            tokens in proptest::collection::vec(proptest::option::of("[a-z0-9:.]{1,10}"), SectionKey::COUNT),
        ) {
            let mut sections = SectionVersions::new();
            for (key, token) in SectionKey::ALL.into_iter().zip(tokens) {
                sections.set(key, token);
            }
            let manifest = VersionManifest::new(global, sections);

            let fields = ManifestFields::from(&manifest);
            let envelope = json!({ "data": { "attributes": serde_json::to_value(&fields).unwrap() } });

            prop_assert_eq!(VersionManifest::from(fields), manifest.clone());
            prop_assert_eq!(normalize_manifest(&envelope), manifest);
        }
    }
}
