//! Structured bibliographic output assembled from one accepted record.

use serde::Serialize;

/// A person, organization, or event name in display and database forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameRecord {
    /// Display name, trailing punctuation trimmed.
    pub name: String,
    /// Name with dates retained, stable enough to key a database row.
    pub db_name: String,
}

/// Bibliographic facts extracted from one MARC record.
///
/// Empty members are skipped on serialization so the JSON shape stays
/// close to the sparse mapping callers historically consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Edition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<NameRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contribs: Vec<NameRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub publishers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub isbn: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lccn: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oclc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_pages: Option<u32>,
}
