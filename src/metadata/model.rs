//! Data types shared by the metadata pipeline.
//!
//! [`CourseMetadata`] is the canonical, validated shape of a course NFT
//! metadata document. It serializes with the same field names the documents
//! use on IPFS, so a validated record can be written back out unchanged.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Validated metadata for a single course NFT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMetadata {
    /// Display name of the course.
    pub name: String,
    /// Long-form course description.
    pub description: String,
    /// URI of the course video, usually `ipfs://<cid>`.
    pub image: String,
    /// Ordered trait list shown on the NFT card.
    pub attributes: Vec<Attribute>,
    /// Fixed-shape course properties.
    pub properties: CourseProperties,
}

/// A single `{trait_type, value}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

/// Attribute values are either text or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(serde_json::Number),
    Text(String),
}

impl Default for AttributeValue {
    fn default() -> Self {
        AttributeValue::Text(String::new())
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::Number(n.into())
    }
}

/// Course properties. Every field has an empty / `false` default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProperties {
    pub category: String,
    pub course_type: String,
    pub accessibility_level: String,
    pub redeemable: bool,
    pub instructor_certified: bool,
    pub style: String,
}

// ---------------------------------------------------------------------------
// Fetch results
// ---------------------------------------------------------------------------

/// Metadata paired with the HTTP URL its video was resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMedia {
    pub metadata: CourseMetadata,
    pub video_url: String,
}

/// Outcome for one token of a batch fetch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    /// The id exactly as requested, including invalid ones.
    pub token_id: i64,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

/// Either the resolved media or the error message, never both.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    Metadata(ResolvedMedia),
    Error(String),
}

impl BatchItem {
    /// The resolved media, if this token succeeded.
    pub fn metadata(&self) -> Option<&ResolvedMedia> {
        match &self.outcome {
            BatchOutcome::Metadata(media) => Some(media),
            BatchOutcome::Error(_) => None,
        }
    }

    /// The error message, if this token failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            BatchOutcome::Metadata(_) => None,
            BatchOutcome::Error(msg) => Some(msg),
        }
    }
}
