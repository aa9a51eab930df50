//! Candidate items offered by a source.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One item eligible to be shown in the results list.
///
/// Sources may provide a bare string, a `[text, id]` pair, or a
/// `[text, id, {attributes}]` triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// The text that is matched against the query.
    pub text: String,
    /// Optional identifier supplied by the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Optional auxiliary attributes (e.g. a picture URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

impl Candidate {
    /// Creates a candidate with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: None,
            attributes: None,
        }
    }

    /// Sets the identifier.
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the attribute record.
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

impl From<&str> for Candidate {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Candidate {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCandidate {
    Text(String),
    Triple(String, Value, Map<String, Value>),
    Pair(String, Value),
}

impl<'de> Deserialize<'de> for Candidate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawCandidate::deserialize(deserializer) {
            Ok(RawCandidate::Text(text)) => Ok(Candidate::new(text)),
            Ok(RawCandidate::Pair(text, id)) => Ok(Candidate::new(text).with_id(id)),
            Ok(RawCandidate::Triple(text, id, attributes)) => {
                Ok(Candidate::new(text).with_id(id).with_attributes(attributes))
            }
            Err(_) => Err(de::Error::custom(
                "expected a string, [text, id], or [text, id, {attributes}]",
            )),
        }
    }
}

/// Builds a list of candidates from plain strings.
pub fn candidates<I, S>(items: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Candidate::new).collect()
}
