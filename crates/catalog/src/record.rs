use serde::{Deserialize, Serialize};

/// Wire schema of one entry in `schools.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub lat: f64,
    pub lng: f64,
    // Any JSON value decodes; anything but a positive integer is dropped on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<serde_json::Value>,
}

/// Ids are strings in the published data, but hand-edited files use integers too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(u64),
}

impl RecordId {
    pub fn into_string(self) -> String {
        match self {
            RecordId::Text(s) => s,
            RecordId::Number(n) => n.to_string(),
        }
    }
}
