pub mod query;
pub mod record;

use std::collections::BTreeMap;

use foundation::{LatLng, LatLngBounds, SchoolId};
use tracing::{info, warn};

pub use query::{SearchQuery, filter_schools};
pub use record::{RecordId, SchoolRecord};

/// A validated school, immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub city: String,
    pub description: String,
    pub photo: Option<String>,
    pub link: Option<String>,
    pub position: LatLng,
    /// Position in the curated tour; `None` keeps the school off the route.
    pub order: Option<u32>,
}

impl School {
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    Decode(String),
    InvalidCoordinates { id: SchoolId, lat: f64, lng: f64 },
    DuplicateId(SchoolId),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Decode(msg) => write!(f, "school data is not valid JSON: {msg}"),
            CatalogError::InvalidCoordinates { id, lat, lng } => {
                write!(f, "school {id} has invalid coordinates ({lat}, {lng})")
            }
            CatalogError::DuplicateId(id) => write!(f, "school id {id} appears more than once"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// The entity store: every school of one load, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchoolCatalog {
    schools: Vec<School>,
    by_id: BTreeMap<SchoolId, usize>,
}

impl SchoolCatalog {
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<SchoolRecord> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Decode(e.to_string()))?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<SchoolRecord>) -> Result<Self, CatalogError> {
        let mut schools = Vec::with_capacity(records.len());
        let mut by_id = BTreeMap::new();

        for rec in records {
            let id = SchoolId::new(rec.id.into_string());
            let position = LatLng::new(rec.lat, rec.lng);
            if !position.is_valid() {
                return Err(CatalogError::InvalidCoordinates {
                    id,
                    lat: rec.lat,
                    lng: rec.lng,
                });
            }
            if by_id.contains_key(&id) {
                return Err(CatalogError::DuplicateId(id));
            }

            let order = normalize_order(&id, rec.order);
            by_id.insert(id.clone(), schools.len());
            schools.push(School {
                id,
                name: rec.name,
                city: rec.city,
                description: rec.description,
                photo: non_empty(rec.photo),
                link: non_empty(rec.link),
                position,
                order,
            });
        }

        let ordered = schools.iter().filter(|s| s.is_ordered()).count();
        info!(schools = schools.len(), ordered, "school catalog loaded");

        Ok(Self { schools, by_id })
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    pub fn get(&self, id: &SchoolId) -> Option<&School> {
        self.by_id.get(id).map(|&idx| &self.schools[idx])
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.schools.iter().map(|s| s.position))
    }
}

fn normalize_order(id: &SchoolId, raw: Option<serde_json::Value>) -> Option<u32> {
    let value = match raw? {
        serde_json::Value::Null => return None,
        serde_json::Value::Number(n) => n.as_f64()?,
        other => {
            warn!(school = %id, order = %other, "ignoring order that is not a number");
            return None;
        }
    };
    if value.fract() == 0.0 && (1.0..=f64::from(u32::MAX)).contains(&value) {
        return Some(value as u32);
    }
    warn!(school = %id, order = value, "ignoring order that is not a positive integer");
    None
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}
