use crate::School;

/// Case-insensitive substring search over school name and city.
///
/// Ordering contract:
/// - `filter_schools` yields matches in catalog (load) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    /// Trims and lowercases the raw input box value.
    pub fn parse(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    /// An empty query matches every school.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, school: &School) -> bool {
        if self.is_empty() {
            return true;
        }
        school.name.to_lowercase().contains(&self.needle)
            || school.city.to_lowercase().contains(&self.needle)
    }
}

pub fn filter_schools<'a>(schools: &'a [School], query: &SearchQuery) -> Vec<&'a School> {
    schools.iter().filter(|s| query.matches(s)).collect()
}
