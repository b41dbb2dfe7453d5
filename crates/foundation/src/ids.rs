use std::fmt;

/// Stable identifier of a school, as it appears in the data source.
///
/// Numeric ids in the source data are normalised to their decimal string form,
/// so `7` and `"7"` name the same school.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchoolId(String);

impl SchoolId {
    pub fn new(id: impl Into<String>) -> Self {
        SchoolId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchoolId {
    fn from(s: &str) -> Self {
        SchoolId::new(s)
    }
}

impl From<String> for SchoolId {
    fn from(s: String) -> Self {
        SchoolId(s)
    }
}

impl From<u64> for SchoolId {
    fn from(n: u64) -> Self {
        SchoolId(n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::SchoolId;

    #[test]
    fn numeric_and_string_ids_are_equal() {
        assert_eq!(SchoolId::from(7u64), SchoolId::from("7"));
        assert_eq!(SchoolId::from(7u64).as_str(), "7");
    }
}
