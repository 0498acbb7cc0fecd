use std::sync::Arc;

/// Locations accepted for new submissions and included in unfiltered queries.
pub const DEFAULT_LOCATIONS: [&str; 18] = [
    "Albuquerque, New Mexico",
    "Carlsbad, California",
    "Chula Vista, California",
    "Colorado Springs, Colorado",
    "Denver, Colorado",
    "El Cajon, California",
    "El Paso, Texas",
    "Escondido, California",
    "Fresno, California",
    "La Mesa, California",
    "Las Vegas, Nevada",
    "Los Angeles, California",
    "Oceanside, California",
    "Phoenix, Arizona",
    "Sacramento, California",
    "Salt Lake City, Utah",
    "San Diego, California",
    "Tucson, Arizona",
];

/// The allowed-location set. Membership is exact, case-sensitive string equality.
///
/// Cheap to clone; the names are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSet {
    names: Arc<[String]>,
}

impl Default for LocationSet {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATIONS)
    }
}

impl LocationSet {
    /// Build a set from names, dropping blanks and duplicates while keeping order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name: String = name.into();
            let name = name.trim();
            if !name.is_empty() && !unique.iter().any(|n| n == name) {
                unique.push(name.to_string());
            }
        }
        Self {
            names: unique.into(),
        }
    }

    /// Parse a `;`-separated list. Commas belong to the `"City, State"` names.
    #[must_use]
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split(';'))
    }

    #[must_use]
    pub fn contains(&self, location: &str) -> bool {
        self.names.iter().any(|n| n == location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_eighteen_locations() {
        let set = LocationSet::default();
        assert_eq!(set.len(), 18);
        assert!(set.contains("Denver, Colorado"));
        assert!(set.contains("Salt Lake City, Utah"));
    }

    #[test]
    fn membership_is_exact() {
        let set = LocationSet::default();
        assert!(!set.contains("denver, colorado"));
        assert!(!set.contains("Denver"));
        assert!(!set.contains(" Denver, Colorado"));
        assert!(!set.contains("Nowhere"));
        assert!(!set.contains(""));
    }

    #[test]
    fn parse_list_splits_on_semicolons() {
        let set = LocationSet::parse_list("Austin, Texas; Boise, Idaho;;Austin, Texas");
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["Austin, Texas", "Boise, Idaho"]
        );
    }

    #[test]
    fn parse_list_of_blanks_is_empty() {
        assert!(LocationSet::parse_list(" ; ").is_empty());
    }
}
