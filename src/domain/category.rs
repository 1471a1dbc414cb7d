// Data categories and the freshness set persisted across wake cycles

/// One of the four independently-aged data groups the cache tracks.
/// Fetching or invalidating one never implicitly touches another, except
/// through the day/hour rollover rules applied by the cache itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataCategory {
    Current,
    Daily,
    HourlyForecast,
    History,
}

impl DataCategory {
    /// Every category, in the order the refresh cycle fetches them.
    pub const ALL: [DataCategory; 4] = [
        DataCategory::Current,
        DataCategory::Daily,
        DataCategory::HourlyForecast,
        DataCategory::History,
    ];

    /// Persisted bit for this category. Values match the record layout the
    /// store has always used, so existing flag integers keep their meaning.
    fn bit(self) -> u32 {
        match self {
            DataCategory::Current => 1,
            DataCategory::Daily => 2,
            DataCategory::HourlyForecast => 4,
            DataCategory::History => 8,
        }
    }
}

/// Set of data categories. The only place category bits are ORed or ANDed;
/// everything else speaks in terms of membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategorySet(u32);

impl CategorySet {
    pub const EMPTY: CategorySet = CategorySet(0);

    pub fn all() -> Self {
        DataCategory::ALL
            .into_iter()
            .fold(Self::EMPTY, |set, c| set.with(c))
    }

    pub fn only(category: DataCategory) -> Self {
        Self::EMPTY.with(category)
    }

    #[must_use]
    pub fn with(self, category: DataCategory) -> Self {
        CategorySet(self.0 | category.bit())
    }

    #[must_use]
    pub fn without(self, category: DataCategory) -> Self {
        CategorySet(self.0 & !category.bit())
    }

    pub fn insert(&mut self, category: DataCategory) {
        *self = self.with(category);
    }

    pub fn remove(&mut self, category: DataCategory) {
        *self = self.without(category);
    }

    pub fn contains(self, category: DataCategory) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn union(self, other: CategorySet) -> Self {
        CategorySet(self.0 | other.0)
    }

    #[must_use]
    pub fn intersection(self, other: CategorySet) -> Self {
        CategorySet(self.0 & other.0)
    }

    /// Categories in `self` but not in `other`.
    #[must_use]
    pub fn difference(self, other: CategorySet) -> Self {
        CategorySet(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = DataCategory> {
        DataCategory::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Persisted integer form.
    pub fn to_bits(self) -> u32 {
        self.0
    }

    /// Rebuild from a persisted integer. Bits that do not correspond to a
    /// known category are dropped, so a record written by a newer firmware
    /// cannot smuggle in flags this build does not understand.
    pub fn from_bits(bits: u32) -> Self {
        DataCategory::ALL
            .into_iter()
            .filter(|c| bits & c.bit() != 0)
            .fold(Self::EMPTY, |set, c| set.with(c))
    }
}

impl std::fmt::Display for CategorySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for category in self.iter() {
            if !first {
                write!(f, "+")?;
            }
            write!(f, "{:?}", category)?;
            first = false;
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_round_trip() {
        let set = CategorySet::only(DataCategory::Daily).with(DataCategory::History);
        assert_eq!(CategorySet::from_bits(set.to_bits()), set);
        assert_eq!(set.to_bits(), 2 | 8);
    }

    #[test]
    fn test_unknown_bits_dropped() {
        let set = CategorySet::from_bits(0xFF);
        assert_eq!(set, CategorySet::all());
        assert_eq!(set.to_bits(), 15);
    }

    #[test]
    fn test_difference_is_complement_of_fresh() {
        let fresh = CategorySet::only(DataCategory::Daily);
        let stale = CategorySet::all().difference(fresh);
        assert!(!stale.contains(DataCategory::Daily));
        assert!(stale.contains(DataCategory::Current));
        assert!(stale.contains(DataCategory::HourlyForecast));
        assert!(stale.contains(DataCategory::History));
    }

    #[test]
    fn test_iter_order_matches_fetch_order() {
        let order: Vec<DataCategory> = CategorySet::all().iter().collect();
        assert_eq!(order, DataCategory::ALL.to_vec());
    }

    #[test]
    fn test_display() {
        assert_eq!(CategorySet::EMPTY.to_string(), "none");
        let set = CategorySet::only(DataCategory::Current).with(DataCategory::Daily);
        assert_eq!(set.to_string(), "Current+Daily");
    }
}
