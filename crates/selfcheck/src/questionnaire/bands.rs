use serde::Serialize;

/// A labeled, inclusive score interval. The last band of a table has no upper
/// bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Band {
    pub key: &'static str,
    pub lower: u32,
    pub upper: Option<u32>,
    /// Report heading, e.g. `Very Low (0-12)`.
    pub title: &'static str,
    pub marker: &'static str,
    pub description: &'static str,
}

impl Band {
    pub fn contains(&self, total: u32) -> bool {
        total >= self.lower && self.upper.map_or(true, |upper| total <= upper)
    }
}

/// Ordered, exhaustive set of bands covering `[0, ∞)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandTable {
    bands: Vec<Band>,
}

impl BandTable {
    pub fn new(bands: Vec<Band>) -> Result<Self, BandTableError> {
        let table = Self { bands };
        table.check()?;
        Ok(table)
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Returns the unique band containing `total`.
    pub fn classify(&self, total: u32) -> Result<&Band, ClassificationError> {
        let mut matches = self.bands.iter().filter(|band| band.contains(total));
        match (matches.next(), matches.next()) {
            (Some(band), None) => Ok(band),
            (None, _) => Err(ClassificationError::NoBand { total }),
            (Some(_), Some(_)) => Err(ClassificationError::Ambiguous { total }),
        }
    }

    fn check(&self) -> Result<(), BandTableError> {
        let Some(first) = self.bands.first() else {
            return Err(BandTableError::Empty);
        };
        if first.lower != 0 {
            return Err(BandTableError::DoesNotStartAtZero { lower: first.lower });
        }

        for pair in self.bands.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let Some(upper) = current.upper else {
                return Err(BandTableError::OpenBandNotLast { key: current.key });
            };
            if upper < current.lower {
                return Err(BandTableError::Inverted { key: current.key });
            }
            if next.lower != upper + 1 {
                return Err(BandTableError::NotContiguous {
                    key: current.key,
                    next: next.key,
                });
            }
        }

        match self.bands.last() {
            Some(last) if last.upper.is_none() => Ok(()),
            Some(last) => Err(BandTableError::TopBandBounded { key: last.key }),
            None => Err(BandTableError::Empty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BandTableError {
    #[error("band table is empty")]
    Empty,
    #[error("first band starts at {lower}, expected 0")]
    DoesNotStartAtZero { lower: u32 },
    #[error("band '{key}' is open-ended but not the last band")]
    OpenBandNotLast { key: &'static str },
    #[error("band '{key}' has an upper bound below its lower bound")]
    Inverted { key: &'static str },
    #[error("bands '{key}' and '{next}' leave a gap or overlap")]
    NotContiguous {
        key: &'static str,
        next: &'static str,
    },
    #[error("top band '{key}' must be open-ended")]
    TopBandBounded { key: &'static str },
}

/// Raised only when a definition is malformed; never caused by user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("score {total} matches no configured band")]
    NoBand { total: u32 },
    #[error("score {total} matches more than one band")]
    Ambiguous { total: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(key: &'static str, lower: u32, upper: Option<u32>) -> Band {
        Band {
            key,
            lower,
            upper,
            title: key,
            marker: "*",
            description: "",
        }
    }

    #[test]
    fn classifies_inclusive_bounds_and_open_top() {
        let table = BandTable::new(vec![
            band("a", 0, Some(4)),
            band("b", 5, Some(9)),
            band("c", 10, None),
        ])
        .expect("valid table");

        assert_eq!(table.classify(0).expect("a").key, "a");
        assert_eq!(table.classify(4).expect("a").key, "a");
        assert_eq!(table.classify(5).expect("b").key, "b");
        assert_eq!(table.classify(10).expect("c").key, "c");
        assert_eq!(table.classify(1_000).expect("c").key, "c");
    }

    #[test]
    fn rejects_gaps_overlaps_and_bounded_top() {
        let gap = BandTable::new(vec![band("a", 0, Some(4)), band("b", 6, None)]);
        assert_eq!(
            gap,
            Err(BandTableError::NotContiguous {
                key: "a",
                next: "b"
            })
        );

        let overlap = BandTable::new(vec![band("a", 0, Some(4)), band("b", 4, None)]);
        assert!(matches!(overlap, Err(BandTableError::NotContiguous { .. })));

        let bounded = BandTable::new(vec![band("a", 0, Some(4)), band("b", 5, Some(9))]);
        assert_eq!(bounded, Err(BandTableError::TopBandBounded { key: "b" }));

        let offset = BandTable::new(vec![band("a", 1, None)]);
        assert_eq!(offset, Err(BandTableError::DoesNotStartAtZero { lower: 1 }));

        assert_eq!(BandTable::new(Vec::new()), Err(BandTableError::Empty));
    }

    #[test]
    fn classify_reports_malformed_tables() {
        // Bypass construction checks to exercise the runtime guard.
        let table = BandTable {
            bands: vec![band("a", 0, Some(4)), band("b", 3, Some(6))],
        };
        assert_eq!(
            table.classify(9),
            Err(ClassificationError::NoBand { total: 9 })
        );
        assert_eq!(
            table.classify(3),
            Err(ClassificationError::Ambiguous { total: 3 })
        );
    }
}
