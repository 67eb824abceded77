use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::super::domain::{
    AmountSpec, Bonus, BonusStatus, Category, ChildAgeBracket, TagParseError,
};

/// Payment cadence, inferred from the amount type and the bonus wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisbursementType {
    #[serde(rename = "una_tantum")]
    LumpSum,
    #[serde(rename = "mensile")]
    Monthly,
    #[serde(rename = "annuale")]
    Annual,
}

impl DisbursementType {
    pub const fn ordered() -> [Self; 3] {
        [Self::LumpSum, Self::Monthly, Self::Annual]
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::LumpSum => "una_tantum",
            Self::Monthly => "mensile",
            Self::Annual => "annuale",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LumpSum => "Una tantum",
            Self::Monthly => "Mensile",
            Self::Annual => "Annuale",
        }
    }

    pub fn of(bonus: &Bonus) -> Self {
        if matches!(bonus.amount, AmountSpec::Fixed { .. }) {
            return Self::LumpSum;
        }

        let name = bonus.name.to_lowercase();
        let description = bonus.description.to_lowercase();
        let mentions = |needle: &str| name.contains(needle) || description.contains(needle);

        if mentions("mensile") {
            Self::Monthly
        } else if mentions("annuale") || mentions("annuo") {
            Self::Annual
        } else {
            Self::LumpSum
        }
    }
}

impl FromStr for DisbursementType {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ordered()
            .into_iter()
            .find(|candidate| candidate.tag().eq_ignore_ascii_case(needle))
            .ok_or_else(|| TagParseError {
                kind: "disbursement type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed ISEE bracket '{tag}'")]
pub struct BracketParseError {
    pub tag: String,
}

/// ISEE range selected in the filter sidebar: `"17000-25000"` or open-ended `"40000+"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IseeBracket {
    Range { floor: f64, ceiling: f64 },
    AtLeast { floor: f64 },
}

impl IseeBracket {
    /// Options offered by the catalog sidebar.
    pub fn standard() -> [(&'static str, &'static str); 4] {
        [
            ("0-17000", "Fino a 17.000€"),
            ("17000-25000", "17.000€ - 25.000€"),
            ("25000-40000", "25.000€ - 40.000€"),
            ("40000+", "Oltre 40.000€"),
        ]
    }

    /// Whether a bonus with the given ISEE bounds accepts households in this bracket.
    pub fn overlaps(&self, min: Option<f64>, max: Option<f64>) -> bool {
        let min = min.unwrap_or(0.0);
        match *self {
            IseeBracket::AtLeast { floor } => {
                max.map_or(true, |max| max > floor) && min <= floor
            }
            IseeBracket::Range { floor, ceiling } => match max {
                None => true,
                Some(max) => max >= floor && min <= ceiling,
            },
        }
    }
}

impl FromStr for IseeBracket {
    type Err = BracketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || BracketParseError { tag: s.to_string() };
        let tag = s.trim();

        if let Some(floor) = tag.strip_suffix('+') {
            let floor = floor.trim().parse::<f64>().map_err(|_| malformed())?;
            return Ok(IseeBracket::AtLeast { floor });
        }

        let (floor, ceiling) = tag.split_once('-').ok_or_else(malformed)?;
        let floor = floor.trim().parse::<f64>().map_err(|_| malformed())?;
        let ceiling = ceiling.trim().parse::<f64>().map_err(|_| malformed())?;
        Ok(IseeBracket::Range { floor, ceiling })
    }
}

impl fmt::Display for IseeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IseeBracket::Range { floor, ceiling } => write!(f, "{floor}-{ceiling}"),
            IseeBracket::AtLeast { floor } => write!(f, "{floor}+"),
        }
    }
}

/// Selections from the search bar and filter sidebar. Empty sets impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: String,
    pub isee: Vec<String>,
    pub categories: Vec<Category>,
    pub disbursement: Vec<DisbursementType>,
    pub child_ages: Vec<ChildAgeBracket>,
    pub status: Vec<BonusStatus>,
}

fn toggle<T: PartialEq>(selection: &mut Vec<T>, value: T) {
    if let Some(position) = selection.iter().position(|existing| *existing == value) {
        selection.remove(position);
    } else {
        selection.push(value);
    }
}

impl FilterCriteria {
    pub fn has_active_filters(&self) -> bool {
        !self.isee.is_empty()
            || !self.categories.is_empty()
            || !self.disbursement.is_empty()
            || !self.child_ages.is_empty()
            || !self.status.is_empty()
    }

    /// Drop every tag selection, keeping the search text.
    pub fn clear(&mut self) {
        self.isee.clear();
        self.categories.clear();
        self.disbursement.clear();
        self.child_ages.clear();
        self.status.clear();
    }

    pub fn toggle_isee(&mut self, tag: impl Into<String>) {
        toggle(&mut self.isee, tag.into());
    }

    pub fn toggle_category(&mut self, category: Category) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_disbursement(&mut self, disbursement: DisbursementType) {
        toggle(&mut self.disbursement, disbursement);
    }

    pub fn toggle_child_age(&mut self, bracket: ChildAgeBracket) {
        toggle(&mut self.child_ages, bracket);
    }

    pub fn toggle_status(&mut self, status: BonusStatus) {
        toggle(&mut self.status, status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_and_open_brackets() {
        assert_eq!(
            "17000-25000".parse::<IseeBracket>(),
            Ok(IseeBracket::Range {
                floor: 17000.0,
                ceiling: 25000.0
            })
        );
        assert_eq!(
            "40000+".parse::<IseeBracket>(),
            Ok(IseeBracket::AtLeast { floor: 40000.0 })
        );
        assert!("abc-25000".parse::<IseeBracket>().is_err());
        assert!("tanti".parse::<IseeBracket>().is_err());
    }

    #[test]
    fn open_bracket_excludes_bonuses_capped_at_floor() {
        let bracket = IseeBracket::AtLeast { floor: 40000.0 };
        assert!(!bracket.overlaps(None, Some(40000.0)));
        assert!(bracket.overlaps(None, Some(40000.5)));
        assert!(bracket.overlaps(None, None));
        assert!(!bracket.overlaps(Some(50000.0), None));
    }

    #[test]
    fn closed_bracket_uses_interval_overlap() {
        let bracket = IseeBracket::Range {
            floor: 17000.0,
            ceiling: 25000.0,
        };
        assert!(bracket.overlaps(None, Some(25000.0)));
        assert!(bracket.overlaps(None, Some(17000.0)));
        assert!(!bracket.overlaps(None, Some(15000.0)));
        assert!(!bracket.overlaps(Some(30000.0), Some(50000.0)));
        assert!(bracket.overlaps(Some(30000.0), None));
    }

    #[test]
    fn toggling_a_tag_twice_restores_selection() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_category(Category::Family);
        criteria.toggle_status(BonusStatus::Active);
        assert!(criteria.has_active_filters());

        criteria.toggle_category(Category::Family);
        assert!(criteria.categories.is_empty());

        criteria.search = "nido".to_string();
        criteria.clear();
        assert!(!criteria.has_active_filters());
        assert_eq!(criteria.search, "nido");
    }
}
