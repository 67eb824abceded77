use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BonusId(pub String);

impl BonusId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BonusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raised when a CLI or query value does not name a known tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct TagParseError {
    pub kind: &'static str,
    pub value: String,
}

fn parse_tag<T: Copy>(
    kind: &'static str,
    raw: &str,
    all: &[T],
    tag: impl Fn(T) -> &'static str,
) -> Result<T, TagParseError> {
    let needle = raw.trim();
    all.iter()
        .copied()
        .find(|candidate| tag(*candidate).eq_ignore_ascii_case(needle))
        .ok_or_else(|| TagParseError {
            kind,
            value: raw.to_string(),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "natalità")]
    Birth,
    #[serde(rename = "famiglia")]
    Family,
    #[serde(rename = "educazione")]
    Education,
    #[serde(rename = "casa")]
    Housing,
    #[serde(rename = "lavoro")]
    Work,
    #[serde(rename = "utenze")]
    Utilities,
    #[serde(rename = "sostegno_alimentare")]
    FoodSupport,
    #[serde(rename = "salute")]
    Health,
    #[serde(rename = "anziani")]
    Elderly,
    #[serde(rename = "cultura")]
    Culture,
}

impl Category {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Birth,
            Self::Family,
            Self::Education,
            Self::Housing,
            Self::Work,
            Self::Utilities,
            Self::FoodSupport,
            Self::Health,
            Self::Elderly,
            Self::Culture,
        ]
    }

    /// Wire tag as it appears in the dataset.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Birth => "natalità",
            Self::Family => "famiglia",
            Self::Education => "educazione",
            Self::Housing => "casa",
            Self::Work => "lavoro",
            Self::Utilities => "utenze",
            Self::FoodSupport => "sostegno_alimentare",
            Self::Health => "salute",
            Self::Elderly => "anziani",
            Self::Culture => "cultura",
        }
    }
}

impl FromStr for Category {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag("category", s, &Self::ordered(), Self::tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusStatus {
    #[serde(rename = "attivo")]
    Active,
    #[serde(rename = "scaduto")]
    Expired,
    #[serde(rename = "in_arrivo")]
    Upcoming,
    #[serde(rename = "sperimentale")]
    Experimental,
    #[serde(rename = "in_scadenza")]
    ExpiringSoon,
}

impl BonusStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Active,
            Self::Upcoming,
            Self::Expired,
            Self::ExpiringSoon,
            Self::Experimental,
        ]
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Active => "attivo",
            Self::Expired => "scaduto",
            Self::Upcoming => "in_arrivo",
            Self::Experimental => "sperimentale",
            Self::ExpiringSoon => "in_scadenza",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Attivo",
            Self::Expired => "Scaduto",
            Self::Upcoming => "In arrivo",
            Self::Experimental => "Sperimentale",
            Self::ExpiringSoon => "In scadenza",
        }
    }
}

impl FromStr for BonusStatus {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag("status", s, &Self::ordered(), Self::tag)
    }
}

/// Age bracket used both by bonus requirements and by the children on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChildAgeBracket {
    #[serde(rename = "gravidanza")]
    Prenatal,
    #[serde(rename = "0-1")]
    UnderOne,
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "3-18")]
    ThreeToEighteen,
    #[serde(rename = "18-21")]
    EighteenToTwentyOne,
    #[serde(rename = "disabile", alias = "disabili")]
    DisabledNoAgeLimit,
}

impl ChildAgeBracket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Prenatal,
            Self::UnderOne,
            Self::OneToThree,
            Self::ThreeToEighteen,
            Self::EighteenToTwentyOne,
            Self::DisabledNoAgeLimit,
        ]
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Prenatal => "gravidanza",
            Self::UnderOne => "0-1",
            Self::OneToThree => "1-3",
            Self::ThreeToEighteen => "3-18",
            Self::EighteenToTwentyOne => "18-21",
            Self::DisabledNoAgeLimit => "disabile",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Prenatal => "In gravidanza",
            Self::UnderOne => "0-1 anno",
            Self::OneToThree => "1-3 anni",
            Self::ThreeToEighteen => "3-18 anni",
            Self::EighteenToTwentyOne => "18-21 anni",
            Self::DisabledNoAgeLimit => "Disabile (senza limiti di età)",
        }
    }

    /// Bracket for a child of the given age in whole years; negative ages are pregnancies.
    pub fn from_age(years: i32) -> Option<Self> {
        match years {
            i32::MIN..=-1 => Some(Self::Prenatal),
            0 => Some(Self::UnderOne),
            1..=2 => Some(Self::OneToThree),
            3..=17 => Some(Self::ThreeToEighteen),
            18..=21 => Some(Self::EighteenToTwentyOne),
            _ => None,
        }
    }
}

impl FromStr for ChildAgeBracket {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("disabili") {
            return Ok(Self::DisabledNoAgeLimit);
        }
        parse_tag("child age bracket", s, &Self::ordered(), Self::tag)
    }
}

/// Amount paid by a bonus for one ISEE bracket; some brackets only carry prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BracketAmount {
    Value(f64),
    Text(String),
}

/// One ISEE bracket; a missing bound means the bracket is open on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeBracket {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(rename = "importo")]
    pub amount: BracketAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipo")]
pub enum AmountSpec {
    #[serde(rename = "fisso")]
    Fixed {
        #[serde(rename = "valore", default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    #[serde(rename = "variabile")]
    Variable {
        #[serde(rename = "fasce_isee", default)]
        brackets: Vec<IncomeBracket>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

impl AmountSpec {
    pub fn note(&self) -> Option<&str> {
        match self {
            AmountSpec::Fixed { note, .. } | AmountSpec::Variable { note, .. } => note.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IseeRequirement {
    #[serde(rename = "richiesto")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl IseeRequirement {
    pub(crate) fn note_mentions(&self, needle: &str) -> bool {
        self.note
            .as_deref()
            .map(|note| note.to_lowercase().contains(needle))
            .unwrap_or(false)
    }
}

/// Free-text requirement pair as authored in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "descrizione")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(rename = "cittadinanza", default, skip_serializing_if = "Option::is_none")]
    pub citizenship: Option<String>,
    #[serde(rename = "residenza", default, skip_serializing_if = "Option::is_none")]
    pub residence: Option<String>,
    #[serde(rename = "eta_figli", default, skip_serializing_if = "Vec::is_empty")]
    pub child_ages: Vec<ChildAgeBracket>,
    #[serde(rename = "altri", default, skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<Requirement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    #[serde(rename = "data", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationMethod {
    #[serde(rename = "metodo")]
    pub method: String,
    #[serde(rename = "documenti", default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Immutable catalog entry as supplied by the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    pub id: BonusId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "categoria")]
    pub categories: Vec<Category>,
    pub status: BonusStatus,
    #[serde(rename = "descrizione")]
    pub description: String,
    #[serde(rename = "importo")]
    pub amount: AmountSpec,
    #[serde(default)]
    pub isee: IseeRequirement,
    #[serde(rename = "requisiti", default)]
    pub requirements: Requirements,
    #[serde(rename = "scadenza", default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Deadline>,
    #[serde(rename = "link_ufficiale", default)]
    pub official_link: String,
    #[serde(rename = "come_fare_domanda", default)]
    pub application: ApplicationMethod,
    #[serde(rename = "compatibilita", default, skip_serializing_if = "Vec::is_empty")]
    pub compatible_with: Vec<String>,
    #[serde(rename = "note_aggiuntive", default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl Bonus {
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Lower-cased JSON rendering of the free-text requirements, used by keyword gates.
    pub(crate) fn other_requirements_text(&self) -> String {
        serde_json::to_string(&self.requirements.other)
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// On-disk dataset envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusDataset {
    pub bonus: Vec<Bonus>,
    #[serde(rename = "ultimo_aggiornamento", default)]
    pub last_updated: String,
}
