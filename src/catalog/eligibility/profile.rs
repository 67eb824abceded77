use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::super::domain::{ChildAgeBracket, TagParseError};

/// Italian regions accepted as a residence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Abruzzo,
    Basilicata,
    Calabria,
    Campania,
    EmiliaRomagna,
    FriuliVeneziaGiulia,
    Lazio,
    Liguria,
    Lombardia,
    Marche,
    Molise,
    Piemonte,
    Puglia,
    Sardegna,
    Sicilia,
    Toscana,
    TrentinoAltoAdige,
    Umbria,
    ValleDAosta,
    Veneto,
}

impl Region {
    pub const fn ordered() -> [Self; 20] {
        [
            Self::Abruzzo,
            Self::Basilicata,
            Self::Calabria,
            Self::Campania,
            Self::EmiliaRomagna,
            Self::FriuliVeneziaGiulia,
            Self::Lazio,
            Self::Liguria,
            Self::Lombardia,
            Self::Marche,
            Self::Molise,
            Self::Piemonte,
            Self::Puglia,
            Self::Sardegna,
            Self::Sicilia,
            Self::Toscana,
            Self::TrentinoAltoAdige,
            Self::Umbria,
            Self::ValleDAosta,
            Self::Veneto,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Abruzzo => "Abruzzo",
            Self::Basilicata => "Basilicata",
            Self::Calabria => "Calabria",
            Self::Campania => "Campania",
            Self::EmiliaRomagna => "Emilia-Romagna",
            Self::FriuliVeneziaGiulia => "Friuli-Venezia Giulia",
            Self::Lazio => "Lazio",
            Self::Liguria => "Liguria",
            Self::Lombardia => "Lombardia",
            Self::Marche => "Marche",
            Self::Molise => "Molise",
            Self::Piemonte => "Piemonte",
            Self::Puglia => "Puglia",
            Self::Sardegna => "Sardegna",
            Self::Sicilia => "Sicilia",
            Self::Toscana => "Toscana",
            Self::TrentinoAltoAdige => "Trentino-Alto Adige",
            Self::Umbria => "Umbria",
            Self::ValleDAosta => "Valle d'Aosta",
            Self::Veneto => "Veneto",
        }
    }
}

const NATIONWIDE_LABEL: &str = "Italia";

/// Where the household lives: anywhere in Italy, or a named region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Residence {
    Nationwide,
    Region(Region),
}

impl Residence {
    pub fn label(self) -> &'static str {
        match self {
            Residence::Nationwide => NATIONWIDE_LABEL,
            Residence::Region(region) => region.label(),
        }
    }
}

impl fmt::Display for Residence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Residence {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.eq_ignore_ascii_case(NATIONWIDE_LABEL) {
            return Ok(Residence::Nationwide);
        }
        Region::ordered()
            .into_iter()
            .find(|region| region.label().eq_ignore_ascii_case(needle))
            .map(Residence::Region)
            .ok_or_else(|| TagParseError {
                kind: "residence",
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Residence {
    type Error = TagParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Residence> for String {
    fn from(value: Residence) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Citizenship {
    #[serde(rename = "Italiana")]
    Italian,
    #[serde(rename = "UE")]
    EuropeanUnion,
    #[serde(rename = "Permesso soggiorno")]
    ResidencePermit,
}

impl Citizenship {
    pub const fn ordered() -> [Self; 3] {
        [Self::Italian, Self::EuropeanUnion, Self::ResidencePermit]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Italian => "Italiana",
            Self::EuropeanUnion => "UE",
            Self::ResidencePermit => "Permesso soggiorno",
        }
    }
}

impl FromStr for Citizenship {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ordered()
            .into_iter()
            .find(|candidate| {
                candidate.label().eq_ignore_ascii_case(needle)
                    || (matches!(candidate, Self::ResidencePermit)
                        && needle.eq_ignore_ascii_case("permesso"))
            })
            .ok_or_else(|| TagParseError {
                kind: "citizenship",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    #[serde(rename = "eta")]
    pub age_bracket: ChildAgeBracket,
    #[serde(rename = "disabile", default)]
    pub disabled: bool,
}

impl Child {
    pub fn new(age_bracket: ChildAgeBracket) -> Self {
        Self {
            age_bracket,
            disabled: false,
        }
    }

    pub fn disabled(age_bracket: ChildAgeBracket) -> Self {
        Self {
            age_bracket,
            disabled: true,
        }
    }
}

impl FromStr for Child {
    type Err = TagParseError;

    /// Parses `<bracket>` or `<bracket>:disabile`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((bracket, flag)) if flag.trim().eq_ignore_ascii_case("disabile") => {
                Ok(Child::disabled(bracket.parse()?))
            }
            Some(_) => Err(TagParseError {
                kind: "child",
                value: s.to_string(),
            }),
            None => Ok(Child::new(s.parse()?)),
        }
    }
}

/// User-entered household snapshot, rebuilt for every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityProfile {
    #[serde(default)]
    pub isee: Option<f64>,
    #[serde(default)]
    pub isee_sociosanitario: Option<f64>,
    #[serde(default)]
    pub gross_income: Option<f64>,
    #[serde(default)]
    pub residence: Option<Residence>,
    #[serde(default)]
    pub citizenship: Option<Citizenship>,
    #[serde(default)]
    pub applicant_age: Option<u32>,
    #[serde(default)]
    pub household_size: Option<u32>,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default)]
    pub owns_property: bool,
    #[serde(default)]
    pub household_disability: bool,
    #[serde(default)]
    pub children: Vec<Child>,
}

impl EligibilityProfile {
    /// Starting point of the eligibility form.
    pub fn nationwide_italian() -> Self {
        Self {
            residence: Some(Residence::Nationwide),
            citizenship: Some(Citizenship::Italian),
            ..Self::default()
        }
    }

    /// Residence and citizenship must both be filled before evaluation is meaningful.
    pub fn is_complete(&self) -> bool {
        self.residence.is_some() && self.citizenship.is_some()
    }

    pub fn has_disability(&self) -> bool {
        self.household_disability || self.children.iter().any(|child| child.disabled)
    }
}
