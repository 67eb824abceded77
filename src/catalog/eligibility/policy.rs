use serde::{Deserialize, Serialize};

/// Verdict for a single bonus against a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum EligibilityDecision {
    Eligible,
    /// Every gate passed, but some only because the data needed to verify them was missing.
    EligibleUnverified { notes: Vec<String> },
    Ineligible { reason: IneligibilityReason },
}

impl EligibilityDecision {
    pub fn is_eligible(&self) -> bool {
        !matches!(self, EligibilityDecision::Ineligible { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityDecision::Eligible => "requisiti soddisfatti".to_string(),
            EligibilityDecision::EligibleUnverified { notes } => {
                if notes.is_empty() {
                    "compatibile, da verificare".to_string()
                } else {
                    format!("compatibile, da verificare: {}", notes.join("; "))
                }
            }
            EligibilityDecision::Ineligible { reason } => reason.summary(),
        }
    }
}

/// First gate that rejected the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum IneligibilityReason {
    ResidenceOutsideItaly,
    CitizenshipNotAccepted { requirement: String },
    IseeAboveMaximum { max: f64, actual: f64 },
    IseeBelowMinimum { min: f64, actual: f64 },
    SociosanitarioAboveMaximum { max: f64, actual: f64 },
    NoChildren,
    NoChildInRequiredBracket,
    ApplicantTooYoung { required: u32, actual: u32 },
    ApplicantNotEighteen { actual: u32 },
    DisabilityRequired,
    PropertyOwnershipRequired,
    LargeFamilyRequired { required: usize, actual: usize },
    GrossIncomeAboveLimit { limit: f64, actual: f64 },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::ResidenceOutsideItaly => {
                "richiesta residenza in Italia".to_string()
            }
            IneligibilityReason::CitizenshipNotAccepted { requirement } => {
                format!("cittadinanza non ammessa (richiesto: {requirement})")
            }
            IneligibilityReason::IseeAboveMaximum { max, actual } => {
                format!("ISEE {actual:.2} oltre il massimo {max:.2}")
            }
            IneligibilityReason::IseeBelowMinimum { min, actual } => {
                format!("ISEE {actual:.2} sotto il minimo {min:.2}")
            }
            IneligibilityReason::SociosanitarioAboveMaximum { max, actual } => {
                format!("ISEE sociosanitario {actual:.2} oltre il massimo {max:.2}")
            }
            IneligibilityReason::NoChildren => "richiede figli a carico".to_string(),
            IneligibilityReason::NoChildInRequiredBracket => {
                "nessun figlio nella fascia di età richiesta".to_string()
            }
            IneligibilityReason::ApplicantTooYoung { required, actual } => {
                format!("età {actual} inferiore a {required} anni")
            }
            IneligibilityReason::ApplicantNotEighteen { actual } => {
                format!("richiede 18 anni, dichiarati {actual}")
            }
            IneligibilityReason::DisabilityRequired => {
                "richiede la presenza di una disabilità nel nucleo".to_string()
            }
            IneligibilityReason::PropertyOwnershipRequired => {
                "richiede la titolarità di un immobile".to_string()
            }
            IneligibilityReason::LargeFamilyRequired { required, actual } => {
                format!("richiede almeno {required} figli, dichiarati {actual}")
            }
            IneligibilityReason::GrossIncomeAboveLimit { limit, actual } => {
                format!("reddito complessivo {actual:.2} oltre il limite {limit:.2}")
            }
        }
    }
}
