mod config;
mod policy;
mod profile;
mod requirements;
mod rules;

pub use config::EligibilityConfig;
pub use policy::{EligibilityDecision, IneligibilityReason};
pub use profile::{Child, Citizenship, EligibilityProfile, Region, Residence};
pub use rules::Gate;

use serde::{Deserialize, Serialize};

use super::domain::{Bonus, BonusId};
use rules::{GateContext, GateVerdict, GATES};

/// Stateless evaluator running the eligibility gates over catalog entries.
#[derive(Debug, Clone, Default)]
pub struct EligibilityEngine {
    config: EligibilityConfig,
}

impl EligibilityEngine {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    /// Run the gates in order, stopping at the first failure or early acceptance.
    pub fn evaluate(&self, bonus: &Bonus, profile: &EligibilityProfile) -> EligibilityOutcome {
        let ctx = GateContext {
            bonus,
            profile,
            config: &self.config,
        };

        let mut notes = Vec::new();
        for (gate, check) in GATES {
            match check(&ctx) {
                GateVerdict::Pass => {}
                GateVerdict::Unverified(note) => {
                    tracing::trace!(bonus = %bonus.id, gate = gate.label(), %note, "gate passed unverified");
                    notes.push(note);
                }
                GateVerdict::Accept(note) => {
                    tracing::trace!(bonus = %bonus.id, gate = gate.label(), %note, "accepted pending verification");
                    notes.push(note);
                    break;
                }
                GateVerdict::Fail(reason) => {
                    tracing::debug!(bonus = %bonus.id, gate = gate.label(), "bonus not eligible");
                    return EligibilityOutcome {
                        bonus_id: bonus.id.clone(),
                        decision: EligibilityDecision::Ineligible { reason },
                        failed_gate: Some(gate.label().to_string()),
                    };
                }
            }
        }

        let decision = if notes.is_empty() {
            EligibilityDecision::Eligible
        } else {
            EligibilityDecision::EligibleUnverified { notes }
        };

        EligibilityOutcome {
            bonus_id: bonus.id.clone(),
            decision,
            failed_gate: None,
        }
    }

    pub fn is_eligible(&self, bonus: &Bonus, profile: &EligibilityProfile) -> bool {
        self.evaluate(bonus, profile).decision.is_eligible()
    }

    /// Order-preserving subset of `bonuses` the profile qualifies for. Empty until the
    /// profile carries both residence and citizenship.
    pub fn filter_eligible<'a, I>(&self, bonuses: I, profile: &EligibilityProfile) -> Vec<&'a Bonus>
    where
        I: IntoIterator<Item = &'a Bonus>,
    {
        if !profile.is_complete() {
            tracing::debug!("eligibility requested without residence or citizenship");
            return Vec::new();
        }

        bonuses
            .into_iter()
            .filter(|bonus| self.is_eligible(bonus, profile))
            .collect()
    }

    /// Eligible bonuses paired with their decision, same precondition as `filter_eligible`.
    pub fn evaluate_eligible<'a, I>(
        &self,
        bonuses: I,
        profile: &EligibilityProfile,
    ) -> Vec<(&'a Bonus, EligibilityOutcome)>
    where
        I: IntoIterator<Item = &'a Bonus>,
    {
        if !profile.is_complete() {
            return Vec::new();
        }

        bonuses
            .into_iter()
            .map(|bonus| (bonus, self.evaluate(bonus, profile)))
            .filter(|(_, outcome)| outcome.decision.is_eligible())
            .collect()
    }
}

/// Evaluation result for one bonus, keeping the gate that rejected it for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub bonus_id: BonusId,
    pub decision: EligibilityDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_gate: Option<String>,
}

/// Convenience wrapper using the default configuration.
pub fn is_eligible(bonus: &Bonus, profile: &EligibilityProfile) -> bool {
    EligibilityEngine::default().is_eligible(bonus, profile)
}

/// Convenience wrapper using the default configuration.
pub fn filter_eligible<'a, I>(bonuses: I, profile: &EligibilityProfile) -> Vec<&'a Bonus>
where
    I: IntoIterator<Item = &'a Bonus>,
{
    EligibilityEngine::default().filter_eligible(bonuses, profile)
}
