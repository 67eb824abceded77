use super::super::domain::Bonus;
use super::config::EligibilityConfig;
use super::policy::IneligibilityReason;
use super::profile::{Citizenship, EligibilityProfile};
use super::requirements;

/// Independent checks applied to every bonus, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Residence,
    Citizenship,
    Isee,
    Sociosanitario,
    ChildAge,
    OtherRequirements,
}

impl Gate {
    pub const fn label(self) -> &'static str {
        match self {
            Gate::Residence => "residence",
            Gate::Citizenship => "citizenship",
            Gate::Isee => "isee",
            Gate::Sociosanitario => "isee_sociosanitario",
            Gate::ChildAge => "child_age",
            Gate::OtherRequirements => "other_requirements",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GateVerdict {
    Pass,
    /// Passed because the data needed to decide was not available.
    Unverified(String),
    /// Eligible without running the remaining gates; the note says what to verify.
    Accept(String),
    Fail(IneligibilityReason),
}

pub(crate) struct GateContext<'a> {
    pub bonus: &'a Bonus,
    pub profile: &'a EligibilityProfile,
    pub config: &'a EligibilityConfig,
}

type GateCheck = fn(&GateContext<'_>) -> GateVerdict;

pub(crate) const GATES: [(Gate, GateCheck); 6] = [
    (Gate::Residence, residence_gate),
    (Gate::Citizenship, citizenship_gate),
    (Gate::Isee, isee_gate),
    (Gate::Sociosanitario, sociosanitario_gate),
    (Gate::ChildAge, child_age_gate),
    (Gate::OtherRequirements, requirements::other_requirements_gate),
];

fn residence_gate(ctx: &GateContext<'_>) -> GateVerdict {
    let Some(text) = ctx.bonus.requirements.residence.as_deref() else {
        return GateVerdict::Pass;
    };
    let text = text.trim().to_lowercase();

    if text == "italia" || text.contains("immobile in italia") {
        // Every accepted residence value is Italian, so only a missing one fails.
        return match ctx.profile.residence {
            Some(_) => GateVerdict::Pass,
            None => GateVerdict::Fail(IneligibilityReason::ResidenceOutsideItaly),
        };
    }

    if text.contains("regione") {
        return GateVerdict::Unverified(
            "residenza regionale richiesta, regione non verificabile".to_string(),
        );
    }

    GateVerdict::Pass
}

fn citizenship_gate(ctx: &GateContext<'_>) -> GateVerdict {
    let Some(raw) = ctx.bonus.requirements.citizenship.as_deref() else {
        return GateVerdict::Pass;
    };
    let text = raw.to_lowercase();

    if text.contains("non specificato") {
        return GateVerdict::Pass;
    }

    let accepted: &[Citizenship] = if text.contains("italiana") {
        if text.contains("ue") {
            &[Citizenship::Italian, Citizenship::EuropeanUnion]
        } else {
            &[Citizenship::Italian]
        }
    } else if text.contains("permesso") {
        &[
            Citizenship::Italian,
            Citizenship::EuropeanUnion,
            Citizenship::ResidencePermit,
        ]
    } else {
        return GateVerdict::Pass;
    };

    match ctx.profile.citizenship {
        Some(citizenship) if accepted.contains(&citizenship) => GateVerdict::Pass,
        _ => GateVerdict::Fail(IneligibilityReason::CitizenshipNotAccepted {
            requirement: raw.to_string(),
        }),
    }
}

fn isee_gate(ctx: &GateContext<'_>) -> GateVerdict {
    let isee = &ctx.bonus.isee;
    if !isee.required {
        return GateVerdict::Pass;
    }

    let Some(actual) = ctx.profile.isee else {
        if isee.note_mentions("opzionale") || isee.note_mentions("non obbligatorio") {
            return GateVerdict::Pass;
        }
        return GateVerdict::Accept("ISEE non indicato: verificare i limiti".to_string());
    };

    if let Some(max) = isee.max {
        if actual > max {
            return GateVerdict::Fail(IneligibilityReason::IseeAboveMaximum { max, actual });
        }
    }
    if let Some(min) = isee.min {
        if actual < min {
            return GateVerdict::Fail(IneligibilityReason::IseeBelowMinimum { min, actual });
        }
    }

    GateVerdict::Pass
}

fn sociosanitario_gate(ctx: &GateContext<'_>) -> GateVerdict {
    if !ctx.bonus.isee.note_mentions("sociosanitario") {
        return GateVerdict::Pass;
    }

    match (ctx.profile.isee_sociosanitario, ctx.bonus.isee.max) {
        (Some(actual), Some(max)) if actual > max => {
            GateVerdict::Fail(IneligibilityReason::SociosanitarioAboveMaximum { max, actual })
        }
        _ => GateVerdict::Pass,
    }
}

fn child_age_gate(ctx: &GateContext<'_>) -> GateVerdict {
    let required = &ctx.bonus.requirements.child_ages;
    if required.is_empty() {
        return GateVerdict::Pass;
    }

    let children = &ctx.profile.children;
    if children.is_empty() {
        return GateVerdict::Fail(IneligibilityReason::NoChildren);
    }

    let accepts_disabled = children.iter().any(|child| child.disabled) && {
        let text = ctx.bonus.other_requirements_text();
        text.contains("disabil") || text.contains("senza limiti")
    };

    let matched = children.iter().any(|child| {
        (child.disabled && accepts_disabled) || required.contains(&child.age_bracket)
    });

    if matched {
        GateVerdict::Pass
    } else {
        GateVerdict::Fail(IneligibilityReason::NoChildInRequiredBracket)
    }
}
