//! Keyword rules for the free-text `altri` requirements.
//!
//! Each rule pairs a matcher over the lower-cased `tipo`/`descrizione` with a check against
//! the profile. Rules are tried in table order for every requirement; the first failing
//! check rejects the bonus. Text that no rule recognizes is ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::policy::IneligibilityReason;
use super::rules::{GateContext, GateVerdict};

pub(crate) struct RequirementText {
    kind: String,
    description: String,
}

impl RequirementText {
    fn new(kind: &str, description: &str) -> Self {
        Self {
            kind: kind.to_lowercase(),
            description: description.to_lowercase(),
        }
    }
}

struct RequirementRule {
    name: &'static str,
    applies: fn(&RequirementText) -> bool,
    check: fn(&RequirementText, &GateContext<'_>) -> Result<(), IneligibilityReason>,
}

const RULES: [RequirementRule; 5] = [
    RequirementRule {
        name: "applicant_age",
        applies: |text| text.kind.contains("età"),
        check: check_applicant_age,
    },
    RequirementRule {
        name: "disability",
        applies: |text| {
            text.kind.contains("disabilit")
                || text.description.contains("disabilit")
                || text.description.contains("accompagnamento")
        },
        check: |_, ctx| {
            if ctx.profile.has_disability() {
                Ok(())
            } else {
                Err(IneligibilityReason::DisabilityRequired)
            }
        },
    },
    RequirementRule {
        name: "property_ownership",
        applies: |text| text.kind.contains("immobile") || text.kind.contains("titolarità"),
        check: |_, ctx| {
            if ctx.profile.owns_property {
                Ok(())
            } else {
                Err(IneligibilityReason::PropertyOwnershipRequired)
            }
        },
    },
    RequirementRule {
        name: "large_family",
        applies: |text| {
            text.description.contains("famiglia numerosa")
                || text.description.contains("almeno 4 figli")
        },
        check: |_, ctx| {
            let required = ctx.config.large_family_min_children;
            let actual = ctx.profile.children.len();
            if actual >= required {
                Ok(())
            } else {
                Err(IneligibilityReason::LargeFamilyRequired { required, actual })
            }
        },
    },
    RequirementRule {
        name: "gross_income",
        applies: |text| text.description.contains("reddito complessivo"),
        check: check_gross_income,
    },
];

pub(crate) fn other_requirements_gate(ctx: &GateContext<'_>) -> GateVerdict {
    for requirement in &ctx.bonus.requirements.other {
        let text = RequirementText::new(&requirement.kind, &requirement.description);
        for rule in RULES.iter().filter(|rule| (rule.applies)(&text)) {
            if let Err(reason) = (rule.check)(&text, ctx) {
                tracing::trace!(
                    bonus = %ctx.bonus.id,
                    rule = rule.name,
                    requirement = %requirement.kind,
                    "requirement rule rejected profile"
                );
                return GateVerdict::Fail(reason);
            }
        }
    }

    GateVerdict::Pass
}

fn check_applicant_age(
    text: &RequirementText,
    ctx: &GateContext<'_>,
) -> Result<(), IneligibilityReason> {
    let Some(age) = ctx.profile.applicant_age else {
        return Ok(());
    };

    for threshold in [80, 65] {
        if text.description.contains(&threshold.to_string()) && age < threshold {
            return Err(IneligibilityReason::ApplicantTooYoung {
                required: threshold,
                actual: age,
            });
        }
    }

    if text.description.contains("18") && text.description.contains("anni") {
        let current_year = ctx.config.current_year();
        let birth_year = i32::try_from(age)
            .ok()
            .and_then(|age| current_year.checked_sub(age));
        if birth_year != current_year.checked_sub(18) {
            return Err(IneligibilityReason::ApplicantNotEighteen { actual: age });
        }
    }

    Ok(())
}

fn check_gross_income(
    text: &RequirementText,
    ctx: &GateContext<'_>,
) -> Result<(), IneligibilityReason> {
    let Some(actual) = ctx.profile.gross_income else {
        return Ok(());
    };
    let Some(limit) = income_ceiling(&text.description) else {
        return Ok(());
    };

    if actual > limit {
        Err(IneligibilityReason::GrossIncomeAboveLimit { limit, actual })
    } else {
        Ok(())
    }
}

static DECIMAL_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,3}(?:\.\d{3})+(?:,\d+)?|\d+[.,]\d+").expect("decimal amount pattern")
});

static THOUSANDS_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+$").expect("thousands pattern"));

/// First decimal amount in the text, read with Italian separators (`6.712,46`, `15.000`).
pub(crate) fn income_ceiling(description: &str) -> Option<f64> {
    let raw = DECIMAL_AMOUNT.find(description)?.as_str();

    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else if THOUSANDS_ONLY.is_match(raw) {
        raw.replace('.', "")
    } else {
        raw.to_string()
    };

    normalized.parse().ok()
}
