use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{
    AmountSpec, ApplicationMethod, Bonus, BonusId, BracketAmount, IncomeBracket, Requirement,
};
use super::filters::DisbursementType;

/// Euro amount in Italian notation, e.g. `1.234,56 €`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let decimals = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (position, digit) in units.chars().enumerate() {
        if position > 0 && (units.len() - position) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{decimals:02} €")
}

fn bracket_amount_label(amount: &BracketAmount) -> String {
    match amount {
        BracketAmount::Value(value) => format_currency(*value),
        BracketAmount::Text(text) => text.clone(),
    }
}

/// Headline amount for cards and table rows.
pub fn amount_summary(bonus: &Bonus) -> String {
    match &bonus.amount {
        AmountSpec::Fixed {
            value: Some(value), ..
        } if *value != 0.0 => format_currency(*value),
        AmountSpec::Variable { brackets, .. } if !brackets.is_empty() => {
            let first = &brackets[0];
            let last = &brackets[brackets.len() - 1];
            format!(
                "{} - {}",
                bracket_amount_label(&first.amount),
                bracket_amount_label(&last.amount)
            )
        }
        _ => "Variabile".to_string(),
    }
}

pub fn bracket_label(bracket: &IncomeBracket) -> String {
    let amount = bracket_amount_label(&bracket.amount);
    match (bracket.min, bracket.max) {
        (None, None) => "Tutte le fasce".to_string(),
        (None, Some(max)) => format!("Fino a {}: {amount}", format_currency(max)),
        (Some(min), None) => format!("Oltre {}: {amount}", format_currency(min)),
        (Some(min), Some(max)) => format!(
            "{} - {}: {amount}",
            format_currency(min),
            format_currency(max)
        ),
    }
}

/// ISEE condition as shown on the card, `None` when no ISEE is needed.
pub fn isee_summary(bonus: &Bonus) -> Option<String> {
    let isee = &bonus.isee;
    if !isee.required {
        return None;
    }

    Some(match (isee.max, isee.min) {
        (Some(max), _) => format!("fino a {}", format_currency(max)),
        (None, Some(min)) => format!("minimo {}", format_currency(min)),
        (None, None) => "richiesto".to_string(),
    })
}

/// Compact projection used by lists, grids and tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusCardView {
    pub id: BonusId,
    pub name: String,
    pub status: &'static str,
    pub categories: Vec<&'static str>,
    pub amount: String,
    pub disbursement: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub favorite: bool,
}

impl BonusCardView {
    pub fn new(bonus: &Bonus, favorite: bool) -> Self {
        Self {
            id: bonus.id.clone(),
            name: bonus.name.clone(),
            status: bonus.status.label(),
            categories: bonus.categories.iter().map(|c| c.tag()).collect(),
            amount: amount_summary(bonus),
            disbursement: DisbursementType::of(bonus).label(),
            isee: isee_summary(bonus),
            deadline: bonus.deadline.as_ref().and_then(|deadline| deadline.date),
            favorite,
        }
    }
}

/// Full projection for the detail modal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusDetailView {
    #[serde(flatten)]
    pub card: BonusCardView,
    pub description: String,
    pub amount_brackets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isee_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizenship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residence: Option<String>,
    pub child_ages: Vec<&'static str>,
    pub other_requirements: Vec<Requirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_note: Option<String>,
    pub application: ApplicationMethod,
    pub official_link: String,
    pub compatible_with: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

impl BonusDetailView {
    pub fn new(bonus: &Bonus, favorite: bool) -> Self {
        let amount_brackets = match &bonus.amount {
            AmountSpec::Variable { brackets, .. } => brackets.iter().map(bracket_label).collect(),
            AmountSpec::Fixed { .. } => Vec::new(),
        };

        Self {
            card: BonusCardView::new(bonus, favorite),
            description: bonus.description.clone(),
            amount_brackets,
            amount_note: bonus.amount.note().map(str::to_string),
            isee_note: bonus.isee.note.clone(),
            citizenship: bonus.requirements.citizenship.clone(),
            residence: bonus.requirements.residence.clone(),
            child_ages: bonus
                .requirements
                .child_ages
                .iter()
                .map(|bracket| bracket.label())
                .collect(),
            other_requirements: bonus.requirements.other.clone(),
            deadline_note: bonus
                .deadline
                .as_ref()
                .and_then(|deadline| deadline.note.clone()),
            application: bonus.application.clone(),
            official_link: bonus.official_link.clone(),
            compatible_with: bonus.compatible_with.clone(),
            additional_notes: bonus.additional_notes.clone(),
        }
    }
}

/// Headline above the result grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub shown: usize,
    pub total: usize,
}

impl ResultSummary {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }

    pub fn headline(&self) -> String {
        if self.shown == 0 {
            "Nessun bonus trovato".to_string()
        } else if self.shown == self.total {
            format!("Tutti i {} bonus disponibili", self.total)
        } else {
            format!("{} di {} bonus", self.shown, self.total)
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    nome: &'a str,
    importo: &'a str,
    status: &'a str,
    categoria: String,
    erogazione: &'a str,
    isee: &'a str,
    scadenza: String,
}

/// Table view export, one row per card.
pub fn write_csv<W: Write>(cards: &[BonusCardView], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for card in cards {
        csv_writer.serialize(CsvRow {
            id: card.id.as_str(),
            nome: &card.name,
            importo: &card.amount,
            status: card.status,
            categoria: card.categories.join("|"),
            erogazione: card.disbursement,
            isee: card.isee.as_deref().unwrap_or(""),
            scadenza: card
                .deadline
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
