use chrono::{DateTime, Datelike, NaiveDate};
use thiserror::Error;

use crate::{db::bill::BillRecord, web::bill::data::DisplayBill};

/// French short month names, capitalized and cut to three characters
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid bill date {0:?}")]
    InvalidDate(String),
}

/// Result of formatting one bill. A bill that can't be formatted is kept as it was.
#[derive(Debug)]
pub enum FormatOutcome {
    Formatted(DisplayBill),
    Fallback {
        original: DisplayBill,
        error: FormatError,
    },
}

impl FormatOutcome {
    pub fn into_bill(self) -> DisplayBill {
        match self {
            FormatOutcome::Formatted(bill) => bill,
            FormatOutcome::Fallback { original, .. } => original,
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, FormatError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|d| d.date_naive()))
        .map_err(|_| FormatError::InvalidDate(raw.to_owned()))
}

/// `2004-04-04` -> `4 Avr. 04`
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {}. {:02}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}

pub fn format_status(status: &str) -> String {
    match status {
        "pending" => "En attente",
        "accepted" => "Accepté",
        "refused" => "Refusé",
        other => other,
    }
    .to_owned()
}

pub fn format_bill(record: BillRecord) -> FormatOutcome {
    match parse_date(&record.date) {
        Ok(date) => {
            let mut bill = DisplayBill::from(record);
            bill.date = format_date(date);
            bill.status = format_status(&bill.status);
            FormatOutcome::Formatted(bill)
        }
        Err(error) => FormatOutcome::Fallback {
            original: DisplayBill::from(record),
            error,
        },
    }
}
