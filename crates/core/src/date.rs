//! Date lines for cover slides.

use chrono::{Datelike, Local, NaiveDate};

const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Produces the date line appended to cover titles.
pub trait DateFormatter {
    fn format_today(&self) -> String;
}

/// Today's local date as "18 de Octubre de 2026".
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanishLongDate;

impl DateFormatter for SpanishLongDate {
    fn format_today(&self) -> String {
        spanish_long_date(Local::now().date_naive())
    }
}

/// Always returns the same text.
#[derive(Debug, Clone)]
pub struct FixedDate(pub String);

impl DateFormatter for FixedDate {
    fn format_today(&self) -> String {
        self.0.clone()
    }
}

/// Long-form Spanish date with a capitalized month name.
pub fn spanish_long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        SPANISH_MONTHS[date.month0() as usize],
        date.year()
    )
}
