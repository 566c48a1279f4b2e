//! Askama filters used by the page layout.

use std::fmt::Display;

use chrono::Datelike;

/// The current calendar year (UTC), for the footer.
///
/// The input is ignored: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Utc::now().year())
}
