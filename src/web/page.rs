//! HTML page for the form routes, rendered from `templates/page.html`.

use minijinja::{context, Environment};
use once_cell::sync::Lazy;

use crate::aggregate::{Breakdown, Label};
use crate::error::{PipelineError, Result};

const PAGE_TEMPLATE: &str = "page.html";

// `.html` name turns on HTML auto-escaping for everything the page interpolates.
static PAGE_ENV: Lazy<std::result::Result<Environment<'static>, minijinja::Error>> =
    Lazy::new(|| {
        let mut env = Environment::new();
        env.add_template(PAGE_TEMPLATE, include_str!("templates/page.html"))?;
        Ok(env)
    });

/// What to show under the form.
#[derive(Debug)]
pub enum View<'a> {
    /// Fresh form.
    Blank,
    /// Input was rejected before aggregation.
    Warning(&'a str),
    /// Aggregation collapsed; the text is the underlying failure.
    Error(&'a str),
    /// Aggregation succeeded. `failures` clauses were counted as neutral.
    Results {
        /// The breakdown to display.
        breakdown: &'a Breakdown,
        /// Clauses substituted with neutral.
        failures: usize,
    },
}

/// Name/value pairs shown for a breakdown. `Other` only appears when non-zero.
pub fn result_cells(breakdown: &Breakdown) -> Vec<(String, String)> {
    let shown = Label::KNOWN
        .into_iter()
        .chain((breakdown.other > 0.0).then_some(Label::Other));
    let mut cells: Vec<(String, String)> = shown
        .map(|label| {
            (
                format!("{} Percentage", label.display_name()),
                format!("{:.2}%", breakdown.percentage(label)),
            )
        })
        .collect();
    cells.push((
        "Overall Sentiment".to_string(),
        breakdown.overall.display_name().to_string(),
    ));
    cells
}

/// The same cells as plain lines, e.g. `Positive Percentage: 50.00%`.
pub fn result_lines(breakdown: &Breakdown) -> Vec<String> {
    result_cells(breakdown)
        .into_iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect()
}

/// Full HTML page: title, form pre-filled with `statement`, then `view`.
pub fn render(statement: &str, view: View<'_>) -> Result<String> {
    let env = PAGE_ENV
        .as_ref()
        .map_err(|e| PipelineError::Unexpected(format!("Page template is invalid: {e}")))?;
    let template = env.get_template(PAGE_TEMPLATE)?;

    let html = match view {
        View::Blank => template.render(context! { statement })?,
        View::Warning(warning) => template.render(context! { statement, warning })?,
        View::Error(error) => template.render(context! { statement, error })?,
        View::Results {
            breakdown,
            failures,
        } => template.render(context! {
            statement,
            lines => result_cells(breakdown),
            failures,
            total => breakdown.total,
        })?,
    };
    Ok(html)
}
