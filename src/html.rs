//! Shared HTML helpers for the dashboard page.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

/// The stylesheet embedded into every page.
///
/// The app has a single page, so the styles are served inline rather than as
/// a static file.
const STYLESHEET: &str = r#"
    :root { color-scheme: light dark; }
    body {
        font-family: system-ui, sans-serif;
        margin: 0;
        color: #1a202c;
        background: #f7fafc;
    }
    @media (prefers-color-scheme: dark) {
        body { color: #e2e8f0; background: #1a202c; }
        .card, table, .form-box { background: #2d3748 !important; }
    }
    .container { max-width: 56rem; margin: 0 auto; padding: 1.5rem; }
    .cards { display: flex; gap: 1rem; margin: 1rem 0; }
    .card {
        flex: 1;
        background: #fff;
        border-radius: 0.5rem;
        padding: 1rem;
        box-shadow: 0 1px 3px rgba(0, 0, 0, 0.2);
    }
    .card h2 { margin: 0; font-size: 0.8rem; text-transform: uppercase; opacity: 0.7; }
    .card p { margin: 0.25rem 0 0; font-size: 1.4rem; font-weight: 600; }
    .income { color: #2f855a; }
    .expense { color: #c53030; }
    table { width: 100%; border-collapse: collapse; background: #fff; border-radius: 0.5rem; }
    th, td { padding: 0.6rem 0.9rem; text-align: left; }
    th { font-size: 0.75rem; text-transform: uppercase; opacity: 0.7; }
    tr { border-bottom: 1px solid rgba(128, 128, 128, 0.2); }
    .badge {
        display: inline-block;
        padding: 0.1rem 0.5rem;
        border-radius: 9999px;
        font-size: 0.75rem;
        font-weight: 600;
    }
    .badge.income { background: rgba(47, 133, 90, 0.15); }
    .badge.expense { background: rgba(197, 48, 48, 0.15); }
    .filters, .form-box form { display: flex; flex-wrap: wrap; gap: 0.75rem; align-items: end; }
    .form-box { background: #fff; border-radius: 0.5rem; padding: 1rem; margin: 1rem 0; }
    label { display: flex; flex-direction: column; font-size: 0.8rem; gap: 0.25rem; }
    input, select { padding: 0.4rem; border: 1px solid #a0aec0; border-radius: 0.25rem; }
    button, .button {
        padding: 0.45rem 1rem;
        border: none;
        border-radius: 0.25rem;
        background: #3182ce;
        color: #fff;
        cursor: pointer;
        text-decoration: none;
        font-size: 0.85rem;
    }
    button.delete { background: transparent; color: #c53030; text-decoration: underline; }
    .empty { text-align: center; opacity: 0.7; padding: 2rem 0; }
    .alert { border-left: 4px solid #c53030; padding: 0.5rem 1rem; margin: 1rem 0; }
"#;

/// Render the base page layout around `content`.
pub(crate) fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Fintrack" }

                script src="https://unpkg.com/htmx.org@2.0.8" {}

                style { (PreEscaped(STYLESHEET)) }
            }
            body
            {
                main class="container" { (content) }
            }
        }
    }
}

/// Render an error message box.
pub(crate) fn alert(message: &str, details: &str) -> Markup {
    html! {
        div class="alert"
        {
            strong { (message) }
            @if !details.is_empty() { p { (details) } }
        }
    }
}

/// Format a dollar amount with a thousands separator and two decimal places.
pub(crate) fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "$0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// Truncate `text` to at most `max_graphemes` graphemes, appending an
/// ellipsis when anything was cut off.
pub(crate) fn truncate_graphemes(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();

    if graphemes.len() <= max_graphemes {
        text.to_owned()
    } else {
        format!("{}…", graphemes[..max_graphemes].concat())
    }
}
