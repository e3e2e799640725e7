//! Terminal rendering.
//!
//! Rendering returns strings so it can be tested; only [`print`] and
//! [`failure`] write to the terminal.

use std::fmt::Write as _;

use stockroom_client::EditError;
use stockroom_core::{Color, FormState};

use crate::commands::CliError;

/// Render the edit form as aligned `label: value` lines.
#[must_use]
pub fn render_form(form: &FormState, sale_price: &str) -> String {
    let rows = [
        ("Item", form.item_id.as_str()),
        ("Product", form.product_name.as_str()),
        ("Category", form.category.as_str()),
        ("Quantity", form.quantity.as_str()),
        ("Barcode", form.barcode.as_str()),
        ("Shelf", form.shelf.as_str()),
        ("Min stock", form.min_stock.as_str()),
        ("Max stock", form.max_stock.as_str()),
        ("Color", form.color.as_str()),
        ("Color code", form.color_code.as_str()),
        ("Retail price", form.retail_price.as_str()),
        ("Discount %", form.discount_percentage.as_str()),
        ("Sale price", sale_price),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let value = if value.is_empty() { "-" } else { value };
        let _ = writeln!(out, "{label:<13} {value}");
    }
    if form.categories.len() > 1 {
        let _ = writeln!(out, "{:<13} {}", "Categories", form.categories.join(", "));
    }
    out.trim_end().to_string()
}

/// Render color matches, one per line.
#[must_use]
pub fn render_colors(colors: &[&Color]) -> String {
    if colors.is_empty() {
        return "No matching colors".to_string();
    }
    colors
        .iter()
        .map(|c| format!("{:<9} {}", c.color_code, c.color_name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What to tell the operator when a command fails.
#[must_use]
pub fn render_failure(err: &CliError) -> String {
    match err {
        CliError::Edit(EditError::SignInRequired) => {
            "Sign in required: run `stockroom session login --token <TOKEN>`".to_string()
        }
        CliError::Edit(edit) => edit
            .toast()
            .map_or_else(|| edit.to_string(), |toast| toast.message().to_string()),
        other => other.to_string(),
    }
}

#[allow(clippy::print_stdout)]
pub fn print(text: &str) {
    println!("{text}");
}

#[allow(clippy::print_stderr)]
pub fn failure(err: &CliError) {
    eprintln!("{}", render_failure(err));
}

#[cfg(test)]
mod tests {
    use stockroom_core::{ColorId, ValidationError};

    use super::*;

    #[test]
    fn test_form_shows_placeholders_for_empty_fields() {
        let rendered = render_form(&FormState::default(), "");
        assert!(rendered.contains("Quantity      0"));
        assert!(rendered.contains("Min stock     5"));
        assert!(rendered.contains("Barcode       -"));
        assert!(rendered.ends_with("Sale price    -"));
    }

    #[test]
    fn test_form_lists_categories_when_ambiguous() {
        let form = FormState {
            categories: vec!["Wood".to_string(), "Glass".to_string()],
            ..FormState::default()
        };
        assert!(render_form(&form, "900.00").contains("Categories    Wood, Glass"));
    }

    #[test]
    fn test_colors() {
        let red = Color {
            id: ColorId::new("c1"),
            color_name: "Crimson Red".to_string(),
            color_code: "#DC143C".to_string(),
        };
        assert_eq!(render_colors(&[&red]), "#DC143C   Crimson Red");
        assert_eq!(render_colors(&[]), "No matching colors");
    }

    #[test]
    fn test_sign_in_failure_gives_hint() {
        let err = CliError::Edit(EditError::SignInRequired);
        assert!(render_failure(&err).contains("stockroom session login"));
    }

    #[test]
    fn test_validation_failure_uses_toast_text() {
        let err = CliError::Edit(EditError::Invalid(ValidationError::MinAboveMax));
        assert_eq!(
            render_failure(&err),
            "Minimum stock cannot be greater than maximum stock"
        );
    }
}
