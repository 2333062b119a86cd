use crate::core::prefs::Theme;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Result,
    Subtle,
}

/// Applies a consistent style to a string, tuned for the terminal theme.
pub fn style_text(text: &str, style_type: StyleType, theme: Theme) -> String {
    let styled = match (style_type, theme) {
        (StyleType::Title, _) => style(text).bold().underlined(),
        (StyleType::Label, _) => style(text).bold(),
        (StyleType::Result, Theme::Dark) => style(text).green().bold(),
        (StyleType::Result, Theme::Light) => style(text).blue().bold(),
        (StyleType::Subtle, _) => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str, theme: Theme) -> Cell {
    let color = match theme {
        Theme::Dark => Color::Cyan,
        Theme::Light => Color::DarkBlue,
    };
    Cell::new(text).fg(color).add_attribute(Attribute::Bold)
}

pub fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn error_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::Red)
}

/// Spinner shown while a conversion is in flight.
pub fn new_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
