//! Help and error colours shared by both binaries.

use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;

/// Section titles and usage lines.
const HEADING: AnsiColor = AnsiColor::Magenta;
/// Flags, subcommands and accepted values.
const LITERAL: AnsiColor = AnsiColor::Cyan;
const PLACEHOLDER: AnsiColor = AnsiColor::BrightBlack;
const ERROR: AnsiColor = AnsiColor::BrightRed;

fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(fg(HEADING).bold())
        .header(fg(HEADING).bold().underline())
        .literal(fg(LITERAL).bold())
        .valid(fg(LITERAL))
        .placeholder(fg(PLACEHOLDER).italic())
        .invalid(fg(ERROR).bold())
        .error(fg(ERROR).bold())
}
