//! Renders diagnostics as text blocks with surrounding source lines.

use owo_colors::{OwoColorize, Stream};

use crate::diagnostic::Diagnostic;

/// When to highlight the offending line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorChoice {
    /// Only when stdout supports color. Honors `NO_COLOR` and `FORCE_COLOR`.
    #[default]
    Auto,
    Always,
    Never,
}

/// Rendering options for [`format_diagnostics_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub colors: ColorChoice,
}

/// One block per diagnostic, same order, with the offending line in yellow
/// when stdout is a color terminal.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    format_diagnostics_with(diagnostics, &FormatOptions::default())
}

pub fn format_diagnostics_with(diagnostics: &[Diagnostic], options: &FormatOptions) -> Vec<String> {
    diagnostics
        .iter()
        .map(|diagnostic| format_diagnostic(diagnostic, options))
        .collect()
}

/// A header `<file> (<line>,<col>): <message>` and three numbered context
/// lines, or just the message when the diagnostic has no file.
///
/// Context lines outside the file render as their number with no text.
pub fn format_diagnostic(diagnostic: &Diagnostic, options: &FormatOptions) -> String {
    let message = diagnostic.message();
    let Some(file) = diagnostic.file.as_deref() else {
        return message.to_string();
    };

    let (line, character) = file.line_and_character_of_position(diagnostic.start.unwrap_or(0));
    let context = |index: Option<usize>| index.and_then(|i| file.line_text(i)).unwrap_or("");

    let offending = format!("{}. {}", line + 1, context(Some(line)));
    let offending = match options.colors {
        ColorChoice::Auto => offending
            .if_supports_color(Stream::Stdout, |text| text.yellow())
            .to_string(),
        ColorChoice::Always => offending.yellow().to_string(),
        ColorChoice::Never => offending,
    };

    [
        format!(
            "{} ({},{}): {}",
            file.file_name().display(),
            line + 1,
            character + 1,
            message
        ),
        format!("{}. {}", line, context(line.checked_sub(1))),
        offending,
        format!("{}. {}", line + 2, context(Some(line + 1))),
    ]
    .join("\n")
}
