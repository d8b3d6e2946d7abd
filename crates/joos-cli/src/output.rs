//! Color-choice resolution shared between diagnostic rendering and the
//! assembly/TIR dump this driver writes to stdout.

use termcolor::ColorChoice;

/// Resolve `ColorChoice` from the `--color` flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: &str) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
