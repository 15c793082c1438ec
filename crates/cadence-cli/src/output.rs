//! Output formatting

use crate::error::CliResult;
use cadence::Phase;
use console::style;
use serde::Serialize;

/// Applies terminal styling when colors are enabled.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    /// Whether to use colors
    pub use_color: bool,
}

impl Painter {
    /// Create a painter
    #[must_use]
    pub const fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Bold heading
    #[must_use]
    pub fn heading(&self, text: &str) -> String {
        style(text).bold().force_styling(self.use_color).to_string()
    }

    /// Phase name, colored by phase
    #[must_use]
    pub fn phase(&self, phase: Phase) -> String {
        let styled = style(format!("{:<6}", phase.to_string())).force_styling(self.use_color);
        let colored = match phase {
            Phase::Before => styled.yellow(),
            Phase::Active => styled.green(),
            Phase::After => styled.cyan(),
        };
        colored.to_string()
    }

    /// Marker for lines that raised an event condition
    #[must_use]
    pub fn event(&self, fired: bool) -> String {
        if fired {
            style("event").magenta().force_styling(self.use_color).to_string()
        } else {
            String::new()
        }
    }

    /// Dimmed text
    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        style(text).dim().force_styling(self.use_color).to_string()
    }
}

/// Format an optional number, `-` when absent.
#[must_use]
pub fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), number)
}

/// Format a number compactly, spelling out infinities.
#[must_use]
pub fn number(value: f64) -> String {
    if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else {
        let rounded = format!("{value:.6}");
        rounded
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Pretty JSON with a trailing newline
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
