use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;
mod text;

pub use text::{TextReport, sample_line};

/// Render a report to a string in the requested format.
pub fn render<T: Serialize + TextReport>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(value.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a report in the requested format.
pub fn output<T: Serialize + TextReport>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}
