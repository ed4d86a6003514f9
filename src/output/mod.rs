use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcript::TranscriptResult;

/// Render a transcript in the requested format
pub fn render(result: &TranscriptResult, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => result.text.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
    };

    Ok(content)
}

/// Save transcript to file
pub async fn save_to_file(result: &TranscriptResult, path: &Path, format: &OutputFormat) -> Result<()> {
    fs_err::write(path, render(result, format)?)?;
    Ok(())
}

/// Print transcript to console
pub fn print_to_console(result: &TranscriptResult, format: &OutputFormat) -> Result<()> {
    println!("{}", render(result, format)?);
    Ok(())
}
