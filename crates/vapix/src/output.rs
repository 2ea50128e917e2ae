//! Output formatting: plain text or JSON.
//!
//! Renders data in the format selected by `--output`. Structured formats
//! use serde; plain output is hand-formatted per command.

use std::io::{self, Write};

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

// ── Render dispatcher ────────────────────────────────────────────────

/// Render `data` in the chosen format, using `plain_fn` for plain text.
pub fn render<T>(
    format: OutputFormat,
    data: &T,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
{
    match format {
        OutputFormat::Plain => Ok(plain_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
    }
}

/// Print the rendered output to stdout. A trailing newline is added
/// unless the text already ends with one.
pub fn print_output(output: &str) -> Result<(), CliError> {
    if output.is_empty() {
        return Ok(());
    }
    let mut stdout = io::stdout().lock();
    if output.ends_with('\n') {
        stdout.write_all(output.as_bytes())?;
    } else {
        writeln!(stdout, "{output}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[derive(Serialize)]
    struct Sample {
        name: &'static str,
    }

    #[test]
    fn formats_dispatch() {
        let data = Sample { name: "cam" };
        let plain = render(OutputFormat::Plain, &data, |s| s.name.to_owned()).unwrap();
        let json = render(OutputFormat::JsonCompact, &data, |_| unreachable!()).unwrap();
        let pretty = render(OutputFormat::Json, &data, |_| unreachable!()).unwrap();

        assert_eq!(plain, "cam");
        assert_eq!(json, r#"{"name":"cam"}"#);
        assert_eq!(pretty, "{\n  \"name\": \"cam\"\n}");
    }
}
