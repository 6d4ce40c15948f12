//! Loading ticket text handed over by the document-text extraction step.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read ticket text from `path`, or from stdin when the path is `-`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; the
/// extractors only look for ASCII markers.
pub fn read_ticket_text(path: &Path) -> Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read ticket from stdin")?;
        buf
    } else {
        fs::read(path)
            .with_context(|| format!("Failed to read ticket {}", path.display()))?
    };
    debug!("Read {} bytes of ticket text", bytes.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Like [`read_ticket_text`], but a ticket that cannot be read yields empty
/// text so the journey can still be entered by hand.
pub fn read_ticket_text_or_empty(path: &Path) -> String {
    match read_ticket_text(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("{:#}", err);
            println!(
                "There was a problem opening your ticket. Enter the journey details manually."
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "IRCTC\nBooked From")?;

        let text = read_ticket_text(file.path())?;
        assert_eq!(text, "IRCTC\nBooked From\n");
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_replaced() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        file.write_all(b"MakeMyTrip \xff ticket")?;

        let text = read_ticket_text(file.path())?;
        assert!(text.starts_with("MakeMyTrip "));
        assert!(text.ends_with(" ticket"));
        Ok(())
    }

    #[test]
    fn test_missing_file_yields_empty_text() {
        let text = read_ticket_text_or_empty(Path::new("/nonexistent/ticket.txt"));
        assert!(text.is_empty());
    }
}
