use std::fs;
use std::path::Path;

use tracing::info;

use crate::chunk_text::chunk_lines;
use crate::error::{RagError, Result};

/// The knowledge base text, read once at startup.
#[derive(Clone, Debug)]
pub struct Corpus {
    text: String,
}

impl Corpus {
    /// Reads the corpus file. A path that is not an existing regular file is
    /// reported as [`RagError::CorpusNotFound`] before anything is read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RagError::CorpusNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        info!(path = %path.display(), bytes = text.len(), "loaded corpus");
        Ok(Self { text })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Non-blank lines in file order. Their positions are the point ids.
    pub fn lines(&self) -> Vec<String> {
        chunk_lines(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = Corpus::load(&path).unwrap_err();
        assert!(matches!(err, RagError::CorpusNotFound(p) if p == path));
    }

    #[test]
    fn directory_is_not_a_corpus() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Corpus::load(dir.path()),
            Err(RagError::CorpusNotFound(_))
        ));
    }

    #[test]
    fn reads_lines_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Range: 507 km\n\nBattery: 77.4 kWh\n").unwrap();
        let corpus = Corpus::load(file.path()).unwrap();
        assert_eq!(corpus.lines(), vec!["Range: 507 km", "Battery: 77.4 kWh"]);
    }
}
