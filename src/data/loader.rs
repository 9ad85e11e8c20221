// ============================================================
// Layer 4 — Parallel Corpus Loader
// ============================================================
// Loads a pair of plain-text files that are aligned line by
// line, e.g.
//
//   data/train.en   ← English, one sentence per line
//   data/train.vi   ← Vietnamese, same line numbers
//
// Both files are read as UTF-8. A missing file is fatal: there
// is nothing sensible to train or test on without it. Files
// whose line counts differ are rejected, since every later step
// assumes line N of one file translates line N of the other.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (Reading a File)

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::sentence_pair::SentencePair;
use crate::domain::traits::CorpusSource;

/// Loads `{dir}/{prefix}.{source_lang}` and `{dir}/{prefix}.{target_lang}`.
/// Implements the CorpusSource trait from Layer 3.
pub struct TextCorpusLoader {
    dir:         PathBuf,
    prefix:      String,
    source_lang: String,
    target_lang: String,
}

impl TextCorpusLoader {
    pub fn new(
        dir:         impl AsRef<Path>,
        prefix:      impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            dir:         dir.as_ref().to_path_buf(),
            prefix:      prefix.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    pub fn source_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.prefix, self.source_lang))
    }

    pub fn target_path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.prefix, self.target_lang))
    }
}

impl CorpusSource for TextCorpusLoader {
    fn load_all(&self) -> Result<Vec<SentencePair>> {
        let source_path = self.source_path();
        let target_path = self.target_path();

        let source = read_lines(&source_path)?;
        let target = read_lines(&target_path)?;

        if source.len() != target.len() {
            bail!(
                "Parallel files are misaligned: '{}' has {} lines, '{}' has {}",
                source_path.display(),
                source.len(),
                target_path.display(),
                target.len(),
            );
        }

        let pairs: Vec<SentencePair> = source
            .into_iter()
            .zip(target)
            .map(|(s, t)| SentencePair::new(s, t))
            .collect();

        tracing::info!(
            "Loaded {} sentence pairs from '{}' / '{}'",
            pairs.len(),
            source_path.display(),
            target_path.display(),
        );
        Ok(pairs)
    }
}

/// Read a UTF-8 file and return one String per line.
/// Both `\n` and `\r\n` endings are stripped.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot read corpus file '{}'", path.display()))?;
    Ok(text.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_loads_aligned_pairs() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "train.en", "hello\r\nthank you\n");
        write(tmp.path(), "train.vi", "xin chào\ncảm ơn\n");

        let loader = TextCorpusLoader::new(tmp.path(), "train", "en", "vi");
        let pairs  = loader.load_all().unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], SentencePair::new("hello", "xin chào"));
        assert_eq!(pairs[1].source, "thank you");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp    = tempfile::tempdir().unwrap();
        let loader = TextCorpusLoader::new(tmp.path(), "train", "en", "vi");
        let err    = loader.load_all().unwrap_err();
        assert!(format!("{err:#}").contains("train.en"));
    }

    #[test]
    fn test_misaligned_files_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "tst.en", "a\nb\nc\n");
        write(tmp.path(), "tst.vi", "a\nb\n");

        let loader = TextCorpusLoader::new(tmp.path(), "tst", "en", "vi");
        assert!(loader.load_all().is_err());
    }
}
