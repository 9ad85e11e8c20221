// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds, saves and loads one word-level tokenizer per language.
//
// The vocabulary is frequency ranked and capped:
//   id 0            → [PAD], never a real word
//   id 1            → most frequent word
//   id 2            → second most frequent word
//   ...
//   id num_words-1  → last word kept
//
// Everything rarer is out of vocabulary. The WordLevel model
// maps such words to its unk token; we point unk at [PAD] so an
// unknown word comes back as id 0 and the Vocabulary wrapper
// drops it along with the padding.
//
// Word splitting rules (shared with data::vocabulary so that the
// counted words and the tokenizer's words are identical):
//   1. lowercase
//   2. replace every character of FILTER_CHARS with a space
//   3. split on whitespace
//
// The tokenizer JSON is written by hand in HuggingFace format
// and read back with Tokenizer::from_file, the same way for
// training and inference.
//
// Reference: tokenizers crate documentation (WordLevel model)

use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tokenizers::Tokenizer;

use crate::data::vocabulary::{split_words, FILTER_CHARS};

pub const PAD_TOKEN: &str = "[PAD]";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// `{dir}/tokenizer_{name}.json`
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("tokenizer_{name}.json"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// Load a previously saved tokenizer from its JSON file.
    pub fn load(&self, name: &str) -> Result<Tokenizer> {
        let path = self.path(name);
        Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })
    }

    /// Rank the words of `texts`, write the word-level tokenizer
    /// JSON and load it back.
    pub fn build_and_save(
        &self,
        name:      &str,
        texts:     &[String],
        num_words: usize,
    ) -> Result<Tokenizer> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let words = ranked_words(texts, num_words);

        let mut vocab = serde_json::Map::new();
        vocab.insert(PAD_TOKEN.to_string(), serde_json::json!(0));
        for (i, word) in words.iter().enumerate() {
            vocab.insert(word.clone(), serde_json::json!(i + 1));
        }

        let filter_class = filter_regex();
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": {
                "type": "Sequence",
                "normalizers": [
                    { "type": "Lowercase" },
                    {
                        "type": "Replace",
                        "pattern": { "Regex": filter_class },
                        "content": " "
                    }
                ]
            },
            "pre_tokenizer": { "type": "WhitespaceSplit" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": PAD_TOKEN
            }
        });

        let path = self.path(name);
        fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON '{}'", path.display()))?;

        tracing::info!(
            "Built '{}' tokenizer: {} words (cap {}), saved to '{}'",
            name,
            words.len(),
            num_words,
            path.display(),
        );

        self.load(name)
    }
}

/// Words of `texts` sorted by descending frequency, ties broken by
/// first appearance, capped so that every id (1-based) is below
/// `num_words`.
pub fn ranked_words(texts: &[String], num_words: usize) -> Vec<String> {
    // word → (count, first position seen)
    let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
    let mut order = 0usize;
    for text in texts {
        for word in split_words(text) {
            let entry = freq.entry(word).or_insert((0, order));
            entry.0 += 1;
            order += 1;
        }
    }

    let mut words: Vec<(String, (usize, usize))> = freq.into_iter().collect();
    words.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    words.truncate(num_words.saturating_sub(1));
    words.into_iter().map(|(w, _)| w).collect()
}

/// Regex character class matching every filtered character.
fn filter_regex() -> String {
    let mut class = String::from("[");
    for c in FILTER_CHARS.chars() {
        match c {
            '\t' => class.push_str("\\t"),
            '\n' => class.push_str("\\n"),
            '\\' | '[' | ']' | '^' | '-' => {
                class.push('\\');
                class.push(c);
            }
            c => class.push(c),
        }
    }
    class.push(']');
    class
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "the cat sat".to_string(),
            "The dog sat, then the cat ran!".to_string(),
        ]
    }

    #[test]
    fn test_ranked_by_frequency_then_first_seen() {
        let words = ranked_words(&corpus(), 100);
        // the ×3, cat ×2, sat ×2 (cat seen first), dog, then, ran
        assert_eq!(words, vec!["the", "cat", "sat", "dog", "then", "ran"]);
    }

    #[test]
    fn test_cap_reserves_padding_slot() {
        let words = ranked_words(&corpus(), 3);
        assert_eq!(words, vec!["the", "cat"]);
    }

    #[test]
    fn test_filter_regex_escapes_class_metacharacters() {
        let re = filter_regex();
        assert!(re.starts_with('[') && re.ends_with(']'));
        assert!(re.contains("\\[\\\\\\]\\^"));
        assert!(re.contains("\\-"));
    }

    #[test]
    fn test_build_then_load_round_trips_through_disk() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(tmp.path());
        assert!(!store.exists("en"));

        let built = store.build_and_save("en", &corpus(), 100).unwrap();
        assert!(store.exists("en"));
        assert_eq!(built.token_to_id("the"), Some(1));
        assert_eq!(built.token_to_id(PAD_TOKEN), Some(0));

        let reloaded = store.load("en").unwrap();
        assert_eq!(reloaded.token_to_id("cat"), Some(2));
    }

    #[test]
    fn test_rebuild_overwrites_a_smaller_vocabulary() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(tmp.path());

        store.build_and_save("en", &corpus(), 2).unwrap();
        assert_eq!(store.load("en").unwrap().token_to_id("cat"), None);

        store.build_and_save("en", &corpus(), 100).unwrap();
        assert_eq!(store.load("en").unwrap().token_to_id("cat"), Some(2));
    }
}
