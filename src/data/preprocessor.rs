// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw corpus lines before they reach the vocabulary.
//
// The IWSLT English/Vietnamese files escape punctuation as HTML
// entities ("don &apos;t", "&quot;hi&quot;") and occasionally
// carry stray control characters or runs of spaces. Left alone,
// "&apos;t" would become a vocabulary word of its own.
//
// Cleaning steps (applied in order):
//   1. Decode the handful of HTML entities the corpus uses
//   2. Replace tabs / control characters / odd spaces with a space
//   3. Collapse runs of spaces and trim
//
// The preprocessor also owns the two target-side rewrites:
//   - mark_target:     "cảm ơn" → "starttt cảm ơn enddd"
//   - clean_reference: reference text used for BLEU scoring
//
// Reference: Rust Book §8 (Strings in Rust)

const ENTITIES: [(&str, &str); 5] = [
    ("&apos;", "'"),
    ("&quot;", "\""),
    ("&lt;",   "<"),
    ("&gt;",   ">"),
    // must run last so "&amp;quot;" does not turn into a quote
    ("&amp;",  "&"),
];

#[derive(Debug, Clone)]
pub struct Preprocessor {
    start_marker: String,
    end_marker:   String,
}

impl Preprocessor {
    pub fn new(start_marker: impl Into<String>, end_marker: impl Into<String>) -> Self {
        Self {
            start_marker: start_marker.into(),
            end_marker:   end_marker.into(),
        }
    }

    /// Clean one corpus line for downstream tokenisation.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: HTML entities ─────────────────────────────────────────────
        let mut decoded = text.to_string();
        for (entity, plain) in ENTITIES {
            if decoded.contains(entity) {
                decoded = decoded.replace(entity, plain);
            }
        }

        // ── Step 2 + 3: normalise characters, collapse spaces ─────────────────
        let mut out        = String::with_capacity(decoded.len());
        let mut last_space = true;
        for c in decoded.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            };
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }
        out.trim_end().to_string()
    }

    /// Wrap a target sentence in the start and end markers the
    /// decoder learns to begin and finish with.
    pub fn mark_target(&self, text: &str) -> String {
        format!("{} {} {}", self.start_marker, self.clean(text), self.end_marker)
    }

    /// Normalise a reference translation for scoring: drop the
    /// detached sentence-final " ." and lowercase, since the model
    /// only ever emits lowercase words without punctuation.
    pub fn clean_reference(&self, text: &str) -> String {
        self.clean(text).replace(" .", "").to_lowercase()
    }

    pub fn start_marker(&self) -> &str {
        &self.start_marker
    }

    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new("starttt", "enddd")
    }
}
