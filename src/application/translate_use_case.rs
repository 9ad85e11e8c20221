// ============================================================
// Layer 2 — TranslateUseCase
// ============================================================
// Interactive loop:
//
//   > <english sentence>
//   Input : <english sentence>
//   Output : <vietnamese translation>
//   ----------------------------------------
//
// A blank line or EOF ends the session. Reader and writer are
// generic so the loop runs against in-memory buffers in tests.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::application::context::NmtContext;
use crate::application::train_use_case::TrainConfig;
use crate::domain::traits::Translator;
use crate::domain::translation::Translation;
use crate::ml::{inferencer::NeuralTranslator, InferBackend};

pub const PROMPT: &str = "> ";
const SEPARATOR: &str = "----------------------------------------";

pub struct TranslateUseCase<T: Translator> {
    translator: T,
}

impl TranslateUseCase<NeuralTranslator<InferBackend>> {
    /// Load context and weights from `config.model_dir`.
    pub fn load(config: TrainConfig) -> Result<Self> {
        let config     = config.resolve_saved()?;
        let context    = NmtContext::load(config)?;
        let device     = burn::backend::wgpu::WgpuDevice::default();
        let translator = NeuralTranslator::<InferBackend>::from_context(context, device)?;
        Ok(Self::new(translator))
    }
}

impl<T: Translator> TranslateUseCase<T> {
    pub fn new(translator: T) -> Self {
        Self { translator }
    }

    pub fn translate(&self, text: &str) -> Result<Translation> {
        let output = self.translator.translate(text)?;
        Ok(Translation::new(text, output))
    }

    /// Run the prompt loop; returns how many sentences were translated.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<usize> {
        let mut count = 0;
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let mut line = String::new();
            let read = input.read_line(&mut line).context("Cannot read from stdin")?;
            let text = line.trim();
            if read == 0 || text.is_empty() {
                break;
            }

            let t = self.translate(text)?;
            writeln!(output, "Input : {}", t.input)?;
            writeln!(output, "Output : {}", t.output)?;
            writeln!(output, "{SEPARATOR}")?;
            count += 1;
        }
        tracing::debug!("Interactive session ended after {} sentences", count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Upper;

    impl Translator for Upper {
        fn translate(&self, text: &str) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    #[test]
    fn test_loop_prints_input_and_output() {
        let use_case = TranslateUseCase::new(Upper);
        let mut out  = Vec::new();

        let n = use_case.run(Cursor::new("hello\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(n, 1);
        assert!(out.contains("Input : hello\n"));
        assert!(out.contains("Output : HELLO\n"));
        assert!(out.contains(SEPARATOR));
    }

    #[test]
    fn test_blank_line_stops_the_loop() {
        let use_case = TranslateUseCase::new(Upper);
        let mut out  = Vec::new();
        let n = use_case.run(Cursor::new("one\n\ntwo\n"), &mut out).unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn test_eof_stops_the_loop() {
        let use_case = TranslateUseCase::new(Upper);
        let mut out  = Vec::new();
        let n = use_case.run(Cursor::new("one\ntwo"), &mut out).unwrap();
        assert_eq!(n, 2);
        assert!(String::from_utf8(out).unwrap().ends_with(PROMPT));
    }
}
