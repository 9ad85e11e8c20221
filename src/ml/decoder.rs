// ============================================================
// Layer 5 — Greedy Decoder
// ============================================================
// Generates a target sentence one token at a time.
//
//   AwaitingFirstToken ──step──► Generating ──step──► ... ──► Done
//
//   1. encode the source once → encoder state
//   2. trace = [START]
//   3. run the decoder over the whole trace with the encoder
//      state (the GRUs keep no state between calls, so both are
//      supplied again every step)
//   4. next = argmax of the scores at the last position
//   5. next == END            → Done(EndToken), END not kept
//      trace full (max_len)   → Done(MaxLength), silently truncated
//      otherwise append, go to 3
//
// The network sits behind DecoderNetwork so the loop can be
// driven by a scripted stand-in in tests.

use anyhow::{bail, Result};

/// What the greedy loop needs from a model.
pub trait DecoderNetwork {
    type State;

    /// Run the encoder over one padded source row.
    fn encode(&self, source_row: &[u32]) -> Result<Self::State>;

    /// Vocabulary scores for the token following `trace`.
    fn next_token_scores(&self, trace: &[u32], state: &Self::State) -> Result<Vec<f32>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndToken,
    MaxLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    AwaitingFirstToken,
    Generating,
    Done(StopReason),
}

/// The evolving token trace of one translation request.
#[derive(Debug, Clone)]
pub struct DecoderTrace {
    tokens:    Vec<u32>,
    state:     DecodeState,
    end_token: u32,
    max_len:   usize,
}

impl DecoderTrace {
    pub fn new(start_token: u32, end_token: u32, max_len: usize) -> Self {
        // A trace that cannot hold a single generated token is full already.
        let state = if max_len <= 1 {
            DecodeState::Done(StopReason::MaxLength)
        } else {
            DecodeState::AwaitingFirstToken
        };
        Self { tokens: vec![start_token], state, end_token, max_len }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, DecodeState::Done(_))
    }

    /// Start token followed by every accepted token.
    pub fn tokens(&self) -> &[u32] {
        &self.tokens
    }

    /// Accepted tokens without the start token.
    pub fn generated(&self) -> &[u32] {
        &self.tokens[1..]
    }

    /// Feed the argmax token of one decoder step.
    pub fn push(&mut self, next: u32) {
        if self.is_done() {
            return;
        }
        if next == self.end_token {
            self.state = DecodeState::Done(StopReason::EndToken);
            return;
        }
        self.tokens.push(next);
        self.state = if self.tokens.len() >= self.max_len {
            DecodeState::Done(StopReason::MaxLength)
        } else {
            DecodeState::Generating
        };
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GreedyDecoder {
    pub start_token: u32,
    pub end_token:   u32,
    pub max_len:     usize,
}

impl GreedyDecoder {
    pub fn new(start_token: u32, end_token: u32, max_len: usize) -> Self {
        Self { start_token, end_token, max_len }
    }

    pub fn decode<N: DecoderNetwork>(&self, network: &N, source_row: &[u32]) -> Result<DecoderTrace> {
        let state = network.encode(source_row)?;
        let mut trace = DecoderTrace::new(self.start_token, self.end_token, self.max_len);

        while !trace.is_done() {
            let scores = network.next_token_scores(trace.tokens(), &state)?;
            let next = argmax(&scores)?;
            trace.push(next);
        }

        tracing::debug!(
            "Decoded {} tokens ({:?})",
            trace.generated().len(),
            trace.state(),
        );
        Ok(trace)
    }
}

/// Index of the largest score; the first one wins ties.
pub fn argmax(scores: &[f32]) -> Result<u32> {
    if scores.is_empty() {
        bail!("Decoder returned an empty score vector");
    }
    let mut best = 0usize;
    for (i, &s) in scores.iter().enumerate().skip(1) {
        if s > scores[best] {
            best = i;
        }
    }
    Ok(best as u32)
}
