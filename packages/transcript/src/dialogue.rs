//! Transcript parsing.
//!
//! A script is segmented into blocks, each starting at a line that opens
//! with a capitalized word sequence followed by a colon (`JERRY:`,
//! `MR. PITT:`) and running up to the next such marker or the end of the
//! text. The label becomes the speaker and the rest of the block, minus any
//! `[...]` stage directions, is tokenized into lowercase words.

use std::sync::LazyLock;

use regex::Regex;
use script_archive_transcript_models::DialogueLine;

use crate::speakers::SpeakerTable;

/// Start of a dialogue block: a capitalized label and its colon. Page text
/// keeps `&nbsp;` as U+00A0, so it counts as indentation here.
static SPEAKER_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t\x{A0}]*([A-Z][A-Za-z0-9.'\-]*(?:[ \t\x{A0}]+[A-Z][A-Za-z0-9.'\-]*)*)[ \t\x{A0}]*:",
    )
    .expect("valid regex")
});

/// Bracketed stage directions, possibly spanning lines.
static STAGE_DIRECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

/// A word with optional internal apostrophes (`don't`, `rock'n'roll`).
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w&&[^_]]+(?:['’][\w&&[^_]]+)*").expect("valid regex")
});

/// Turns raw script text into speaker-attributed [`DialogueLine`]s.
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    speakers: SpeakerTable,
}

impl TranscriptParser {
    /// Creates a parser that cleans speaker labels with `speakers`.
    #[must_use]
    pub const fn new(speakers: SpeakerTable) -> Self {
        Self { speakers }
    }

    /// Parses a full script into lines, in script order.
    ///
    /// Blocks whose label is blocklisted are dropped. Text without any
    /// speaker markers yields an empty vector.
    #[must_use]
    pub fn parse(&self, text: &str) -> Vec<DialogueLine> {
        let markers: Vec<_> = SPEAKER_MARKER_RE.captures_iter(text).collect();
        let mut lines = Vec::with_capacity(markers.len());
        let mut dropped = 0usize;

        for (i, caps) in markers.iter().enumerate() {
            let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let body_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |next| next.start());
            let body = &text[whole.end()..body_end];

            let label = normalize_label(label.as_str());
            let Some(speaker) = self.speakers.resolve(&label) else {
                dropped += 1;
                continue;
            };

            lines.push(DialogueLine {
                speaker,
                tokens: tokenize(&strip_stage_directions(body)),
            });
        }

        log::debug!(
            "Parsed {} dialogue lines ({dropped} non-speaker blocks dropped)",
            lines.len()
        );

        lines
    }
}

/// Lowercases a label and collapses internal whitespace.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Removes every `[...]` span from `text`.
#[must_use]
pub fn strip_stage_directions(text: &str) -> String {
    STAGE_DIRECTION_RE.replace_all(text, " ").into_owned()
}

/// Splits `text` into lowercase word tokens, keeping contractions whole.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().replace('’', "'"))
        .collect()
}
