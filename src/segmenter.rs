//! Incremental sentence segmentation over a stream of text fragments.
//!
//! Tokens from a language model arrive in arbitrary pieces ("Hel", "lo. Th",
//! "is ..."). `SentenceSegmenter` buffers them and hands back each sentence
//! as soon as its end is recognizable, so synthesis can start while the rest
//! of the answer is still being generated.
//!
//! A boundary is `.`, `!` or `?` followed either by whitespace and an
//! upper-case letter, or by the end of the buffered text. Boundaries that
//! would end a sentence on a known abbreviation ("Dr.", "e.g.") are rejected.

/// Abbreviations that end in a period without ending a sentence.
pub const ABBREVIATIONS: &[&str] = &[
    "Mr.", "Mrs.", "Dr.", "Ms.", "Prof.", "Sr.", "Jr.", "vs.", "e.g.", "i.e.",
];

/// Groups streamed text fragments into complete sentences.
///
/// Owned by the producer thread for one pipeline run; not shared.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    buffer: String,
    abbreviations: Vec<String>,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSegmenter {
    /// Creates a segmenter with the default abbreviation list.
    pub fn new() -> Self {
        Self::with_abbreviations(ABBREVIATIONS.iter().copied())
    }

    /// Creates a segmenter with a custom abbreviation list.
    pub fn with_abbreviations<I, S>(abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            buffer: String::new(),
            abbreviations: abbreviations.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends a fragment and returns every sentence completed by it, in order.
    ///
    /// Text after the last accepted boundary stays buffered for the next call.
    pub fn add_text(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);

        // Whitespace can never complete a boundary on its own.
        if fragment.trim().is_empty() {
            return Vec::new();
        }

        let mut sentences = Vec::new();
        let mut last_end = 0;

        for end in boundary_candidates(&self.buffer) {
            let sentence = self.buffer[last_end..end].trim();
            if sentence.is_empty() || self.ends_with_abbreviation(sentence) {
                continue;
            }
            sentences.push(sentence.to_string());
            last_end = end;
        }

        if last_end > 0 {
            self.buffer.drain(..last_end);
        }

        sentences
    }

    /// Returns the trimmed remainder once and clears the buffer.
    ///
    /// `None` when nothing but whitespace is buffered.
    pub fn flush(&mut self) -> Option<String> {
        let remainder = self.buffer.trim().to_string();
        self.buffer.clear();
        if remainder.is_empty() {
            None
        } else {
            Some(remainder)
        }
    }

    /// Text currently waiting for a boundary.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    fn ends_with_abbreviation(&self, sentence: &str) -> bool {
        self.abbreviations.iter().any(|abbreviation| {
            sentence.strip_suffix(abbreviation.as_str()).is_some_and(|head| {
                // "Dr." must be a whole word: "Mr. Dr." yes, "ToDr." no
                head.chars()
                    .next_back()
                    .is_none_or(|c| !c.is_alphanumeric())
            })
        })
    }
}

/// Byte offsets just past each candidate boundary, in ascending order.
///
/// For punctuation followed by whitespace and an upper-case letter, the
/// offset is the start of that letter. For punctuation at the very end of
/// the text, it is the text length.
fn boundary_candidates(text: &str) -> Vec<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut candidates = Vec::new();

    for (i, &(offset, c)) in chars.iter().enumerate() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let after = offset + c.len_utf8();
        if after == text.len() {
            candidates.push(after);
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && chars[j].1.is_whitespace() {
            j += 1;
        }
        if j > i + 1 && j < chars.len() && chars[j].1.is_uppercase() {
            candidates.push(chars[j].0);
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(segmenter: &mut SentenceSegmenter, fragments: &[&str]) -> Vec<String> {
        fragments
            .iter()
            .flat_map(|fragment| segmenter.add_text(fragment))
            .collect()
    }

    #[test]
    fn test_single_complete_sentence_at_end_of_buffer() {
        let mut segmenter = SentenceSegmenter::new();
        assert_eq!(segmenter.add_text("Hello world."), vec!["Hello world."]);
        assert_eq!(segmenter.pending(), "");
    }

    #[test]
    fn test_trailing_whitespace_waits_for_next_capital() {
        let mut segmenter = SentenceSegmenter::new();
        assert!(segmenter.add_text("Hello world. ").is_empty());
        assert_eq!(segmenter.add_text("This is"), vec!["Hello world."]);
        assert_eq!(segmenter.pending(), "This is");
    }

    #[test]
    fn test_multiple_sentences_in_one_fragment() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = segmenter.add_text("One. Two! Three? Four");
        assert_eq!(sentences, vec!["One.", "Two!", "Three?"]);
        assert_eq!(segmenter.flush(), Some("Four".to_string()));
    }

    #[test]
    fn test_lowercase_after_period_is_not_a_boundary() {
        let mut segmenter = SentenceSegmenter::new();
        assert!(segmenter.add_text("Version 2. is out").is_empty());
        assert!(segmenter.add_text("The end").is_empty());
    }

    #[test]
    fn test_period_without_whitespace_is_not_a_boundary() {
        let mut segmenter = SentenceSegmenter::new();
        assert!(segmenter.add_text("Visit example.Com today").is_empty());
    }

    #[test]
    fn test_abbreviation_suppresses_boundary() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = segmenter.add_text("Dr. Smith arrived. He left.");
        assert_eq!(sentences, vec!["Dr. Smith arrived.", "He left."]);
        assert_eq!(segmenter.flush(), None);
    }

    #[test]
    fn test_abbreviation_split_across_fragments() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = feed(&mut segmenter, &["I met Mr.", " Jones today. ", "Nice"]);
        assert_eq!(sentences, vec!["I met Mr. Jones today."]);
    }

    #[test]
    fn test_lowercase_abbreviations() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = segmenter.add_text("Use fruit, e.g. Apples work. Done.");
        assert_eq!(sentences, vec!["Use fruit, e.g. Apples work.", "Done."]);
    }

    #[test]
    fn test_abbreviation_must_be_whole_word() {
        let mut segmenter = SentenceSegmenter::new();
        // "ToDr." merely ends with "Dr."
        let sentences = segmenter.add_text("Go ToDr. Next one");
        assert_eq!(sentences, vec!["Go ToDr."]);
    }

    #[test]
    fn test_abbreviation_at_end_of_input_is_flushed() {
        let mut segmenter = SentenceSegmenter::new();
        assert!(segmenter.add_text("Say hello to Dr.").is_empty());
        assert_eq!(segmenter.flush(), Some("Say hello to Dr.".to_string()));
    }

    #[test]
    fn test_custom_abbreviations() {
        let mut segmenter = SentenceSegmenter::with_abbreviations(["approx."]);
        assert!(segmenter.add_text("It costs approx.").is_empty());
        // Default list no longer applies
        let sentences = segmenter.add_text(" Ten euros. Dr. Who");
        assert_eq!(sentences, vec!["It costs approx. Ten euros.", "Dr."]);
    }

    #[test]
    fn test_whitespace_fragments_are_noops() {
        let mut segmenter = SentenceSegmenter::new();
        assert!(segmenter.add_text("").is_empty());
        assert!(segmenter.add_text("   ").is_empty());
        assert!(segmenter.add_text("\n").is_empty());
        assert_eq!(segmenter.flush(), None);
    }

    #[test]
    fn test_whitespace_fragment_is_kept_between_words() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = feed(&mut segmenter, &["Hi.", " ", "Bye"]);
        assert_eq!(sentences, vec!["Hi."]);
        assert_eq!(segmenter.flush(), Some("Bye".to_string()));
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut segmenter = SentenceSegmenter::new();
        segmenter.add_text("no boundary yet");
        assert_eq!(segmenter.flush(), Some("no boundary yet".to_string()));
        assert_eq!(segmenter.flush(), None);
    }

    #[test]
    fn test_flush_on_whitespace_only_buffer() {
        let mut segmenter = SentenceSegmenter::new();
        assert_eq!(segmenter.add_text("Done."), vec!["Done."]);
        segmenter.add_text("  ");
        assert_eq!(segmenter.flush(), None);
    }

    #[test]
    fn test_newline_between_sentences() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = segmenter.add_text("First line.\n\nSecond line");
        assert_eq!(sentences, vec!["First line."]);
    }

    #[test]
    fn test_unicode_text() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = segmenter.add_text("Café au lait… Très bien! Élan vital");
        assert_eq!(sentences, vec!["Café au lait… Très bien!"]);
        assert_eq!(segmenter.flush(), Some("Élan vital".to_string()));
    }

    #[test]
    fn test_streamed_answer_scenario() {
        let mut segmenter = SentenceSegmenter::new();
        let sentences = feed(
            &mut segmenter,
            &["Hello world. ", "This is ", "Dr. Lee speaking. ", "Goodbye."],
        );
        assert_eq!(
            sentences,
            vec!["Hello world.", "This is Dr. Lee speaking.", "Goodbye."]
        );
        assert_eq!(segmenter.flush(), None);
    }

    #[test]
    fn test_boundary_candidates_offsets() {
        assert_eq!(boundary_candidates("A. B"), vec![3]);
        assert_eq!(boundary_candidates("A."), vec![2]);
        assert_eq!(boundary_candidates("a. b"), Vec::<usize>::new());
        assert_eq!(boundary_candidates("Wow?!  Yes"), vec![7]);
    }
}
