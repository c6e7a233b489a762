//! Multiple-choice questions built from summary sentences

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Questions generated per summary at most
pub const MAX_QUESTIONS: usize = 3;

/// Wrong options per question
pub const DISTRACTOR_COUNT: usize = 3;

/// Pads the option list when the summary has too few other sentences
pub const FILLER_OPTION: &str = "Other option";

/// Sentences are separated by a period followed by a space
pub const SENTENCE_DELIMITER: &str = ". ";

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Split text into trimmed, non-empty sentences
///
/// Only `". "` separates sentences, so the last sentence keeps its final
/// period.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The question asked about a sentence
pub fn question_for(sentence: &str) -> String {
    format!("What is the main idea of: '{}'?", sentence)
}

/// Generate up to three MCQs with the thread-local RNG
pub fn generate_mcqs(summary: &str) -> Vec<Mcq> {
    generate_mcqs_with_rng(summary, &mut rand::thread_rng())
}

/// Generate up to three MCQs, shuffling options with `rng`
///
/// Every question has exactly four options: the answer plus the first three
/// distinct other sentences, padded with [`FILLER_OPTION`].
pub fn generate_mcqs_with_rng<R: Rng + ?Sized>(summary: &str, rng: &mut R) -> Vec<Mcq> {
    let sentences = split_sentences(summary);

    sentences
        .iter()
        .take(MAX_QUESTIONS)
        .map(|sentence| {
            let mut options: Vec<String> = Vec::with_capacity(DISTRACTOR_COUNT + 1);
            options.push(sentence.clone());

            for other in &sentences {
                if options.len() > DISTRACTOR_COUNT {
                    break;
                }
                if other != sentence && !options.contains(other) {
                    options.push(other.clone());
                }
            }
            while options.len() <= DISTRACTOR_COUNT {
                options.push(FILLER_OPTION.to_string());
            }

            options.shuffle(rng);

            Mcq {
                question: question_for(sentence),
                options,
                answer: sentence.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_split_sentences() {
        assert_eq!(split_sentences("A. B. C. D."), vec!["A", "B", "C", "D."]);
        assert_eq!(split_sentences("  One.  Two. "), vec!["One", "Two."]);
        assert!(split_sentences("").is_empty());
        assert!(split_sentences(" .  . ").is_empty());
    }

    #[test]
    fn test_three_questions_from_four_sentences() {
        let mut rng = StdRng::seed_from_u64(7);
        let mcqs = generate_mcqs_with_rng("A. B. C. D.", &mut rng);

        assert_eq!(mcqs.len(), 3);
        let answers: Vec<_> = mcqs.iter().map(|m| m.answer.as_str()).collect();
        assert_eq!(answers, vec!["A", "B", "C"]);
        assert_eq!(mcqs[0].question, "What is the main idea of: 'A'?");

        let mut options = mcqs[0].options.clone();
        options.sort();
        assert_eq!(options, vec!["A", "B", "C", "D."]);

        let mut options = mcqs[2].options.clone();
        options.sort();
        assert_eq!(options, vec!["A", "B", "C", "D."]);
    }

    #[test]
    fn test_single_sentence_is_padded() {
        let mut rng = StdRng::seed_from_u64(1);
        let mcqs = generate_mcqs_with_rng("Only one sentence here.", &mut rng);

        assert_eq!(mcqs.len(), 1);
        let mcq = &mcqs[0];
        assert_eq!(mcq.answer, "Only one sentence here.");
        assert_eq!(mcq.options.len(), 4);
        assert_eq!(
            mcq.options.iter().filter(|o| *o == FILLER_OPTION).count(),
            3
        );
    }

    #[test]
    fn test_duplicate_sentences_are_not_distractors() {
        let mut rng = StdRng::seed_from_u64(3);
        let mcqs = generate_mcqs_with_rng("Same. Same. Different.", &mut rng);

        let first = &mcqs[0];
        assert_eq!(first.options.iter().filter(|o| *o == "Same").count(), 1);
        assert!(first.options.contains(&"Different.".to_string()));
        assert_eq!(first.options.iter().filter(|o| *o == FILLER_OPTION).count(), 2);
    }

    #[test]
    fn test_empty_summary_has_no_questions() {
        assert!(generate_mcqs("").is_empty());
        assert!(generate_mcqs("   ").is_empty());
    }

    #[test]
    fn test_answer_always_among_options() {
        let summary = "The war ended. Cities were rebuilt. Trade resumed. People moved west. Art flourished.";
        for mcq in generate_mcqs(summary) {
            assert_eq!(mcq.options.len(), DISTRACTOR_COUNT + 1);
            assert!(mcq.options.contains(&mcq.answer));
        }
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let summary = "Alpha. Beta. Gamma. Delta. Epsilon.";
        let first = generate_mcqs_with_rng(summary, &mut StdRng::seed_from_u64(42));
        let second = generate_mcqs_with_rng(summary, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_answer_position_varies() {
        let summary = "Alpha. Beta. Gamma. Delta.";
        let mut seen = [false; 4];
        for seed in 0..200 {
            let mcqs = generate_mcqs_with_rng(summary, &mut StdRng::seed_from_u64(seed));
            let position = mcqs[0]
                .options
                .iter()
                .position(|o| *o == mcqs[0].answer)
                .unwrap();
            seen[position] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
