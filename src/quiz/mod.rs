//! Multiple-choice question generation
//!
//! Questions are built from the first sentences of a summary. Each question
//! offers its source sentence as the answer plus other sentences as
//! distractors.

mod mcq;

pub use mcq::{
    generate_mcqs, generate_mcqs_with_rng, question_for, split_sentences, Mcq, DISTRACTOR_COUNT,
    FILLER_OPTION, MAX_QUESTIONS, SENTENCE_DELIMITER,
};
