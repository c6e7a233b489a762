//! Plain-text report

use std::fmt::Write;

use super::types::ChapterResult;

/// Render results as the plain-text report printed by the CLI
pub fn format_text_report(results: &[ChapterResult]) -> String {
    let mut out = String::new();

    for result in results {
        let _ = writeln!(out, "\n{}", result.chapter);
        let _ = writeln!(out, "Summary:");
        let _ = writeln!(out, "{}", result.summary);
        let _ = writeln!(out, "\nMCQs:");
        for (i, mcq) in result.mcqs.iter().enumerate() {
            let _ = writeln!(out, "Q{}: {}", i + 1, mcq.question);
            for option in &mcq.options {
                let _ = writeln!(out, " - {}", option);
            }
            let _ = writeln!(out, "Answer: {}", mcq.answer);
        }
    }

    out
}
