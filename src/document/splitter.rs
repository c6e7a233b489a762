//! Chapter segmentation
//!
//! A chapter starts at every case-insensitive `Chapter <number>` marker and
//! runs until the next marker. The marker line is the title. Text before the
//! first marker is not part of any chapter.

use std::sync::LazyLock;

use regex::Regex;

use super::types::Chapter;

/// Title used when the document contains no chapter markers
pub const FULL_TEXT_TITLE: &str = "Full Text";

static CHAPTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)chapter\s+\d+[^\n]*").unwrap());

/// Split document text into chapters
///
/// Never returns an empty list: without markers the whole (trimmed) text
/// becomes a single "Full Text" chapter.
pub fn split_into_chapters(text: &str) -> Vec<Chapter> {
    let markers: Vec<_> = CHAPTER_MARKER.find_iter(text).collect();

    if markers.is_empty() {
        return vec![Chapter::new(FULL_TEXT_TITLE, text.trim())];
    }

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers
                .get(i + 1)
                .map(|next| next.start())
                .unwrap_or(text.len());
            Chapter::new(marker.as_str().trim(), text[marker.end()..end].trim())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_chapter_scenario() {
        let text = "Chapter 1 Intro\nHello world. This is a test. Another sentence. Final one.";
        let chapters = split_into_chapters(text);

        assert_eq!(
            chapters,
            vec![Chapter::new(
                "Chapter 1 Intro",
                "Hello world. This is a test. Another sentence. Final one."
            )]
        );
    }

    #[test]
    fn test_chapters_in_document_order() {
        let text = "Chapter 1: Dawn\nThe sun rose.\n\nCHAPTER 2 Noon\nIt was hot.\nchapter 3\nNight fell.";
        let chapters = split_into_chapters(text);

        let titles: Vec<_> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter 1: Dawn", "CHAPTER 2 Noon", "chapter 3"]);

        let contents: Vec<_> = chapters.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["The sun rose.", "It was hot.", "Night fell."]);
    }

    #[test]
    fn test_preamble_before_first_marker_is_dropped() {
        let text = "Foreword by the editor.\nChapter 1 Begin\nBody text.";
        let chapters = split_into_chapters(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1 Begin");
        assert_eq!(chapters[0].content, "Body text.");
    }

    #[test]
    fn test_no_markers_yields_full_text() {
        let text = "\n  Just some prose without headings.\nSecond line.  \n";
        let chapters = split_into_chapters(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, FULL_TEXT_TITLE);
        assert_eq!(chapters[0].content, text.trim());
    }

    #[test]
    fn test_empty_input_still_yields_a_chapter() {
        let chapters = split_into_chapters("");
        assert_eq!(chapters, vec![Chapter::new(FULL_TEXT_TITLE, "")]);
    }

    #[test]
    fn test_word_chapter_without_number_is_not_a_marker() {
        let chapters = split_into_chapters("This chapter has no number.");
        assert_eq!(chapters[0].title, FULL_TEXT_TITLE);
    }

    #[test]
    fn test_empty_chapter_content() {
        let text = "Chapter 1 Empty\n   \nChapter 2 Full\nContent here.";
        let chapters = split_into_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].content, "");
        assert_eq!(chapters[1].content, "Content here.");
    }

    #[test]
    fn test_duplicate_titles_are_kept() {
        let text = "Chapter 1\nfirst\nChapter 1\nsecond";
        let chapters = split_into_chapters(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, chapters[1].title);
        assert_eq!(chapters[1].content, "second");
    }

    #[test]
    fn test_content_spans_cover_text_minus_titles() {
        let text = "Chapter 1 A\nalpha beta\nChapter 2 B\ngamma\nChapter 3 C\ndelta epsilon";
        let chapters = split_into_chapters(text);

        let mut rebuilt = String::new();
        for chapter in &chapters {
            rebuilt.push_str(&chapter.title);
            rebuilt.push('\n');
            rebuilt.push_str(&chapter.content);
            rebuilt.push('\n');
        }
        assert_eq!(rebuilt.trim_end(), text);
    }
}
