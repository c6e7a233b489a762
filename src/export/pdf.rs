//! PDF report rendering
//!
//! Lays out the results on US Letter pages with the standard Helvetica
//! fonts, top to bottom, breaking pages when the cursor nears the bottom.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use thiserror::Error;

use crate::pipeline::ChapterResult;

pub const PDF_EXPORT_FILENAME: &str = "book_summary.pdf";
pub const PDF_TITLE: &str = "Book Summary and MCQs";

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const TOP_MARGIN: i64 = 40;
const RIGHT_MARGIN: i64 = 40;
const CHAPTER_BREAK_Y: i64 = 100;
const LINE_BREAK_Y: i64 = 60;
const LINE_HEIGHT: i64 = 15;
const BODY_SIZE: i64 = 12;

/// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f64 = 0.5;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

#[derive(Debug, Error)]
pub enum PdfExportError {
    #[error("PDF encoding failed: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Collects drawing operations page by page
struct PageCanvas {
    pages: Vec<Vec<Operation>>,
    y: i64,
}

impl PageCanvas {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - TOP_MARGIN,
        }
    }

    fn show_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = PAGE_HEIGHT - TOP_MARGIN;
    }

    fn break_if_below(&mut self, threshold: i64) {
        if self.y < threshold {
            self.show_page();
        }
    }

    fn draw_string(&mut self, font: &str, size: i64, x: i64, text: &str) {
        let y = self.y;
        if let Some(ops) = self.pages.last_mut() {
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
            ops.push(Operation::new("Td", vec![x.into(), y.into()]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
            ));
            ops.push(Operation::new("ET", vec![]));
        }
    }

    /// Draw body lines at `x`, wrapping to the page width
    fn draw_body(&mut self, x: i64, text: &str) {
        for line in wrap_text(text, max_chars(x, BODY_SIZE)) {
            self.break_if_below(LINE_BREAK_Y);
            self.draw_string(REGULAR, BODY_SIZE, x, &line);
            self.y -= LINE_HEIGHT;
        }
    }
}

/// Render the chapter results as a PDF document
pub fn render_pdf(results: &[ChapterResult]) -> Result<Vec<u8>, PdfExportError> {
    let bytes = assemble(layout(results).pages)?;
    tracing::debug!(chapters = results.len(), bytes = bytes.len(), "Rendered PDF export");
    Ok(bytes)
}

fn layout(results: &[ChapterResult]) -> PageCanvas {
    let mut canvas = PageCanvas::new();

    canvas.draw_string(BOLD, 16, 40, PDF_TITLE);
    canvas.y -= 30;

    for result in results {
        canvas.break_if_below(CHAPTER_BREAK_Y);
        canvas.draw_string(BOLD, 14, 40, &result.chapter);
        canvas.y -= 20;

        for line in result.summary.split('\n') {
            canvas.draw_body(50, line);
        }
        canvas.y -= 10;

        canvas.draw_string(BOLD, 13, 50, "MCQs:");
        canvas.y -= 20;

        for mcq in &result.mcqs {
            canvas.draw_body(60, &format!("Q: {}", mcq.question));
            for option in &mcq.options {
                canvas.draw_body(70, &format!("- {}", option));
            }
            canvas.y -= 10;
        }
        canvas.y -= 20;
    }

    canvas
}

fn assemble(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, PdfExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn max_chars(x: i64, size: i64) -> usize {
    let usable = (PAGE_WIDTH - x - RIGHT_MARGIN) as f64;
    (usable / (size as f64 * AVG_GLYPH_WIDTH)).floor().max(1.0) as usize
}

/// Greedy word wrap; words longer than a line are split
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encode text for the standard fonts' WinAnsiEncoding; unmapped characters
/// become '?'
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            ' '..='~' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Mcq;

    fn chapter(title: &str, summary: &str, questions: usize) -> ChapterResult {
        ChapterResult {
            chapter: title.to_string(),
            summary: summary.to_string(),
            mcqs: (0..questions)
                .map(|i| Mcq {
                    question: format!("What is the main idea of: 'Sentence {}'?", i),
                    options: vec![
                        format!("Sentence {}", i),
                        "Other option".to_string(),
                        "Other option".to_string(),
                        "Other option".to_string(),
                    ],
                    answer: format!("Sentence {}", i),
                })
                .collect(),
        }
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[test]
    fn test_single_page_document() {
        let bytes = render_pdf(&[chapter("Chapter 1", "A short summary.", 3)]).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_empty_results_still_render_title_page() {
        let bytes = render_pdf(&[]).unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_long_input_spans_pages() {
        let summary = "Every line of this summary is long enough to need wrapping. ".repeat(40);
        let results: Vec<_> = (1..=6)
            .map(|i| chapter(&format!("Chapter {}", i), &summary, 3))
            .collect();

        let bytes = render_pdf(&results).unwrap();
        assert!(page_count(&bytes) > 3);
    }

    /// (font size, y) of every text placement, page by page
    fn placements(canvas: &PageCanvas) -> Vec<Vec<(i64, i64)>> {
        canvas
            .pages
            .iter()
            .map(|ops| {
                let mut size = 0;
                let mut out = Vec::new();
                for op in ops {
                    match op.operator.as_str() {
                        "Tf" => size = op.operands[1].as_i64().unwrap(),
                        "Td" => out.push((size, op.operands[1].as_i64().unwrap())),
                        _ => {}
                    }
                }
                out
            })
            .collect()
    }

    #[test]
    fn test_break_thresholds_hold() {
        let summary = "Every line of this summary is long enough to need wrapping. ".repeat(40);
        let results: Vec<_> = (1..=6)
            .map(|i| chapter(&format!("Chapter {}", i), &summary, 3))
            .collect();
        let pages = placements(&layout(&results));
        assert!(pages.len() > 3);

        for page in &pages {
            assert_eq!(page[0].1, PAGE_HEIGHT - TOP_MARGIN);
            for &(size, y) in page {
                if size == BODY_SIZE {
                    assert!(y >= LINE_BREAK_Y, "body line at y={}", y);
                }
                if size == 14 {
                    assert!(y >= CHAPTER_BREAK_Y, "chapter heading at y={}", y);
                }
            }
        }
    }

    #[test]
    fn test_low_chapter_heading_starts_new_page() {
        // 37 summary lines leave the cursor at y=97 after the first chapter
        let summary = vec!["Short line."; 37].join("\n");
        let results = vec![
            chapter("Chapter 1", &summary, 0),
            chapter("Chapter 2", "Next.", 0),
        ];
        let pages = placements(&layout(&results));

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].last(), Some(&(13, 137)));
        assert_eq!(pages[1][0], (14, 752));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("  spaced   out ", 20), vec!["spaced out"]);
    }

    #[test]
    fn test_line_width_budget() {
        assert_eq!(max_chars(50, 12), 87);
        assert!(max_chars(70, 12) < max_chars(50, 12));
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(encode_win_ansi("é“”"), vec![0xe9, 0x93, 0x94]);
        assert_eq!(encode_win_ansi("日"), b"?".to_vec());
    }
}
