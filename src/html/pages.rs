use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::pipeline::ChapterResult;

/// Seconds between reloads of the processing page
pub const PROCESSING_REFRESH_SECS: u32 = 5;

/// What the index page shows besides its forms
#[derive(Debug, Default)]
pub struct IndexView<'a> {
    pub error: Option<&'a str>,
    pub success: Option<&'a str>,
    pub results: Option<&'a [ChapterResult]>,
}

impl<'a> IndexView<'a> {
    pub fn error(message: &'a str) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }

    pub fn success(message: &'a str) -> Self {
        Self {
            success: Some(message),
            ..Self::default()
        }
    }

    pub fn results(results: &'a [ChapterResult]) -> Self {
        Self {
            results: Some(results),
            ..Self::default()
        }
    }
}

fn layout(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/style.css">{head_extra}
</head>
<body>
  <header class="site-header">
    <h1><a href="/">Book Summarizer</a></h1>
    <button type="button" id="dark-mode-toggle" aria-label="Toggle dark mode">Dark mode</button>
  </header>
  <main>
{body}
  </main>
  <script src="/static/script.js"></script>
</body>
</html>
"#,
        title = encode_text(title),
    )
}

/// Upload forms, contact form, flash messages and optional results
pub fn render_index(view: &IndexView<'_>) -> String {
    let mut body = String::new();

    if let Some(error) = view.error {
        let _ = writeln!(body, r#"    <div class="alert alert-error">{}</div>"#, encode_text(error));
    }
    if let Some(success) = view.success {
        let _ = writeln!(body, r#"    <div class="alert alert-success">{}</div>"#, encode_text(success));
    }

    body.push_str(
        r#"    <section class="card upload">
      <h2>Summarize a book</h2>
      <p>Upload a PDF or TXT file. Chapters are detected from "Chapter N" headings.</p>
      <form action="/" method="post" enctype="multipart/form-data" class="upload-form">
        <input type="file" name="file" accept=".pdf,.txt" required>
        <button type="submit">Upload and process in background</button>
      </form>
      <form action="/summarize" method="post" enctype="multipart/form-data" class="upload-form">
        <input type="file" name="file" accept=".pdf,.txt" required>
        <button type="submit">Upload and wait for results</button>
      </form>
      <div class="progress-bar" hidden><div class="progress-fill"></div></div>
    </section>
"#,
    );

    if let Some(results) = view.results {
        body.push_str(&results_section(results));
    }

    body.push_str(
        r#"    <section class="card contact">
      <h2>Contact</h2>
      <form action="/contact" method="post" class="contact-form">
        <label>Name <input type="text" name="name" required></label>
        <label>Email <input type="email" name="email" required></label>
        <label>Message <textarea name="message" rows="4" required></textarea></label>
        <button type="submit">Send</button>
      </form>
    </section>
"#,
    );

    layout("Book Summarizer", "", &body)
}

/// Page shown while a background task is pending; reloads itself
pub fn render_processing() -> String {
    let refresh = format!(
        "\n  <meta http-equiv=\"refresh\" content=\"{}\">",
        PROCESSING_REFRESH_SECS
    );
    let body = r#"    <section class="card processing">
      <h2>Processing your book...</h2>
      <p>Chapters are being summarized. This page refreshes automatically.</p>
      <div class="spinner" aria-hidden="true"></div>
    </section>
"#;
    layout("Processing - Book Summarizer", &refresh, body)
}

/// Stand-alone results page
pub fn render_results(results: &[ChapterResult]) -> String {
    let mut body = results_section(results);
    body.push_str("    <p><a href=\"/\">Summarize another book</a></p>\n");
    layout("Results - Book Summarizer", "", &body)
}

fn results_section(results: &[ChapterResult]) -> String {
    let payload = serde_json::to_string(results).unwrap_or_else(|_| "[]".to_string());
    let payload = encode_double_quoted_attribute(&payload);

    let mut out = String::new();
    let _ = writeln!(out, r#"    <section class="results">"#);
    let _ = writeln!(out, r#"      <div class="results-toolbar">"#);
    let _ = writeln!(out, r#"        <button type="button" id="quiz-toggle">Start Quiz</button>"#);
    let _ = writeln!(
        out,
        r#"        <button type="button" class="export-btn" data-format="json" data-results="{}">Export JSON</button>"#,
        payload
    );
    let _ = writeln!(
        out,
        r#"        <button type="button" class="export-btn" data-format="pdf" data-results="{}">Export PDF</button>"#,
        payload
    );
    let _ = writeln!(out, "      </div>");

    for result in results {
        let _ = writeln!(out, r#"      <article class="card chapter">"#);
        let _ = writeln!(out, "        <h2>{}</h2>", encode_text(&result.chapter));
        let _ = writeln!(out, r#"        <div class="summary">"#);
        for paragraph in result.summary.split('\n').filter(|p| !p.trim().is_empty()) {
            let _ = writeln!(out, "          <p>{}</p>", encode_text(paragraph));
        }
        let _ = writeln!(out, "        </div>");

        if !result.mcqs.is_empty() {
            let _ = writeln!(out, "        <h3>MCQs</h3>");
        }
        for mcq in &result.mcqs {
            let _ = writeln!(
                out,
                r#"        <div class="quiz-question" data-correct="{}">"#,
                encode_double_quoted_attribute(&mcq.answer)
            );
            let _ = writeln!(out, r#"          <p class="question">{}</p>"#, encode_text(&mcq.question));
            let _ = writeln!(out, r#"          <ul class="options">"#);
            for option in &mcq.options {
                let _ = writeln!(out, "            <li>{}</li>", encode_text(option));
            }
            let _ = writeln!(out, "          </ul>");
            let _ = writeln!(out, r#"          <div class="quiz-options">"#);
            for option in &mcq.options {
                let _ = writeln!(
                    out,
                    r#"            <button type="button" class="quiz-option">{}</button>"#,
                    encode_text(option)
                );
            }
            let _ = writeln!(out, "          </div>");
            let _ = writeln!(
                out,
                r#"          <p class="answer">Answer: {}</p>"#,
                encode_text(&mcq.answer)
            );
            let _ = writeln!(out, "        </div>");
        }
        let _ = writeln!(out, "      </article>");
    }

    let _ = writeln!(out, "    </section>");
    out
}
