use std::path::Path;

use super::types::{ChapterResult, PipelineError, PipelineEvent};
use crate::document::{extract_text, split_into_chapters};
use crate::quiz::generate_mcqs;
use crate::summarize::Summarizer;

/// Runs documents through extraction, chapter splitting, summarization and
/// MCQ generation
#[derive(Clone)]
pub struct Pipeline {
    summarizer: Summarizer,
}

impl Pipeline {
    pub fn new(summarizer: Summarizer) -> Self {
        Self { summarizer }
    }

    /// Process a file, logging progress with `tracing`
    pub async fn run(&self, path: &Path) -> Result<Vec<ChapterResult>, PipelineError> {
        self.run_with_progress(path, |event| tracing::info!("{}", event))
            .await
    }

    /// Process a file, reporting progress to `on_event`
    pub async fn run_with_progress<F>(
        &self,
        path: &Path,
        mut on_event: F,
    ) -> Result<Vec<ChapterResult>, PipelineError>
    where
        F: FnMut(PipelineEvent) + Send,
    {
        on_event(PipelineEvent::Extracting {
            path: path.to_path_buf(),
        });
        let text = extract_text(path).await?;

        self.process_text_with_progress(&text, on_event).await
    }

    /// Process already extracted text
    pub async fn process_text(&self, text: &str) -> Result<Vec<ChapterResult>, PipelineError> {
        self.process_text_with_progress(text, |_| {}).await
    }

    async fn process_text_with_progress<F>(
        &self,
        text: &str,
        mut on_event: F,
    ) -> Result<Vec<ChapterResult>, PipelineError>
    where
        F: FnMut(PipelineEvent) + Send,
    {
        on_event(PipelineEvent::Splitting);
        let chapters = split_into_chapters(text);
        on_event(PipelineEvent::ChaptersFound(chapters.len()));

        on_event(PipelineEvent::PreparingModel {
            model: self.summarizer.backend().model().to_string(),
        });

        let mut results = Vec::with_capacity(chapters.len());
        for (index, chapter) in chapters.into_iter().enumerate() {
            on_event(PipelineEvent::ProcessingChapter {
                index,
                title: chapter.title.clone(),
            });

            let summary = self
                .summarizer
                .summarize(&chapter.content)
                .await
                .map_err(|source| PipelineError::Summarization {
                    chapter: chapter.title.clone(),
                    source,
                })?;
            let mcqs = generate_mcqs(&summary);

            results.push(ChapterResult {
                chapter: chapter.title,
                summary,
                mcqs,
            });
        }

        on_event(PipelineEvent::Finished {
            chapters: results.len(),
        });
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineStage;
    use crate::summarize::{MockBackend, EMPTY_CONTENT_SUMMARY};
    use std::sync::Arc;

    fn pipeline_with(backend: Arc<MockBackend>) -> Pipeline {
        Pipeline::new(Summarizer::new(backend))
    }

    #[tokio::test]
    async fn test_run_txt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.txt");
        std::fs::write(
            &path,
            "Chapter 1 Intro\nHello world. This is a test. Another sentence. Final one.",
        )
        .unwrap();

        let backend = Arc::new(MockBackend::echo());
        let pipeline = pipeline_with(backend.clone());

        let mut events = Vec::new();
        let results = pipeline
            .run_with_progress(&path, |event| events.push(event))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chapter, "Chapter 1 Intro");
        assert_eq!(
            results[0].summary,
            "Hello world. This is a test. Another sentence. Final one."
        );
        assert_eq!(results[0].mcqs.len(), 3);
        assert_eq!(results[0].mcqs[0].answer, "Hello world");
        assert_eq!(backend.calls(), 1);

        assert_eq!(events.first(), Some(&PipelineEvent::Extracting { path: path.clone() }));
        assert!(events.contains(&PipelineEvent::ChaptersFound(1)));
        assert_eq!(events.last(), Some(&PipelineEvent::Finished { chapters: 1 }));
    }

    #[tokio::test]
    async fn test_empty_chapter_uses_sentinel() {
        let backend = Arc::new(MockBackend::returning("Summary for chapter two."));
        let pipeline = pipeline_with(backend.clone());

        let results = pipeline
            .process_text("Chapter 1 Blank\n\nChapter 2 Real\nSomething happened.")
            .await
            .unwrap();

        assert_eq!(results[0].summary, EMPTY_CONTENT_SUMMARY);
        assert_eq!(results[0].mcqs.len(), 1);
        assert_eq!(results[0].mcqs[0].answer, EMPTY_CONTENT_SUMMARY);
        assert_eq!(results[1].summary, "Summary for chapter two.");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_file_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        std::fs::write(&path, "whatever").unwrap();

        let backend = Arc::new(MockBackend::echo());
        let err = pipeline_with(backend.clone()).run(&path).await.unwrap_err();

        assert_eq!(err.stage(), PipelineStage::Extraction);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_aborts_run() {
        let backend = Arc::new(MockBackend::failing());
        let err = pipeline_with(backend.clone())
            .process_text("Chapter 1 A\nfirst.\nChapter 2 B\nsecond.")
            .await
            .unwrap_err();

        match err {
            PipelineError::Summarization { chapter, .. } => assert_eq!(chapter, "Chapter 1 A"),
            other => panic!("expected summarization error, got {:?}", other),
        }
        assert_eq!(backend.calls(), 1);
    }
}
