//! Chapterwise
//!
//! Splits uploaded books into chapters, summarizes each chapter with a
//! pretrained summarization model and builds multiple-choice questions from
//! the summaries. Served over HTTP by `chapterwise-server` and available on
//! the command line as `chapterwise`.

pub mod cli;
pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod export;
pub mod html;
pub mod pipeline;
pub mod quiz;
pub mod routes;
pub mod state;
pub mod summarize;
pub mod tasks;
pub mod upload;
