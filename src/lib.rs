//! Shortsmith - scripts and footage keywords for short videos
//!
//! The model-facing half of an automated short-video pipeline.
//!
//! # Overview
//!
//! Shortsmith lets you:
//! - Write a short spoken script for a topic
//! - Turn a script and its timed captions into time-aligned search keywords
//!   for background footage
//! - Stitch matched footage segments back together, absorbing gaps
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `completion` - Completion service trait with hosted (OpenAI-compatible) and local (Ollama) backends
//! - `response_log` - Raw model response logging
//! - `script` - Script generation
//! - `timeline` - Keyword timeline extraction, JSON repair and interval merging
//!
//! # Example
//!
//! ```rust,no_run
//! use shortsmith::completion::create_service;
//! use shortsmith::config::Settings;
//! use shortsmith::timeline::{QueryTimelineGenerator, TimedCaption};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let completion = create_service(
//!         settings.timeline.provider,
//!         &settings.timeline.model,
//!         &settings,
//!     )?;
//!     let generator = QueryTimelineGenerator::with_settings(completion, &settings.timeline);
//!
//!     let captions = vec![
//!         TimedCaption::new(0.0, 2.0, "The cheetah is the fastest land animal"),
//!         TimedCaption::new(2.0, 4.5, "reaching 75 mph"),
//!     ];
//!     if let Some(timeline) = generator.get_query_timeline("Cheetah facts", &captions).await {
//!         println!("{} keyword segments", timeline.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod openai;
pub mod response_log;
pub mod script;
pub mod timeline;

pub use error::{Result, ShortsmithError};
