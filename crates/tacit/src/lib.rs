//! Tacit - adaptive preference memory for LLM applications
//!
//! Observes a stream of text interactions, keeps a decaying weighted memory of
//! the salient terms (keyed by embedding, split into short and long term
//! tiers), and retrieves the preferences relevant to a new prompt so they can
//! be injected as context.
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use chrono::Utc;
//! use tacit::config::Config;
//! use tacit::embedding::StaticEmbeddings;
//! use tacit::storage::InMemoryStateStore;
//! use tacit::PreferenceMemory;
//!
//! let model = StaticEmbeddings::from_map(HashMap::from([
//!     ("box".to_string(), vec![0.8, 0.1, 0.2]),
//!     ("rectangle".to_string(), vec![0.79, 0.12, 0.18]),
//! ]))?;
//!
//! let mut memory = PreferenceMemory::open(
//!     Config::default(),
//!     Arc::new(model),
//!     Box::new(InMemoryStateStore::new()),
//! )?;
//!
//! memory.process_response("Draw a box", Utc::now())?;
//! let prompt = memory.augment_prompt("Make a rectangle")?;
//! assert_eq!(prompt, "Make a rectangle\n[Preferences: box=box]");
//! # Ok::<(), tacit::TacitError>(())
//! ```

pub mod augment;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod memory;
pub mod storage;
pub mod testing;
pub mod tokenizer;

pub use engine::PreferenceMemory;
pub use error::{Result, TacitError};
