//! Print a normalized feature vector for an image.
//!
//! This crate backs a single-shot CLI that loads one image (from a URL or a
//! local path), runs it through a pretrained classifier truncated at its
//! pooled feature output, and emits the L2-normalized vector as a JSON array
//! on stdout. Failures are emitted as `{"error": ..., "detail": ...}` on
//! stdout with exit status 0; the payload shape is the success signal for
//! the pipeline that spawns the process.
//!
//! # Quick Start
//!
//! ```no_run
//! use image_embed::{EmbedOptions, EmbeddingEngine};
//!
//! let opts = EmbedOptions::default();
//! let engine = EmbeddingEngine::load(&opts).expect("failed to load model");
//! let img = image::open("photo.jpg").unwrap().to_rgb8();
//! let vector = engine.embed(&img).unwrap();
//! println!("{}", image_embed::output::vector_json(&vector));
//! ```

#![deny(missing_docs)]

pub mod engine;
pub mod error;
pub mod fetch;
pub mod output;
pub mod preprocess;

pub use engine::{l2_normalize, EmbedOptions, EmbeddingEngine};
pub use error::{Error, Result, TAG_EMBED_FAILED, TAG_IMAGE_LOAD_FAILED};
