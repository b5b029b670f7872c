//! Core types shared by every part of the engine.
//!
//! At the moment this is the error model: [`EngineError`] enumerates every
//! failure mode of the adapter and [`Result`] is the crate-wide alias. The
//! helpers [`describe_tera_error`] and [`missing_template_in`] translate
//! backend errors into that model.

pub mod error;

pub use error::{EngineError, Result, describe_tera_error, missing_template_in};
