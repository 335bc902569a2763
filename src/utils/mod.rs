//! Utility functions for short keys, fingerprints and URL validation.
//!
//! - [`short_key`] - Short key codec and shape validation
//! - [`code_generator`] - Random discriminator generation
//! - [`fingerprint`] - Deduplication digest over link targets
//! - [`url_validator`] - URL field validation

pub mod code_generator;
pub mod fingerprint;
pub mod short_key;
pub mod url_validator;
