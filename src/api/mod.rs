//! Purpose: Define the stable public Rust API boundary for Marquee.
//! Exports: Core types and operations needed by the CLI and tests.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: This module is the only public path to the core primitives.

pub use crate::core::catalog::{Catalog, Listing, Movie, MovieId};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::origin::OriginPolicy;
pub use crate::core::validate::{
    FieldErrors, MovieDraft, MoviePatch, YEAR_MAX, YEAR_MIN, validate_movie,
    validate_partial_movie,
};
