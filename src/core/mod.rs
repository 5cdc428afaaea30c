//! Core error types for updraft.
//!
//! The crate uses a single strongly-typed error enum, [`UpdateError`], for
//! everything that is a genuine failure. Recoverable conditions - an empty
//! release list, no upgrade candidates, a rejected pre-update hook, a missing
//! asset, a failed download - are not errors: they flow through stage return
//! values and the pipeline's cancel hook instead.

pub mod error;

pub use error::UpdateError;
