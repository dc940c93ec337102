//! Projection layer for projdex
//!
//! This crate holds the fixed linear transform applied to every feature
//! vector before it is stored or searched:
//! - ProjectionMatrix: Row-major weights plus optional centring vector
//! - Projection: Validated transform with `project` / `project_into`
//!
//! How the matrix is read from disk is up to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod matrix;
pub mod projection;

pub use error::{ProjectionError, ProjectionResult};
pub use matrix::ProjectionMatrix;
pub use projection::Projection;
