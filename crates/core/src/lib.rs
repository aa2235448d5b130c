//! Shared building blocks for the w3rt workspace.
//!
//! Every other crate in the workspace builds on three things defined here:
//! strongly-typed ids ([`ids`]), the context value tree ([`value`]), and
//! canonical JSON hashing ([`canonical`]).

pub mod canonical;
pub mod ids;
pub mod value;

pub use ids::RunId;
pub use value::Value;
