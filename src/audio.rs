//! Audio engine boundary.
//!
//! [`Engine`] is the narrow interface the session drives: loading, transport,
//! position read-back, volume and effect parameters. [`RodioEngine`] is the
//! concrete implementation used by the binary; tests substitute their own.

mod engine;
mod player;
mod sink;
mod types;

pub use engine::Engine;
pub use player::RodioEngine;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
#[cfg(test)]
mod tests;
