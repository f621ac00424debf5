#![deny(clippy::all)]

/**
 * Angular Refactor CLI
 *
 * Command line front end of the template refactorings
 */
pub use angular_refactor as refactor;

pub mod extract_component;
pub mod logging;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
