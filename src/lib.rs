//! pixcache - a three-tier image loader.
//!
//! Images are identified by their URL and resolved through a size-bounded
//! in-memory LRU cache, a persistent disk cache and finally the network.
//! Network hits populate both caches; loads are cancellable.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing caches, fetcher and configuration.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "pixcache";
