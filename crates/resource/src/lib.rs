//! Resource providers for fixpdf source packages.
//!
//! - [`FilesystemResourceProvider`]: parts of an unpacked package directory
//! - [`InMemoryResourceProvider`]: re-exported from fixpdf-traits

mod filesystem;

pub use filesystem::FilesystemResourceProvider;

pub use fixpdf_traits::InMemoryResourceProvider;
