//! Resource providers for the pagescript interpreter.
//!
//! - [`FilesystemResourceProvider`]: resolves paths against the directory of
//!   the document being interpreted.
//! - [`InMemoryResourceProvider`]: re-exported from `pagescript-traits`.

mod filesystem;

pub use filesystem::FilesystemResourceProvider;

pub use pagescript_traits::InMemoryResourceProvider;
