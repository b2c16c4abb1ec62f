//! aibridge Resources
//!
//! Serves model files to web content over the private URL scheme.
//!
//! - [`ModelResourceRouter`] classifies scheme URLs and resolves them to bytes
//! - [`ZipArchiveReader`] extracts personal model entries from in-memory archives
//! - [`ResourceRequest`] enforces the single-termination request lifecycle
//! - [`AssetSource`] abstracts the bundled resource root

pub mod archive;
pub mod assets;
pub mod error;
pub mod request;
pub mod router;

pub use archive::{ZipArchiveReader, ZipEntry};
pub use assets::{AssetSource, DirectoryAssets, MemoryAssets};
pub use error::{ArchiveError, NotFoundReason, ResolveError};
pub use request::{RequestState, ResolvedKind, ResourceRequest, ResourceResponse, SchemeTask};
pub use router::{ModelResourceRouter, Route, RoutePrefixes};
