//! Corten Bundle Resolution
//!
//! This crate handles bundle declarations and their resolution into the
//! ordered set a kernel boots with. It provides the declaration type, the
//! parsers that read declarations from modern JSON files and legacy module
//! directories, and the resolver that merges, orders and caches the result.
//!
//! Declarations are stored in JSON format and describe one bundle each,
//! including the bundles it replaces and the bundles it must load after.

pub mod declaration;
pub mod errors;
pub mod ini_parser;
pub mod json_parser;
pub mod parser;
pub mod resolver;

pub use declaration::BundleDeclaration;
pub use errors::BundleError;
pub use ini_parser::IniParser;
pub use json_parser::JsonParser;
pub use parser::{DeclarationParser, DelegatingParser};
pub use resolver::{BundleProvider, BundleResolver};
