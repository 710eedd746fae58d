//! A header scanner for a C++-like annotation syntax.
//!
//! This crate tokenizes and parses a single translation unit looking for a small set of
//! recognized annotation macros — class/struct, enum, function/method, property, and
//! arbitrary custom macros — and emits one JSON object per recognized declaration. It does
//! not attempt to understand C++ in full: anything that is not an annotated declaration is
//! skipped over at the token level (see [parser::Parser]).
//!
//! ```
//! use header_scan::{config::MacroConfig, parser};
//!
//! let source = "ENUM()\nenum class Color { Red, Green, Blue };\n";
//! let document = parser::scan(source, &MacroConfig::default()).unwrap();
//! assert_eq!(document[0]["name"], "Color");
//! ```
pub mod config;
pub mod error;
pub mod json;
pub mod parser;
pub mod position;
pub mod scope;
pub mod token;
pub mod tokenizer;
pub mod type_node;
mod util;

pub use config::MacroConfig;
pub use error::{ScanError, ScanErrorKind};
pub use parser::{scan, Parser};
pub use util::Log;
