//! Scaffolds self-contained modules and repository bundles from stub files.
//!
//! A scaffold run materializes a declarative directory tree ([`arbor`]),
//! renders stubs by literal placeholder substitution ([`template`]) and
//! writes them without ever overwriting an existing file ([`writer`]).
//! Repository bundles additionally drive an external artifact generator
//! ([`generator`]) and move its output into the target module ([`relocate`]).

pub mod api;
pub mod blueprints;
pub mod config;
pub mod errors;
pub mod generator;
pub mod relocate;
pub mod report;
pub mod scaffold;
pub mod source;
pub mod template;
pub mod utils;
pub mod writer;

pub use api::{make_module, make_repo, ModgenError};
