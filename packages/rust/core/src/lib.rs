//! Filesystem side of disclose.
//!
//! Finds skill directories, filters out documents that need no work, and
//! commits the primary document and its reference files produced by
//! `disclose-markdown` (e.g. [`pipeline::refactor_document`], [`pipeline::run`]).

pub mod discovery;
pub mod eligibility;
pub mod materializer;
pub mod pipeline;
