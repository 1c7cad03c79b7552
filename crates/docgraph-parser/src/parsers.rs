//! Individual reference passes and the metadata block parser.
//!
//! Each link pass works on a single line and takes the byte ranges that
//! must be ignored (inline code), so the analyzer can combine them freely.

pub mod code_links;
pub mod link_utils;
pub mod metadata;
pub mod plain_links;
pub mod short_links;
