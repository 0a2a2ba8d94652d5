//! Response decoder module
//!
//! # Overview
//!
//! Pulls the domain records out of a page body (`workers` array) and the
//! total record count out of a `count=true` response (`meta.totalNumber`).
//! Records are passed through untouched.

mod decoders;

pub use decoders::{JsonDecoder, RecordDecoder, TotalCountDecoder};

#[cfg(test)]
mod tests;
