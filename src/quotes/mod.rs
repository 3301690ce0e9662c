//! Quote retrieval
//!
//! - `source`: the HTTP quote endpoint behind the `QuoteSource` trait
//! - `fetcher`: the bounded retry/filter loop on top of it

pub mod fetcher;
pub mod source;

pub use fetcher::{FetchPolicy, QuoteFetcher};
pub use source::HttpQuoteSource;
