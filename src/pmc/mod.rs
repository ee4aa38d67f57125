//! PMC (PubMed Central) full-text retrieval
//!
//! Full text is fetched as JATS XML through EFetch and reduced to an ordered
//! list of body sections. A PDF link is looked up in the PMC Open Access web
//! service alongside it.

pub mod client;
pub mod models;
pub mod oa_api;
pub mod parser;

// Re-export public types
pub use client::PmcClient;
pub use models::{ArticleSection, FullTextResult, FullTextStatus};
pub use parser::{ParsedBody, parse_jats_body};
