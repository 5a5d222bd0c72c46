//! genomyx-core — portal response conversion and alteration summarization.
//!
//! The portal web service answers every command with tab-delimited text.
//! This crate turns those payloads into structured rows
//! ([`convert::convert_response`]) and folds profile-data rows into
//! per-gene mutation/copy-number percentage summaries
//! ([`summarize::summarize`]). Transport, batching and the CLI live in
//! the sibling crates.
//!
//! # Example
//!
//! ```rust
//! use genomyx_core::{convert_response, summarize, PROFILE_DATA_COMMAND};
//!
//! # fn main() -> genomyx_core::Result<()> {
//! let raw = "# DATA_TYPE\t Mutations\n".to_string()
//!     + "# PROFILE_ID\tgbm_tcga_mutations\tMUTATION_EXTENDED\n"
//!     + "GENE_ID\tCOMMON\tTCGA-02-0001-01\tTCGA-02-0003-01\n"
//!     + "7157\tTP53\tR175H\tNaN\n";
//! let raw = raw.as_str();
//!
//! let response = convert_response(raw, Some(PROFILE_DATA_COMMAND))?;
//! assert_eq!(response.results, 1);
//!
//! let summary = summarize(&response.rows)?;
//! assert_eq!(summary.genes["tp53"].mutated, Some(50));
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod error;
pub mod summarize;

pub use convert::{
    convert_response, map_row, parse, AlterationType, ConvertedResponse, ParsedResponse, Row,
    ALTERATION_TYPE_KEY, DATA_TYPE_KEY, GENE_SYMBOL_KEY, PROFILE_DATA_COMMAND,
};
pub use error::{GenomyxError, Result};
pub use summarize::{summarize, summarize_responses, GeneSummary, Summary};
