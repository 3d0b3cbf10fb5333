pub mod api;
pub mod bulk;
pub mod cli;
pub mod config;
pub mod courts;
pub mod decision;
pub mod error;
pub mod html;
pub mod output;
pub mod progress;
pub mod search;

pub use decision::{parse_detail_page, DecisionParser, DecisionRecord, TemplateEra};
pub use error::{CaseLawError, Result};
pub use search::{iterate, SearchCriteria, SearchResults};

#[cfg(test)]
mod error_test;
