//! Read-only expense reports derived from vouchers and the category tree.
//!
//! - Monthly comparison
//! - Cost-center and supplier breakdowns
//! - Trailing 90-day heatmap
//! - Budget comparison, category ledger, tree and voucher listings
//! - Export payloads handed to the file-rendering collaborator

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;
