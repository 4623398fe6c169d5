//! Repository implementations for data access.

pub mod account;
pub mod category;
pub(crate) mod convert;
pub mod error;
pub mod payment_source;
pub mod report;
pub mod store;
pub mod voucher;

pub use account::AccountRepository;
pub use category::CategoryRepository;
pub use error::RepositoryError;
pub use payment_source::PaymentSourceRepository;
pub use report::ReportRepository;
pub use store::BookStore;
pub use voucher::VoucherRepository;
