//! Data models for the lending service

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookSummary, NewBook};
pub use loan::LoanRecord;
pub use user::{PublicUser, SessionClaims, UserAccount};
