//! Library record service.
//!
//! Authors, books and borrow transactions exposed over HTTP. Each domain
//! area is a [`stacks_kernel::Module`] contributing routes, an OpenAPI
//! fragment and its table migrations; [`app`] wires them together.

pub mod app;
pub mod error;
pub mod modules;
pub mod utils;

pub use error::LibraryError;
pub use modules::borrows::lifecycle::BorrowLedger;
