//! Database access for the prediction service

pub mod predictions;

pub use predictions::{insert, list_all, set_true_class, StoreError};
