//! Core types and algorithms for the Giftshop citizen registry.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the validation rules, the relative graph engine, the birthday and age
//! percentile aggregators, and the [`store::CitizenStore`] abstraction the
//! other crates plug into.

pub mod birthdays;
pub mod citizen;
pub mod date;
pub mod error;
pub mod percentile;
pub mod relatives;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
