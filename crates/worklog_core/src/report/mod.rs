//! Read-side projections over entries and ledger contents.
//!
//! Only chart data is computed here; drawing belongs to the caller.

pub mod distribution;
