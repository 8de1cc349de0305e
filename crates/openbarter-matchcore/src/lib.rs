//! # openbarter-matchcore
//!
//! **Pure deterministic double-auction matcher for OpenBarter.**
//!
//! MatchCore is the compute plane — it takes a snapshot of open bids and
//! produces a list of proposed matches. It has:
//!
//! - **Zero side effects**: no ledger writes, no signature checks, no clocks
//! - **Deterministic output**: same bids in the same order -> same matches;
//!   this is a correctness requirement for auditability, not an optimization
//! - **No time-awareness**: expired bids are filtered by the caller before
//!   the pass; proposed matches are re-validated against current bid status
//!   at commit time (compare-and-swap, owned by the ledger crate)

pub mod bid_book;
pub mod matcher;
pub mod reconcile;

pub use bid_book::BidBook;
pub use matcher::{match_bids, overlap_price, overlap_quantity};
pub use reconcile::{PassPartition, partition_by_usage};
