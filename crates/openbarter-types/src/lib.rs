//! # openbarter-types
//!
//! Shared types, errors, and configuration for the **OpenBarter** commodity
//! marketplace.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`BidId`], [`MatchId`], [`TradeAgreementId`],
//!   [`PaymentAgreementId`], [`EventId`], [`ContentPath`]
//! - **Bid model**: [`Bid`], [`BidKind`], [`BidStatus`]
//! - **Match model**: [`Match`]
//! - **Signed bid content**: [`BidContent`], [`SignedBid`]
//! - **Domain events**: [`MarketEvent`]
//! - **Configuration**: [`MarketplaceConfig`]
//! - **Errors**: [`BarterError`] with `OB_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod bid;
pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod event;
pub mod ids;
pub mod matches;

// Re-export all primary types at crate root for ergonomic imports:
//   use openbarter_types::{Bid, BidKind, Match, MarketEvent, ...};

pub use bid::*;
pub use config::*;
pub use content::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use matches::*;

// Constants are accessed via `openbarter_types::constants::FOO`
// (not re-exported to avoid name collisions).
