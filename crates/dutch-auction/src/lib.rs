#![no_std]

pub mod builder;
pub mod call;
pub mod convert;
pub mod curve;
pub mod error;
pub mod math;
pub mod order;
pub mod params;
pub mod predicate;

pub use builder::{build_auction_order, MakerOrder};
pub use call::{AmountGetter, Call};
pub use error::AuctionError;
pub use order::{AmountSource, AuctionInteraction, Interaction, Order, PostFill};
pub use params::{AuctionParameters, Curve, Direction};
pub use predicate::Predicate;
