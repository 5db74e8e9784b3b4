//! Escrowed auctions for single non-fungible tokens, settled in a
//! fungible CIS-2 token chosen per auction.
//!
//! Each auction escrows exactly one unit of the listed asset together
//! with every bidder's cumulative value deposit, and deterministically
//! settles both once the end time has passed: resolution for auctions
//! with bids, cancellation for auctions without. Every custody record is
//! reclaimed on one of the terminal paths.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod state;
mod token;
