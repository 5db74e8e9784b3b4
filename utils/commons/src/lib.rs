//! It exposes all structs, types and utilities shared by the auction
//! escrow contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{constants::*, derive::*, errors::*, structs::*, types::*};
use concordium_cis2::*;
use concordium_std::*;

pub mod test;

mod constants;
mod derive;
mod errors;
mod structs;
mod types;
