use commons::{
    AuctionId, ContractTokenAmount, Token, BID_TAG, CANCELLED_TAG, CREATED_TAG, REFUNDED_TAG,
    RESOLVED_TAG,
};
use concordium_std::*;

use crate::external::CreateParams;

/// Auction creation event data.
#[derive(Debug, Serial)]
pub struct CreatedEvent<'a> {
    /// Derived auction record address.
    pub auction: &'a AuctionId,
    /// Seller account address.
    pub seller: &'a AccountAddress,
    /// The escrowed asset.
    pub asset: &'a Token,
    /// Token the bids are denominated in.
    pub value_unit: &'a Token,
    /// Time at which bidding closes.
    pub end_time: Timestamp,
    /// Smallest allowed opening bid.
    pub minimum_bid: ContractTokenAmount,
}

/// Bid event data.
#[derive(Debug, Serial)]
pub struct BidEvent<'a> {
    /// Derived auction record address.
    pub auction: &'a AuctionId,
    /// Bidder account address.
    pub bidder: &'a AccountAddress,
    /// The escrowed increment.
    pub amount: ContractTokenAmount,
    /// The bidder's cumulative bid after this increment.
    pub total: ContractTokenAmount,
}

/// Auction resolution event data.
#[derive(Debug, Serial)]
pub struct ResolvedEvent<'a> {
    /// Derived auction record address.
    pub auction: &'a AuctionId,
    /// Seller account address.
    pub seller: &'a AccountAddress,
    /// Address of the auction winner.
    pub winner: &'a AccountAddress,
    /// Winning bid amount paid to the seller.
    pub price: ContractTokenAmount,
}

/// Refund event data.
#[derive(Debug, Serial)]
pub struct RefundedEvent<'a> {
    /// Derived auction record address.
    pub auction: &'a AuctionId,
    /// The refunded losing bidder.
    pub bidder: &'a AccountAddress,
    /// Escrow returned to the bidder.
    pub amount: ContractTokenAmount,
}

/// Cancel auction event data.
#[derive(Debug, Serial)]
pub struct CancelledEvent<'a> {
    /// Derived auction record address.
    pub auction: &'a AuctionId,
    /// Seller account address.
    pub seller: &'a AccountAddress,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvents<'a> {
    Created(CreatedEvent<'a>),
    Bid(BidEvent<'a>),
    Resolved(ResolvedEvent<'a>),
    Refunded(RefundedEvent<'a>),
    Cancelled(CancelledEvent<'a>),
}

impl<'a> AuctionEvents<'a> {
    pub fn created(
        auction: &'a AuctionId,
        seller: &'a AccountAddress,
        params: &'a CreateParams,
    ) -> Self {
        Self::Created(CreatedEvent {
            auction,
            seller,
            asset: &params.asset,
            value_unit: &params.value_unit,
            end_time: params.end_time,
            minimum_bid: params.minimum_bid,
        })
    }

    pub fn bid(
        auction: &'a AuctionId,
        bidder: &'a AccountAddress,
        amount: ContractTokenAmount,
        total: ContractTokenAmount,
    ) -> Self {
        Self::Bid(BidEvent {
            auction,
            bidder,
            amount,
            total,
        })
    }

    pub fn resolved(
        auction: &'a AuctionId,
        seller: &'a AccountAddress,
        winner: &'a AccountAddress,
        price: ContractTokenAmount,
    ) -> Self {
        Self::Resolved(ResolvedEvent {
            auction,
            seller,
            winner,
            price,
        })
    }

    pub fn refunded(
        auction: &'a AuctionId,
        bidder: &'a AccountAddress,
        amount: ContractTokenAmount,
    ) -> Self {
        Self::Refunded(RefundedEvent {
            auction,
            bidder,
            amount,
        })
    }

    pub fn cancelled(auction: &'a AuctionId, seller: &'a AccountAddress) -> Self {
        Self::Cancelled(CancelledEvent { auction, seller })
    }
}

impl<'a> Serial for AuctionEvents<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvents::Created(event) => {
                out.write_u8(CREATED_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Bid(event) => {
                out.write_u8(BID_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Resolved(event) => {
                out.write_u8(RESOLVED_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Refunded(event) => {
                out.write_u8(REFUNDED_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Cancelled(event) => {
                out.write_u8(CANCELLED_TAG)?;
                event.serial(out)
            }
        }
    }
}
