use super::*;
use sha3::{Digest, Keccak256};

/// Storage address of an auction record.
///
/// Derivable by any party from the listing key materials, so no lookup
/// table is needed to locate a running auction.
#[derive(Debug, Serialize, SchemaType, Hash, PartialEq, Eq, Clone, Copy)]
pub struct AuctionId(pub [u8; 32]);

/// Storage address of a single bidder's bid record on one auction.
#[derive(Debug, Serialize, SchemaType, Hash, PartialEq, Eq, Clone, Copy)]
pub struct BidId(pub [u8; 32]);

/// Derive the address of the auction record listed by `seller` under the
/// chosen `seed`.
pub fn auction_id(seller: &AccountAddress, seed: u64) -> AuctionId {
    let mut hasher = Keccak256::default();
    hasher.update(AUCTION_DOMAIN);
    hasher.update(seller.0);
    hasher.update(seed.to_le_bytes());
    AuctionId(hasher.finalize().into())
}

/// Derive the address of `bidder`'s bid record on the given auction.
pub fn bid_id(auction: &AuctionId, bidder: &AccountAddress) -> BidId {
    let mut hasher = Keccak256::default();
    hasher.update(BID_DOMAIN);
    hasher.update(auction.0);
    hasher.update(bidder.0);
    BidId(hasher.finalize().into())
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    const SELLER: AccountAddress = AccountAddress([7u8; 32]);
    const OTHER: AccountAddress = AccountAddress([8u8; 32]);

    #[concordium_test]
    fn test_auction_id_is_deterministic() {
        claim_eq!(
            auction_id(&SELLER, 1),
            auction_id(&SELLER, 1),
            "Same key materials must derive the same address"
        );
    }

    #[concordium_test]
    fn test_auction_id_depends_on_all_key_materials() {
        let base = auction_id(&SELLER, 1);
        claim_ne!(
            base,
            auction_id(&SELLER, 2),
            "A different seed must derive a different address"
        );
        claim_ne!(
            base,
            auction_id(&OTHER, 1),
            "A different seller must derive a different address"
        );
    }

    #[concordium_test]
    fn test_bid_id_depends_on_auction_and_bidder() {
        let auction = auction_id(&SELLER, 1);
        let other_auction = auction_id(&SELLER, 2);
        let base = bid_id(&auction, &OTHER);
        claim_ne!(base, bid_id(&other_auction, &OTHER));
        claim_ne!(base, bid_id(&auction, &SELLER));
    }

    #[concordium_test]
    fn test_domains_are_separated() {
        // An auction address can never collide with a bid record address
        // built from the same 40 bytes of key material.
        let auction = auction_id(&SELLER, 1);
        let bid = bid_id(&AuctionId(SELLER.0), &AccountAddress([1u8; 32]));
        claim_ne!(auction.0, bid.0);
    }
}
