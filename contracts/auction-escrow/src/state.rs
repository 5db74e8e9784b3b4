use commons::{bid_id, AuctionId, BidId, ContractTokenAmount, CustomContractError, Token};
use concordium_std::*;

use crate::external::CreateParams;

/// Progress of a single auction.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStatus {
    /// Accepting bids until the end time is reached.
    Open,
    /// Settled with a winner. The record only remains to serve the
    /// outstanding loser refunds; the last refund removes it.
    Resolved,
}

/// Authoritative record of one auction. Cancellation and the final refund
/// remove the record outright, so no stored variant exists for those
/// terminal states.
#[derive(Debug, Serialize, SchemaType, Clone)]
pub struct AuctionRecord {
    /// Account that listed the asset.
    pub seller: AccountAddress,
    /// The escrowed non-fungible unit.
    pub asset: Token,
    /// The fungible token bids are denominated in.
    pub value_unit: Token,
    /// Time at which bidding closes.
    pub end_time: Timestamp,
    /// Smallest allowed opening bid.
    pub minimum_bid: ContractTokenAmount,
    /// Current leader, if any bid has been placed.
    pub highest_bidder: Option<AccountAddress>,
    /// The leader's cumulative bid. Never decreases while the auction is
    /// open.
    pub highest_bid_amount: ContractTokenAmount,
    /// Value held in custody for this auction. Always equals the sum of
    /// the outstanding bid record amounts.
    pub escrow: ContractTokenAmount,
    /// Progress of the auction.
    pub status: AuctionStatus,
}

impl AuctionRecord {
    /// Fresh open auction as listed by `seller`.
    pub fn open(seller: AccountAddress, params: &CreateParams) -> Self {
        Self {
            seller,
            asset: params.asset.clone(),
            value_unit: params.value_unit.clone(),
            end_time: params.end_time,
            minimum_bid: params.minimum_bid,
            highest_bidder: None,
            highest_bid_amount: ContractTokenAmount::from(0),
            escrow: ContractTokenAmount::from(0),
            status: AuctionStatus::Open,
        }
    }
}

/// One bidder's cumulative escrow on one auction. Removed when the bidder
/// is paid out or refunded.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq)]
pub struct BidRecord {
    /// The bidding account.
    pub bidder: AccountAddress,
    /// Total value this bidder has escrowed so far.
    pub amount: ContractTokenAmount,
}

/// Escrow movement owed after a successful bid.
#[must_use]
pub struct BidOutcome {
    /// Token to pull the increment in.
    pub value_unit: Token,
    /// The bidder's cumulative amount after this increment.
    pub total: ContractTokenAmount,
}

/// Transfers owed by a successful resolution.
#[must_use]
pub struct Settlement {
    pub seller: AccountAddress,
    pub winner: AccountAddress,
    /// Asset to hand to the winner.
    pub asset: Token,
    /// Token the seller is paid in.
    pub value_unit: Token,
    /// The winning amount, owed to the seller.
    pub price: ContractTokenAmount,
}

/// Escrow owed back to a losing bidder.
#[must_use]
pub struct Payout {
    pub value_unit: Token,
    pub amount: ContractTokenAmount,
}

/// Asset returned by a zero-bid cancellation.
#[must_use]
pub struct Reclaim {
    pub seller: AccountAddress,
    pub asset: Token,
}

/// The contract state: every live auction record and every outstanding
/// bid record, each under its derived address.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    pub auctions: StateMap<AuctionId, AuctionRecord, S>,
    pub bids: StateMap<BidId, BidRecord, S>,
}

impl<S: HasStateApi> State<S> {
    /// Creates an empty state with no auctions.
    pub fn empty(state_builder: &mut StateBuilder<S>) -> Self {
        State {
            auctions: state_builder.new_map(),
            bids: state_builder.new_map(),
        }
    }

    /// Record a new auction under its derived address.
    pub fn create(
        &mut self,
        id: AuctionId,
        record: AuctionRecord,
        now: Timestamp,
    ) -> Result<(), CustomContractError> {
        ensure!(record.end_time > now, CustomContractError::InvalidTiming);
        ensure!(
            self.auctions.get(&id).is_none(),
            CustomContractError::AlreadyExists
        );
        self.auctions.insert(id, record);
        Ok(())
    }

    /// Add `amount` to `bidder`'s cumulative escrow and recompute
    /// leadership from the stored records.
    pub fn bid(
        &mut self,
        id: &AuctionId,
        bidder: AccountAddress,
        amount: ContractTokenAmount,
        now: Timestamp,
    ) -> Result<BidOutcome, CustomContractError> {
        ensure!(
            amount > ContractTokenAmount::from(0),
            CustomContractError::ZeroAmount
        );

        let mut auction = self
            .auctions
            .get_mut(id)
            .ok_or(CustomContractError::UnknownAuction)?;
        ensure!(
            auction.status == AuctionStatus::Open,
            CustomContractError::AuctionClosed
        );
        ensure!(now < auction.end_time, CustomContractError::AuctionClosed);

        let key = bid_id(id, &bidder);
        let previous = self.bids.get(&key).map(|record| record.amount);
        if previous.is_none() {
            // The floor only applies to a bidder's opening bid; raises may
            // come in any increments.
            ensure!(
                amount >= auction.minimum_bid,
                CustomContractError::BelowMinimum
            );
        }
        let total = previous.unwrap_or_else(|| ContractTokenAmount::from(0)) + amount;
        self.bids.insert(key, BidRecord { bidder, amount: total });

        auction.escrow += amount;

        // A raise only takes the lead once the cumulative total strictly
        // exceeds the current highest, but the escrowed top-up is kept
        // either way so the bidder can keep raising later.
        if total > auction.highest_bid_amount {
            auction.highest_bidder = Some(bidder);
            auction.highest_bid_amount = total;
        }

        Ok(BidOutcome {
            value_unit: auction.value_unit.clone(),
            total,
        })
    }

    /// Settle an expired auction with the named winner. Consumes the
    /// winner's bid record; their escrow share becomes the seller's
    /// payment.
    pub fn resolve(
        &mut self,
        id: &AuctionId,
        winner: AccountAddress,
        now: Timestamp,
    ) -> Result<Settlement, CustomContractError> {
        let (settlement, drained) = {
            let mut auction = self
                .auctions
                .get_mut(id)
                .ok_or(CustomContractError::UnknownAuction)?;
            ensure!(
                auction.status == AuctionStatus::Open,
                CustomContractError::AuctionClosed
            );
            ensure!(
                now >= auction.end_time,
                CustomContractError::AuctionStillOpen
            );
            let leader = auction
                .highest_bidder
                .ok_or(CustomContractError::NoBids)?;
            ensure!(winner == leader, CustomContractError::WinnerMismatch);

            let key = bid_id(id, &winner);
            let recorded = self
                .bids
                .get(&key)
                .map(|record| record.amount)
                .ok_or(CustomContractError::WinnerMismatch)?;
            ensure!(
                recorded == auction.highest_bid_amount,
                CustomContractError::WinnerMismatch
            );

            self.bids.remove(&key);
            auction.status = AuctionStatus::Resolved;
            auction.escrow -= recorded;

            let drained = auction.escrow == ContractTokenAmount::from(0);
            (
                Settlement {
                    seller: auction.seller,
                    winner,
                    asset: auction.asset.clone(),
                    value_unit: auction.value_unit.clone(),
                    price: recorded,
                },
                drained,
            )
        };
        // With no losing bids outstanding there is nothing left to refund,
        // so the custody and the auction record are reclaimed right away.
        // Otherwise the record stays behind until the last refund.
        if drained {
            self.auctions.remove(id);
        }
        Ok(settlement)
    }

    /// Return a losing bidder's escrow after resolution. The last refund
    /// removes the drained auction record itself.
    pub fn refund(
        &mut self,
        id: &AuctionId,
        bidder: AccountAddress,
    ) -> Result<Payout, CustomContractError> {
        let (payout, drained) = {
            let mut auction = self
                .auctions
                .get_mut(id)
                .ok_or(CustomContractError::UnknownAuction)?;
            ensure!(
                auction.status == AuctionStatus::Resolved,
                CustomContractError::NotResolved
            );
            ensure!(
                auction.highest_bidder != Some(bidder),
                CustomContractError::WinnerCannotRefund
            );

            let key = bid_id(id, &bidder);
            let amount = self
                .bids
                .get(&key)
                .map(|record| record.amount)
                .ok_or(CustomContractError::AlreadyRefunded)?;
            self.bids.remove(&key);
            auction.escrow -= amount;

            (
                Payout {
                    value_unit: auction.value_unit.clone(),
                    amount,
                },
                auction.escrow == ContractTokenAmount::from(0),
            )
        };
        if drained {
            self.auctions.remove(id);
        }
        Ok(payout)
    }

    /// Tear down an expired auction that received no bids. An expired
    /// auction with bids must go through `resolve` instead.
    pub fn cancel(
        &mut self,
        id: &AuctionId,
        now: Timestamp,
    ) -> Result<Reclaim, CustomContractError> {
        let reclaim = {
            let auction = self
                .auctions
                .get(id)
                .ok_or(CustomContractError::UnknownAuction)?;
            ensure!(
                auction.status == AuctionStatus::Open,
                CustomContractError::AuctionClosed
            );
            ensure!(
                now >= auction.end_time,
                CustomContractError::AuctionStillOpen
            );
            // Zero bids also means zero escrow and zero bid records, so
            // removing the record leaves nothing behind.
            ensure!(
                auction.highest_bidder.is_none(),
                CustomContractError::BidsExist
            );
            Reclaim {
                seller: auction.seller,
                asset: auction.asset.clone(),
            }
        };
        self.auctions.remove(id);
        Ok(reclaim)
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::auction_id;
    use concordium_std::test_infrastructure::TestStateBuilder;

    const SELLER: AccountAddress = AccountAddress([1u8; 32]);
    const ALICE: AccountAddress = AccountAddress([2u8; 32]);
    const BOB: AccountAddress = AccountAddress([3u8; 32]);
    const CAROL: AccountAddress = AccountAddress([4u8; 32]);

    const END_MS: u64 = 10_000;

    fn nft() -> Token {
        Token {
            contract: ContractAddress {
                index: 1,
                subindex: 0,
            },
            id: concordium_cis2::TokenIdVec(vec![0]),
        }
    }

    fn currency() -> Token {
        Token {
            contract: ContractAddress {
                index: 2,
                subindex: 0,
            },
            id: concordium_cis2::TokenIdVec(vec![1]),
        }
    }

    fn open_params(minimum_bid: u64) -> CreateParams {
        CreateParams {
            seed: 1,
            asset: nft(),
            value_unit: currency(),
            end_time: Timestamp::from_timestamp_millis(END_MS),
            minimum_bid: minimum_bid.into(),
        }
    }

    fn listed_state() -> (State<test_infrastructure::TestStateApi>, AuctionId) {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::empty(&mut state_builder);
        let id = auction_id(&SELLER, 1);
        state
            .create(
                id,
                AuctionRecord::open(SELLER, &open_params(1)),
                Timestamp::from_timestamp_millis(0),
            )
            .expect("Listing should succeed");
        (state, id)
    }

    fn outstanding(state: &State<test_infrastructure::TestStateApi>, id: &AuctionId) -> u64 {
        [ALICE, BOB, CAROL]
            .iter()
            .filter_map(|bidder| state.bids.get(&bid_id(id, bidder)))
            .map(|record| record.amount.0)
            .sum()
    }

    #[concordium_test]
    /// The highest bid never decreases and always equals the largest
    /// cumulative amount, and the custody balance always equals the sum
    /// of the outstanding bid records.
    fn test_highest_bid_is_monotone_and_escrow_balances() {
        let (mut state, id) = listed_state();
        let now = Timestamp::from_timestamp_millis(5);

        let sequence: [(AccountAddress, u64); 5] =
            [(ALICE, 100), (BOB, 200), (CAROL, 60), (ALICE, 150), (CAROL, 90)];

        let mut previous_highest = 0u64;
        for (bidder, amount) in sequence.iter() {
            state
                .bid(&id, *bidder, (*amount).into(), now)
                .expect("Bidding should succeed");

            let auction = state.auctions.get(&id).expect("Auction should exist");
            let maximum = [ALICE, BOB, CAROL]
                .iter()
                .filter_map(|account| state.bids.get(&bid_id(&id, account)))
                .map(|record| record.amount.0)
                .max()
                .unwrap_or(0);

            claim!(auction.highest_bid_amount.0 >= previous_highest);
            claim_eq!(auction.highest_bid_amount.0, maximum);
            claim_eq!(auction.escrow.0, outstanding(&state, &id));
            previous_highest = auction.highest_bid_amount.0;
        }

        // Alice raised to 250 in total and leads over Bob's 200.
        let auction = state.auctions.get(&id).expect("Auction should exist");
        claim_eq!(auction.highest_bidder, Some(ALICE));
        claim_eq!(auction.highest_bid_amount, 250.into());
        claim_eq!(auction.escrow, 600.into());
    }

    #[concordium_test]
    /// For any expired open auction exactly one of resolution and
    /// cancellation is available.
    fn test_expired_auction_settles_one_way_only() {
        let after_end = Timestamp::from_timestamp_millis(END_MS + 1);

        // With a bid: resolvable, not cancellable.
        let (mut state, id) = listed_state();
        let now = Timestamp::from_timestamp_millis(5);
        state
            .bid(&id, ALICE, 100.into(), now)
            .expect("Bidding should succeed");
        claim_eq!(
            state.cancel(&id, after_end).map(|_| ()).unwrap_err(),
            CustomContractError::BidsExist
        );
        state
            .resolve(&id, ALICE, after_end)
            .map(|_| ())
            .expect("Resolution should succeed");

        // Without a bid: cancellable, not resolvable.
        let (mut state, id) = listed_state();
        claim_eq!(
            state.resolve(&id, ALICE, after_end).map(|_| ()).unwrap_err(),
            CustomContractError::NoBids
        );
        state
            .cancel(&id, after_end)
            .map(|_| ())
            .expect("Cancellation should succeed");
        claim!(state.auctions.get(&id).is_none());
    }
}
