use commons::{
    auction_id, bid_id, ContractResult, ContractTokenAmount, ContractTokenId, CustomContractError,
};
use concordium_cis2::OnReceivingCis2Params;
use concordium_std::*;

use crate::events::AuctionEvents;
use crate::external::*;
use crate::state::{AuctionRecord, State};
use crate::token;

/// Initialize the contract with no auctions.
#[init(contract = "AuctionEscrow")]
fn contract_init<S: HasStateApi>(
    _ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::empty(state_builder))
}

/// List an asset for auction under a fresh `(seller, seed)` address and
/// escrow exactly one unit of it from the seller's balance.
///
/// The contract must already be an operator for the seller on the asset
/// contract; a listing whose asset cannot be pulled is rejected whole.
#[receive(
    mutable,
    contract = "AuctionEscrow",
    name = "create",
    parameter = "CreateParams",
    enable_logger
)]
fn contract_create<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: CreateParams = ctx.parameter_cursor().get()?;

    let seller = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
        Address::Account(account_address) => account_address,
    };

    let id = auction_id(&seller, params.seed);
    let record = AuctionRecord::open(seller, &params);
    host.state_mut()
        .create(id, record, ctx.metadata().slot_time())?;

    token::pull(
        host,
        ctx.self_address(),
        &params.asset,
        1.into(),
        seller,
        CustomContractError::InsufficientAssetBalance,
    )?;

    logger.log(&AuctionEvents::created(&id, &seller, &params))?;

    Ok(())
}

/// Raise the sender's cumulative bid by the given increment and escrow
/// the increment in the value custody.
///
/// An opening bid must meet the auction minimum; raises may come in any
/// nonzero increments and are kept even when they do not take the lead.
#[receive(
    mutable,
    contract = "AuctionEscrow",
    name = "bid",
    parameter = "BidParams",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: BidParams = ctx.parameter_cursor().get()?;

    let bidder = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
        Address::Account(account_address) => account_address,
    };

    let id = auction_id(&params.seller, params.seed);
    let outcome = host
        .state_mut()
        .bid(&id, bidder, params.amount, ctx.metadata().slot_time())?;

    token::pull(
        host,
        ctx.self_address(),
        &outcome.value_unit,
        params.amount,
        bidder,
        CustomContractError::InsufficientValueBalance,
    )?;

    logger.log(&AuctionEvents::bid(&id, &bidder, params.amount, outcome.total))?;

    Ok(())
}

/// Settle an expired auction with the recorded leader as winner. Anyone
/// may crank this once the end time has passed.
///
/// The winning escrow is swept to the seller, the asset leaves custody
/// towards the winner, and the winner's bid record is closed. Losing
/// escrow stays behind for the individual refunds.
#[receive(
    mutable,
    contract = "AuctionEscrow",
    name = "resolve",
    parameter = "ResolveParams",
    enable_logger
)]
fn contract_resolve<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: ResolveParams = ctx.parameter_cursor().get()?;

    let id = auction_id(&params.seller, params.seed);
    let settlement = host
        .state_mut()
        .resolve(&id, params.winner, ctx.metadata().slot_time())?;

    token::release(
        host,
        ctx.self_address(),
        &settlement.value_unit,
        settlement.price,
        settlement.seller,
    )?;
    token::release(
        host,
        ctx.self_address(),
        &settlement.asset,
        1.into(),
        settlement.winner,
    )?;

    logger.log(&AuctionEvents::resolved(
        &id,
        &settlement.seller,
        &settlement.winner,
        settlement.price,
    ))?;

    Ok(())
}

/// Return the sender's escrow after a lost auction and close their bid
/// record. The last refund also removes the drained auction record,
/// reclaiming the remaining custody storage.
#[receive(
    mutable,
    contract = "AuctionEscrow",
    name = "refund",
    parameter = "RefundParams",
    enable_logger
)]
fn contract_refund<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: RefundParams = ctx.parameter_cursor().get()?;

    let bidder = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
        Address::Account(account_address) => account_address,
    };

    let id = auction_id(&params.seller, params.seed);
    let payout = host.state_mut().refund(&id, bidder)?;

    token::release(
        host,
        ctx.self_address(),
        &payout.value_unit,
        payout.amount,
        bidder,
    )?;

    logger.log(&AuctionEvents::refunded(&id, &bidder, payout.amount))?;

    Ok(())
}

/// Reclaim an expired auction that received no bids, returning the asset
/// to the seller and removing every record. The auction address is
/// derived from the sender, so sellers can only name their own lots; an
/// expired auction with bids must go through `resolve` instead.
#[receive(
    mutable,
    contract = "AuctionEscrow",
    name = "cancel",
    parameter = "CancelParams",
    enable_logger
)]
fn contract_cancel<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params: CancelParams = ctx.parameter_cursor().get()?;

    let seller = match ctx.sender() {
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
        Address::Account(account_address) => account_address,
    };

    let id = auction_id(&seller, params.seed);
    let reclaim = host
        .state_mut()
        .cancel(&id, ctx.metadata().slot_time())?;

    token::release(
        host,
        ctx.self_address(),
        &reclaim.asset,
        1.into(),
        reclaim.seller,
    )?;

    logger.log(&AuctionEvents::cancelled(&id, &seller))?;

    Ok(())
}

/// Hook invoked by token contracts when custody deposits are transferred
/// to this contract. All escrow accounting happens in the operation that
/// triggered the transfer.
#[receive(
    contract = "AuctionEscrow",
    name = "deposit",
    parameter = "OnReceivingCis2Params<ContractTokenId, ContractTokenAmount>"
)]
fn contract_deposit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    ensure!(
        matches!(ctx.sender(), Address::Contract(_)),
        CustomContractError::ContractOnly.into()
    );
    let _params: OnReceivingCis2Params<ContractTokenId, ContractTokenAmount> =
        ctx.parameter_cursor().get()?;
    Ok(())
}

/// View function that returns a live auction record.
#[receive(
    contract = "AuctionEscrow",
    name = "view",
    parameter = "ViewParams",
    return_value = "AuctionRecord"
)]
fn contract_view<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AuctionRecord> {
    let params: ViewParams = ctx.parameter_cursor().get()?;
    let id = auction_id(&params.seller, params.seed);
    let record = host
        .state()
        .auctions
        .get(&id)
        .ok_or(CustomContractError::UnknownAuction)?;
    Ok(AuctionRecord::clone(&record))
}

/// View function that returns a bidder's outstanding escrowed amount.
/// Answers zero for closed or never-opened bid records.
#[receive(
    contract = "AuctionEscrow",
    name = "viewBid",
    parameter = "ViewBidParams",
    return_value = "ContractTokenAmount"
)]
fn contract_view_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractTokenAmount> {
    let params: ViewBidParams = ctx.parameter_cursor().get()?;
    let id = auction_id(&params.seller, params.seed);
    let amount = host
        .state()
        .bids
        .get(&bid_id(&id, &params.bidder))
        .map(|record| record.amount)
        .unwrap_or_else(|| ContractTokenAmount::from(0));
    Ok(amount)
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::*;
    use commons::{ContractError, Token, TransferParameter};
    use concordium_cis2::{AdditionalData, TokenIdVec};
    use concordium_std::fmt::Debug;
    use test_infrastructure::*;

    use crate::state::AuctionStatus;

    const SELLER: AccountAddress = AccountAddress([1u8; 32]);
    const ALICE: AccountAddress = AccountAddress([2u8; 32]);
    const BOB: AccountAddress = AccountAddress([3u8; 32]);
    const CAROL: AccountAddress = AccountAddress([4u8; 32]);
    const CRANK: AccountAddress = AccountAddress([5u8; 32]);

    const NFT_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const VALUE_CONTRACT: ContractAddress = ContractAddress {
        index: 2,
        subindex: 0,
    };
    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 9,
        subindex: 0,
    };

    const SEED: u64 = 7;
    const END_MS: u64 = 10_000;

    type Host = TestHost<State<TestStateApi>>;

    fn nft() -> Token {
        Token {
            contract: NFT_CONTRACT,
            id: TokenIdVec(vec![0]),
        }
    }

    fn currency() -> Token {
        Token {
            contract: VALUE_CONTRACT,
            id: TokenIdVec(vec![1]),
        }
    }

    fn accept_transfers(host: &mut Host, contract: ContractAddress) {
        host.setup_mock_entrypoint(
            contract,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_ok_mock::<TransferParameter, _>(()),
        );
    }

    fn reject_transfers(host: &mut Host, contract: ContractAddress) {
        host.setup_mock_entrypoint(
            contract,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            logic_reject_mock(-17),
        );
    }

    fn check_transfers(
        host: &mut Host,
        contract: ContractAddress,
        check: impl Fn(&TransferParameter) -> bool + 'static,
    ) {
        host.setup_mock_entrypoint(
            contract,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParameter, _>(check, ()),
        );
    }

    fn fresh_host() -> Host {
        let mut state_builder = TestStateBuilder::new();
        let state = State::empty(&mut state_builder);
        let mut host = TestHost::new(state, state_builder);
        accept_transfers(&mut host, NFT_CONTRACT);
        accept_transfers(&mut host, VALUE_CONTRACT);
        host
    }

    fn receive_ctx<'a>(
        sender: AccountAddress,
        parameter_bytes: &'a [u8],
        slot_time_ms: u64,
    ) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender));
        ctx.set_self_address(SELF_ADDRESS);
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(slot_time_ms));
        ctx.set_parameter(parameter_bytes);
        ctx
    }

    fn create(host: &mut Host, minimum_bid: u64) -> ContractResult<()> {
        let params = CreateParams {
            seed: SEED,
            asset: nft(),
            value_unit: currency(),
            end_time: Timestamp::from_timestamp_millis(END_MS),
            minimum_bid: minimum_bid.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(SELLER, &parameter_bytes, 0);
        let mut logger = TestLogger::init();
        contract_create(&ctx, host, &mut logger)
    }

    fn bid_at(
        host: &mut Host,
        bidder: AccountAddress,
        amount: u64,
        slot_time_ms: u64,
    ) -> ContractResult<()> {
        let params = BidParams {
            seller: SELLER,
            seed: SEED,
            amount: amount.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(bidder, &parameter_bytes, slot_time_ms);
        let mut logger = TestLogger::init();
        contract_bid(&ctx, host, &mut logger)
    }

    fn bid(host: &mut Host, bidder: AccountAddress, amount: u64) -> ContractResult<()> {
        bid_at(host, bidder, amount, 5)
    }

    fn resolve_at(host: &mut Host, winner: AccountAddress, slot_time_ms: u64) -> ContractResult<()> {
        let params = ResolveParams {
            seller: SELLER,
            seed: SEED,
            winner,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(CRANK, &parameter_bytes, slot_time_ms);
        let mut logger = TestLogger::init();
        contract_resolve(&ctx, host, &mut logger)
    }

    fn refund(host: &mut Host, bidder: AccountAddress) -> ContractResult<()> {
        let params = RefundParams {
            seller: SELLER,
            seed: SEED,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(bidder, &parameter_bytes, END_MS + 10);
        let mut logger = TestLogger::init();
        contract_refund(&ctx, host, &mut logger)
    }

    fn cancel_at(host: &mut Host, sender: AccountAddress, slot_time_ms: u64) -> ContractResult<()> {
        let params = CancelParams { seed: SEED };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(sender, &parameter_bytes, slot_time_ms);
        let mut logger = TestLogger::init();
        contract_cancel(&ctx, host, &mut logger)
    }

    fn auction(host: &Host) -> Option<AuctionRecord> {
        host.state()
            .auctions
            .get(&auction_id(&SELLER, SEED))
            .map(|record| AuctionRecord::clone(&record))
    }

    fn escrowed(host: &Host, bidder: AccountAddress) -> Option<ContractTokenAmount> {
        host.state()
            .bids
            .get(&bid_id(&auction_id(&SELLER, SEED), &bidder))
            .map(|record| record.amount)
    }

    fn expect_error<T: Debug>(expr: ContractResult<T>, err: CustomContractError, msg: &str) {
        let actual = expr.expect_err(msg);
        claim_eq!(actual, ContractError::from(err));
    }

    /// Seller lists, Alice and Bob compete, Alice retakes the lead with a
    /// raise: cumulative amounts of 250 against 200 million micro-units.
    fn contested_auction(host: &mut Host) {
        create(host, 1).expect("Listing should succeed");
        bid(host, ALICE, 100_000_000).expect("Opening bid should succeed");
        bid(host, BOB, 200_000_000).expect("Overbid should succeed");
        bid(host, ALICE, 150_000_000).expect("Raise should succeed");
    }

    #[concordium_test]
    /// Listing stores an open auction record and escrows exactly one unit
    /// of the asset out of the seller's balance.
    fn test_create_escrows_the_asset() {
        let mut host = fresh_host();
        check_transfers(&mut host, NFT_CONTRACT, |params| {
            let transfer = &params.0[0];
            transfer.from == Address::Account(SELLER)
                && transfer.amount == 1.into()
                && transfer.token_id == TokenIdVec(vec![0])
        });

        create(&mut host, 1).expect("Listing should succeed");

        let record = auction(&host).expect("Auction record should exist");
        claim_eq!(record.seller, SELLER);
        claim_eq!(record.status, AuctionStatus::Open);
        claim_eq!(record.highest_bidder, None);
        claim_eq!(record.highest_bid_amount, 0.into());
        claim_eq!(record.escrow, 0.into());
        claim_eq!(record.end_time, Timestamp::from_timestamp_millis(END_MS));
    }

    #[concordium_test]
    fn test_create_requires_future_end_time() {
        let mut host = fresh_host();
        let params = CreateParams {
            seed: SEED,
            asset: nft(),
            value_unit: currency(),
            end_time: Timestamp::from_timestamp_millis(END_MS),
            minimum_bid: 1.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(SELLER, &parameter_bytes, END_MS);
        let mut logger = TestLogger::init();

        expect_error(
            contract_create(&ctx, &mut host, &mut logger),
            CustomContractError::InvalidTiming,
            "Listing with an end time in the past should fail",
        );
    }

    #[concordium_test]
    /// A second listing under the same `(seller, seed)` derives the same
    /// address and must be rejected.
    fn test_create_rejects_duplicate_listing() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        expect_error(
            create(&mut host, 1),
            CustomContractError::AlreadyExists,
            "Relisting the same seed should fail",
        );
    }

    #[concordium_test]
    fn test_create_without_asset_balance() {
        let mut host = fresh_host();
        reject_transfers(&mut host, NFT_CONTRACT);
        expect_error(
            create(&mut host, 1),
            CustomContractError::InsufficientAssetBalance,
            "Listing an asset the seller does not hold should fail",
        );
    }

    #[concordium_test]
    fn test_first_bid_takes_the_lead() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");

        bid(&mut host, ALICE, 100).expect("Opening bid should succeed");

        let record = auction(&host).expect("Auction record should exist");
        claim_eq!(record.highest_bidder, Some(ALICE));
        claim_eq!(record.highest_bid_amount, 100.into());
        claim_eq!(record.escrow, 100.into());
        claim_eq!(escrowed(&host, ALICE), Some(100.into()));
    }

    #[concordium_test]
    /// Bidders raise incrementally across calls; the leaderboard follows
    /// cumulative amounts and custody tracks every deposit.
    fn test_bids_and_raises() {
        let mut host = fresh_host();
        contested_auction(&mut host);

        let record = auction(&host).expect("Auction record should exist");
        claim_eq!(record.highest_bidder, Some(ALICE));
        claim_eq!(record.highest_bid_amount, 250_000_000.into());
        claim_eq!(record.escrow, 450_000_000.into());
        claim_eq!(escrowed(&host, ALICE), Some(250_000_000.into()));
        claim_eq!(escrowed(&host, BOB), Some(200_000_000.into()));
    }

    #[concordium_test]
    /// A top-up below the current leader is escrowed without moving the
    /// leaderboard.
    fn test_topup_below_leader_is_escrowed() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        bid(&mut host, ALICE, 100).expect("Opening bid should succeed");
        bid(&mut host, BOB, 300).expect("Overbid should succeed");
        bid(&mut host, ALICE, 100).expect("Top-up should be accepted");

        let record = auction(&host).expect("Auction record should exist");
        claim_eq!(record.highest_bidder, Some(BOB));
        claim_eq!(record.highest_bid_amount, 300.into());
        claim_eq!(record.escrow, 500.into());
        claim_eq!(escrowed(&host, ALICE), Some(200.into()));
    }

    #[concordium_test]
    fn test_zero_bid_is_rejected() {
        let mut host = fresh_host();
        create(&mut host, 0).expect("Listing should succeed");
        expect_error(
            bid(&mut host, ALICE, 0),
            CustomContractError::ZeroAmount,
            "Bidding zero should fail",
        );
    }

    #[concordium_test]
    /// The minimum only gates a bidder's opening bid, not later raises.
    fn test_opening_bid_below_minimum() {
        let mut host = fresh_host();
        create(&mut host, 50).expect("Listing should succeed");

        expect_error(
            bid(&mut host, ALICE, 10),
            CustomContractError::BelowMinimum,
            "Opening bid below the minimum should fail",
        );
        bid(&mut host, ALICE, 50).expect("Opening bid at the minimum should succeed");
        bid(&mut host, ALICE, 10).expect("Raises below the minimum should succeed");
        claim_eq!(escrowed(&host, ALICE), Some(60.into()));
    }

    #[concordium_test]
    /// Expiry is re-checked at execution time, so a bid landing on the
    /// end time is already too late.
    fn test_bid_after_end_time() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        expect_error(
            bid_at(&mut host, ALICE, 100, END_MS),
            CustomContractError::AuctionClosed,
            "Bidding at the end time should fail",
        );
    }

    #[concordium_test]
    fn test_bid_without_listing() {
        let mut host = fresh_host();
        expect_error(
            bid(&mut host, ALICE, 100),
            CustomContractError::UnknownAuction,
            "Bidding on a nonexistent auction should fail",
        );
    }

    #[concordium_test]
    fn test_bid_without_value_balance() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        reject_transfers(&mut host, VALUE_CONTRACT);
        expect_error(
            bid(&mut host, ALICE, 100),
            CustomContractError::InsufficientValueBalance,
            "Bidding beyond the bidder's balance should fail",
        );
    }

    #[concordium_test]
    fn test_resolve_before_end_time() {
        let mut host = fresh_host();
        contested_auction(&mut host);
        expect_error(
            resolve_at(&mut host, ALICE, END_MS - 1),
            CustomContractError::AuctionStillOpen,
            "Resolving before expiry should fail",
        );
    }

    #[concordium_test]
    /// A zero-bid auction has no winner to settle; it must be cancelled.
    fn test_resolve_without_bids() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        expect_error(
            resolve_at(&mut host, ALICE, END_MS + 1),
            CustomContractError::NoBids,
            "Resolving a bidless auction should fail",
        );
    }

    #[concordium_test]
    fn test_resolve_with_wrong_winner() {
        let mut host = fresh_host();
        contested_auction(&mut host);
        expect_error(
            resolve_at(&mut host, BOB, END_MS + 1),
            CustomContractError::WinnerMismatch,
            "Resolving with a non-leading winner should fail",
        );
    }

    #[concordium_test]
    /// Resolution sweeps the winning amount to the seller, hands over the
    /// asset, and closes only the winner's bid record; losing escrow
    /// stays behind for refunds.
    fn test_resolve_pays_seller_and_winner() {
        let mut host = fresh_host();
        contested_auction(&mut host);

        check_transfers(&mut host, VALUE_CONTRACT, |params| {
            let transfer = &params.0[0];
            transfer.from == Address::Contract(SELF_ADDRESS)
                && transfer.amount == 250_000_000.into()
                && matches!(&transfer.to, concordium_cis2::Receiver::Account(account) if *account == SELLER)
        });
        check_transfers(&mut host, NFT_CONTRACT, |params| {
            let transfer = &params.0[0];
            transfer.from == Address::Contract(SELF_ADDRESS)
                && transfer.amount == 1.into()
                && matches!(&transfer.to, concordium_cis2::Receiver::Account(account) if *account == ALICE)
        });

        resolve_at(&mut host, ALICE, END_MS + 5).expect("Resolution should succeed");

        let record = auction(&host).expect("Auction record should remain for refunds");
        claim_eq!(record.status, AuctionStatus::Resolved);
        claim_eq!(record.highest_bidder, Some(ALICE));
        claim_eq!(record.escrow, 200_000_000.into());
        claim_eq!(escrowed(&host, ALICE), None);
        claim_eq!(escrowed(&host, BOB), Some(200_000_000.into()));
    }

    #[concordium_test]
    fn test_resolve_twice() {
        let mut host = fresh_host();
        contested_auction(&mut host);
        resolve_at(&mut host, ALICE, END_MS + 5).expect("Resolution should succeed");
        expect_error(
            resolve_at(&mut host, ALICE, END_MS + 5),
            CustomContractError::AuctionClosed,
            "Resolving a second time should fail",
        );
        expect_error(
            bid(&mut host, CAROL, 400),
            CustomContractError::AuctionClosed,
            "Bidding on a settled auction should fail",
        );
    }

    #[concordium_test]
    /// With a single bidder there is nothing left to refund, so
    /// resolution reclaims the custody and the auction record right away.
    fn test_resolve_with_single_bidder_tears_down() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        bid(&mut host, ALICE, 100).expect("Opening bid should succeed");

        resolve_at(&mut host, ALICE, END_MS + 5).expect("Resolution should succeed");

        claim_eq!(escrowed(&host, ALICE), None);
        claim!(auction(&host).is_none());
    }

    #[concordium_test]
    fn test_refund_requires_resolution() {
        let mut host = fresh_host();
        contested_auction(&mut host);
        expect_error(
            refund(&mut host, BOB),
            CustomContractError::NotResolved,
            "Refunding before resolution should fail",
        );
    }

    #[concordium_test]
    fn test_winner_cannot_refund() {
        let mut host = fresh_host();
        contested_auction(&mut host);
        resolve_at(&mut host, ALICE, END_MS + 5).expect("Resolution should succeed");
        expect_error(
            refund(&mut host, ALICE),
            CustomContractError::WinnerCannotRefund,
            "The winner must not reclaim their locked bid",
        );
    }

    #[concordium_test]
    /// The last refund returns the loser's full escrow and removes the
    /// drained auction record.
    fn test_refund_returns_escrow_and_tears_down() {
        let mut host = fresh_host();
        contested_auction(&mut host);
        resolve_at(&mut host, ALICE, END_MS + 5).expect("Resolution should succeed");

        check_transfers(&mut host, VALUE_CONTRACT, |params| {
            let transfer = &params.0[0];
            transfer.from == Address::Contract(SELF_ADDRESS)
                && transfer.amount == 200_000_000.into()
                && matches!(&transfer.to, concordium_cis2::Receiver::Account(account) if *account == BOB)
        });

        refund(&mut host, BOB).expect("Refund should succeed");

        claim_eq!(escrowed(&host, BOB), None);
        claim!(auction(&host).is_none());

        expect_error(
            refund(&mut host, BOB),
            CustomContractError::UnknownAuction,
            "Refunding a torn-down auction should fail",
        );
    }

    #[concordium_test]
    /// While other losers are still owed, a repeated refund claim fails
    /// on the missing bid record rather than the missing auction.
    fn test_refund_twice() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        bid(&mut host, ALICE, 300).expect("Opening bid should succeed");
        bid(&mut host, BOB, 200).expect("Trailing bid should be escrowed");
        bid(&mut host, CAROL, 100).expect("Trailing bid should be escrowed");

        resolve_at(&mut host, ALICE, END_MS + 5).expect("Resolution should succeed");
        refund(&mut host, BOB).expect("Refund should succeed");

        expect_error(
            refund(&mut host, BOB),
            CustomContractError::AlreadyRefunded,
            "A second refund claim should fail",
        );
        claim_eq!(escrowed(&host, CAROL), Some(100.into()));
    }

    #[concordium_test]
    fn test_cancel_returns_the_asset() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");

        check_transfers(&mut host, NFT_CONTRACT, |params| {
            let transfer = &params.0[0];
            transfer.from == Address::Contract(SELF_ADDRESS)
                && transfer.amount == 1.into()
                && matches!(&transfer.to, concordium_cis2::Receiver::Account(account) if *account == SELLER)
        });

        cancel_at(&mut host, SELLER, END_MS + 1).expect("Cancellation should succeed");
        claim!(auction(&host).is_none());
    }

    #[concordium_test]
    fn test_cancel_with_bids() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        bid(&mut host, ALICE, 100).expect("Opening bid should succeed");
        expect_error(
            cancel_at(&mut host, SELLER, END_MS + 1),
            CustomContractError::BidsExist,
            "Cancelling an auction with bids should fail",
        );
    }

    #[concordium_test]
    fn test_cancel_before_end_time() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        expect_error(
            cancel_at(&mut host, SELLER, END_MS - 1),
            CustomContractError::AuctionStillOpen,
            "Cancelling before expiry should fail",
        );
    }

    #[concordium_test]
    /// The cancel address is derived from the sender, so a stranger's
    /// cancel lands on a nonexistent record.
    fn test_cancel_by_stranger() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        expect_error(
            cancel_at(&mut host, ALICE, END_MS + 1),
            CustomContractError::UnknownAuction,
            "Strangers must not cancel other sellers' auctions",
        );
    }

    #[concordium_test]
    fn test_deposit_rejects_accounts() {
        let host = fresh_host();
        let params: OnReceivingCis2Params<ContractTokenId, ContractTokenAmount> =
            OnReceivingCis2Params {
                token_id: TokenIdVec(vec![1]),
                amount: 10.into(),
                from: Address::Account(ALICE),
                data: AdditionalData::empty(),
            };
        let parameter_bytes = to_bytes(&params);

        let ctx = receive_ctx(ALICE, &parameter_bytes, 5);
        expect_error(
            contract_deposit(&ctx, &host),
            CustomContractError::ContractOnly,
            "Deposit notifications must come from token contracts",
        );

        let mut ctx = receive_ctx(ALICE, &parameter_bytes, 5);
        ctx.set_sender(Address::Contract(VALUE_CONTRACT));
        contract_deposit(&ctx, &host).expect("Deposits from token contracts should be accepted");
    }

    #[concordium_test]
    fn test_views() {
        let mut host = fresh_host();
        create(&mut host, 1).expect("Listing should succeed");
        bid(&mut host, ALICE, 100).expect("Opening bid should succeed");

        let params = ViewParams {
            seller: SELLER,
            seed: SEED,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(CRANK, &parameter_bytes, 5);
        let record = contract_view(&ctx, &host).expect("Viewing a live auction should succeed");
        claim_eq!(record.highest_bidder, Some(ALICE));
        claim_eq!(record.escrow, 100.into());

        let params = ViewBidParams {
            seller: SELLER,
            seed: SEED,
            bidder: ALICE,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(CRANK, &parameter_bytes, 5);
        let amount = contract_view_bid(&ctx, &host).expect("Viewing a bid should succeed");
        claim_eq!(amount, 100.into());

        let params = ViewBidParams {
            seller: SELLER,
            seed: SEED,
            bidder: BOB,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(CRANK, &parameter_bytes, 5);
        let amount = contract_view_bid(&ctx, &host).expect("Viewing a missing bid should succeed");
        claim_eq!(amount, 0.into());
    }
}
