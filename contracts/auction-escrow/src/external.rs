use commons::{ContractTokenAmount, Token};
use concordium_std::*;

/// Type of the parameter to the `create` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct CreateParams {
    /// Caller-chosen discriminator, allowing one seller to run several
    /// auctions at once.
    pub seed: u64,
    /// The non-fungible unit to be escrowed and sold.
    pub asset: Token,
    /// The fungible token bids are denominated in.
    pub value_unit: Token,
    /// Time at which bidding closes. Must be in the future on creation.
    pub end_time: Timestamp,
    /// Smallest allowed opening bid.
    pub minimum_bid: ContractTokenAmount,
}

/// Type of the parameter to the `bid` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct BidParams {
    /// Seller whose auction is being bid on.
    pub seller: AccountAddress,
    /// Seed the auction was listed under.
    pub seed: u64,
    /// Value increment to add to the sender's cumulative bid.
    pub amount: ContractTokenAmount,
}

/// Type of the parameter to the `resolve` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct ResolveParams {
    /// Seller whose auction is being resolved.
    pub seller: AccountAddress,
    /// Seed the auction was listed under.
    pub seed: u64,
    /// The claimed winner. Must match the recorded leader.
    pub winner: AccountAddress,
}

/// Type of the parameter to the `refund` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct RefundParams {
    /// Seller whose auction the sender lost.
    pub seller: AccountAddress,
    /// Seed the auction was listed under.
    pub seed: u64,
}

/// Type of the parameter to the `cancel` function. The auction address is
/// derived from the sender, so only the seller can name their own lots.
#[derive(Debug, Serialize, SchemaType)]
pub struct CancelParams {
    /// Seed the auction was listed under.
    pub seed: u64,
}

/// Type of the parameter to the `view` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct ViewParams {
    pub seller: AccountAddress,
    pub seed: u64,
}

/// Type of the parameter to the `viewBid` function.
#[derive(Debug, Serialize, SchemaType)]
pub struct ViewBidParams {
    pub seller: AccountAddress,
    pub seed: u64,
    pub bidder: AccountAddress,
}
