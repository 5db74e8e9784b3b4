use super::*;

/// The custom errors the contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Only account addresses can perform this action (Error code: -4).
    OnlyAccountAddress,
    /// This function must only be called by a contract (Error code: -5).
    ContractOnly,
    /// Failed to invoke a contract (Error code: -6).
    InvokeContractError,
    /// Incompatible token contract (Error code: -7).
    Incompatible,
    /// No auction record exists under the derived address (Error code: -8).
    UnknownAuction,
    /// Auction end time is not in the future (Error code: -9).
    InvalidTiming,
    /// An auction record already exists under the derived address
    /// (Error code: -10).
    AlreadyExists,
    /// The seller does not hold the asset to be escrowed (Error code: -11).
    InsufficientAssetBalance,
    /// The bidder cannot cover the bid increment (Error code: -12).
    InsufficientValueBalance,
    /// The auction is expired or already settled (Error code: -13).
    AuctionClosed,
    /// Opening bid is below the auction minimum (Error code: -14).
    BelowMinimum,
    /// Bid increments must be nonzero (Error code: -15).
    ZeroAmount,
    /// The auction has not reached its end time yet (Error code: -16).
    AuctionStillOpen,
    /// The auction expired without any bids (Error code: -17).
    NoBids,
    /// The supplied winner or bid record does not match the recorded
    /// leader (Error code: -18).
    WinnerMismatch,
    /// The auction has not been resolved yet (Error code: -19).
    NotResolved,
    /// The winner cannot claim a refund (Error code: -20).
    WinnerCannotRefund,
    /// No bid record remains for this bidder (Error code: -21).
    AlreadyRefunded,
    /// Cannot cancel an auction that received bids (Error code: -22).
    BidsExist,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to contract invocations to CustomContractError.
impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

/// Mapping CustomContractError to ContractError
impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis2Error::Custom(c)
    }
}
