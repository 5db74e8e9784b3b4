use super::*;

pub type ContractResult<A> = Result<A, ContractError>;

/// Contract token ID type.
pub type ContractTokenId = TokenIdVec;

/// Contract token amount type. Amounts are fixed-point integers in the
/// token's smallest denomination.
pub type ContractTokenAmount = TokenAmountU64;

/// Wrapping the custom errors in a type with CIS2 errors.
pub type ContractError = Cis2Error<CustomContractError>;

/// Parameter type for the CIS-2 `transfer` function specialized to the
/// token types used by these contracts.
pub type TransferParameter = TransferParams<ContractTokenId, ContractTokenAmount>;
