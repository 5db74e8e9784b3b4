use commons::{ContractError, ContractResult, ContractTokenAmount, CustomContractError, Token};
use concordium_cis2::{AdditionalData, Receiver, Transfer, TransferParams};
use concordium_std::*;

/// Entrypoint invoked by token contracts when this contract receives a
/// deposit.
pub const DEPOSIT_ENTRYPOINT: &str = "deposit";

/// Pull `amount` of `token` out of `from`'s balance into contract
/// custody. This contract must already be an operator for `from` on the
/// token contract; a rejected pull is reported as `on_reject`.
pub fn pull<T>(
    host: &mut impl HasHost<T>,
    custody: ContractAddress,
    token: &Token,
    amount: ContractTokenAmount,
    from: AccountAddress,
    on_reject: CustomContractError,
) -> ContractResult<()> {
    let transfer = Transfer {
        token_id: token.id.clone(),
        amount,
        from: Address::Account(from),
        to: Receiver::Contract(
            custody,
            OwnedEntrypointName::new_unchecked(DEPOSIT_ENTRYPOINT.into()),
        ),
        data: AdditionalData::empty(),
    };
    host.invoke_contract(
        &token.contract,
        &TransferParams(vec![transfer]),
        EntrypointName::new_unchecked("transfer"),
        Amount::zero(),
    )
    .map_err(|error| handle_call_error(error, on_reject))?;

    Ok(())
}

/// Release `amount` of `token` from contract custody to the account `to`.
pub fn release<T>(
    host: &mut impl HasHost<T>,
    custody: ContractAddress,
    token: &Token,
    amount: ContractTokenAmount,
    to: AccountAddress,
) -> ContractResult<()> {
    let transfer = Transfer {
        token_id: token.id.clone(),
        amount,
        from: Address::Contract(custody),
        to: Receiver::Account(to),
        data: AdditionalData::empty(),
    };
    host.invoke_contract(
        &token.contract,
        &TransferParams(vec![transfer]),
        EntrypointName::new_unchecked("transfer"),
        Amount::zero(),
    )
    .map_err(|error| handle_call_error(error, CustomContractError::InvokeContractError))?;

    Ok(())
}

// A logic rejection means the token contract refused the transfer, which
// for a compliant CIS-2 contract is an uncovered balance or missing
// operator rights.
fn handle_call_error<R>(error: CallContractError<R>, on_reject: CustomContractError) -> ContractError {
    match error {
        CallContractError::LogicReject { .. } => on_reject.into(),
        CallContractError::MissingEntrypoint | CallContractError::MessageFailed => {
            CustomContractError::Incompatible.into()
        }
        _ => CustomContractError::InvokeContractError.into(),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use commons::test::*;
    use commons::TransferParameter;
    use concordium_cis2::TokenIdVec;
    use concordium_std::test_infrastructure::*;

    const TOKEN_CONTRACT: ContractAddress = ContractAddress {
        index: 1,
        subindex: 0,
    };
    const CUSTODY: ContractAddress = ContractAddress {
        index: 9,
        subindex: 0,
    };

    const USER: AccountAddress = AccountAddress([1u8; 32]);

    fn token() -> Token {
        Token {
            contract: TOKEN_CONTRACT,
            id: TokenIdVec(vec![7]),
        }
    }

    #[concordium_test]
    fn test_pull_names_owner_and_custody() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParameter, _>(
                |params| {
                    let transfer = &params.0[0];
                    transfer.from == Address::Account(USER)
                        && transfer.amount == 40.into()
                        && transfer.token_id == TokenIdVec(vec![7])
                },
                (),
            ),
        );

        let response = pull(
            &mut host,
            CUSTODY,
            &token(),
            40.into(),
            USER,
            CustomContractError::InsufficientValueBalance,
        );
        claim_eq!(response, Ok(()));
    }

    #[concordium_test]
    fn test_rejected_pull_maps_to_domain_error() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            logic_reject_mock(-42),
        );

        let response = pull(
            &mut host,
            CUSTODY,
            &token(),
            40.into(),
            USER,
            CustomContractError::InsufficientValueBalance,
        );
        claim_eq!(
            response,
            Err(CustomContractError::InsufficientValueBalance.into())
        );
    }

    #[concordium_test]
    fn test_release_transfers_out_of_custody() {
        let state_builder = TestStateBuilder::default();
        let mut host = TestHost::new((), state_builder);

        host.setup_mock_entrypoint(
            TOKEN_CONTRACT,
            OwnedEntrypointName::new_unchecked("transfer".into()),
            parse_and_check_mock::<TransferParameter, _>(
                |params| {
                    let transfer = &params.0[0];
                    transfer.from == Address::Contract(CUSTODY)
                        && matches!(&transfer.to, Receiver::Account(account) if *account == USER)
                        && transfer.amount == 15.into()
                },
                (),
            ),
        );

        let response = release(&mut host, CUSTODY, &token(), 15.into(), USER);
        claim_eq!(response, Ok(()));
    }
}
