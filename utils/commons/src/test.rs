//! Mock helpers for exercising contracts against `TestHost` with stubbed
//! CIS-2 token contracts.
use concordium_std::test_infrastructure::MockFn;
use concordium_std::*;

/// Mock an entrypoint that parses its parameter and answers with the
/// given return value.
pub fn parse_and_ok_mock<D: Deserial, S>(
    return_value: impl Clone + Serial + 'static,
) -> MockFn<S> {
    MockFn::new(move |parameter, _amount, _balance, _state| {
        D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
        Ok((false, Some(return_value.clone())))
    })
}

/// Mock an entrypoint that parses its parameter, traps unless `check`
/// accepts it, and answers with the given return value.
pub fn parse_and_check_mock<D: Deserial, S>(
    check: impl Fn(&D) -> bool + 'static,
    return_value: impl Clone + Serial + 'static,
) -> MockFn<S> {
    MockFn::new(move |parameter, _, _, _state| {
        let value =
            D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
        if !check(&value) {
            return Err(CallContractError::Trap);
        };
        Ok((false, Some(return_value.clone())))
    })
}

/// Mock an entrypoint that rejects every call with a logic error, the way
/// a CIS-2 contract answers an uncovered transfer.
pub fn logic_reject_mock<S>(reason: i32) -> MockFn<S> {
    MockFn::new(move |_parameter, _amount, _balance, _state: &mut S| {
        Err(CallContractError::LogicReject {
            reason,
            return_value: (),
        })
    })
}
