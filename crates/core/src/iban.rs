//! # IBAN Module
//!
//! Sinh số IBAN cho tài khoản từ Parameter, subaccount của AccountType,
//! ID tài khoản và ID khách hàng.
//!
//! ```text
//! PL 12345678 000001 7 000000000 42
//! ── ──────── ────── ─────────────────
//! country bank   subaccount  account + zeros + customer (12)
//! ```

use crate::error::CoreResult;
use crate::parameter::Parameter;
use crate::validation;

/// Độ dài cố định của IBAN
pub const IBAN_LENGTH: usize = 28;

/// Độ dài đoạn cuối: account_id + zeros + customer_id
pub const ACCOUNT_SEGMENT_LENGTH: usize = 12;

/// Ghép IBAN, chưa kiểm tra độ dài.
///
/// Số 0 được chèn giữa account_id và customer_id cho đến khi đoạn cuối đủ
/// 12 ký tự. Nếu hai ID đã dài hơn 12 thì không chèn gì.
pub fn compose_iban(
    country_code: &str,
    bank_number: &str,
    subaccount: &str,
    account_id: i64,
    customer_id: i64,
) -> String {
    let account = account_id.to_string();
    let customer = customer_id.to_string();
    let padding = ACCOUNT_SEGMENT_LENGTH.saturating_sub(account.len() + customer.len());

    let mut iban = String::with_capacity(IBAN_LENGTH);
    iban.push_str(country_code);
    iban.push_str(bank_number);
    iban.push_str(subaccount);
    iban.push_str(&account);
    iban.push_str(&"0".repeat(padding));
    iban.push_str(&customer);
    iban
}

/// Sinh IBAN và kiểm tra đúng 28 ký tự.
///
/// # Examples
/// ```
/// use minibank_core::{generate_iban, Parameter};
///
/// let parameter = Parameter::new("PL", "12345678");
/// let iban = generate_iban(&parameter, "000001", 7, 42).unwrap();
/// assert_eq!(iban, "PL12345678000001700000000042");
/// ```
pub fn generate_iban(
    parameter: &Parameter,
    subaccount: &str,
    account_id: i64,
    customer_id: i64,
) -> CoreResult<String> {
    let iban = compose_iban(
        &parameter.country_code,
        &parameter.bank_number,
        subaccount,
        account_id,
        customer_id,
    );
    validation::iban(&iban)?;
    Ok(iban)
}
