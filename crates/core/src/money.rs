//! # Money Module
//!
//! Các quy tắc cho số tiền: fixed-point `rust_decimal::Decimal` với 2 chữ số
//! thập phân, giới hạn số chữ số giống cột DECIMAL(12, 2) và DECIMAL(4, 2).

use crate::error::{CoreError, CoreResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// Số chữ số thập phân của mọi số tiền và lãi suất
pub const MONEY_DECIMALS: u32 = 2;

/// Tổng số chữ số tối đa cho Balance, Debit, Free balance, Value operation
pub const MONEY_MAX_DIGITS: u32 = 12;

/// Tổng số chữ số tối đa cho Percent
pub const PERCENT_MAX_DIGITS: u32 = 4;

/// Làm tròn về 2 chữ số thập phân, half-up (midpoint away from zero).
///
/// # Examples
/// ```
/// use minibank_core::money::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(0.125)), dec!(0.13));
/// assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
/// assert_eq!(round_money(dec!(10.004)), dec!(10.00));
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    fixed_scale(value.round_dp_with_strategy(MONEY_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
}

/// Đưa giá trị về đúng scale 2 (`1.5000` -> `1.50`, `100` -> `100.00`).
///
/// Chỉ bỏ số 0 thừa; giá trị có hơn 2 chữ số thập phân có nghĩa được giữ
/// nguyên để `check_digits` báo lỗi.
///
/// # Examples
/// ```
/// use minibank_core::money::fixed_scale;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(fixed_scale(dec!(1.5000)).to_string(), "1.50");
/// assert_eq!(fixed_scale(dec!(100)).to_string(), "100.00");
/// assert_eq!(fixed_scale(dec!(1.005)).to_string(), "1.005");
/// ```
pub fn fixed_scale(value: Decimal) -> Decimal {
    let mut scaled = value.normalize();
    if scaled.scale() > MONEY_DECIMALS {
        return value;
    }
    scaled.rescale(MONEY_DECIMALS);
    scaled
}

/// Kiểm tra một giá trị có vừa cột DECIMAL(max_digits, 2) không.
///
/// Trả về lỗi nếu có quá 2 chữ số thập phân hoặc phần nguyên quá dài.
pub fn check_digits(field: &str, value: Decimal, max_digits: u32) -> CoreResult<()> {
    if value.normalize().scale() > MONEY_DECIMALS {
        return Err(CoreError::validation(
            field,
            format!("Ensure that there are no more than {} decimal places.", MONEY_DECIMALS),
        ));
    }

    let limit = Decimal::from(10_i64.pow(max_digits - MONEY_DECIMALS));
    if value.abs() >= limit {
        return Err(CoreError::validation(
            field,
            format!("Ensure that there are no more than {} digits in total.", max_digits),
        ));
    }

    Ok(())
}

/// Kiểm tra số tiền (DECIMAL(12, 2))
pub fn check_money(field: &str, value: Decimal) -> CoreResult<()> {
    check_digits(field, value, MONEY_MAX_DIGITS)
}

/// Kiểm tra lãi suất (DECIMAL(4, 2), không âm)
pub fn check_percent(field: &str, value: Decimal) -> CoreResult<()> {
    if value < Decimal::ZERO {
        return Err(CoreError::validation(
            field,
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    check_digits(field, value, PERCENT_MAX_DIGITS)
}

/// Parse Decimal từ TEXT column (dùng ở persistence layer)
pub fn parse_money(field: &str, raw: &str) -> CoreResult<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| CoreError::validation(field, format!("invalid decimal '{}': {}", raw, e)))
}
