//! # Validation Module
//!
//! Các hàm kiểm tra dữ liệu form, gọi trước mọi thao tác ghi xuống DB.
//! Mỗi hàm trả về `CoreResult<()>` với tên field và message dễ đọc.

use crate::error::{CoreError, CoreResult};

/// Field bắt buộc, không rỗng, tối đa `max_len` ký tự
pub fn required(field: &str, value: &str, max_len: usize) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "This field is required."));
    }
    max_length(field, value, max_len)
}

/// Field tùy chọn, tối đa `max_len` ký tự
pub fn max_length(field: &str, value: &str, max_len: usize) -> CoreResult<()> {
    let len = value.chars().count();
    if len > max_len {
        return Err(CoreError::validation(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max_len, len
            ),
        ));
    }
    Ok(())
}

/// Đúng `count` chữ số ASCII
pub fn exact_digits(field: &str, value: &str, count: usize) -> CoreResult<()> {
    if value.len() == count && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::validation(
            field,
            format!("Enter exactly {} digits.", count),
        ))
    }
}

/// Mã bưu điện Ba Lan: `NN-NNN`
pub fn postal_code(value: &str) -> CoreResult<()> {
    let bytes = value.as_bytes();
    let valid = bytes.len() == 6
        && bytes[2] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(CoreError::validation("postal_code", "Enter a valid value (00-000)."))
    }
}

/// PESEL: 11 chữ số
pub fn pesel(value: &str) -> CoreResult<()> {
    exact_digits("pesel", value, 11)
}

/// Mã loại tài khoản: một chữ cái, dấu gạch, hai chữ số (`A-00`)
pub fn account_type_code(value: &str) -> CoreResult<()> {
    let bytes = value.as_bytes();
    let valid = bytes.len() == 4
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b'-'
        && bytes[2].is_ascii_digit()
        && bytes[3].is_ascii_digit();

    if valid {
        Ok(())
    } else {
        Err(CoreError::validation("code", "Enter a valid value (A-00)."))
    }
}

/// Subaccount: 6 chữ số
pub fn subaccount(value: &str) -> CoreResult<()> {
    exact_digits("subaccount", value, 6)
}

/// Mã quốc gia: 2 chữ cái
pub fn country_code(value: &str) -> CoreResult<()> {
    if value.len() == 2 && value.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(CoreError::validation("country_code", "Enter exactly 2 letters."))
    }
}

/// Số ngân hàng: 8 chữ số
pub fn bank_number(value: &str) -> CoreResult<()> {
    exact_digits("bank_number", value, 8)
}

/// IBAN đã sinh phải có đúng 28 ký tự
pub fn iban(value: &str) -> CoreResult<()> {
    let len = value.chars().count();
    if len != crate::iban::IBAN_LENGTH {
        return Err(CoreError::IbanLength(len));
    }
    Ok(())
}
