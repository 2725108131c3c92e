//! # Customer Module
//!
//! Định nghĩa Customer (khách hàng) với địa chỉ và thông tin KYC
//! (PESEL, số giấy tờ tùy thân, ngày/nơi sinh).

use crate::error::CoreResult;
use crate::validation;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dữ liệu form khi tạo hoặc sửa khách hàng.
///
/// Dùng chung cho create và update, giống form gốc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub house: String,
    /// Số căn hộ (có thể bỏ trống)
    pub apartment: Option<String>,
    /// Mã bưu điện `NN-NNN`
    pub postal_code: String,
    pub city: String,
    /// PESEL - 11 chữ số
    pub pesel: String,
    pub birth_date: NaiveDate,
    pub birth_city: String,
    /// Số giấy tờ tùy thân, luôn lưu dạng viết hoa
    pub identification: String,
}

impl CustomerForm {
    /// Chuẩn hóa trước khi lưu: trim các field, viết hoa identification,
    /// apartment rỗng thành None
    pub fn normalized(mut self) -> Self {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.street = self.street.trim().to_string();
        self.house = self.house.trim().to_string();
        self.apartment = self
            .apartment
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        self.postal_code = self.postal_code.trim().to_string();
        self.city = self.city.trim().to_string();
        self.pesel = self.pesel.trim().to_string();
        self.birth_city = self.birth_city.trim().to_string();
        self.identification = self.identification.trim().to_uppercase();
        self
    }

    /// Kiểm tra toàn bộ field
    pub fn validate(&self) -> CoreResult<()> {
        validation::required("first_name", &self.first_name, 100)?;
        validation::required("last_name", &self.last_name, 100)?;
        validation::required("street", &self.street, 100)?;
        validation::required("house", &self.house, 10)?;
        if let Some(apartment) = &self.apartment {
            validation::max_length("apartment", apartment, 10)?;
        }
        validation::postal_code(&self.postal_code)?;
        validation::required("city", &self.city, 100)?;
        validation::pesel(&self.pesel)?;
        validation::required("birth_city", &self.birth_city, 100)?;
        validation::required("identification", &self.identification, 9)?;
        Ok(())
    }
}

/// Suy ra ngày sinh từ PESEL.
///
/// Sáu chữ số đầu là `YYMMDD`; tháng lớn hơn 12 nghĩa là sinh năm 20xx và
/// tháng thật bằng tháng trừ 20. `None` nếu PESEL không đủ 11 chữ số hoặc
/// ngày không tồn tại.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use minibank_core::birth_date_from_pesel;
///
/// assert_eq!(birth_date_from_pesel("85061512345"), NaiveDate::from_ymd_opt(1985, 6, 15));
/// assert_eq!(birth_date_from_pesel("02270812345"), NaiveDate::from_ymd_opt(2002, 7, 8));
/// ```
pub fn birth_date_from_pesel(pesel: &str) -> Option<NaiveDate> {
    let pesel = pesel.trim();
    if pesel.len() != 11 || !pesel.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = pesel[0..2].parse().ok()?;
    let month: u32 = pesel[2..4].parse().ok()?;
    let day: u32 = pesel[4..6].parse().ok()?;

    if month > 12 {
        NaiveDate::from_ymd_opt(2000 + year, month.checked_sub(20)?, day)
    } else {
        NaiveDate::from_ymd_opt(1900 + year, month, day)
    }
}

/// Khách hàng đã lưu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// ID tự tăng
    pub id: i64,
    #[serde(flatten)]
    pub details: CustomerForm,
    /// Thời gian tạo
    pub created_at: DateTime<Utc>,
    /// Nhân viên đã tạo
    pub created_employee: String,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (#{}, PESEL {})",
            self.full_name(),
            self.id,
            self.details.pesel
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_form() -> CustomerForm {
        CustomerForm {
            first_name: "Jan".to_string(),
            last_name: "Kowalski".to_string(),
            street: "Marszałkowska".to_string(),
            house: "10".to_string(),
            apartment: Some("".to_string()),
            postal_code: "00-950".to_string(),
            city: "Warszawa".to_string(),
            pesel: "90010112345".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            birth_city: "Kraków".to_string(),
            identification: "abc123456".to_string(),
        }
    }

    #[test]
    fn test_normalized_uppercases_identification() {
        let form = sample_form().normalized();
        assert_eq!(form.identification, "ABC123456");
        assert_eq!(form.apartment, None);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_birth_date_from_pesel_centuries() {
        assert_eq!(
            birth_date_from_pesel("90010112345"),
            NaiveDate::from_ymd_opt(1990, 1, 1)
        );
        assert_eq!(
            birth_date_from_pesel("85123112345"),
            NaiveDate::from_ymd_opt(1985, 12, 31)
        );
        assert_eq!(
            birth_date_from_pesel("05322912345"),
            NaiveDate::from_ymd_opt(2005, 12, 29)
        );
        assert_eq!(
            birth_date_from_pesel("10210312345"),
            NaiveDate::from_ymd_opt(2010, 1, 3)
        );
    }

    #[test]
    fn test_birth_date_from_invalid_pesel() {
        assert_eq!(birth_date_from_pesel("8506151234"), None);
        assert_eq!(birth_date_from_pesel("85O61512345"), None);
        // tháng 13..20 không hợp lệ ở cả hai thế kỷ
        assert_eq!(birth_date_from_pesel("85131512345"), None);
        assert_eq!(birth_date_from_pesel("85023012345"), None);
    }

    #[test]
    fn test_validate_rejects_bad_pesel() {
        let mut form = sample_form();
        form.pesel = "123".to_string();
        let err = form.normalized().validate().unwrap_err();
        assert!(err.to_string().starts_with("pesel"));
    }

    #[test]
    fn test_validate_rejects_long_identification() {
        let mut form = sample_form();
        form.identification = "ABC1234567".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_customer_display() {
        let customer = Customer {
            id: 42,
            details: sample_form().normalized(),
            created_at: Utc::now(),
            created_employee: "teller".to_string(),
        };
        assert_eq!(customer.to_string(), "Jan Kowalski (#42, PESEL 90010112345)");
    }
}
