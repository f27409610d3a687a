//! Client-side pre-validation of wishlist targets.
//!
//! Advisory only: the server is the authority and may still reject a target
//! that passes here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    format::format_won,
    models::{NewWishList, PriceHistoryPoint, TargetKind},
};

/// Confirmation shown after the server accepted a target.
pub const ADDED_MESSAGE: &str = "위시리스트에 추가됐어요!";
/// Shown when the server rejected a target without a message.
pub const ADD_FAILED_FALLBACK: &str = "추가 실패";
/// Input rule shown next to the target field.
pub const TARGET_INPUT_HINT: &str = "정수만 입력 (예: 9000, 9,000)";

/// Plain digits, or digits grouped by thousands.
static TARGET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+|\d{1,3}(,\d{3})+)$").expect("invalid target value regex")
});

/// Why a target was not submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetRejection {
    /// Nothing was entered.
    #[error("목표 값을 입력해주세요.")]
    Empty,
    /// The input is not a whole non-negative number.
    #[error("정수만 입력해주세요.")]
    NotNumeric,
    /// A price target must be below the current price.
    #[error("현재 가격({}) 미만으로 입력해주세요.", won(.current))]
    PriceNotBelowCurrent {
        /// Latest known price.
        current: i64,
    },
    /// A discount target must exceed the current discount.
    #[error("현재 할인율({current}%) 초과로 입력해주세요.")]
    DiscountNotAboveCurrent {
        /// Latest known discount percent.
        current: i32,
    },
}

fn won(value: &i64) -> String {
    format_won(*value)
}

impl TargetRejection {
    /// Whether the view should stay silent instead of showing a message.
    pub fn is_silent(&self) -> bool {
        matches!(self, TargetRejection::Empty)
    }
}

/// Parse `raw` and check it against the latest loaded price point.
///
/// Without a loaded point the bound checks are skipped.
pub fn validate_target(
    app_id: u64,
    kind: TargetKind,
    raw: &str,
    latest: Option<&PriceHistoryPoint>,
) -> Result<NewWishList, TargetRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TargetRejection::Empty);
    }
    if !TARGET_RE.is_match(trimmed) {
        return Err(TargetRejection::NotNumeric);
    }
    let value: i64 = trimmed
        .replace(',', "")
        .parse()
        .map_err(|_| TargetRejection::NotNumeric)?;

    if let Some(latest) = latest {
        match kind {
            TargetKind::Price if value >= latest.price => {
                return Err(TargetRejection::PriceNotBelowCurrent {
                    current: latest.price,
                });
            }
            TargetKind::Discount if value <= i64::from(latest.discount_percent) => {
                return Err(TargetRejection::DiscountNotAboveCurrent {
                    current: latest.discount_percent,
                });
            }
            _ => {}
        }
    }

    Ok(NewWishList {
        app_id,
        target_type: kind,
        target_value: value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest(price: i64, discount: i32) -> PriceHistoryPoint {
        PriceHistoryPoint {
            snapshot_date: "2024-05-01".to_string(),
            price,
            discount_percent: discount,
        }
    }

    #[test]
    fn price_target_must_be_below_current() {
        let point = latest(9000, 10);
        let err = validate_target(1, TargetKind::Price, "10000", Some(&point)).unwrap_err();
        assert!(err.to_string().contains("9,000"));
        assert_eq!(
            validate_target(1, TargetKind::Price, "9000", Some(&point)),
            Err(TargetRejection::PriceNotBelowCurrent { current: 9000 })
        );

        let draft = validate_target(1, TargetKind::Price, " 8999 ", Some(&point)).expect("accepted");
        assert_eq!(draft.target_value, 8999);
        assert_eq!(draft.target_type, TargetKind::Price);
    }

    #[test]
    fn discount_target_must_exceed_current() {
        let point = latest(9000, 20);
        let err = validate_target(1, TargetKind::Discount, "20", Some(&point)).unwrap_err();
        assert_eq!(err.to_string(), "현재 할인율(20%) 초과로 입력해주세요.");
        assert!(validate_target(1, TargetKind::Discount, "15", Some(&point)).is_err());
        assert!(validate_target(1, TargetKind::Discount, "21", Some(&point)).is_ok());
    }

    #[test]
    fn rejects_empty_and_non_numeric_input() {
        let point = latest(9000, 0);
        let empty = validate_target(1, TargetKind::Price, "   ", Some(&point)).unwrap_err();
        assert!(empty.is_silent());
        assert_eq!(
            validate_target(1, TargetKind::Price, "cheap", Some(&point)),
            Err(TargetRejection::NotNumeric)
        );
        assert_eq!(
            validate_target(1, TargetKind::Price, "-5", Some(&point)),
            Err(TargetRejection::NotNumeric)
        );
    }

    #[test]
    fn accepts_grouped_digits() {
        let point = latest(20_000, 0);
        let draft = validate_target(7, TargetKind::Price, "15,000", Some(&point)).expect("accepted");
        assert_eq!(draft.target_value, 15_000);
        assert_eq!(draft.app_id, 7);
    }

    #[test]
    fn rejects_malformed_grouping_and_decimals() {
        for raw in ["1,,0,00", "10,00", ",100", "1,000,", "10.5", "1e4", "+5"] {
            assert_eq!(
                validate_target(1, TargetKind::Price, raw, None),
                Err(TargetRejection::NotNumeric),
                "{raw}"
            );
        }
        let draft = validate_target(1, TargetKind::Price, "1,234,567", None).expect("accepted");
        assert_eq!(draft.target_value, 1_234_567);
    }

    #[test]
    fn without_history_only_parsing_applies() {
        let draft = validate_target(3, TargetKind::Discount, "0", None).expect("accepted");
        assert_eq!(draft.target_value, 0);
    }
}
