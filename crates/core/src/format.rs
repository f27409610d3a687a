//! User-facing labels for prices, discounts and wishlist targets.

use crate::models::{Game, TargetKind, WishListEntry};

/// Label used instead of a price for free games.
pub const FREE_LABEL: &str = "무료";

/// Group digits by thousands: `9000` → `9,000`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Amount in won: `9000` → `9,000원`.
pub fn format_won(value: i64) -> String {
    format!("{}원", group_thousands(value))
}

/// Current price of `game`, or [`FREE_LABEL`] when it costs nothing.
pub fn price_label(game: &Game) -> String {
    if game.is_free() {
        FREE_LABEL.to_string()
    } else {
        format_won(game.current_price)
    }
}

/// Discount badge, only for discounted games: `-35%`.
pub fn discount_badge(game: &Game) -> Option<String> {
    game.is_discounted()
        .then(|| format!("-{}%", game.discount_percent))
}

/// Struck-through original price, only for discounted games.
pub fn original_price_label(game: &Game) -> Option<String> {
    game.is_discounted()
        .then(|| format_won(game.original_price))
}

/// Short name of a target kind.
pub fn target_kind_label(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Price => "가격",
        TargetKind::Discount => "할인율",
    }
}

/// Target value with its unit: `9,000원` or `30%`.
pub fn target_value_label(kind: TargetKind, value: i64) -> String {
    match kind {
        TargetKind::Price => format_won(value),
        TargetKind::Discount => format!("{value}%"),
    }
}

/// Whether the target has been reached.
pub fn target_status_label(entry: &WishListEntry) -> &'static str {
    if entry.in_target_range {
        "목표 달성"
    } else {
        "대기중"
    }
}

/// Current pricing summary on the detail view: `9,000원 (20% 할인중)`.
pub fn current_price_summary(price: i64, discount_percent: i32) -> String {
    if discount_percent > 0 {
        format!("{} ({discount_percent}% 할인중)", format_won(price))
    } else {
        format_won(price)
    }
}

/// Greeting shown to a signed-in user.
pub fn greeting(nickname: &str) -> String {
    format!("{nickname} 님")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(current: i64, original: i64, discount: i32) -> Game {
        Game {
            app_id: 10,
            name: "Counter-Strike".to_string(),
            current_price: current,
            original_price: original,
            discount_percent: discount,
        }
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(9000), "9,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-45_000), "-45,000");
    }

    #[test]
    fn free_games_show_free_label() {
        let free = game(0, 0, 0);
        assert_eq!(price_label(&free), "무료");
        assert!(discount_badge(&free).is_none());
        assert!(original_price_label(&free).is_none());
    }

    #[test]
    fn discounted_games_show_badge_and_original() {
        let sale = game(6500, 10_000, 35);
        assert_eq!(price_label(&sale), "6,500원");
        assert_eq!(discount_badge(&sale).as_deref(), Some("-35%"));
        assert_eq!(original_price_label(&sale).as_deref(), Some("10,000원"));
    }

    #[test]
    fn target_labels() {
        assert_eq!(target_value_label(TargetKind::Price, 12_000), "12,000원");
        assert_eq!(target_value_label(TargetKind::Discount, 30), "30%");
        assert_eq!(target_kind_label(TargetKind::Discount), "할인율");
        assert_eq!(current_price_summary(9000, 0), "9,000원");
        assert_eq!(current_price_summary(9000, 20), "9,000원 (20% 할인중)");
    }
}
