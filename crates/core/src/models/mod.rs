//! Shared domain models received from the tracker API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base URL of the public Steam store page for an app.
pub const STORE_URL_BASE: &str = "https://store.steampowered.com/app";

/// A tracked game with its current pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Steam application id.
    pub app_id: u64,
    /// Display name.
    pub name: String,
    /// Current price in won.
    pub current_price: i64,
    /// Price before any discount, in won.
    pub original_price: i64,
    /// Active discount in percent (0 when not on sale).
    pub discount_percent: i32,
}

impl Game {
    /// Whether the game is currently discounted.
    pub fn is_discounted(&self) -> bool {
        self.discount_percent > 0
    }

    /// Whether the game is free to play.
    pub fn is_free(&self) -> bool {
        self.current_price == 0
    }

    /// A discounted game must be cheaper than its original price.
    pub fn is_consistent(&self) -> bool {
        !self.is_discounted() || self.current_price < self.original_price
    }

    /// Store page for this game.
    pub fn store_url(&self) -> String {
        store_url(self.app_id)
    }
}

/// Store page for an arbitrary app id.
pub fn store_url(app_id: u64) -> String {
    format!("{STORE_URL_BASE}/{app_id}/")
}

/// Genre used to filter the game list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    /// Id sent in the `genreIds` filter.
    pub genre_id: u64,
    /// Display name of the genre chip.
    pub genre_name: String,
}

/// One daily price snapshot of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryPoint {
    /// Snapshot date, lexically sortable (`YYYY-MM-DD`).
    pub snapshot_date: String,
    /// Price on that day, in won.
    pub price: i64,
    /// Discount on that day, in percent.
    pub discount_percent: i32,
}

/// One record of the aggregate Steam price index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SteamIndexPoint {
    /// Record date (`YYYY-MM-DD`).
    pub record_date: String,
    /// Index value on that date.
    pub index_value: f64,
    /// Number of games the index was computed over.
    pub total_game_count: i64,
}

/// Basis on which a wishlist goal is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TargetKind {
    /// Notify once the price drops below the target.
    Price,
    /// Notify once the discount exceeds the target.
    Discount,
}

impl TargetKind {
    /// Wire representation of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetKind::Price => "PRICE",
            TargetKind::Discount => "DISCOUNT",
        }
    }

    /// The other kind.
    pub fn toggled(self) -> Self {
        match self {
            TargetKind::Price => TargetKind::Discount,
            TargetKind::Discount => TargetKind::Price,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered wishlist target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishListEntry {
    /// Id used to delete the entry.
    pub wish_list_id: u64,
    /// Game the target belongs to.
    pub app_id: u64,
    /// Display name of the game.
    pub game_name: String,
    /// Whether the target is a price or a discount.
    pub target_type: TargetKind,
    /// Target price in won, or target discount in percent.
    pub target_value: i64,
    /// Computed server-side: the target condition currently holds.
    pub in_target_range: bool,
}

/// Body of a wishlist registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWishList {
    /// Game to watch.
    pub app_id: u64,
    /// Basis of the target.
    pub target_type: TargetKind,
    /// Target price in won, or target discount in percent.
    pub target_value: i64,
}

/// Profile of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Server-side account id.
    pub account_id: u64,
    /// Login id.
    pub username: String,
    /// Display name.
    pub nickname: String,
    /// Contact e-mail.
    pub email: String,
}

/// Payload returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginGrant {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Nickname of the account, empty when the server omits it.
    #[serde(default)]
    pub nickname: String,
}

/// Body of a signup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    /// Requested login id.
    pub username: String,
    /// Password, sent as entered.
    pub password: String,
    /// Contact e-mail.
    pub email: String,
    /// Display name.
    pub nickname: String,
}

/// Most recent point of the loaded window, by snapshot date.
///
/// Ties keep the earliest point in iteration order.
pub fn latest_point(points: &[PriceHistoryPoint]) -> Option<&PriceHistoryPoint> {
    points.iter().fold(None, |latest, point| match latest {
        Some(current) if point.snapshot_date <= current.snapshot_date => Some(current),
        _ => Some(point),
    })
}
