#![warn(clippy::all, missing_docs)]

//! Core logic for the Steam price tracker dashboard.
//!
//! This crate hosts the API models, configuration handling, the HTTP
//! client and login session, and the view-independent state (paged
//! collections, wishlist validation, routing) used by the terminal UI
//! and any future frontends.

pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod paging;
pub mod routes;
pub mod session;
pub mod wishlist;

pub use api::{ApiClient, GameQuery};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use models::{
    AccountInfo, Game, Genre, LoginGrant, NewWishList, PriceHistoryPoint, SignupForm,
    SteamIndexPoint, TargetKind, WishListEntry,
};
pub use paging::{Applied, MergeDirection, PageTicket, PagedCollection};
pub use routes::Route;
pub use session::{Credential, CredentialStore, Session};
