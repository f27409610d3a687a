//! Requests views ask the app to run, and the responses routed back to them.

use steamdash_core::{
    AccountInfo, ApiClient, ApiResult, Game, GameQuery, Genre, LoginGrant, NewWishList,
    PageTicket, PriceHistoryPoint, SignupForm, SteamIndexPoint, WishListEntry,
};

#[derive(Debug, Clone)]
pub enum Request {
    Games { ticket: PageTicket, genre_ids: Vec<u64> },
    Genres,
    PriceHistory { app_id: u64, ticket: PageTicket },
    IndexHistory { ticket: PageTicket },
    WishList,
    AddWishList(NewWishList),
    DeleteWishList(u64),
    Login { username: String, password: String },
    Signup(SignupForm),
    AccountInfo,
    /// Account info and wishlist, fetched together.
    Profile,
}

impl Request {
    /// Short name used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Request::Games { .. } => "games",
            Request::Genres => "genres",
            Request::PriceHistory { .. } => "price_history",
            Request::IndexHistory { .. } => "index_history",
            Request::WishList => "wish_list",
            Request::AddWishList(_) => "add_wish_list",
            Request::DeleteWishList(_) => "delete_wish_list",
            Request::Login { .. } => "login",
            Request::Signup(_) => "signup",
            Request::AccountInfo => "account_info",
            Request::Profile => "profile",
        }
    }

    pub async fn execute(self, client: &ApiClient) -> Response {
        match self {
            Request::Games { ticket, genre_ids } => {
                let query = GameQuery {
                    page: ticket.page(),
                    size: ticket.size(),
                    genre_ids,
                };
                Response::Games(ticket, client.list_games(&query).await)
            }
            Request::Genres => Response::Genres(client.list_genres().await),
            Request::PriceHistory { app_id, ticket } => Response::PriceHistory(
                ticket,
                client
                    .price_history(app_id, ticket.page(), ticket.size())
                    .await,
            ),
            Request::IndexHistory { ticket } => Response::IndexHistory(
                ticket,
                client.index_history(ticket.page(), ticket.size()).await,
            ),
            Request::WishList => Response::WishList(client.wish_list().await),
            Request::AddWishList(entry) => {
                Response::WishListAdded(client.add_wish_list(&entry).await)
            }
            Request::DeleteWishList(id) => {
                Response::WishListDeleted(id, client.delete_wish_list(id).await)
            }
            Request::Login { username, password } => {
                Response::LoggedIn(client.login(&username, &password).await)
            }
            Request::Signup(form) => Response::SignedUp(client.signup(&form).await),
            Request::AccountInfo => Response::AccountInfo(client.account_info().await),
            Request::Profile => {
                let (account, wish_list) =
                    tokio::join!(client.account_info(), client.wish_list());
                Response::Profile(account.and_then(|account| wish_list.map(|list| (account, list))))
            }
        }
    }
}

#[derive(Debug)]
pub enum Response {
    Games(PageTicket, ApiResult<Vec<Game>>),
    Genres(ApiResult<Vec<Genre>>),
    PriceHistory(PageTicket, ApiResult<Vec<PriceHistoryPoint>>),
    IndexHistory(PageTicket, ApiResult<Vec<SteamIndexPoint>>),
    WishList(ApiResult<Vec<WishListEntry>>),
    WishListAdded(ApiResult<()>),
    WishListDeleted(u64, ApiResult<()>),
    LoggedIn(ApiResult<LoginGrant>),
    SignedUp(ApiResult<()>),
    AccountInfo(ApiResult<AccountInfo>),
    Profile(ApiResult<(AccountInfo, Vec<WishListEntry>)>),
}
