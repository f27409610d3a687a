use reqwest::{Client, Method, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    config::ApiConfig,
    error::{ApiError, ApiResult},
    models::{
        AccountInfo, Game, Genre, LoginGrant, NewWishList, PriceHistoryPoint, SignupForm,
        SteamIndexPoint, WishListEntry,
    },
    session::{Credential, Session},
};

use super::envelope::{decode, Envelope};

/// Parameters of a game list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    /// Zero-based page index.
    pub page: usize,
    /// Page size.
    pub size: usize,
    /// Genre filter; empty means all games.
    pub genre_ids: Vec<u64>,
}

impl GameQuery {
    /// Query parameters, with `genreIds` comma-joined and omitted when empty.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];
        if !self.genre_ids.is_empty() {
            let joined = self
                .genre_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            params.push(("genreIds", joined));
        }
        params
    }
}

/// Client for the tracker API. Cheap to clone; clones share the session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Build a client for `config`, authenticating through `session`.
    pub fn new(config: &ApiConfig, session: Session) -> ApiResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Session used to authenticate requests.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match self.session.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<Envelope<T>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let result = decode(status, &body);
        if let Err(err) = &result {
            warn!(%status, "api call failed: {err}");
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.send::<T>(builder).await?.into_data()
    }

    async fn execute(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.send::<IgnoredAny>(builder).await.map(|_| ())
    }

    /// `GET /api/game`: one page of games, optionally filtered by genres.
    pub async fn list_games(&self, query: &GameQuery) -> ApiResult<Vec<Game>> {
        self.fetch(self.request(Method::GET, "/api/game").query(&query.params()))
            .await
    }

    /// `GET /api/game/genre`: all genres.
    pub async fn list_genres(&self) -> ApiResult<Vec<Genre>> {
        self.fetch(self.request(Method::GET, "/api/game/genre"))
            .await
    }

    /// `GET /api/game/{appId}/price-history`: one page, newest first.
    pub async fn price_history(
        &self,
        app_id: u64,
        page: usize,
        size: usize,
    ) -> ApiResult<Vec<PriceHistoryPoint>> {
        let path = format!("/api/game/{app_id}/price-history");
        self.fetch(
            self.request(Method::GET, &path)
                .query(&[("page", page), ("size", size)]),
        )
        .await
    }

    /// `GET /api/steam-index/history`: one page, newest first.
    pub async fn index_history(&self, page: usize, size: usize) -> ApiResult<Vec<SteamIndexPoint>> {
        self.fetch(
            self.request(Method::GET, "/api/steam-index/history")
                .query(&[("page", page), ("size", size)]),
        )
        .await
    }

    /// `GET /api/wish-list`: targets of the signed-in account.
    pub async fn wish_list(&self) -> ApiResult<Vec<WishListEntry>> {
        self.fetch(self.request(Method::GET, "/api/wish-list"))
            .await
    }

    /// `POST /api/wish-list`: register a target.
    pub async fn add_wish_list(&self, entry: &NewWishList) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/api/wish-list").json(entry))
            .await?;
        info!(app_id = entry.app_id, kind = %entry.target_type, value = entry.target_value, "Wishlist target added");
        Ok(())
    }

    /// `DELETE /api/wish-list/{id}`.
    pub async fn delete_wish_list(&self, wish_list_id: u64) -> ApiResult<()> {
        let path = format!("/api/wish-list/{wish_list_id}");
        self.execute(self.request(Method::DELETE, &path)).await?;
        info!(wish_list_id, "Wishlist target deleted");
        Ok(())
    }

    /// `POST /api/account/login`. On success the session is established.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginGrant> {
        let body = json!({ "username": username, "password": password });
        let grant: LoginGrant = self
            .fetch(self.request(Method::POST, "/api/account/login").json(&body))
            .await?;
        let credential = Credential::new(grant.access_token.clone(), grant.nickname.clone());
        if let Err(err) = self.session.establish(credential) {
            // The in-memory session still works for this run.
            warn!("Failed to persist credential: {err:#}");
        }
        Ok(grant)
    }

    /// `POST /api/account/signup`.
    pub async fn signup(&self, form: &SignupForm) -> ApiResult<()> {
        self.execute(self.request(Method::POST, "/api/account/signup").json(form))
            .await?;
        info!(username = %form.username, "Account created");
        Ok(())
    }

    /// `GET /api/account/info`.
    pub async fn account_info(&self) -> ApiResult<AccountInfo> {
        self.fetch(self.request(Method::GET, "/api/account/info"))
            .await
    }
}

/// Whether `err` warrants sending the user to the login view.
pub fn requires_login(err: &ApiError) -> bool {
    err.is_auth_failure()
}
