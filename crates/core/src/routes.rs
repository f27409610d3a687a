//! Route table of the dashboard. Unknown paths redirect home.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static GAME_DETAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/games/(\d+)$").expect("invalid game detail route regex"));

/// A view reachable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// `/`: index chart and greeting.
    #[default]
    Home,
    /// `/games`: game list with genre filter.
    Games,
    /// `/games/:appId`: price chart and wishlist form.
    GameDetail(u64),
    /// `/login`
    Login,
    /// `/signup`
    Signup,
    /// `/wishlist`: wishlist management.
    WishList,
    /// `/mypage`: account profile and wishlist.
    MyPage,
}

impl Route {
    /// Resolve `path`; anything unknown maps to [`Route::Home`].
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        match path {
            "/" => Route::Home,
            "/games" => Route::Games,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/wishlist" => Route::WishList,
            "/mypage" => Route::MyPage,
            other => GAME_DETAIL_RE
                .captures(other)
                .and_then(|caps| caps.get(1))
                .and_then(|app_id| app_id.as_str().parse().ok())
                .map(Route::GameDetail)
                .unwrap_or(Route::Home),
        }
    }

    /// Canonical path of the route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Games => "/games".to_string(),
            Route::GameDetail(app_id) => format!("/games/{app_id}"),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::WishList => "/wishlist".to_string(),
            Route::MyPage => "/mypage".to_string(),
        }
    }

    /// Short title used in the header bar.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Steam 가격 지수",
            Route::Games => "게임 목록",
            Route::GameDetail(_) => "가격 기록",
            Route::Login => "로그인",
            Route::Signup => "회원가입",
            Route::WishList => "내 위시리스트",
            Route::MyPage => "내 정보",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/games"), Route::Games);
        assert_eq!(Route::parse("/games/570"), Route::GameDetail(570));
        assert_eq!(Route::parse("/games/570/"), Route::GameDetail(570));
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/signup"), Route::Signup);
        assert_eq!(Route::parse("/wishlist"), Route::WishList);
        assert_eq!(Route::parse("/mypage?tab=1"), Route::MyPage);
    }

    #[test]
    fn unknown_paths_redirect_home() {
        assert_eq!(Route::parse("/nowhere"), Route::Home);
        assert_eq!(Route::parse("/games/abc"), Route::Home);
        assert_eq!(Route::parse("/games/570/reviews"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Home,
            Route::Games,
            Route::GameDetail(730),
            Route::Login,
            Route::Signup,
            Route::WishList,
            Route::MyPage,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
