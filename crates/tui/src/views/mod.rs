//! One view per route. Views own their state, translate keys into
//! [`Action`]s and absorb the [`Response`]s of the requests they issued.

mod auth;
mod detail;
mod games;
mod home;
mod mypage;
mod wishlist;

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use steamdash_core::{ApiError, Route, Session};
use tracing::error;

use crate::{
    fetch::{Request, Response},
    theme::Theme,
};

pub use auth::{LoginView, SignupView};
pub use detail::DetailView;
pub use games::GamesView;
pub use home::HomeView;
pub use mypage::MyPageView;
pub use wishlist::{WishListPanel, WishListView};

/// Shared, read-only state handed to views.
pub struct Ctx<'a> {
    pub session: &'a Session,
    pub theme: &'a Theme,
}

/// What a view asks the app to do next.
#[derive(Debug)]
pub enum Action {
    None,
    Navigate(Route),
    Fetch(Request),
    Status(String),
}

pub enum View {
    Home(HomeView),
    Games(GamesView),
    Detail(DetailView),
    WishList(WishListView),
    MyPage(MyPageView),
    Login(LoginView),
    Signup(SignupView),
}

impl View {
    /// Fresh, unloaded view for `route`.
    pub fn for_route(route: Route) -> Self {
        match route {
            Route::Home => View::Home(HomeView::new()),
            Route::Games => View::Games(GamesView::new()),
            Route::GameDetail(app_id) => View::Detail(DetailView::new(app_id)),
            Route::WishList => View::WishList(WishListView::new()),
            Route::MyPage => View::MyPage(MyPageView::new()),
            Route::Login => View::Login(LoginView::new()),
            Route::Signup => View::Signup(SignupView::new()),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            View::Home(_) => Route::Home,
            View::Games(_) => Route::Games,
            View::Detail(view) => Route::GameDetail(view.app_id()),
            View::WishList(_) => Route::WishList,
            View::MyPage(_) => Route::MyPage,
            View::Login(_) => Route::Login,
            View::Signup(_) => Route::Signup,
        }
    }

    /// Requests issued when the view is first shown.
    pub fn mount(&mut self, ctx: &Ctx) -> Vec<Request> {
        match self {
            View::Home(view) => view.mount(ctx),
            View::Games(view) => view.mount(),
            View::Detail(view) => view.mount(),
            View::WishList(view) => view.mount(),
            View::MyPage(view) => view.mount(),
            View::Login(_) | View::Signup(_) => Vec::new(),
        }
    }

    /// Whether printable keys go to a text field instead of global shortcuts.
    pub fn captures_text(&self) -> bool {
        match self {
            View::Login(_) | View::Signup(_) => true,
            View::Detail(view) => view.is_editing(),
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &Ctx) -> Action {
        match self {
            View::Home(view) => view.handle_key(key),
            View::Games(view) => view.handle_key(key),
            View::Detail(view) => view.handle_key(key, ctx),
            View::WishList(view) => view.handle_key(key),
            View::MyPage(view) => view.handle_key(key),
            View::Login(view) => view.handle_key(key),
            View::Signup(view) => view.handle_key(key),
        }
    }

    pub fn apply(&mut self, response: Response, ctx: &Ctx) -> Action {
        match self {
            View::Home(view) => view.apply(response, ctx),
            View::Games(view) => view.apply(response),
            View::Detail(view) => view.apply(response),
            View::WishList(view) => view.apply(response),
            View::MyPage(view) => view.apply(response),
            View::Login(view) => view.apply(response),
            View::Signup(view) => view.apply(response),
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        match self {
            View::Home(view) => view.draw(frame, area, ctx),
            View::Games(view) => view.draw(frame, area, ctx),
            View::Detail(view) => view.draw(frame, area, ctx),
            View::WishList(view) => view.draw(frame, area, ctx),
            View::MyPage(view) => view.draw(frame, area, ctx),
            View::Login(view) => view.draw(frame, area, ctx),
            View::Signup(view) => view.draw(frame, area, ctx),
        }
    }

    /// Key help for the status bar.
    pub fn hints(&self, ctx: &Ctx) -> &'static str {
        match self {
            View::Home(_) => "m: 이전 데이터 더 보기",
            View::Games(_) => "Tab: 장르/목록 전환  Space: 장르 선택  Enter: 상세  m: 더 보기",
            View::Detail(view) => view.hints(ctx),
            View::WishList(_) | View::MyPage(_) => "Enter: 게임 보기  d: 삭제  r: 새로고침",
            View::Login(_) | View::Signup(_) => "Tab: 다음 항목  Enter: 확인  Esc: 홈",
        }
    }

    /// Whether any request of the view is outstanding.
    pub fn is_loading(&self) -> bool {
        match self {
            View::Home(view) => view.is_loading(),
            View::Games(view) => view.is_loading(),
            View::Detail(view) => view.is_loading(),
            View::WishList(view) => view.is_loading(),
            View::MyPage(view) => view.is_loading(),
            View::Login(view) => view.is_submitting(),
            View::Signup(view) => view.is_submitting(),
        }
    }
}

/// Log a failed list fetch and report it in the status bar. The list keeps
/// its last-known contents.
pub(crate) fn list_failure(what: &str, err: &ApiError) -> Action {
    error!(what, "Fetch failed: {err}");
    let detail = err
        .server_message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    Action::Status(format!("{what} 불러오기 실패: {detail}"))
}

/// Clamp a list cursor after moving by `delta`.
pub(crate) fn step_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = cursor as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}
