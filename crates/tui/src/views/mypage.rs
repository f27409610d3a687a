use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use steamdash_core::{api::requires_login, AccountInfo, Route};
use tracing::{error, info, warn};

use super::{Action, Ctx, WishListPanel};
use crate::fetch::{Request, Response};

/// `/mypage`: account details and the wishlist.
#[derive(Debug, Default)]
pub struct MyPageView {
    account: Option<AccountInfo>,
    panel: WishListPanel,
    loading: bool,
    error: Option<String>,
}

impl MyPageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self) -> Vec<Request> {
        self.loading = true;
        vec![Request::Profile]
    }

    pub fn is_loading(&self) -> bool {
        self.loading || self.panel.is_deleting()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('r') if !self.loading => {
                self.loading = true;
                self.error = None;
                Action::Fetch(Request::Profile)
            }
            _ => self.panel.handle_key(key),
        }
    }

    pub fn apply(&mut self, response: Response) -> Action {
        match response {
            Response::Profile(result) => {
                self.loading = false;
                match result {
                    Ok((account, entries)) => {
                        info!(entries = entries.len(), "Profile loaded");
                        self.account = Some(account);
                        self.panel.set_entries(entries);
                        self.error = None;
                        Action::None
                    }
                    Err(err) if requires_login(&err) => {
                        warn!("Profile rejected the credential, redirecting to login: {err}");
                        Action::Navigate(Route::Login)
                    }
                    Err(err) => {
                        error!("Profile fetch failed: {err}");
                        self.error = Some(err.user_message("내 정보를 불러오지 못했어요."));
                        Action::None
                    }
                }
            }
            Response::WishListDeleted(id, result) => self.panel.apply_delete(id, result),
            _ => Action::None,
        }
    }

    fn account_lines(&self, ctx: &Ctx) -> Vec<Line<'static>> {
        let theme = ctx.theme;
        if let Some(message) = &self.error {
            return vec![
                Line::from(Span::styled(message.clone(), Style::default().fg(theme.danger))),
                Line::from(Span::styled("r: 다시 시도", Style::default().fg(theme.muted))),
            ];
        }
        let Some(account) = &self.account else {
            return vec![Line::from(Span::styled(
                "불러오는 중...",
                Style::default().fg(theme.muted),
            ))];
        };
        let label = Style::default().fg(theme.muted);
        vec![
            Line::from(vec![
                Span::styled("닉네임  ", label),
                Span::styled(
                    account.nickname.clone(),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("아이디  ", label),
                Span::raw(account.username.clone()),
            ]),
            Line::from(vec![
                Span::styled("이메일  ", label),
                Span::raw(account.email.clone()),
            ]),
        ]
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(4)])
            .split(area);
        frame.render_widget(
            Paragraph::new(self.account_lines(ctx))
                .block(Block::default().borders(Borders::ALL).title("내 정보")),
            chunks[0],
        );
        self.panel.draw(frame, chunks[1], "내 위시리스트", ctx.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steamdash_core::{error::StatusCode, ApiError};

    fn account() -> AccountInfo {
        AccountInfo {
            account_id: 3,
            username: "gamer01".into(),
            nickname: "게이머".into(),
            email: "gamer@example.com".into(),
        }
    }

    #[test]
    fn auth_failure_redirects_to_login() {
        let mut view = MyPageView::new();
        view.mount();
        let action = view.apply(Response::Profile(Err(ApiError::Unauthorized {
            status: StatusCode::UNAUTHORIZED,
            message: String::new(),
        })));
        assert!(matches!(action, Action::Navigate(Route::Login)));
    }

    #[test]
    fn server_failure_stays_with_inline_error() {
        let mut view = MyPageView::new();
        view.mount();
        let action = view.apply(Response::Profile(Err(ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL".into(),
            message: String::new(),
        })));
        assert!(matches!(action, Action::None));
        assert_eq!(view.error.as_deref(), Some("내 정보를 불러오지 못했어요."));
        assert!(!view.is_loading());
    }

    #[test]
    fn loaded_profile_fills_account_and_wishlist() {
        let mut view = MyPageView::new();
        view.mount();
        view.apply(Response::Profile(Ok((account(), Vec::new()))));
        assert_eq!(view.account, Some(account()));
        assert!(view.panel.entries().is_empty());
        assert!(matches!(
            view.handle_key(KeyEvent::from(KeyCode::Char('r'))),
            Action::Fetch(Request::Profile)
        ));
    }
}
