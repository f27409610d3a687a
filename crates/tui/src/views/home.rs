use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use steamdash_core::{format::greeting, Applied, PagedCollection, SteamIndexPoint};
use tracing::{info, warn};

use super::{list_failure, Action, Ctx};
use crate::{
    chart,
    fetch::{Request, Response},
};

/// `/`: Steam price index trend.
pub struct HomeView {
    index: PagedCollection<SteamIndexPoint>,
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            index: PagedCollection::time_series(),
        }
    }

    pub fn mount(&mut self, ctx: &Ctx) -> Vec<Request> {
        let mut requests = vec![Request::IndexHistory {
            ticket: self.index.reset(),
        }];
        if ctx.session.is_authenticated() {
            requests.push(Request::AccountInfo);
        }
        requests
    }

    pub fn is_loading(&self) -> bool {
        self.index.is_loading()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('m') => match self.index.load_more() {
                Some(ticket) => Action::Fetch(Request::IndexHistory { ticket }),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    pub fn apply(&mut self, response: Response, ctx: &Ctx) -> Action {
        match response {
            Response::IndexHistory(ticket, Ok(batch)) => {
                if self.index.complete(ticket, batch) == Applied::Merged {
                    info!(
                        page = ticket.page(),
                        total = self.index.items().len(),
                        "Index history loaded"
                    );
                }
                Action::None
            }
            Response::IndexHistory(ticket, Err(err)) => {
                self.index.fail(ticket);
                list_failure("가격 지수", &err)
            }
            Response::AccountInfo(Ok(account)) => {
                if let Err(err) = ctx.session.update_nickname(&account.nickname) {
                    warn!("Failed to store nickname: {err:#}");
                }
                Action::None
            }
            Response::AccountInfo(Err(err)) => {
                warn!("Nickname refresh failed: {err}");
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(8)])
            .split(area);

        let theme = ctx.theme;
        let mut lines = Vec::new();
        match ctx.session.nickname() {
            Some(nickname) => {
                lines.push(Line::from(vec![
                    Span::styled(
                        greeting(&nickname),
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        "   g 게임 목록 · p 내 정보 · w 위시리스트 · o 로그아웃",
                        Style::default().fg(theme.muted),
                    ),
                ]));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "g 게임 목록 · l 로그인",
                    Style::default().fg(theme.muted),
                )));
            }
        }
        let header = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let points = self.index.items();
        let dates: Vec<&str> = points.iter().map(|point| point.record_date.as_str()).collect();
        let values: Vec<f64> = points.iter().map(|point| point.index_value).collect();
        let title = match points.last() {
            Some(latest) => format!(
                "Steam 가격 지수 · {:.2} ({}개 게임){}",
                latest.index_value,
                latest.total_game_count,
                if self.index.has_more() { " · m: 이전 데이터 더 보기" } else { "" }
            ),
            None => "Steam 가격 지수".to_string(),
        };
        chart::render_series(frame, chunks[1], &title, "지수", &dates, &values, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use steamdash_core::{Credential, Session};

    fn point(date: &str, value: f64) -> SteamIndexPoint {
        SteamIndexPoint {
            record_date: date.to_string(),
            index_value: value,
            total_game_count: 1200,
        }
    }

    #[test]
    fn mount_requests_nickname_only_when_signed_in() -> anyhow::Result<()> {
        let session = Session::in_memory();
        let theme = Theme::default();
        let ctx = Ctx {
            session: &session,
            theme: &theme,
        };
        let mut view = HomeView::new();
        assert_eq!(view.mount(&ctx).len(), 1);

        session.establish(Credential::new("tok", "gamer"))?;
        let mut view = HomeView::new();
        let requests = view.mount(&ctx);
        assert_eq!(requests.len(), 2);
        assert!(matches!(requests[1], Request::AccountInfo));
        Ok(())
    }

    #[test]
    fn older_index_pages_prepend() {
        let session = Session::in_memory();
        let theme = Theme::default();
        let ctx = Ctx {
            session: &session,
            theme: &theme,
        };
        let mut view = HomeView::new();
        let requests = view.mount(&ctx);
        let Request::IndexHistory { ticket } = requests[0].clone() else {
            panic!("expected index request");
        };
        let first: Vec<_> = (0..30).map(|day| point(&format!("2024-02-{:02}", day % 28 + 1), 100.0)).collect();
        view.apply(Response::IndexHistory(ticket, Ok(first)), &ctx);

        let Action::Fetch(Request::IndexHistory { ticket }) =
            view.handle_key(KeyEvent::from(KeyCode::Char('m')))
        else {
            panic!("expected a load-more request");
        };
        assert_eq!(ticket.page(), 1);
        view.apply(
            Response::IndexHistory(ticket, Ok(vec![point("2024-01-30", 99.0)])),
            &ctx,
        );
        assert_eq!(view.index.items()[0].record_date, "2024-01-30");
        assert!(!view.index.has_more());
        assert!(matches!(
            view.handle_key(KeyEvent::from(KeyCode::Char('m'))),
            Action::None
        ));
    }
}
