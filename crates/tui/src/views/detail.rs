use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use steamdash_core::{
    format::{current_price_summary, target_kind_label},
    models::{latest_point, store_url},
    wishlist::{validate_target, ADDED_MESSAGE, ADD_FAILED_FALLBACK, TARGET_INPUT_HINT},
    Applied, PagedCollection, PriceHistoryPoint, TargetKind,
};
use tracing::{info, warn};

use super::{list_failure, Action, Ctx};
use crate::{
    chart,
    fetch::{Request, Response},
    input::TextInput,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Notice {
    Info(String),
    Error(String),
}

/// `/games/:appId`: price history and the wishlist form.
pub struct DetailView {
    app_id: u64,
    history: PagedCollection<PriceHistoryPoint>,
    kind: TargetKind,
    target: TextInput,
    editing: bool,
    submitting: bool,
    notice: Option<Notice>,
}

impl DetailView {
    pub fn new(app_id: u64) -> Self {
        Self {
            app_id,
            history: PagedCollection::time_series(),
            kind: TargetKind::Price,
            target: TextInput::new("목표 값"),
            editing: false,
            submitting: false,
            notice: None,
        }
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }

    pub fn mount(&mut self) -> Vec<Request> {
        vec![Request::PriceHistory {
            app_id: self.app_id,
            ticket: self.history.reset(),
        }]
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_loading(&self) -> bool {
        self.history.is_loading() || self.submitting
    }

    pub fn hints(&self, ctx: &Ctx) -> &'static str {
        if self.editing {
            "Enter: 추가  Esc: 입력 종료"
        } else if ctx.session.is_authenticated() {
            "m: 이전 데이터  t: 가격/할인율 전환  i: 목표 입력"
        } else {
            "m: 이전 데이터  l: 로그인하면 위시리스트에 추가할 수 있어요"
        }
    }

    fn submit(&mut self) -> Action {
        if self.submitting {
            return Action::None;
        }
        let latest = latest_point(self.history.items());
        match validate_target(self.app_id, self.kind, &self.target.value(), latest) {
            Ok(draft) => {
                self.submitting = true;
                self.notice = None;
                info!(app_id = self.app_id, kind = %draft.target_type, value = draft.target_value, "Submitting wishlist target");
                Action::Fetch(Request::AddWishList(draft))
            }
            Err(rejection) if rejection.is_silent() => Action::None,
            Err(rejection) => {
                self.notice = Some(Notice::Error(rejection.to_string()));
                Action::None
            }
        }
    }

    fn clear_error(&mut self) {
        if matches!(self.notice, Some(Notice::Error(_))) {
            self.notice = None;
        }
    }

    fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
        self.clear_error();
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &Ctx) -> Action {
        if self.editing {
            match key.code {
                KeyCode::Esc => self.editing = false,
                KeyCode::Enter => return self.submit(),
                KeyCode::Tab => self.toggle_kind(),
                _ => {
                    if self.target.handle_key(key) {
                        self.clear_error();
                    }
                }
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('m') => match self.history.load_more() {
                Some(ticket) => Action::Fetch(Request::PriceHistory {
                    app_id: self.app_id,
                    ticket,
                }),
                None => Action::None,
            },
            KeyCode::Char('t') if ctx.session.is_authenticated() => {
                self.toggle_kind();
                Action::None
            }
            KeyCode::Char('i') | KeyCode::Enter if ctx.session.is_authenticated() => {
                self.editing = true;
                Action::None
            }
            _ => Action::None,
        }
    }

    pub fn apply(&mut self, response: Response) -> Action {
        match response {
            Response::PriceHistory(ticket, Ok(batch)) => {
                if self.history.complete(ticket, batch) == Applied::Merged {
                    info!(
                        app_id = self.app_id,
                        page = ticket.page(),
                        total = self.history.items().len(),
                        "Price history loaded"
                    );
                }
                Action::None
            }
            Response::PriceHistory(ticket, Err(err)) => {
                self.history.fail(ticket);
                list_failure("가격 기록", &err)
            }
            Response::WishListAdded(result) => {
                self.submitting = false;
                match result {
                    Ok(()) => {
                        self.target.clear();
                        self.editing = false;
                        self.notice = Some(Notice::Info(ADDED_MESSAGE.to_string()));
                    }
                    Err(err) => {
                        warn!(app_id = self.app_id, "Wishlist target rejected: {err}");
                        self.notice = Some(Notice::Error(err.user_message(ADD_FAILED_FALLBACK)));
                    }
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn summary_lines(&self, ctx: &Ctx) -> Vec<Line<'static>> {
        let theme = ctx.theme;
        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("App {}", self.app_id),
                Style::default()
                    .fg(theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(store_url(self.app_id), Style::default().fg(theme.muted)),
        ])];
        if let Some(latest) = latest_point(self.history.items()) {
            lines.push(Line::from(vec![
                Span::raw("현재 가격: "),
                Span::styled(
                    current_price_summary(latest.price, latest.discount_percent),
                    Style::default().fg(theme.accent),
                ),
            ]));
        }
        lines
    }

    fn form_lines(&self, ctx: &Ctx) -> Vec<Line<'static>> {
        let theme = ctx.theme;
        if !ctx.session.is_authenticated() {
            return vec![Line::from(Span::styled(
                "로그인하면 위시리스트에 추가할 수 있어요. (l: 로그인)",
                Style::default().fg(theme.muted),
            ))];
        }

        let kinds: Vec<Span<'static>> = [TargetKind::Price, TargetKind::Discount]
            .into_iter()
            .flat_map(|kind| {
                let style = if kind == self.kind {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(theme.muted)
                };
                [
                    Span::styled(format!(" {} ", target_kind_label(kind)), style),
                    Span::raw(" "),
                ]
            })
            .collect();
        let mut lines = vec![
            Line::from(kinds),
            self.target.line(self.editing, theme),
        ];
        match &self.notice {
            Some(Notice::Info(text)) => lines.push(Line::from(Span::styled(
                text.clone(),
                Style::default().fg(theme.success),
            ))),
            Some(Notice::Error(text)) => lines.push(Line::from(Span::styled(
                text.clone(),
                Style::default().fg(theme.danger),
            ))),
            None if self.submitting => lines.push(Line::from(Span::styled(
                "추가하는 중...",
                Style::default().fg(theme.muted),
            ))),
            None if self.editing => lines.push(Line::from(Span::styled(
                TARGET_INPUT_HINT,
                Style::default().fg(theme.muted),
            ))),
            None => {}
        }
        lines
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(5),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(self.summary_lines(ctx)).block(Block::default().borders(Borders::ALL)),
            rows[0],
        );

        let charts = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        let points = self.history.items();
        let dates: Vec<&str> = points.iter().map(|point| point.snapshot_date.as_str()).collect();
        let prices: Vec<f64> = points.iter().map(|point| point.price as f64).collect();
        let discounts: Vec<f64> = points
            .iter()
            .map(|point| f64::from(point.discount_percent))
            .collect();
        let price_title = if self.history.has_more() {
            "가격 변동 · m: 이전 데이터 더 보기"
        } else {
            "가격 변동"
        };
        chart::render_series(frame, charts[0], price_title, "가격", &dates, &prices, ctx.theme);
        chart::render_series(frame, charts[1], "할인율 변동", "할인율", &dates, &discounts, ctx.theme);

        let form_area = rows[2];
        frame.render_widget(
            Paragraph::new(self.form_lines(ctx))
                .block(Block::default().borders(Borders::ALL).title("위시리스트")),
            form_area,
        );
        if self.editing {
            let inner = Rect {
                x: form_area.x + 1,
                y: form_area.y + 1,
                width: form_area.width.saturating_sub(2),
                height: form_area.height.saturating_sub(2),
            };
            self.target.place_cursor(frame, inner, 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use steamdash_core::{error::StatusCode, ApiError, Credential, Session};

    fn point(date: &str, price: i64, discount: i32) -> PriceHistoryPoint {
        PriceHistoryPoint {
            snapshot_date: date.to_string(),
            price,
            discount_percent: discount,
        }
    }

    fn signed_in() -> anyhow::Result<Session> {
        let session = Session::in_memory();
        session.establish(Credential::new("tok", "gamer"))?;
        Ok(session)
    }

    fn loaded(view: &mut DetailView) {
        let Request::PriceHistory { ticket, .. } = view.mount().remove(0) else {
            panic!("expected history request");
        };
        view.apply(Response::PriceHistory(
            ticket,
            Ok(vec![point("2024-05-01", 9000, 10), point("2024-04-01", 12_000, 0)]),
        ));
    }

    fn type_target(view: &mut DetailView, ctx: &Ctx, text: &str) {
        if !view.is_editing() {
            view.handle_key(KeyEvent::from(KeyCode::Char('i')), ctx);
        }
        for ch in text.chars() {
            view.handle_key(KeyEvent::from(KeyCode::Char(ch)), ctx);
        }
    }

    #[test]
    fn price_target_above_latest_is_rejected_inline() -> anyhow::Result<()> {
        let session = signed_in()?;
        let theme = Theme::default();
        let ctx = Ctx { session: &session, theme: &theme };
        let mut view = DetailView::new(570);
        loaded(&mut view);

        type_target(&mut view, &ctx, "10000");
        assert!(matches!(view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx), Action::None));
        match &view.notice {
            Some(Notice::Error(message)) => assert!(message.contains("9,000")),
            other => panic!("unexpected notice {other:?}"),
        }
        assert!(!view.submitting);
        Ok(())
    }

    #[test]
    fn accepted_target_is_sent_once_and_confirmed() -> anyhow::Result<()> {
        let session = signed_in()?;
        let theme = Theme::default();
        let ctx = Ctx { session: &session, theme: &theme };
        let mut view = DetailView::new(570);
        loaded(&mut view);

        type_target(&mut view, &ctx, "8000");
        let Action::Fetch(Request::AddWishList(draft)) =
            view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx)
        else {
            panic!("expected a submission");
        };
        assert_eq!(draft.target_value, 8000);
        assert!(matches!(view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx), Action::None));

        view.apply(Response::WishListAdded(Ok(())));
        assert_eq!(view.notice, Some(Notice::Info(ADDED_MESSAGE.to_string())));
        assert!(view.target.is_empty());
        assert!(!view.is_editing());
        Ok(())
    }

    #[test]
    fn discount_target_toggle_and_server_failure() -> anyhow::Result<()> {
        let session = signed_in()?;
        let theme = Theme::default();
        let ctx = Ctx { session: &session, theme: &theme };
        let mut view = DetailView::new(570);
        loaded(&mut view);

        view.handle_key(KeyEvent::from(KeyCode::Char('t')), &ctx);
        assert_eq!(view.kind, TargetKind::Discount);
        type_target(&mut view, &ctx, "10");
        view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx);
        assert!(matches!(&view.notice, Some(Notice::Error(message)) if message.contains("10%")));

        view.target.clear();
        type_target(&mut view, &ctx, "50");
        assert!(matches!(
            view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx),
            Action::Fetch(_)
        ));
        view.apply(Response::WishListAdded(Err(ApiError::Server {
            status: StatusCode::CONFLICT,
            code: "DUPLICATE".into(),
            message: String::new(),
        })));
        assert_eq!(view.notice, Some(Notice::Error(ADD_FAILED_FALLBACK.to_string())));
        assert!(!view.submitting);
        Ok(())
    }

    #[test]
    fn inline_error_clears_on_toggle_and_typing() -> anyhow::Result<()> {
        let session = signed_in()?;
        let theme = Theme::default();
        let ctx = Ctx { session: &session, theme: &theme };
        let mut view = DetailView::new(570);
        loaded(&mut view);

        type_target(&mut view, &ctx, "10000");
        view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx);
        assert!(matches!(view.notice, Some(Notice::Error(_))));
        view.handle_key(KeyEvent::from(KeyCode::Tab), &ctx);
        assert_eq!(view.kind, TargetKind::Discount);
        assert_eq!(view.notice, None);
        view.handle_key(KeyEvent::from(KeyCode::Tab), &ctx);

        view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx);
        assert!(matches!(view.notice, Some(Notice::Error(_))));
        view.handle_key(KeyEvent::from(KeyCode::Backspace), &ctx);
        assert_eq!(view.notice, None);

        type_target(&mut view, &ctx, "0");
        view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx);
        assert!(matches!(view.notice, Some(Notice::Error(_))));
        view.handle_key(KeyEvent::from(KeyCode::Esc), &ctx);
        view.handle_key(KeyEvent::from(KeyCode::Char('t')), &ctx);
        assert_eq!(view.kind, TargetKind::Discount);
        assert_eq!(view.notice, None);
        assert!(!view.submitting);
        Ok(())
    }

    #[test]
    fn form_is_hidden_when_signed_out() {
        let session = Session::in_memory();
        let theme = Theme::default();
        let ctx = Ctx { session: &session, theme: &theme };
        let mut view = DetailView::new(570);
        view.handle_key(KeyEvent::from(KeyCode::Char('i')), &ctx);
        assert!(!view.is_editing());
        let text: String = view.form_lines(&ctx)[0]
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();
        assert!(text.contains("로그인"));
    }

    #[test]
    fn empty_target_is_silently_ignored() -> anyhow::Result<()> {
        let session = signed_in()?;
        let theme = Theme::default();
        let ctx = Ctx { session: &session, theme: &theme };
        let mut view = DetailView::new(1);
        type_target(&mut view, &ctx, "   ");
        assert!(matches!(view.handle_key(KeyEvent::from(KeyCode::Enter), &ctx), Action::None));
        assert_eq!(view.notice, None);
        Ok(())
    }
}
