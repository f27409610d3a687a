use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use steamdash_core::{
    format::{target_kind_label, target_status_label, target_value_label},
    ApiResult, Route, WishListEntry,
};
use tracing::{error, info};

use super::{list_failure, step_cursor, Action, Ctx};
use crate::{
    fetch::{Request, Response},
    theme::Theme,
};

const EMPTY: &str = "위시리스트가 비어있습니다.";

/// Wishlist entries with selection and delete, shared by `/wishlist` and
/// `/mypage`.
#[derive(Debug, Default)]
pub struct WishListPanel {
    entries: Vec<WishListEntry>,
    cursor: usize,
    deleting: Option<u64>,
}

impl WishListPanel {
    pub fn entries(&self) -> &[WishListEntry] {
        &self.entries
    }

    pub fn set_entries(&mut self, entries: Vec<WishListEntry>) {
        self.entries = entries;
        self.cursor = step_cursor(self.cursor, 0, self.entries.len());
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = step_cursor(self.cursor, -1, self.entries.len());
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor = step_cursor(self.cursor, 1, self.entries.len());
                Action::None
            }
            KeyCode::Enter => match self.entries.get(self.cursor) {
                Some(entry) => Action::Navigate(Route::GameDetail(entry.app_id)),
                None => Action::None,
            },
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.deleting.is_some() {
                    return Action::None;
                }
                match self.entries.get(self.cursor) {
                    Some(entry) => {
                        self.deleting = Some(entry.wish_list_id);
                        Action::Fetch(Request::DeleteWishList(entry.wish_list_id))
                    }
                    None => Action::None,
                }
            }
            _ => Action::None,
        }
    }

    /// Absorb a delete result. The entry is removed only once the server
    /// confirmed it.
    pub fn apply_delete(&mut self, id: u64, result: ApiResult<()>) -> Action {
        if self.deleting == Some(id) {
            self.deleting = None;
        }
        match result {
            Ok(()) => {
                info!(wish_list_id = id, "Wishlist entry deleted");
                self.entries.retain(|entry| entry.wish_list_id != id);
                self.cursor = step_cursor(self.cursor, 0, self.entries.len());
                Action::None
            }
            Err(err) => {
                error!(wish_list_id = id, "Wishlist delete failed: {err}");
                Action::Status(format!("삭제 실패: {}", err.user_message("다시 시도해주세요.")))
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{title} ({})", self.entries.len()));
        if self.entries.is_empty() {
            frame.render_widget(
                Paragraph::new(EMPTY)
                    .style(Style::default().fg(theme.muted))
                    .block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| ListItem::new(entry_line(entry, self.deleting == Some(entry.wish_list_id), theme)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn entry_line(entry: &WishListEntry, deleting: bool, theme: &Theme) -> Line<'static> {
    let status_color = if entry.in_target_range {
        theme.success
    } else {
        theme.warning
    };
    let mut spans = vec![
        Span::styled(
            entry.game_name.clone(),
            Style::default()
                .fg(theme.primary_fg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} {}",
                target_kind_label(entry.target_type),
                target_value_label(entry.target_type, entry.target_value)
            ),
            Style::default().fg(theme.accent),
        ),
        Span::raw("  "),
        Span::styled(
            target_status_label(entry).to_string(),
            Style::default().fg(status_color),
        ),
    ];
    if deleting {
        spans.push(Span::styled(" 삭제 중...", Style::default().fg(theme.muted)));
    }
    Line::from(spans)
}

/// `/wishlist`.
#[derive(Debug, Default)]
pub struct WishListView {
    panel: WishListPanel,
    loading: bool,
}

impl WishListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self) -> Vec<Request> {
        self.loading = true;
        vec![Request::WishList]
    }

    pub fn is_loading(&self) -> bool {
        self.loading || self.panel.is_deleting()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('r') if !self.loading => {
                self.loading = true;
                Action::Fetch(Request::WishList)
            }
            _ => self.panel.handle_key(key),
        }
    }

    pub fn apply(&mut self, response: Response) -> Action {
        match response {
            Response::WishList(result) => {
                self.loading = false;
                match result {
                    Ok(entries) => {
                        info!(count = entries.len(), "Wishlist loaded");
                        self.panel.set_entries(entries);
                        Action::None
                    }
                    Err(err) => list_failure("위시리스트", &err),
                }
            }
            Response::WishListDeleted(id, result) => self.panel.apply_delete(id, result),
            _ => Action::None,
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        self.panel.draw(frame, area, "위시리스트", ctx.theme);
    }
}
