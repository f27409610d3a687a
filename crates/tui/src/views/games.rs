use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use steamdash_core::{
    format::{discount_badge, original_price_label, price_label},
    Applied, Game, Genre, PagedCollection, Route,
};
use tracing::{info, warn};

use super::{list_failure, step_cursor, Action, Ctx};
use crate::{
    fetch::{Request, Response},
    theme::Theme,
};

const EMPTY: &str = "게임이 없습니다.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Genres,
    Games,
}

/// `/games`: genre filter and the paged game list.
pub struct GamesView {
    genres: Vec<Genre>,
    selected: BTreeSet<u64>,
    genre_cursor: usize,
    games: PagedCollection<Game>,
    cursor: usize,
    focus: Focus,
}

impl GamesView {
    pub fn new() -> Self {
        Self {
            genres: Vec::new(),
            selected: BTreeSet::new(),
            genre_cursor: 0,
            games: PagedCollection::games(),
            cursor: 0,
            focus: Focus::Games,
        }
    }

    pub fn mount(&mut self) -> Vec<Request> {
        vec![Request::Genres, self.reload()]
    }

    pub fn is_loading(&self) -> bool {
        self.games.is_loading()
    }

    fn genre_ids(&self) -> Vec<u64> {
        self.selected.iter().copied().collect()
    }

    /// Restart the list at page 0 for the current genre filter.
    fn reload(&mut self) -> Request {
        self.cursor = 0;
        Request::Games {
            ticket: self.games.reset(),
            genre_ids: self.genre_ids(),
        }
    }

    fn load_more(&mut self) -> Action {
        match self.games.load_more() {
            Some(ticket) => Action::Fetch(Request::Games {
                ticket,
                genre_ids: self.genre_ids(),
            }),
            None => Action::None,
        }
    }

    fn toggle_genre(&mut self) -> Action {
        let Some(genre) = self.genres.get(self.genre_cursor) else {
            return Action::None;
        };
        let id = genre.genre_id;
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        info!(genre_ids = ?self.selected, "Genre filter changed");
        Action::Fetch(self.reload())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match (self.focus, key.code) {
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => {
                self.focus = match self.focus {
                    Focus::Genres => Focus::Games,
                    Focus::Games => Focus::Genres,
                };
                Action::None
            }
            (_, KeyCode::Char('m')) => self.load_more(),
            (_, KeyCode::Char('r')) => Action::Fetch(self.reload()),
            (Focus::Genres, KeyCode::Left | KeyCode::Up) => {
                self.genre_cursor = step_cursor(self.genre_cursor, -1, self.genres.len());
                Action::None
            }
            (Focus::Genres, KeyCode::Right | KeyCode::Down) => {
                self.genre_cursor = step_cursor(self.genre_cursor, 1, self.genres.len());
                Action::None
            }
            (Focus::Genres, KeyCode::Char(' ') | KeyCode::Enter) => self.toggle_genre(),
            (Focus::Games, KeyCode::Up | KeyCode::Char('k')) => {
                self.cursor = step_cursor(self.cursor, -1, self.games.items().len());
                Action::None
            }
            (Focus::Games, KeyCode::Down | KeyCode::Char('j')) => {
                let len = self.games.items().len();
                self.cursor = step_cursor(self.cursor, 1, len);
                // Reaching the last row pulls the next page.
                if len > 0 && self.cursor + 1 == len {
                    return self.load_more();
                }
                Action::None
            }
            (Focus::Games, KeyCode::Enter) => match self.games.items().get(self.cursor) {
                Some(game) => Action::Navigate(Route::GameDetail(game.app_id)),
                None => Action::None,
            },
            _ => Action::None,
        }
    }

    pub fn apply(&mut self, response: Response) -> Action {
        match response {
            Response::Genres(Ok(genres)) => {
                self.genres = genres;
                self.genre_cursor = step_cursor(self.genre_cursor, 0, self.genres.len());
                Action::None
            }
            Response::Genres(Err(err)) => list_failure("장르", &err),
            Response::Games(ticket, Ok(batch)) => {
                let inconsistent = batch.iter().filter(|game| !game.is_consistent()).count();
                if inconsistent > 0 {
                    warn!(inconsistent, "Games with mismatched discount fields");
                }
                if self.games.complete(ticket, batch) == Applied::Merged {
                    info!(
                        page = ticket.page(),
                        total = self.games.items().len(),
                        "Games loaded"
                    );
                }
                Action::None
            }
            Response::Games(ticket, Err(err)) => {
                self.games.fail(ticket);
                list_failure("게임 목록", &err)
            }
            _ => Action::None,
        }
    }

    fn genre_line(&self, theme: &Theme) -> Line<'static> {
        let mut spans = Vec::new();
        for (idx, genre) in self.genres.iter().enumerate() {
            let selected = self.selected.contains(&genre.genre_id);
            let mut style = if selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            if self.focus == Focus::Genres && idx == self.genre_cursor {
                style = style.bg(theme.selection_bg).add_modifier(Modifier::UNDERLINED);
            }
            let mark = if selected { "■" } else { "□" };
            spans.push(Span::styled(format!("{mark} {}", genre.genre_name), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        let theme = ctx.theme;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(5)])
            .split(area);

        let genre_border = if self.focus == Focus::Genres {
            theme.accent
        } else {
            theme.muted
        };
        let genres = Paragraph::new(self.genre_line(theme))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(genre_border))
                    .title("장르"),
            );
        frame.render_widget(genres, chunks[0]);

        let title = if self.games.has_more() {
            format!("게임 ({}) · m: 더 보기", self.games.items().len())
        } else {
            format!("게임 ({})", self.games.items().len())
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        if self.games.is_empty() {
            let text = if self.games.is_loading() { "불러오는 중..." } else { EMPTY };
            frame.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(theme.muted))
                    .block(block),
                chunks[1],
            );
            return;
        }

        let items: Vec<ListItem> = self
            .games
            .items()
            .iter()
            .map(|game| ListItem::new(game_line(game, theme)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(theme.selection_bg))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        if self.focus == Focus::Games {
            state.select(Some(self.cursor));
        }
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }
}

/// One game row: name, discount badge, price and struck original price.
pub(crate) fn game_line(game: &Game, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(
        game.name.clone(),
        Style::default().fg(theme.primary_fg),
    )];
    if let Some(badge) = discount_badge(game) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            badge,
            Style::default()
                .fg(theme.success)
                .add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        price_label(game),
        Style::default().fg(theme.accent),
    ));
    if let Some(original) = original_price_label(game) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            original,
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::CROSSED_OUT),
        ));
    }
    Line::from(spans)
}
