use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use steamdash_core::{ApiClient, Route, Session};
use tokio::{spawn, sync::mpsc};
use tracing::{debug, info, warn};

use crate::{
    fetch::{Request, Response},
    theme::Theme,
    views::{Action, Ctx, View},
};

const TICK_RATE: Duration = Duration::from_millis(250);
const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

enum AppEvent {
    Input(Event),
    Tick,
    /// A request finished. `generation` names the view that issued it.
    Fetched { generation: u64, response: Response },
}

/// Terminal front end: owns the current view and routes requests and
/// responses between it and the API client.
pub struct App {
    client: ApiClient,
    session: Session,
    theme: Theme,
    view: View,
    generation: u64,
    status: String,
    spinner: usize,
    should_quit: bool,
    event_tx: Option<mpsc::Sender<AppEvent>>,
}

impl App {
    pub fn new(client: ApiClient, theme: Theme, theme_status: Option<String>) -> Self {
        let session = client.session().clone();
        Self {
            client,
            session,
            theme,
            view: View::for_route(Route::Home),
            generation: 0,
            status: theme_status.unwrap_or_default(),
            spinner: 0,
            should_quit: false,
            event_tx: None,
        }
    }

    pub async fn run(&mut self, start: Route) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);
        self.navigate(start);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) || self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    /// Tear down the current view and mount a fresh one for `route`.
    /// Responses still in flight for the old view are dropped on arrival.
    fn navigate(&mut self, route: Route) {
        self.generation += 1;
        info!(route = %route, generation = self.generation, "Navigate");
        self.view = View::for_route(route);
        let ctx = Ctx {
            session: &self.session,
            theme: &self.theme,
        };
        for request in self.view.mount(&ctx) {
            self.spawn_request(request);
        }
    }

    fn spawn_request(&self, request: Request) {
        let Some(sender) = self.event_tx.clone() else {
            warn!(request = request.label(), "No event loop, request dropped");
            return;
        };
        let client = self.client.clone();
        let generation = self.generation;
        debug!(request = request.label(), generation, "Spawning request");
        spawn(async move {
            let response = request.execute(&client).await;
            if sender
                .send(AppEvent::Fetched {
                    generation,
                    response,
                })
                .await
                .is_err()
            {
                debug!("Event loop closed before response arrived");
            }
        });
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Navigate(route) => self.navigate(route),
            Action::Fetch(request) => self.spawn_request(request),
            Action::Status(message) => self.status = message,
        }
    }

    fn logout(&mut self) {
        if let Err(err) = self.session.clear() {
            warn!("Failed to remove stored credential: {err:#}");
        }
        info!("Logged out");
        self.status = "로그아웃 되었어요.".to_string();
        self.navigate(Route::Home);
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if key.kind != KeyEventKind::Release {
                    self.handle_key(key);
                }
                true
            }
            Some(AppEvent::Input(_)) => true,
            Some(AppEvent::Tick) => {
                if self.view.is_loading() {
                    self.spinner = (self.spinner + 1) % SPINNER.len();
                }
                true
            }
            Some(AppEvent::Fetched {
                generation,
                response,
            }) => {
                if generation != self.generation {
                    debug!(
                        generation,
                        current = self.generation,
                        "Dropping response for a closed view"
                    );
                    return true;
                }
                let ctx = Ctx {
                    session: &self.session,
                    theme: &self.theme,
                };
                let action = self.view.apply(response, &ctx);
                self.apply_action(action);
                true
            }
            None => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.handle_global_shortcut(&key) {
            return;
        }
        let ctx = Ctx {
            session: &self.session,
            theme: &self.theme,
        };
        let action = self.view.handle_key(key, &ctx);
        self.apply_action(action);
    }

    fn handle_global_shortcut(&mut self, key: &KeyEvent) -> bool {
        let route = self.view.route();
        if self.view.captures_text() {
            // Text fields keep every key except leaving the form.
            if key.code == KeyCode::Esc && matches!(route, Route::Login | Route::Signup) {
                self.navigate(Route::Home);
                return true;
            }
            return false;
        }
        if !key.modifiers.is_empty() && key.modifiers != KeyModifiers::SHIFT {
            return false;
        }

        let signed_in = self.session.is_authenticated();
        let target = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('o') if signed_in => {
                self.logout();
                return true;
            }
            KeyCode::Esc => match route {
                Route::Home => return false,
                Route::GameDetail(_) => Route::Games,
                _ => Route::Home,
            },
            KeyCode::Char('h') => Route::Home,
            KeyCode::Char('g') => Route::Games,
            KeyCode::Char('w') if signed_in => Route::WishList,
            KeyCode::Char('p') if signed_in => Route::MyPage,
            KeyCode::Char('l') if !signed_in => Route::Login,
            _ => return false,
        };
        self.navigate(target);
        true
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, layout[0]);
        let ctx = Ctx {
            session: &self.session,
            theme: &self.theme,
        };
        self.view.draw(frame, layout[1], &ctx);
        self.render_status(frame, layout[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let route = self.view.route();
        let mut spans = vec![
            Span::styled(
                " Steam Tracker ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
            Span::raw(" "),
            Span::styled(
                route.title().to_string(),
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", route.path()), Style::default().fg(self.theme.muted)),
            Span::raw("   "),
        ];
        spans.push(Span::styled(
            self.nav_hint(),
            Style::default().fg(self.theme.muted),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Global shortcuts, limited to what the session allows.
    fn nav_hint(&self) -> &'static str {
        if self.session.is_authenticated() {
            "h 홈 · g 게임 · w 위시리스트 · p 내 정보 · o 로그아웃 · q 종료"
        } else {
            "h 홈 · g 게임 · l 로그인 · q 종료"
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let ctx = Ctx {
            session: &self.session,
            theme: &self.theme,
        };
        let mut spans = Vec::new();
        if self.view.is_loading() {
            spans.push(Span::styled(
                format!("{} ", SPINNER[self.spinner]),
                Style::default().fg(self.theme.accent),
            ));
        }
        if !self.status.is_empty() {
            spans.push(Span::styled(
                format!("{}  ", self.status),
                Style::default().fg(self.theme.warning),
            ));
        }
        spans.push(Span::styled(
            self.view.hints(&ctx),
            Style::default().fg(self.theme.muted),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use steamdash_core::{config::ApiConfig, Credential, Game, PagedCollection};

    fn app() -> Result<App> {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let client = ApiClient::new(&config, Session::in_memory())?;
        Ok(App::new(client, Theme::default(), None))
    }

    fn key(ch: char) -> Event {
        Event::Key(KeyEvent::from(KeyCode::Char(ch)))
    }

    fn game(app_id: u64) -> Game {
        Game {
            app_id,
            name: format!("Game {app_id}"),
            current_price: 1000,
            original_price: 1000,
            discount_percent: 0,
        }
    }

    #[test]
    fn identity_shortcuts_need_a_session() -> Result<()> {
        let mut app = app()?;
        app.process_app_event(Some(AppEvent::Input(key('w'))));
        assert_eq!(app.view.route(), Route::Home);
        app.process_app_event(Some(AppEvent::Input(key('l'))));
        assert_eq!(app.view.route(), Route::Login);

        app.session.establish(Credential::new("tok", "gamer"))?;
        app.navigate(Route::Home);
        app.process_app_event(Some(AppEvent::Input(key('w'))));
        assert_eq!(app.view.route(), Route::WishList);
        app.process_app_event(Some(AppEvent::Input(key('p'))));
        assert_eq!(app.view.route(), Route::MyPage);
        Ok(())
    }

    #[test]
    fn logout_clears_session_and_returns_home() -> Result<()> {
        let mut app = app()?;
        app.session.establish(Credential::new("tok", "gamer"))?;
        app.navigate(Route::MyPage);
        app.process_app_event(Some(AppEvent::Input(key('o'))));
        assert!(!app.session.is_authenticated());
        assert_eq!(app.view.route(), Route::Home);

        assert!(!app.nav_hint().contains("로그아웃"));
        assert!(app.nav_hint().contains("l 로그인"));

        let mut terminal = Terminal::new(TestBackend::new(100, 20))?;
        terminal.draw(|frame| app.draw(frame))?;
        Ok(())
    }

    #[test]
    fn text_fields_swallow_shortcuts() -> Result<()> {
        let mut app = app()?;
        app.navigate(Route::Login);
        app.process_app_event(Some(AppEvent::Input(key('q'))));
        assert!(!app.should_quit);
        assert_eq!(app.view.route(), Route::Login);
        app.process_app_event(Some(AppEvent::Input(Event::Key(KeyEvent::from(KeyCode::Esc)))));
        assert_eq!(app.view.route(), Route::Home);
        Ok(())
    }

    #[test]
    fn responses_for_closed_views_are_dropped() -> Result<()> {
        let mut app = app()?;
        app.navigate(Route::Games);
        let stale_generation = app.generation;
        app.navigate(Route::Games);

        let ticket = PagedCollection::<Game>::games().reset();
        app.process_app_event(Some(AppEvent::Fetched {
            generation: stale_generation,
            response: Response::Games(ticket, Ok(vec![game(1)])),
        }));
        assert!(app.view.is_loading());
        let mut terminal = Terminal::new(TestBackend::new(80, 20))?;
        terminal.draw(|frame| app.draw(frame))?;
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(!rendered.contains("Game 1"));
        Ok(())
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() -> Result<()> {
        let mut app = app()?;
        app.navigate(Route::Signup);
        app.process_app_event(Some(AppEvent::Input(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))));
        assert!(app.should_quit);
        Ok(())
    }
}
