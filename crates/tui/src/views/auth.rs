use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use steamdash_core::{Route, SignupForm};
use tracing::{info, warn};

use super::{Action, Ctx};
use crate::{
    fetch::{Request, Response},
    input::TextInput,
    theme::Theme,
};

const LOGIN_FAILED: &str = "로그인 실패";
const SIGNUP_FAILED: &str = "회원가입 실패";
const MISSING_FIELDS: &str = "모든 항목을 입력해주세요.";

/// Text fields followed by navigation links, with one focus cursor over
/// both.
struct Form {
    fields: Vec<TextInput>,
    links: Vec<(&'static str, Route)>,
    focus: usize,
    submitting: bool,
    error: Option<String>,
}

enum FormKey {
    Submit,
    Follow(Route),
    Handled,
}

impl Form {
    fn new(fields: Vec<TextInput>, links: Vec<(&'static str, Route)>) -> Self {
        Self {
            fields,
            links,
            focus: 0,
            submitting: false,
            error: None,
        }
    }

    fn slots(&self) -> usize {
        self.fields.len() + self.links.len()
    }

    fn values(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|field| {
                let value = field.value();
                if field.is_masked() {
                    value
                } else {
                    value.trim().to_string()
                }
            })
            .collect()
    }

    fn handle_key(&mut self, key: KeyEvent) -> FormKey {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.slots();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + self.slots() - 1) % self.slots();
            }
            KeyCode::Enter => {
                return match self.focus.checked_sub(self.fields.len()) {
                    Some(link) => FormKey::Follow(self.links[link].1),
                    None => FormKey::Submit,
                };
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.handle_key(key);
                }
            }
        }
        FormKey::Handled
    }

    /// Validate locally and mark the form as submitting.
    fn begin_submit(&mut self) -> Option<Vec<String>> {
        if self.submitting {
            return None;
        }
        let values = self.values();
        if values.iter().any(|value| value.is_empty()) {
            self.error = Some(MISSING_FIELDS.to_string());
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some(values)
    }

    fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = self
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| field.line(idx == self.focus, theme))
            .collect();
        lines.push(Line::default());
        for (offset, (label, _)) in self.links.iter().enumerate() {
            let focused = self.fields.len() + offset == self.focus;
            let style = if focused {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(theme.muted)
            };
            let marker = if focused { "▶ " } else { "  " };
            lines.push(Line::from(Span::styled(format!("{marker}{label}"), style)));
        }
        lines.push(Line::default());
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.danger),
            )));
        } else if self.submitting {
            lines.push(Line::from(Span::styled(
                "처리 중...",
                Style::default().fg(theme.muted),
            )));
        }
        lines
    }

    fn draw(&self, frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
        let height = (self.slots() + 6) as u16;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(60),
                Constraint::Percentage(20),
            ])
            .split(area);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(columns[1]);
        let form_area = rows[1];
        frame.render_widget(
            Paragraph::new(self.lines(theme)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.accent))
                    .title(title.to_string()),
            ),
            form_area,
        );
        if let Some(field) = self.fields.get(self.focus) {
            let inner = Rect {
                x: form_area.x + 1,
                y: form_area.y + 1,
                width: form_area.width.saturating_sub(2),
                height: form_area.height.saturating_sub(2),
            };
            field.place_cursor(frame, inner, self.focus as u16);
        }
    }
}

/// `/login`.
pub struct LoginView {
    form: Form,
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            form: Form::new(
                vec![TextInput::new("아이디"), TextInput::masked("비밀번호")],
                vec![
                    ("회원가입", Route::Signup),
                    ("로그인 없이 둘러보기", Route::Home),
                ],
            ),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.form.submitting
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match self.form.handle_key(key) {
            FormKey::Submit => match self.form.begin_submit() {
                Some(values) => {
                    let [username, password]: [String; 2] = match values.try_into() {
                        Ok(pair) => pair,
                        Err(_) => return Action::None,
                    };
                    info!(username = %username, "Logging in");
                    Action::Fetch(Request::Login { username, password })
                }
                None => Action::None,
            },
            FormKey::Follow(route) => Action::Navigate(route),
            FormKey::Handled => Action::None,
        }
    }

    pub fn apply(&mut self, response: Response) -> Action {
        let Response::LoggedIn(result) = response else {
            return Action::None;
        };
        self.form.submitting = false;
        match result {
            Ok(grant) => {
                info!(nickname = %grant.nickname, "Logged in");
                Action::Navigate(Route::Home)
            }
            Err(err) => {
                warn!("Login failed: {err}");
                self.form.fields[1].clear();
                self.form.error = Some(err.user_message(LOGIN_FAILED));
                Action::None
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        self.form.draw(frame, area, "로그인", ctx.theme);
    }
}

/// `/signup`.
pub struct SignupView {
    form: Form,
}

impl SignupView {
    pub fn new() -> Self {
        Self {
            form: Form::new(
                vec![
                    TextInput::new("아이디"),
                    TextInput::masked("비밀번호"),
                    TextInput::new("이메일"),
                    TextInput::new("닉네임"),
                ],
                vec![("로그인으로 돌아가기", Route::Login)],
            ),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.form.submitting
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match self.form.handle_key(key) {
            FormKey::Submit => match self.form.begin_submit() {
                Some(values) => {
                    let [username, password, email, nickname]: [String; 4] =
                        match values.try_into() {
                            Ok(fields) => fields,
                            Err(_) => return Action::None,
                        };
                    info!(username = %username, "Signing up");
                    Action::Fetch(Request::Signup(SignupForm {
                        username,
                        password,
                        email,
                        nickname,
                    }))
                }
                None => Action::None,
            },
            FormKey::Follow(route) => Action::Navigate(route),
            FormKey::Handled => Action::None,
        }
    }

    pub fn apply(&mut self, response: Response) -> Action {
        let Response::SignedUp(result) = response else {
            return Action::None;
        };
        self.form.submitting = false;
        match result {
            Ok(()) => {
                info!("Signed up");
                Action::Navigate(Route::Login)
            }
            Err(err) => {
                warn!("Signup failed: {err}");
                self.form.error = Some(err.user_message(SIGNUP_FAILED));
                Action::None
            }
        }
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, ctx: &Ctx) {
        self.form.draw(frame, area, "회원가입", ctx.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steamdash_core::{error::StatusCode, ApiError, LoginGrant};

    fn type_text(view: &mut LoginView, text: &str) {
        for ch in text.chars() {
            view.handle_key(KeyEvent::from(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn login_submits_trimmed_credentials_once() {
        let mut view = LoginView::new();
        type_text(&mut view, " gamer ");
        view.handle_key(KeyEvent::from(KeyCode::Tab));
        type_text(&mut view, "secret");

        let Action::Fetch(Request::Login { username, password }) =
            view.handle_key(KeyEvent::from(KeyCode::Enter))
        else {
            panic!("expected a login request");
        };
        assert_eq!(username, "gamer");
        assert_eq!(password, "secret");
        assert!(view.is_submitting());
        assert!(matches!(view.handle_key(KeyEvent::from(KeyCode::Enter)), Action::None));

        let action = view.apply(Response::LoggedIn(Ok(LoginGrant {
            access_token: "tok".into(),
            nickname: "게이머".into(),
        })));
        assert!(matches!(action, Action::Navigate(Route::Home)));
    }

    #[test]
    fn login_failure_uses_server_message_or_fallback() {
        let mut view = LoginView::new();
        type_text(&mut view, "gamer");
        view.handle_key(KeyEvent::from(KeyCode::Tab));
        type_text(&mut view, "wrong");
        view.handle_key(KeyEvent::from(KeyCode::Enter));
        view.apply(Response::LoggedIn(Err(ApiError::Unauthorized {
            status: StatusCode::UNAUTHORIZED,
            message: String::new(),
        })));
        assert_eq!(view.form.error.as_deref(), Some(LOGIN_FAILED));
        assert!(view.form.fields[1].is_empty());

        type_text(&mut view, "wrong");
        view.handle_key(KeyEvent::from(KeyCode::Enter));
        view.apply(Response::LoggedIn(Err(ApiError::Server {
            status: StatusCode::BAD_REQUEST,
            code: "INVALID_PASSWORD".into(),
            message: "비밀번호가 일치하지 않습니다.".into(),
        })));
        assert_eq!(view.form.error.as_deref(), Some("비밀번호가 일치하지 않습니다."));
    }

    #[test]
    fn empty_fields_are_not_sent() {
        let mut view = LoginView::new();
        assert!(matches!(view.handle_key(KeyEvent::from(KeyCode::Enter)), Action::None));
        assert_eq!(view.form.error.as_deref(), Some(MISSING_FIELDS));
        assert!(!view.is_submitting());
    }

    #[test]
    fn links_navigate() {
        let mut view = LoginView::new();
        view.handle_key(KeyEvent::from(KeyCode::Tab));
        view.handle_key(KeyEvent::from(KeyCode::Tab));
        assert!(matches!(
            view.handle_key(KeyEvent::from(KeyCode::Enter)),
            Action::Navigate(Route::Signup)
        ));
        view.handle_key(KeyEvent::from(KeyCode::Tab));
        assert!(matches!(
            view.handle_key(KeyEvent::from(KeyCode::Enter)),
            Action::Navigate(Route::Home)
        ));
    }

    #[test]
    fn signup_success_goes_to_login() {
        let mut view = SignupView::new();
        for (idx, text) in ["gamer", "secret", "gamer@example.com", "게이머"].iter().enumerate() {
            if idx > 0 {
                view.handle_key(KeyEvent::from(KeyCode::Tab));
            }
            for ch in text.chars() {
                view.handle_key(KeyEvent::from(KeyCode::Char(ch)));
            }
        }
        let Action::Fetch(Request::Signup(form)) = view.handle_key(KeyEvent::from(KeyCode::Enter))
        else {
            panic!("expected a signup request");
        };
        assert_eq!(form.email, "gamer@example.com");
        assert_eq!(form.nickname, "게이머");

        assert!(matches!(
            view.apply(Response::SignedUp(Ok(()))),
            Action::Navigate(Route::Login)
        ));
    }

    #[test]
    fn signup_failure_falls_back() {
        let mut view = SignupView::new();
        view.form.submitting = true;
        view.apply(Response::SignedUp(Err(ApiError::MissingData)));
        assert_eq!(view.form.error.as_deref(), Some(SIGNUP_FAILED));
        assert!(!view.is_submitting());
    }
}
