use crossterm::event::KeyCode;
use ratatui::{layout::Rect, style::Style, Frame};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::theme::{ColorToken, Theme};

const PLACEHOLDER: &str = "Search by name or number";

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub is_focused: bool,
    pub theme: &'a Theme,
    pub on_change: fn(String) -> Action,
}

/// Controlled search field. Every keystroke reports the full text; the
/// list filters on it immediately.
pub struct SearchBar {
    input: TextInput,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }
}

fn input_style(theme: &Theme) -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(theme.color(ColorToken::GrayBackground)),
            fg: Some(theme.color(ColorToken::GrayDark)),
        },
        placeholder_style: Some(Style::default().fg(theme.color(ColorToken::GrayMedium))),
        cursor_style: None,
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc | KeyCode::Down | KeyCode::Tab => return vec![Action::SearchBlur],
            _ => {}
        }
        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: true,
            style: input_style(props.theme),
            on_change: props.on_change,
            on_submit: |_| Action::SearchBlur,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: props.is_focused,
            style: input_style(props.theme),
            on_change: props.on_change,
            on_submit: |_| Action::SearchBlur,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, area, input_props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn props<'a>(query: &'a str, theme: &'a Theme, is_focused: bool) -> SearchBarProps<'a> {
        SearchBarProps {
            query,
            is_focused,
            theme,
            on_change: Action::SearchChange,
        }
    }

    #[test]
    fn test_typing_reports_full_text() {
        let mut bar = SearchBar::new();
        let theme = Theme::light();
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("p")), props("", &theme, true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchChange("p".into()));
    }

    #[test]
    fn test_escape_blurs() {
        let mut bar = SearchBar::new();
        let theme = Theme::light();
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("esc")), props("", &theme, true))
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchBlur);
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut bar = SearchBar::new();
        let theme = Theme::light();
        let actions: Vec<_> = bar
            .handle_event(&EventKind::Key(key("a")), props("", &theme, false))
            .into_iter()
            .collect();
        actions.assert_empty();
    }
}
