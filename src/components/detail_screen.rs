use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use super::{Component, StatBarRow, StatBarRowProps};
use crate::action::Action;
use crate::sprite;
use crate::sprite_backend::{self, Placement};
use crate::state::{AppState, DetailState};
use crate::theme::{ColorToken, Theme};

const CHEVRON_WIDTH: u16 = 3;
const MOVES_SHOWN: usize = 2;

pub struct DetailScreenProps<'a> {
    pub state: &'a AppState,
    pub theme: &'a Theme,
    pub is_focused: bool,
}

/// One Pokemon: artwork, types, about, flavor text and base stats.
///
/// Missing data never blocks the layout. Until the records arrive (or
/// when they fail) the name is blank and the stats show placeholders.
pub struct DetailScreen {
    stat_row: StatBarRow,
    status_bar: StatusBar,
}

impl Default for DetailScreen {
    fn default() -> Self {
        Self {
            stat_row: StatBarRow,
            status_bar: StatusBar::new(),
        }
    }
}

pub fn format_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_id(id: u16) -> String {
    format!("#{id:03}")
}

/// Tenths with a decimal comma, whole numbers without one: 69 -> "6,9".
pub fn format_tenths(value: u16, unit: &str) -> String {
    let (whole, tenth) = (value / 10, value % 10);
    if tenth == 0 {
        format!("{whole} {unit}")
    } else {
        format!("{whole},{tenth} {unit}")
    }
}

pub fn moves_text(moves: &[String]) -> String {
    moves
        .iter()
        .take(MOVES_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}

fn artwork_key(uri: &str, x: u16, y: u16, cols: u16, rows: u16) -> String {
    format!("{uri}@{x},{y}:{cols}x{rows}")
}

impl DetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn accent(detail: &DetailState, theme: &Theme) -> Color {
        match detail.detail.data() {
            Some(data) => theme.accent(data.type_names()),
            None => theme.color(ColorToken::Tint),
        }
    }

    fn render_header(
        frame: &mut Frame,
        area: Rect,
        detail: &DetailState,
        theme: &Theme,
        accent: Color,
    ) {
        let [back_area, name_area, shiny_area, id_area] = Layout::horizontal([
            Constraint::Length(8),
            Constraint::Min(1),
            Constraint::Length(12),
            Constraint::Length(6),
        ])
        .areas(area);

        let dim = Style::default().fg(theme.color(ColorToken::GrayMedium));
        frame.render_widget(Paragraph::new(" ← Esc").style(dim), back_area);

        let name = detail
            .detail
            .data()
            .map(|data| format_name(&data.name))
            .unwrap_or_default();
        let name =
            Paragraph::new(name).style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
        frame.render_widget(name, name_area);

        let switch = if detail.shiny { "[x]" } else { "[ ]" };
        let shiny = Paragraph::new(format!("Shiny {switch}"))
            .alignment(Alignment::Right)
            .style(if detail.shiny {
                Style::default().fg(accent)
            } else {
                dim
            });
        frame.render_widget(shiny, shiny_area);

        let id = Paragraph::new(format_id(detail.current_id()))
            .alignment(Alignment::Right)
            .style(
                Style::default()
                    .fg(theme.color(ColorToken::GrayDark))
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(id, id_area);
    }

    fn render_artwork_row(
        frame: &mut Frame,
        area: Rect,
        props: &DetailScreenProps<'_>,
        accent: Color,
    ) {
        let detail = &props.state.detail;
        let [prev_area, art_area, next_area] = Layout::horizontal([
            Constraint::Length(CHEVRON_WIDTH),
            Constraint::Min(1),
            Constraint::Length(CHEVRON_WIDTH),
        ])
        .areas(area);

        let chevron = Style::default().fg(accent).add_modifier(Modifier::BOLD);
        let middle = |rect: Rect| Rect {
            y: rect.y + rect.height / 2,
            height: rect.height.min(1),
            ..rect
        };
        if detail.nav.has_previous() {
            frame.render_widget(
                Paragraph::new("<").alignment(Alignment::Center).style(chevron),
                middle(prev_area),
            );
        }
        if detail.nav.has_next() {
            frame.render_widget(
                Paragraph::new(">").alignment(Alignment::Center).style(chevron),
                middle(next_area),
            );
        }

        Self::render_artwork(frame, art_area, props);
    }

    fn render_artwork(frame: &mut Frame, area: Rect, props: &DetailScreenProps<'_>) {
        let detail = &props.state.detail;
        if props.state.settings.artwork_enabled {
            if let Some(artwork) = detail.current_artwork() {
                let (cols, rows) = sprite::fit_cells(artwork, area.width, area.height);
                let x = area.x.saturating_add(area.width.saturating_sub(cols) / 2);
                let y = area.y.saturating_add(area.height.saturating_sub(rows) / 2);
                let key = artwork_key(&detail.artwork_uri(), x, y, cols, rows);
                if sprite_backend::artwork_placed(&key) {
                    return;
                }
                match sprite::kitty_sequence(artwork, cols, rows) {
                    Ok(sequence) => {
                        sprite_backend::place_artwork(Placement {
                            key,
                            x,
                            y,
                            sequence,
                        });
                        return;
                    }
                    Err(error) => {
                        tracing::warn!(%error, "artwork encode failed");
                    }
                }
            }
        }

        sprite_backend::clear_artwork();
        let text = if !props.state.settings.artwork_enabled {
            ""
        } else if detail.artwork_loading {
            "[loading artwork]"
        } else {
            "[no artwork]"
        };
        let placeholder = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(props.theme.color(ColorToken::GrayMedium)));
        let line = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(placeholder, line);
    }

    fn type_badges(detail: &DetailState, theme: &Theme) -> Line<'static> {
        let Some(data) = detail.detail.data() else {
            return Line::default();
        };
        let mut spans = Vec::new();
        for name in data.type_names() {
            let color = theme.type_color(name).unwrap_or(theme.color(ColorToken::Tint));
            spans.push(Span::styled(
                format!(" {} ", name.to_uppercase()),
                Style::default()
                    .bg(color)
                    .fg(theme.color(ColorToken::White))
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }
        spans.pop();
        Line::from(spans)
    }

    fn render_about(frame: &mut Frame, area: Rect, detail: &DetailState, theme: &Theme) {
        let columns = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

        let data = detail.detail.data();
        let cells = [
            ("Weight", data.map(|d| format_tenths(d.weight, "kg")).unwrap_or_default()),
            ("Size", data.map(|d| format_tenths(d.height, "m")).unwrap_or_default()),
            ("Moves", data.map(|d| moves_text(&d.moves)).unwrap_or_default()),
        ];

        let value_style = Style::default().fg(theme.color(ColorToken::GrayDark));
        let label_style = Style::default().fg(theme.color(ColorToken::GrayMedium));
        for ((label, value), column) in cells.into_iter().zip(columns.iter()) {
            let [value_area, label_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(*column);
            frame.render_widget(
                Paragraph::new(value).alignment(Alignment::Center).style(value_style),
                value_area,
            );
            frame.render_widget(
                Paragraph::new(label).alignment(Alignment::Center).style(label_style),
                label_area,
            );
        }
    }

    fn section_title(text: &str, accent: Color) -> Paragraph<'static> {
        Paragraph::new(text.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, props: &DetailScreenProps<'_>) {
        let theme = props.theme;
        let detail = &props.state.detail;
        let mut hints = vec![StatusBarHint::new("Esc", "Back")];
        if detail.nav.has_previous() || detail.nav.has_next() {
            hints.push(StatusBarHint::new("←/→", "Browse"));
        }
        hints.push(StatusBarHint::new("s", "Shiny"));
        if props.state.settings.sound_enabled && detail.cry_uri().is_some() {
            hints.push(StatusBarHint::new("p", "Cry"));
        }
        hints.push(StatusBarHint::new("q", "Quit"));

        let status = if let Some(error) = detail.error() {
            error.to_string()
        } else if detail.detail.is_loading() || detail.species.is_loading() {
            "Loading...".to_string()
        } else if detail.cry_playing {
            "♪".to_string()
        } else {
            props.state.message.clone().unwrap_or_default()
        };
        let status_color = if detail.error().is_some() {
            theme.color(ColorToken::Tint)
        } else {
            theme.color(ColorToken::GrayMedium)
        };
        let status_items = [StatusBarItem::span(Span::styled(
            status,
            Style::default().fg(status_color),
        ))];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(theme.color(ColorToken::GrayBackground)),
                fg: Some(theme.color(ColorToken::GrayDark)),
            },
            text: Style::default().fg(theme.color(ColorToken::GrayMedium)),
            hint_key: Style::default()
                .fg(theme.color(ColorToken::Tint))
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(theme.color(ColorToken::GrayMedium)),
            separator: Style::default().fg(theme.color(ColorToken::GrayMedium)),
        };
        let status_props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, status_props);
    }
}

impl Component<Action> for DetailScreen {
    type Props<'a> = DetailScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::DetailPrev),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::DetailNext),
            KeyCode::Char('s') => Some(Action::ShinyToggle),
            KeyCode::Char('p') | KeyCode::Char(' ') => Some(Action::PlayCry),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::DetailClose),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let theme = props.theme;
        let detail = &props.state.detail;
        let accent = Self::accent(detail, theme);

        let background = Block::default().style(
            Style::default()
                .bg(theme.color(ColorToken::GrayWhite))
                .fg(theme.color(ColorToken::GrayDark)),
        );
        frame.render_widget(background, area);

        let stat_rows = detail.stat_bars.len() as u16;
        let [header, artwork, types, about_title, about, flavor, stats_title, stats, footer] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(stat_rows),
                Constraint::Length(1),
            ])
            .areas(area);

        Self::render_header(frame, header, detail, theme, accent);
        Self::render_artwork_row(frame, artwork, &props, accent);

        frame.render_widget(
            Paragraph::new(Self::type_badges(detail, theme)).alignment(Alignment::Center),
            types,
        );

        frame.render_widget(Self::section_title("About", accent), about_title);
        Self::render_about(frame, about, detail, theme);

        let flavor_text = Paragraph::new(detail.flavor_text().unwrap_or_default())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(theme.color(ColorToken::GrayDark)));
        frame.render_widget(flavor_text, flavor.inner(ratatui::layout::Margin::new(2, 0)));

        frame.render_widget(Self::section_title("Base stats", accent), stats_title);
        let rows = Layout::vertical(vec![Constraint::Length(1); detail.stat_bars.len()])
            .split(stats.inner(ratatui::layout::Margin::new(2, 0)));
        for (bar, row) in detail.stat_bars.iter().zip(rows.iter()) {
            self.stat_row.render(
                frame,
                *row,
                StatBarRowProps { bar, accent, theme },
            );
        }

        self.render_footer(frame, footer, &props);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api;
    use crate::state::{BaseStat, Navigation, PokemonDetail, PokemonType, Screen, MAX_POKEMON_ID};
    use tui_dispatch::testing::*;
    use tui_dispatch::DataResource;

    fn pikachu() -> PokemonDetail {
        PokemonDetail {
            id: 25,
            name: "pikachu".into(),
            types: vec![PokemonType {
                slot: 1,
                name: "electric".into(),
            }],
            stats: vec![BaseStat {
                name: "special-defense".into(),
                value: 50,
            }],
            height: 4,
            weight: 60,
            moves: vec!["mega-punch".into(), "pay-day".into(), "thunder-punch".into()],
            cry_uri: None,
        }
    }

    fn detail_state(id: u16) -> AppState {
        let mut state = AppState {
            screen: Screen::Detail,
            ..Default::default()
        };
        state.settings.artwork_enabled = false;
        state.detail.nav = Navigation::new(id);
        state
    }

    fn render(state: &AppState) -> String {
        let mut render = RenderHarness::new(80, 30);
        let mut screen = DetailScreen::new();
        let theme = Theme::light();
        render.render_to_string_plain(|frame| {
            screen.render(
                frame,
                frame.area(),
                DetailScreenProps {
                    state,
                    theme: &theme,
                    is_focused: true,
                },
            );
        })
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_name("pikachu"), "Pikachu");
        assert_eq!(format_id(7), "#007");
        assert_eq!(format_id(1025), "#1025");
        assert_eq!(format_tenths(60, "kg"), "6 kg");
        assert_eq!(format_tenths(69, "kg"), "6,9 kg");
        assert_eq!(format_tenths(4, "m"), "0,4 m");
        assert_eq!(
            moves_text(&["mega-punch".into(), "pay-day".into(), "thunder".into()]),
            "mega-punch\npay-day"
        );
    }

    #[test]
    fn test_artwork_key_tracks_uri_and_geometry() {
        let uri = api::artwork_uri(25);
        let key = artwork_key(&uri, 4, 2, 20, 10);
        assert_eq!(key, artwork_key(&uri, 4, 2, 20, 10));
        assert_ne!(key, artwork_key(&uri, 5, 2, 20, 10));
        assert_ne!(key, artwork_key(&uri, 4, 2, 18, 9));
        assert_ne!(key, artwork_key(&api::shiny_artwork_uri(25), 4, 2, 20, 10));
    }

    #[test]
    fn test_render_loading_shows_placeholders() {
        let mut state = detail_state(25);
        state.detail.detail = DataResource::Loading;
        let output = render(&state);
        assert!(output.contains("#025"));
        assert!(output.contains("HP"));
        assert!(output.contains("001"));
        assert!(output.contains("Loading"));
    }

    #[test]
    fn test_render_loaded_detail() {
        let mut state = detail_state(25);
        state.detail.detail = DataResource::Loaded(pikachu());
        state.detail.stat_bars = vec![crate::stat_bar::StatBar::new("special-defense", 50)];
        let output = render(&state);
        assert!(output.contains("Pikachu"));
        assert!(output.contains("ELECTRIC"));
        assert!(output.contains("6 kg"));
        assert!(output.contains("0,4 m"));
        assert!(output.contains("SDEF"));
        assert!(output.contains("050"));
        assert!(!output.contains("Thunder-punch"));
    }

    #[test]
    fn test_failed_detail_renders_like_loading_with_footer_error() {
        let mut state = detail_state(25);
        state.detail.detail = DataResource::Failed("not found: /pokemon/25".into());
        let output = render(&state);
        assert!(output.contains("HP"));
        assert!(output.contains("not found"));
    }

    #[test]
    fn test_chevrons_hidden_at_bounds() {
        let has_prev = |output: &str| output.lines().any(|line| line.starts_with(" <"));
        let has_next = |output: &str| output.lines().any(|line| line.trim_end().ends_with('>'));

        let first = render(&detail_state(1));
        assert!(!has_prev(&first));
        assert!(has_next(&first));

        let last = render(&detail_state(MAX_POKEMON_ID));
        assert!(has_prev(&last));
        assert!(!has_next(&last));
    }

    #[test]
    fn test_arrow_keys_browse() {
        let mut screen = DetailScreen::new();
        let theme = Theme::light();
        let state = detail_state(25);
        let props = || DetailScreenProps {
            state: &state,
            theme: &theme,
            is_focused: true,
        };
        let actions: Vec<_> = screen
            .handle_event(&EventKind::Key(key("left")), props())
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailPrev);

        let actions: Vec<_> = screen
            .handle_event(&EventKind::Key(key("esc")), props())
            .into_iter()
            .collect();
        actions.assert_first(Action::DetailClose);
    }
}
