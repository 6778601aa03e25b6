use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::stat_bar::{filled_cells, StatBar};
use crate::theme::{ColorToken, Theme, FADED_ALPHA};

const LABEL_WIDTH: u16 = 6;
const VALUE_WIDTH: u16 = 5;
const BAR_CELL: &str = "█";

pub struct StatBarRowProps<'a> {
    pub bar: &'a StatBar,
    pub accent: Color,
    pub theme: &'a Theme,
}

/// One base stat: abbreviation, zero-padded value, animated fill.
#[derive(Default)]
pub struct StatBarRow;

impl StatBarRow {
    /// Filled and faded spans for a bar `width` cells wide.
    pub fn bar_line(bar: &StatBar, width: u16, accent: Color, theme: &Theme) -> Line<'static> {
        let (filled, _) = bar.segments();
        let cells = filled_cells(width, filled);
        let faded = theme.faded(accent, FADED_ALPHA);
        Line::from(vec![
            Span::styled(BAR_CELL.repeat(cells as usize), Style::default().fg(accent)),
            Span::styled(
                BAR_CELL.repeat(width.saturating_sub(cells) as usize),
                Style::default().fg(faded),
            ),
        ])
    }
}

impl Component<Action> for StatBarRow {
    type Props<'a> = StatBarRowProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.height == 0 || area.width <= LABEL_WIDTH + VALUE_WIDTH {
            return;
        }
        let [label_area, value_area, bar_area] = Layout::horizontal([
            Constraint::Length(LABEL_WIDTH),
            Constraint::Length(VALUE_WIDTH),
            Constraint::Min(1),
        ])
        .areas(Rect { height: 1, ..area });

        let label = Paragraph::new(props.bar.label()).style(
            Style::default()
                .fg(props.accent)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(label, label_area);

        let value = Paragraph::new(format!("{:03}", props.bar.value))
            .style(Style::default().fg(props.theme.color(ColorToken::GrayDark)));
        frame.render_widget(value, value_area);

        let bar = Self::bar_line(props.bar, bar_area.width, props.accent, props.theme);
        frame.render_widget(Paragraph::new(bar), bar_area);
    }
}
