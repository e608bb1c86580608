//! Result panel showing the outcome of the last submit attempt

use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{BoardingPass, ResultState};
use crate::tui::ui::Styles;

pub struct ResultPanel;

impl ResultPanel {
    /// Rows the panel needs for `result`
    pub fn height(result: Option<&ResultState>) -> u16 {
        match result {
            None => 0,
            Some(ResultState {
                boarding_pass: Some(_),
                ..
            }) => 10,
            Some(_) => 4,
        }
    }

    pub fn render(f: &mut Frame, area: Rect, result: &ResultState) {
        if area.height == 0 {
            return;
        }

        let (heading, style) = if result.success {
            ("✔ Success!", Styles::success())
        } else {
            ("✖ Error", Styles::error())
        };

        let mut lines = vec![
            Line::from(Span::styled(heading, style.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(result.message.clone(), style)),
        ];

        if let Some(ref pass) = result.boarding_pass {
            lines.extend(Self::pass_lines(pass));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style);

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    fn pass_lines(pass: &BoardingPass) -> Vec<Line<'static>> {
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<12}", label), Styles::inactive()),
                Span::raw(value),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field("Passenger", pass.passenger_name.clone()),
            field(
                "Flight",
                format!("{}  {} → {}", pass.flight_number, pass.departure, pass.arrival),
            ),
            field(
                "Date",
                format!("{}  boarding {}", pass.date.format("%Y-%m-%d"), pass.boarding_time),
            ),
            field("Seat / Gate", format!("{} / {}", pass.seat, pass.gate)),
        ];

        let reference = match pass.booking_reference {
            Some(ref booking) => format!("{}  ref {}", pass.pnr, booking),
            None => pass.pnr.clone(),
        };
        lines.push(field("PNR", reference));
        lines
    }
}
