use ratatui::{
    Frame as TuiFrame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Canvas, Hud, Rgb};

/// Draws the game canvas with a header and a controls footer
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut TuiFrame, canvas: &Canvas, hud: &Hud<'_>, try_number: u32) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(hud, try_number), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        frame.render_widget(self.render_grid(canvas, hud), game_area);
        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, canvas: &Canvas, hud: &Hud<'_>) -> Paragraph<'static> {
        let lines: Vec<Line> = (0..canvas.grid_height())
            .map(|row| {
                let spans: Vec<Span> = (0..canvas.grid_width())
                    .map(|col| Self::cell_span(canvas.cell(col, row)))
                    .collect();
                Line::from(spans)
            })
            .collect();

        let (title, border_color) = if hud.game_over {
            (" GAME OVER ".to_string(), Color::Red)
        } else {
            (format!(" {} ", hud.title), Color::White)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    /// One grid cell, two columns wide so cells look square
    fn cell_span(color: Rgb) -> Span<'static> {
        if color == [0, 0, 0] {
            Span::styled(". ", Style::default().fg(Color::DarkGray))
        } else {
            let [r, g, b] = color;
            Span::styled("██", Style::default().fg(Color::Rgb(r, g, b)))
        }
    }

    fn render_stats(&self, hud: &Hud<'_>, try_number: u32) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Game: ", label),
            Span::styled(hud.title.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Try: ", label),
            Span::styled(try_number.to_string(), value),
            Span::raw("    "),
            Span::styled("Score: ", label),
            Span::styled(hud.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Reward: ", label),
            Span::styled(format!("{:.2}", hud.reward), value),
            Span::raw("    "),
            Span::styled("Tick: ", label),
            Span::styled(hud.tick.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" to wait | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
