use super::ChatApp;
use crate::models::chat::Role;
use ratatui::{
    layout::{ Alignment, Constraint, Direction, Layout, Rect },
    style::{ Color, Modifier, Style },
    text::{ Line, Span },
    widgets::{ Block, Paragraph, Wrap },
    Frame,
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

const EMPTY_STATE: &str =
    "Démarrez la conversation : posez une question sur une culture, une maladie, ou une pratique.";

pub fn draw(f: &mut Frame, app: &mut ChatApp) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ].as_ref()
        )
        .margin(1)
        .split(size);

    draw_messages(f, app, chunks[0]);
    draw_typing_indicator(f, app, chunks[1]);
    draw_input(f, app, chunks[2]);
    draw_hint(f, chunks[3]);
}

fn draw_messages(f: &mut Frame, app: &ChatApp, area: Rect) {
    if app.conversation.is_empty() {
        let prompt = Paragraph::new(EMPTY_STATE)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(prompt, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for message in &app.conversation.messages {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        let (style, alignment) = match message.role {
            Role::User =>
                (Style::default().fg(Color::Green).add_modifier(Modifier::BOLD), Alignment::Right),
            Role::Bot => (Style::default().fg(Color::White), Alignment::Left),
        };
        for text_line in message.text.lines() {
            lines.push(
                Line::from(Span::styled(text_line.to_string(), style)).alignment(alignment)
            );
        }
    }

    // Pinned to the bottom unless the user scrolled up; app.scroll counts
    // lines up from the latest message.
    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(area.height);
    let offset = max_scroll.saturating_sub(app.scroll.min(max_scroll));

    let msgs = Paragraph::new(lines)
        .block(Block::default())
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    f.render_widget(msgs, area);
}

fn draw_typing_indicator(f: &mut Frame, app: &ChatApp, area: Rect) {
    if !app.loading {
        return;
    }
    let frame = SPINNER_FRAMES[app.spinner_idx % SPINNER_FRAMES.len()];
    let line = Line::from(
        vec![
            Span::styled(frame, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled("Agrosys écrit...", Style::default().fg(Color::DarkGray))
        ]
    );
    f.render_widget(Paragraph::new(line), area);
}

fn draw_input(f: &mut Frame, app: &ChatApp, area: Rect) {
    let separator = "─".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(
            Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray)))
        ),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        }
    );

    let display: String = app.input.replace('\n', " ⏎ ");
    let input = Line::from(
        vec![
            Span::styled("→ ", Style::default().fg(Color::DarkGray)),
            Span::styled(display.clone(), Style::default().fg(Color::White))
        ]
    );

    let visible_width = area.width.saturating_sub(2);
    let text_width = display.chars().count() as u16;
    let scroll_offset = text_width.saturating_sub(visible_width);

    f.render_widget(Paragraph::new(input).scroll((0, scroll_offset)), Rect {
        x: area.x,
        y: area.y + 1,
        width: area.width,
        height: area.height.saturating_sub(1),
    });
}

fn draw_hint(f: &mut Frame, area: Rect) {
    let hint = Line::from(
        Span::styled(
            "Entrée: envoyer | Maj+Entrée: nouvelle ligne | Échap: quitter",
            Style::default().fg(Color::DarkGray)
        )
    );
    f.render_widget(Paragraph::new(hint), area);
}
