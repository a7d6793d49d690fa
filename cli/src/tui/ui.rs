use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
    Frame,
};
use todobase_core::{TaskRepository, Theme};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode};

pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub muted: Color,
    pub done: Color,
    pub highlight: Color,
    pub error: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color::White,
            text: Color::Black,
            accent: Color::Blue,
            muted: Color::Gray,
            done: Color::Green,
            highlight: Color::Rgb(220, 225, 240),
            error: Color::Red,
        },
        Theme::Dark => Palette {
            background: Color::Rgb(24, 24, 32),
            text: Color::Rgb(230, 230, 230),
            accent: Color::Cyan,
            muted: Color::DarkGray,
            done: Color::LightGreen,
            highlight: Color::Rgb(60, 60, 80),
            error: Color::LightRed,
        },
    }
}

pub fn draw<R: TaskRepository + 'static>(f: &mut Frame, app: &mut App<R>) {
    let size = f.area();
    let p = palette(app.theme.theme());

    f.render_widget(
        Block::default().style(Style::default().bg(p.background).fg(p.text)),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Input
            Constraint::Min(1),    // List
            Constraint::Length(1), // Footer/Status
        ])
        .split(size);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("TODO LIST", Style::default().fg(p.accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  [{}]", app.theme.theme()), Style::default().fg(p.muted)),
    ]))
    .alignment(Alignment::Center)
    .block(panel(&p, ""));
    f.render_widget(header, chunks[0]);

    draw_input(f, app, &p, chunks[1]);
    draw_task_list(f, app, &p, chunks[2]);
    draw_footer(f, app, &p, chunks[3]);
}

fn panel(p: &Palette, title: &str) -> Block<'static> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.muted))
}

fn draw_input<R: TaskRepository + 'static>(f: &mut Frame, app: &App<R>, p: &Palette, area: Rect) {
    let draft = app.list.draft();
    let (text, style) = if draft.is_empty() && matches!(app.input_mode, InputMode::Normal) {
        ("What needs to be done?", Style::default().fg(p.muted))
    } else {
        (draft, Style::default().fg(p.text))
    };

    let mut block = panel(p, " New task ");
    if matches!(app.input_mode, InputMode::Adding) {
        block = block.border_style(Style::default().fg(p.accent));
    }
    f.render_widget(Paragraph::new(text).style(style).block(block), area);

    if let InputMode::Adding = app.input_mode {
        let before: String = draft.chars().take(app.cursor_position).collect();
        let x = area.x + 1 + before.width() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_task_list<R: TaskRepository + 'static>(
    f: &mut Frame,
    app: &mut App<R>,
    p: &Palette,
    area: Rect,
) {
    let rows: Vec<Row> = app.list.tasks().iter().map(|task| {
        let (icon, name_style, action) = if task.is_completed {
            (
                Span::styled("✔", Style::default().fg(p.done)),
                Style::default().fg(p.muted).add_modifier(Modifier::CROSSED_OUT),
                "Undo",
            )
        } else {
            (
                Span::styled("☐", Style::default().fg(p.text)),
                Style::default().fg(p.text).add_modifier(Modifier::BOLD),
                "Complete",
            )
        };

        Row::new(vec![
            icon,
            Span::styled(task.name.clone(), name_style),
            Span::styled(action, Style::default().fg(p.muted)),
        ])
    }).collect();

    let title = format!(" Tasks ({}) ", app.list.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Min(10),    // Name
            Constraint::Length(9),  // Action
        ],
    )
    .block(panel(p, &title))
    .row_highlight_style(Style::default().bg(p.highlight).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_footer<R: TaskRepository + 'static>(f: &mut Frame, app: &App<R>, p: &Palette, area: Rect) {
    let footer = match (&app.status, &app.input_mode) {
        (Some(status), _) => Paragraph::new(status.as_str()).style(Style::default().fg(p.error)),
        (None, InputMode::Adding) => Paragraph::new("Enter: Add | Esc: Back")
            .style(Style::default().fg(p.muted)),
        (None, InputMode::Normal) => Paragraph::new(
            "a: Add | Space: Done/Undo | d: Delete | t: Theme | r: Retry | R: Reload | q: Quit",
        )
        .style(Style::default().fg(p.muted)),
    };
    f.render_widget(footer.alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::tempdir;
    use todobase_core::{
        FilePreferenceStore, InMemoryTaskRepository, Task, TaskService, ThemeController,
    };
    use tokio::runtime::Runtime;

    fn screen(app: &mut App<InMemoryTaskRepository>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 14)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_tasks_and_placeholder() {
        let runtime = Runtime::new().unwrap();
        let dir = tempdir().unwrap();
        let service = TaskService::new(InMemoryTaskRepository::new());
        let theme = ThemeController::new(FilePreferenceStore::new(dir.path()));
        let mut app = App::new(service, theme, runtime.handle().clone());
        app.list.apply(todobase_core::Outcome::Loaded(vec![
            Task { id: 1, name: "Buy milk".to_string(), is_completed: true },
            Task { id: 2, name: "Walk dog".to_string(), is_completed: false },
        ]));

        let out = screen(&mut app);
        assert!(out.contains("TODO LIST"));
        assert!(out.contains("[light]"));
        assert!(out.contains("What needs to be done?"));
        assert!(out.contains("Buy milk"));
        assert!(out.contains("Undo"));
        assert!(out.contains("Complete"));
        assert!(out.contains("Tasks (2)"));
        assert!(out.contains("r: Retry"));
    }

    #[test]
    fn test_status_replaces_help() {
        let runtime = Runtime::new().unwrap();
        let dir = tempdir().unwrap();
        let service = TaskService::new(InMemoryTaskRepository::new());
        let theme = ThemeController::new(FilePreferenceStore::new(dir.path()));
        let mut app = App::new(service, theme, runtime.handle().clone());
        app.status = Some("Could not load tasks".to_string());
        app.toggle_theme();

        let out = screen(&mut app);
        assert!(out.contains("Could not load tasks"));
        assert!(out.contains("[dark]"));
        assert!(!out.contains("q: Quit"));
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(palette(Theme::Light).background, palette(Theme::Dark).background);
    }
}
