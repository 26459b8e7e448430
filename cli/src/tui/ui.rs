use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, BorderType, Paragraph, Row, Table, Wrap},
    Frame,
};
use eventbook_core::countdown::relative_time;
use eventbook_core::{Priority, StatusFilter, TaskStatus};

use crate::tui::app::{App, InputMode};
use crate::view::{badge, priority_mark, truncate};

const AMBER: Color = Color::Rgb(245, 158, 11);
const TITLE_WIDTH: usize = 32;

/// Row colour for each status; unrenderable tasks are dimmed.
pub fn status_color(status: Option<TaskStatus>) -> Color {
    match status {
        Some(TaskStatus::Overdue) => Color::Red,
        Some(TaskStatus::DueSoon) => AMBER,
        Some(TaskStatus::Urgent) => Color::Yellow,
        Some(TaskStatus::Completed) => Color::Green,
        Some(TaskStatus::Pending) => Color::Reset,
        None => Color::DarkGray,
    }
}

fn filter_label(app: &App) -> &'static str {
    let lang = app.language;
    match app.filter {
        StatusFilter::All => lang.pick("全部", "All"),
        StatusFilter::Pending => lang.pick("待完成", "Pending"),
        StatusFilter::Completed => lang.pick("已完成", "Completed"),
        StatusFilter::Overdue => lang.pick("已逾期", "Overdue"),
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Input / message
            Constraint::Length(1), // Footer
        ])
        .split(size);

    let title = format!(
        "EVENTBOOK · {} · {}",
        filter_label(app),
        app.rendered_at.with_timezone(&Local).format("%H:%M")
    );
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .split(main_chunks[1]);

    draw_task_list(f, app, content_chunks[0]);
    draw_detail_view(f, app, content_chunks[1]);
    draw_input_line(f, app, main_chunks[2]);

    let help = app.language.pick(
        "j/k 移动 | 空格 完成 | a 添加 | d 删除 | f 筛选 | l 语言 | r 刷新 | q 退出",
        "j/k: Navigate | space: Done | a: Add | d: Delete | f: Filter | l: Language | r: Reload | q: Quit",
    );
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_task_list(f: &mut Frame, app: &mut App, area: Rect) {
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .zip(&app.views)
        .map(|(task, view)| {
            let color = status_color(view.status);
            let priority_style = match task.priority {
                Priority::High => Style::default().fg(Color::Red),
                Priority::Medium => Style::default().fg(Color::Yellow),
                Priority::Low => Style::default().fg(Color::Green),
            };
            let title_style = if task.completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            Row::new(vec![
                Span::styled(badge(view.status), Style::default().fg(color)),
                Span::styled(priority_mark(task.priority), priority_style),
                Span::styled(view.countdown.clone(), Style::default().fg(color)),
                Span::styled(truncate(&task.title, TITLE_WIDTH), title_style),
            ])
        })
        .collect();

    let lang = app.language;
    let table = Table::new(
        rows,
        [
            Constraint::Length(2),  // Badge
            Constraint::Length(3),  // Priority
            Constraint::Length(18), // Countdown
            Constraint::Min(10),    // Title
        ],
    )
    .header(
        Row::new(vec!["", "Pr", lang.pick("倒计时", "Countdown"), lang.pick("任务", "Task")])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(
        Block::default()
            .title(lang.pick(" 任务 ", " Tasks "))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    let lang = app.language;
    let block = Block::default()
        .title(lang.pick(" 详情 ", " Detail "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    let Some((task, view)) = app.selected_task() else {
        f.render_widget(block, area);
        return;
    };

    let field = |label: &'static str, value: String, color: Color| {
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Blue)),
            Span::styled(value, Style::default().fg(color)),
        ])
    };

    let color = status_color(view.status);
    let mut detail_text = vec![
        Line::from(Span::styled(task.title.as_str(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        field(lang.pick("倒计时: ", "Countdown: "), view.countdown.clone(), color),
    ];
    if let Some(status) = view.status {
        detail_text.push(field(lang.pick("状态: ", "Status: "), status.label(lang).to_string(), color));
    }
    detail_text.push(field(
        lang.pick("事件簿: ", "Book: "),
        app.book_name(&task.event_book_id),
        Color::Reset,
    ));
    if let Some(folder) = &task.folder {
        detail_text.push(field(lang.pick("文件夹: ", "Folder: "), folder.clone(), Color::Reset));
    }
    if let Some(done_at) = task.completed_at {
        detail_text.push(field(
            lang.pick("完成于: ", "Completed: "),
            relative_time(done_at, app.rendered_at, lang),
            Color::Green,
        ));
    }
    detail_text.push(field("ID: ", task.id.to_string(), Color::DarkGray));

    if !task.description.is_empty() {
        detail_text.push(Line::from(""));
        detail_text.push(Line::from(task.description.as_str()));
    }

    let detail_block = Paragraph::new(detail_text)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(detail_block, area);
}

fn draw_input_line(f: &mut Frame, app: &App, area: Rect) {
    match app.input_mode {
        InputMode::Adding => {
            let prompt = "> ";
            let line = Paragraph::new(format!("{}{}", prompt, app.input))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(line, area);
            let before: String = app.input.chars().take(app.cursor_position).collect();
            let x = area.x + (prompt.len() + unicode_width::UnicodeWidthStr::width(before.as_str())) as u16;
            f.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
        InputMode::Normal => {
            if let Some(message) = &app.message {
                let line = Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red));
                f.render_widget(line, area);
            }
        }
    }
}
