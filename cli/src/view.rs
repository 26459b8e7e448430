use chrono::{DateTime, Local, Utc};
use eventbook_core::countdown::{reformat_legacy, relative_time, TaskStatus};
use eventbook_core::{
    parse_deadline, EventBook, EventBookSummary, Language, Priority, Task, TaskKind, TaskStats, TaskView,
};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TITLE_WIDTH: usize = 28;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    badge: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Book")]
    book: String,
    #[tabled(rename = "Pri")]
    priority: &'static str,
    #[tabled(rename = "Countdown")]
    countdown: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct BookRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tasks")]
    tasks: usize,
    #[tabled(rename = "Done")]
    done: usize,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn short_id(task: &Task) -> String {
    task.id.to_string()[..8].to_string()
}

pub fn priority_mark(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "H",
        Priority::Medium => "M",
        Priority::Low => "L",
    }
}

/// Glyph shown next to a task; recurring and plain pending tasks get none.
pub fn badge(status: Option<TaskStatus>) -> &'static str {
    match status {
        Some(TaskStatus::Completed) => "✔",
        Some(TaskStatus::Overdue) => "!",
        Some(TaskStatus::DueSoon) => "▲",
        Some(TaskStatus::Urgent) => "△",
        Some(TaskStatus::Pending) => "",
        None => "?",
    }
}

/// Cuts `text` to at most `width` terminal columns, counting CJK as two.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn book_name(books: &[EventBook], id: &str, language: Language) -> String {
    books
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.display_name(language).to_string())
        .unwrap_or_else(|| id.to_string())
}

pub fn task_table(tasks: &[Task], views: &[TaskView], books: &[EventBook], language: Language) -> String {
    let rows = tasks.iter().zip(views).map(|(task, view)| TaskRow {
        id: short_id(task),
        badge: badge(view.status),
        title: truncate(&task.title, TITLE_WIDTH),
        book: book_name(books, &task.event_book_id, language),
        priority: priority_mark(task.priority),
        countdown: view.countdown.clone(),
        status: view
            .status
            .map(|s| s.label(language).to_string())
            .unwrap_or_default(),
    });

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .to_string()
}

pub fn book_table(summaries: &[EventBookSummary], language: Language) -> String {
    let rows = summaries.iter().map(|s| BookRow {
        id: s.book.id.clone(),
        name: format!("{} {}", s.book.icon, s.book.display_name(language)),
        tasks: s.task_count,
        done: s.completed_count,
        description: s.book.display_description(language).to_string(),
    });

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .to_string()
}

fn stat_row(label: &str, value: impl ToString) -> [String; 2] {
    [label.to_string(), value.to_string()]
}

pub fn stats_table(stats: &TaskStats, language: Language) -> String {
    let mut builder = Builder::default();
    builder.push_record(stat_row(language.pick("全部", "Total"), stats.total));
    builder.push_record(stat_row(language.pick("待完成", "Pending"), stats.pending));
    builder.push_record(stat_row(language.pick("已完成", "Completed"), stats.completed));
    builder.push_record(stat_row(language.pick("已逾期", "Overdue"), stats.overdue));
    builder.push_record(stat_row(
        language.pick("即将到期", "Due soon"),
        stats.due_soon + stats.urgent,
    ));
    builder.push_record(stat_row(
        language.pick("完成率", "Completion"),
        format!("{}%", stats.completion_rate()),
    ));
    if stats.invalid > 0 {
        builder.push_record(stat_row(language.pick("日期无效", "Invalid date"), stats.invalid));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Multi-line detail view used by `show`.
pub fn task_detail(
    task: &Task,
    view: &TaskView,
    books: &[EventBook],
    now: DateTime<Utc>,
    language: Language,
) -> String {
    let label = |zh: &str, en: &str| format!("{:<12}", language.pick(zh, en));
    let mut lines = vec![
        format!("{}{}", label("标题", "Title"), task.title),
        format!("{}{}", label("编号", "ID"), task.id),
        format!("{}{}", label("事件簿", "Book"), book_name(books, &task.event_book_id, language)),
        format!("{}{}", label("倒计时", "Countdown"), view.countdown),
    ];
    if let Some(status) = view.status {
        lines.push(format!("{}{}", label("状态", "Status"), status.label(language)));
    }
    if let Some(deadline) = task.deadline.as_deref() {
        let shown = parse_deadline(deadline)
            .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| deadline.to_string());
        lines.push(format!("{}{}", label("截止", "Deadline"), shown));
    }
    if let TaskKind::Recurring { duration: Some(duration), .. } = &task.kind {
        lines.push(format!(
            "{}{}",
            label("时长", "Duration"),
            reformat_legacy(duration, language)
        ));
    }
    lines.push(format!("{}{}", label("优先级", "Priority"), priority_mark(task.priority)));
    if let Some(folder) = &task.folder {
        lines.push(format!("{}{}", label("文件夹", "Folder"), folder));
    }
    if task.notification_enabled {
        lines.push(format!("{}{}", label("提醒", "Notify"), language.pick("开", "on")));
    }
    if let Some(done_at) = task.completed_at {
        lines.push(format!(
            "{}{}",
            label("完成于", "Completed"),
            relative_time(done_at, now, language)
        ));
    }
    if !task.description.is_empty() {
        lines.push(String::new());
        lines.push(task.description.clone());
    }
    lines.join("\n")
}
