mod task_input;
mod tui;
mod view;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use eventbook_core::countdown::render_task;
use eventbook_core::input::parse_switch;
use eventbook_core::model::settings::Theme;
use eventbook_core::{
    render_tasks, AppConfig, EventBookRepository, EventBookService, FileEventBookRepository,
    FileSettingsRepository, FileTaskRepository, Language, SettingsRepository, SortStrategy,
    StatusFilter, TaskService,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventbook")]
#[command(about = "Deadline countdowns for your tasks, grouped into event books", long_about = None)]
struct Cli {
    /// Data directory (default: ~/.eventbook)
    #[arg(long, global = true, env = "EVENTBOOK_HOME")]
    data_dir: Option<PathBuf>,
    /// Display language: zh or en
    #[arg(long, global = true, env = "EVENTBOOK_LANG")]
    lang: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a task (usage: add Essay deadline:fri book:university pri:h)
    Add {
        /// Title words plus key:value metadata
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List tasks with their countdowns
    List {
        #[arg(long)]
        book: Option<String>,
        #[arg(long)]
        folder: Option<String>,
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        #[arg(long, value_enum, default_value_t = SortArg::Deadline)]
        sort: SortArg,
    },
    /// Change a task (usage: edit 3f2a New title pri:l deadline:+2d)
    Edit {
        id: String,
        /// New title words plus key:value metadata
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show one task (id prefix is enough)
    Show { id: String },
    /// Toggle completion of a task
    Done { id: String },
    /// Delete a task
    Rm { id: String },
    /// List event books
    Books,
    /// Create an event book
    BookAdd {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "📘")]
        icon: String,
        #[arg(long, default_value = "#3B82F6")]
        color: String,
    },
    /// Delete an empty event book
    BookRm { id: String },
    /// Task counters
    Stats,
    /// Show or change stored settings
    Config {
        #[arg(long)]
        language: Option<String>,
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        /// on/off
        #[arg(long)]
        notifications: Option<String>,
    },
    /// Open the Terminal User Interface
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Pending,
    Completed,
    Overdue,
}

impl From<FilterArg> for StatusFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => StatusFilter::All,
            FilterArg::Pending => StatusFilter::Pending,
            FilterArg::Completed => StatusFilter::Completed,
            FilterArg::Overdue => StatusFilter::Overdue,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Deadline,
    Priority,
}

impl From<SortArg> for SortStrategy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Deadline => SortStrategy::Deadline,
            SortArg::Priority => SortStrategy::Priority,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // The TUI owns the terminal; logs stay off there unless RUST_LOG is set.
    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_tracing(if interactive { "off" } else { "warn" });

    let config = AppConfig::load(cli.data_dir, cli.lang.as_deref())?;
    let language = config.language;
    debug!(data_dir = %config.data_dir.display(), language = %language, "configuration loaded");
    let service = TaskService::new(FileTaskRepository::new(config.base_dir())?);
    let books = FileEventBookRepository::new(config.base_dir())?;

    match cli.command {
        Some(Commands::Add { args }) => {
            let draft = task_input::build_task(&args)?;
            for warning in &draft.warnings {
                println!("Warning: {}", warning);
            }
            let book = books
                .get(&draft.task.event_book_id)?
                .ok_or_else(|| anyhow!("Event book '{}' not found", draft.task.event_book_id))?;

            let created = service.create_task(draft.task)?;
            let view = render_task(&created, Utc::now(), language)?;
            println!(
                "{} {} ({})",
                language.pick("已添加:", "Task added:"),
                created.title,
                view::short_id(&created)
            );
            println!("  {} · {}", book.display_name(language), view.countdown);
        }
        Some(Commands::List {
            book,
            folder,
            filter,
            sort,
        }) => {
            let now = Utc::now();
            let filter = StatusFilter::from(filter);
            let mut tasks = match (&book, &folder) {
                (Some(book), _) => service.list_by_event_book(book, sort.into())?,
                (None, Some(folder)) => service.list_by_folder(folder, sort.into())?,
                (None, None) => service.list_tasks(sort.into())?,
            };
            if let (Some(_), Some(folder)) = (&book, &folder) {
                tasks.retain(|t| t.folder.as_deref() == Some(folder.as_str()));
            }
            tasks.retain(|t| filter.matches(t, now));

            if tasks.is_empty() {
                println!("{}", language.pick("没有任务。", "No tasks found."));
            } else {
                let views = render_tasks(&tasks, now, language);
                println!("{}", view::task_table(&tasks, &views, &books.list()?, language));
            }
        }
        Some(Commands::Edit { id, args }) => {
            let mut task = service.find_by_prefix(&id)?;
            for warning in task_input::apply_edits(&mut task, &args)? {
                println!("Warning: {}", warning);
            }
            if books.get(&task.event_book_id)?.is_none() {
                return Err(anyhow!("Event book '{}' not found", task.event_book_id));
            }
            service.update_task(&task)?;
            let view = render_task(&task, Utc::now(), language)?;
            println!("{} {} · {}", language.pick("已更新:", "Updated:"), task.title, view.countdown);
        }
        Some(Commands::Show { id }) => {
            let now = Utc::now();
            let task = service.find_by_prefix(&id)?;
            let views = render_tasks(std::slice::from_ref(&task), now, language);
            let view = views
                .first()
                .ok_or_else(|| anyhow!("Could not render task {}", task.id))?;
            println!("{}", view::task_detail(&task, view, &books.list()?, now, language));
        }
        Some(Commands::Done { id }) => {
            let task = service.find_by_prefix(&id)?;
            let task = service.toggle_complete(&task.id)?;
            let state = if task.completed {
                language.pick("已完成", "Completed")
            } else {
                language.pick("待完成", "Pending")
            };
            println!("{} → {}", task.title, state);
        }
        Some(Commands::Rm { id }) => {
            let task = service.find_by_prefix(&id)?;
            service.delete_task(&task.id)?;
            println!("{} {}", language.pick("已删除:", "Deleted:"), task.title);
        }
        Some(Commands::Books) => {
            let book_service = EventBookService::new(books, FileTaskRepository::new(config.base_dir())?);
            println!("{}", view::book_table(&book_service.list_summaries()?, language));
        }
        Some(Commands::BookAdd {
            name,
            description,
            icon,
            color,
        }) => {
            let book_service = EventBookService::new(books, FileTaskRepository::new(config.base_dir())?);
            let book = book_service.create(&name, &description, &icon, &color)?;
            println!("{} {} ({})", language.pick("已创建:", "Created:"), book.name, book.id);
        }
        Some(Commands::BookRm { id }) => {
            let book_service = EventBookService::new(books, FileTaskRepository::new(config.base_dir())?);
            book_service.delete(&id)?;
            println!("{} {}", language.pick("已删除:", "Deleted:"), id);
        }
        Some(Commands::Stats) => {
            let stats = service.stats(Utc::now())?;
            println!("{}", view::stats_table(&stats, language));
        }
        Some(Commands::Config {
            language: new_language,
            theme,
            notifications,
        }) => {
            let repo = FileSettingsRepository::new(config.base_dir())?;
            let mut settings = config.settings.clone();
            let changed = new_language.is_some() || theme.is_some() || notifications.is_some();
            if let Some(code) = new_language {
                settings.language = code.parse::<Language>()?;
            }
            if let Some(theme) = theme {
                settings.theme = theme.into();
            }
            if let Some(value) = notifications {
                settings.notifications.enabled = parse_switch(&value)?;
            }
            if changed {
                repo.save(&settings)?;
            }
            println!("data dir:      {}", config.data_dir.display());
            println!("language:      {}", settings.language);
            println!("theme:         {:?}", settings.theme);
            println!(
                "notifications: {}",
                if settings.notifications.enabled { "on" } else { "off" }
            );
        }
        Some(Commands::Tui) | None => {
            tui::run(config)?;
        }
    }
    Ok(())
}
