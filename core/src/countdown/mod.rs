//! Countdown engine: turns a task's deadline and completion flag into display
//! text and a status. Every function takes `now` explicitly and never reads a
//! clock, so results are reproducible.

pub mod calculator;
pub mod classifier;
pub mod formatter;
pub mod render;

pub use calculator::{calculate, calculate_str, remaining, Countdown};
pub use classifier::{classify, TaskStatus};
pub use formatter::{format_countdown, reformat_legacy, relative_time};
pub use render::{render_task, render_tasks, TaskView};
