mod add_task_form;
mod selector_bar;
mod stats_bar;
mod task_list;
mod task_list_row;

pub use add_task_form::AddTaskForm;
pub use selector_bar::SelectorBar;
pub use stats_bar::StatsBar;
pub use task_list::TaskList;
pub use task_list_row::TaskListRow;
