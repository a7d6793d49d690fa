use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};
use todobase_core::Task;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Task")]
    name: String,
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let rows = tasks.iter().map(|task| TaskRow {
        id: task.id,
        done: if task.is_completed { "✔" } else { "☐" },
        name: task.name.clone(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_message() {
        assert_eq!(render_tasks(&[]), "No tasks found.");
    }

    #[test]
    fn test_rows_show_state() {
        let out = render_tasks(&[
            Task { id: 1, name: "Buy milk".to_string(), is_completed: true },
            Task { id: 2, name: "Walk dog".to_string(), is_completed: false },
        ]);
        assert!(out.contains("Buy milk"));
        assert!(out.contains("Walk dog"));
        assert!(out.contains("✔"));
        assert!(out.contains("☐"));
    }
}
