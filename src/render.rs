use serde::Serialize;

use crate::tasks::{Task, TaskList};
use crate::tokens::{self, TokenLevel};

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to serialize json: {}", e),
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ErrorOut<'a> {
    pub code: &'a str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'a str>,
}

pub fn print_json_error(code: &str, message: &str, hint: Option<&str>) {
    let err = ErrorOut { code, message, hint };
    print_json(&err);
}

#[derive(Serialize, Debug, Clone)]
pub struct TokenReport {
    pub tokens: usize,
    pub level: TokenLevel,
    pub threshold: usize,
}

impl TokenReport {
    pub fn for_text(text: &str, threshold: usize) -> Self {
        let count = tokens::count(text);
        Self { tokens: count, level: TokenLevel::classify(count, threshold), threshold }
    }

    pub fn line(&self) -> String {
        match self.level {
            TokenLevel::High => format!("{} (high, over {})", tokens::format_badge(self.tokens), self.threshold),
            TokenLevel::Normal => tokens::format_badge(self.tokens),
        }
    }
}

pub fn task_line(task: &Task) -> String {
    let mark = if task.is_checked { 'x' } else { ' ' };
    format!("{:>3}. [{}] {}", task.index, mark, task.title)
}

pub fn render_task_list(list: &TaskList) {
    if list.is_empty() {
        println!("(no tasks found; expected lines like \"- [ ] Task description\")");
        return;
    }
    for task in list.tasks() {
        println!("{}", task_line(task));
    }
    println!("\n{}/{} done", list.checked_count(), list.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_line_marks_checked() {
        let task = Task {
            index: 2,
            title: "Ship it".into(),
            is_checked: true,
            original_line: "- [X] Ship it".into(),
            start_index: 0,
            end_index: 13,
        };
        assert_eq!(task_line(&task), "  2. [x] Ship it");
    }

    #[test]
    fn high_report_mentions_threshold() {
        let report = TokenReport { tokens: 40_000, level: TokenLevel::High, threshold: 30_000 };
        assert_eq!(report.line(), "Tokens: 40,000 (high, over 30000)");
    }
}
