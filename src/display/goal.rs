//! Goal display formatting

use chrono::NaiveDate;

use crate::models::Goal;

use super::report::{format_bar, format_percentage};

/// Format goals (paired with their ids) with progress bars
pub fn format_goal_list(goals: &[(usize, Goal)], today: NaiveDate, symbol: &str) -> String {
    if goals.is_empty() {
        return "No financial goals set yet.\n".to_string();
    }

    let mut output = String::new();
    for (id, goal) in goals {
        let pct = goal.progress() * 100.0;
        let days = goal.days_left(today);
        let due = if goal.is_complete() {
            "completed".to_string()
        } else if days < 0 {
            format!("overdue by {} days", -days)
        } else {
            format!("{} days left", days)
        };

        output.push_str(&format!(
            "[{}] {} (due {}, {})\n",
            id,
            goal.name,
            goal.deadline.format("%Y-%m-%d"),
            due
        ));
        output.push_str(&format!(
            "    {} {:>6}  saved {} of {}, {} to go\n",
            format_bar(pct, 20),
            format_percentage(pct),
            goal.saved.format_with_symbol(symbol),
            goal.target.format_with_symbol(symbol),
            goal.remaining().format_with_symbol(symbol)
        ));
    }

    output
}
