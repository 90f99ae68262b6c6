//! Display projection: filter, then sort, into a fresh sequence.
//!
//! Nothing here mutates the store; callers get borrowed tasks in display
//! order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::Task;

/// Which tasks to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Incomplete];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Incomplete => "incomplete",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Incomplete => !task.completed,
        }
    }

    /// Next value in selector order, wrapping
    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Completed,
            Filter::Completed => Filter::Incomplete,
            Filter::Incomplete => Filter::All,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "completed" => Ok(Filter::Completed),
            "incomplete" => Ok(Filter::Incomplete),
            other => Err(Error::InvalidArgument(format!(
                "unknown filter '{other}' (expected all|completed|incomplete)"
            ))),
        }
    }
}

/// Display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sort {
    #[default]
    Date,
    Alphabetical,
}

impl Sort {
    pub const ALL: [Sort; 2] = [Sort::Date, Sort::Alphabetical];

    pub fn as_str(self) -> &'static str {
        match self {
            Sort::Date => "date",
            Sort::Alphabetical => "alphabetical",
        }
    }

    pub fn compare(self, left: &Task, right: &Task) -> Ordering {
        match self {
            Sort::Date => left.date.cmp(&right.date),
            Sort::Alphabetical => compare_text(&left.text, &right.text),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Sort::Date => Sort::Alphabetical,
            Sort::Alphabetical => Sort::Date,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sort {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Sort::Date),
            "alphabetical" => Ok(Sort::Alphabetical),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort '{other}' (expected date|alphabetical)"
            ))),
        }
    }
}

/// Filter `tasks`, then stable-sort the filtered copy
pub fn project(tasks: &[Task], filter: Filter, sort: Sort) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| filter.matches(task)).collect();
    visible.sort_by(|left, right| sort.compare(left, right));
    visible
}

/// Dictionary-style text order.
///
/// Letters compare case-insensitively first; on a full case-insensitive tie
/// the first case difference puts lowercase ahead, and code points decide
/// anything left.
pub fn compare_text(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (l, r) in left.chars().zip(right.chars()) {
        if l == r {
            continue;
        }
        match (l.is_lowercase(), r.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return l.cmp(&r),
        }
    }

    left.cmp(right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: u64, text: &str, completed: bool) -> Task {
        Task {
            id,
            text: text.to_string(),
            completed,
            date: Utc
                .timestamp_millis_opt(id as i64)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.text.clone()).collect()
    }

    #[test]
    fn filter_keeps_relative_order() {
        let tasks = vec![task(1, "x", true), task(2, "y", false), task(3, "z", true)];

        let completed = project(&tasks, Filter::Completed, Sort::Date);
        assert_eq!(texts(&completed), vec!["x", "z"]);

        let incomplete = project(&tasks, Filter::Incomplete, Sort::Date);
        assert_eq!(texts(&incomplete), vec!["y"]);

        assert_eq!(project(&tasks, Filter::All, Sort::Date).len(), 3);
    }

    #[test]
    fn sort_alphabetical_and_date() {
        let tasks = vec![
            task(1, "banana", false),
            task(2, "Apple", false),
            task(3, "cherry", false),
        ];

        let alpha = project(&tasks, Filter::All, Sort::Alphabetical);
        assert_eq!(texts(&alpha), vec!["Apple", "banana", "cherry"]);

        let by_date = project(&tasks, Filter::All, Sort::Date);
        assert_eq!(texts(&by_date), vec!["banana", "Apple", "cherry"]);
    }

    #[test]
    fn projection_does_not_reorder_source() {
        let tasks = vec![task(2, "b", false), task(1, "a", false)];
        let sorted = project(&tasks, Filter::All, Sort::Date);

        assert_eq!(texts(&sorted), vec!["a", "b"]);
        assert_eq!(tasks[0].text, "b");
    }

    #[test]
    fn date_ties_keep_filtered_order() {
        let mut zeta = task(5, "zeta", false);
        zeta.id = 7;
        let tasks = vec![zeta, task(5, "alpha", false)];

        let sorted = project(&tasks, Filter::All, Sort::Date);
        assert_eq!(texts(&sorted), vec!["zeta", "alpha"]);
    }

    #[test]
    fn text_order_is_case_insensitive_then_lowercase_first() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_text("a", "A"), Ordering::Less);
        assert_eq!(compare_text("abc", "abcd"), Ordering::Less);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn selectors_parse_and_cycle() {
        assert_eq!("Completed".parse::<Filter>().unwrap(), Filter::Completed);
        assert_eq!("alphabetical".parse::<Sort>().unwrap(), Sort::Alphabetical);
        assert!("done".parse::<Filter>().is_err());
        assert!("priority".parse::<Sort>().is_err());

        assert_eq!(Filter::Incomplete.next(), Filter::All);
        assert_eq!(Sort::Alphabetical.next(), Sort::Date);
        assert_eq!(Filter::default(), Filter::All);
        assert_eq!(Sort::default(), Sort::Date);
    }
}
