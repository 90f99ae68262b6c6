use crate::task::Task;
use crate::view::{self, Filter, Sort};

/// Ids of the tasks to display, in display order
pub fn visible_ids(tasks: &[Task], filter: Filter, sort: Sort) -> Vec<u64> {
    view::project(tasks, filter, sort)
        .into_iter()
        .map(|task| task.id)
        .collect()
}

/// Keep the previously selected task if it is still visible, otherwise stay
/// near the old row.
pub fn select_by_id(
    visible: &[u64],
    previous_id: Option<u64>,
    previous_pos: Option<usize>,
) -> Option<usize> {
    if visible.is_empty() {
        return None;
    }
    if let Some(id) = previous_id {
        if let Some(pos) = visible.iter().position(|candidate| *candidate == id) {
            return Some(pos);
        }
    }
    Some(previous_pos.unwrap_or(0).min(visible.len() - 1))
}

/// Rows `[start, end)` to draw so the selection stays on screen
pub fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

/// `(open, done)` counts over the whole store
pub fn completion_counts(tasks: &[Task]) -> (usize, usize) {
    let done = tasks.iter().filter(|task| task.completed).count();
    (tasks.len() - done, done)
}
