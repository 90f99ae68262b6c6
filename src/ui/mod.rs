//! Interactive terminal front end.

pub mod task_viewer;
