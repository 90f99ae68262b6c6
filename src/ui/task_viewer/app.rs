use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use crate::error::Result;
use crate::input::InputBuffer;
use crate::storage::KeyValueStore;
use crate::task::{Task, TaskStore};
use crate::view::{Filter, Sort};

use super::model;
use super::view;

const EVENT_POLL_MS: u64 = 200;

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Input,
    List,
}

#[derive(Default, Clone, Copy)]
struct Viewport {
    height: u16,
}

pub struct AppState<S> {
    pub(crate) store: TaskStore<S>,
    pub(crate) input: InputBuffer,
    pub(crate) filter: Filter,
    pub(crate) sort: Sort,
    pub(crate) visible: Vec<u64>,
    pub(crate) selected: Option<usize>,
    pub(crate) focus: Focus,
    pub(crate) show_help: bool,
    status_message: Option<String>,
    info_message: Option<String>,
    viewport: Viewport,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn new(store: TaskStore<S>, filter: Filter, sort: Sort) -> Self {
        let mut app = Self {
            store,
            input: InputBuffer::new(),
            filter,
            sort,
            visible: Vec::new(),
            selected: None,
            focus: Focus::Input,
            show_help: false,
            status_message: None,
            info_message: None,
            viewport: Viewport::default(),
        };
        app.refresh();
        app
    }

    /// Recompute the projection, keeping the selection by id
    fn refresh(&mut self) {
        let previous_id = self.selected_task().map(|task| task.id);
        let previous_pos = self.selected;
        self.visible = model::visible_ids(self.store.tasks(), self.filter, self.sort);
        self.selected = model::select_by_id(&self.visible, previous_id, previous_pos);
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        let id = self.visible.get(self.selected?)?;
        self.store.get(*id)
    }

    /// Tasks in display order
    pub(crate) fn visible_tasks(&self) -> Vec<&Task> {
        self.visible
            .iter()
            .filter_map(|id| self.store.get(*id))
            .collect()
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        self.info_message
            .as_ref()
            .map(|info| (info.clone(), StatusKind::Info))
    }

    pub(crate) fn footer_hint(&self) -> &'static str {
        match self.focus {
            Focus::Input => "type task  enter add  tab list  esc clear  ctrl-c quit",
            Focus::List => {
                "j/k move  space toggle  d delete  f filter  s sort  tab input  ? help  q quit"
            }
        }
    }

    pub(crate) fn task_count_summary(&self) -> String {
        let (open, done) = model::completion_counts(self.store.tasks());
        format!(
            "showing: {}  open: {open}  done: {done}",
            self.visible.len()
        )
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn update_viewport(&mut self, height: u16) {
        self.viewport = Viewport { height };
    }

    fn list_jump(&self) -> isize {
        let height = self.viewport.height.saturating_sub(9);
        (height / 2).max(1) as isize
    }

    fn move_selection(&mut self, delta: isize) {
        if self.visible.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let max = self.visible.len() as isize - 1;
        self.selected = Some((current + delta).clamp(0, max) as usize);
    }

    fn submit_input(&mut self) {
        match self.input.submit(&mut self.store) {
            Ok(Some(task)) => {
                self.refresh();
                if let Some(pos) = self.visible.iter().position(|id| *id == task.id) {
                    self.selected = Some(pos);
                }
                self.set_info(format!("added {}", task.text));
            }
            Ok(None) => self.set_info("nothing to add".to_string()),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id) else {
            self.set_error("no task selected".to_string());
            return;
        };
        match self.store.toggle_completion(id) {
            Ok(Some(task)) => {
                let verb = if task.completed { "completed" } else { "reopened" };
                self.refresh();
                self.set_info(format!("{verb} {}", task.text));
            }
            Ok(None) => self.refresh(),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id) else {
            self.set_error("no task selected".to_string());
            return;
        };
        match self.store.remove(id) {
            Ok(Some(task)) => {
                self.refresh();
                self.set_info(format!("deleted {}", task.text));
            }
            Ok(None) => self.refresh(),
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.refresh();
        self.set_info(format!("filter: {}", self.filter));
    }

    fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.refresh();
        self.set_info(format!("sort: {}", self.sort));
    }

    /// Apply one key press; returns true when the viewer should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::List => return self.handle_list_key(key),
        }
        false
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => self.input.pop(),
            KeyCode::Tab | KeyCode::Down => self.focus = Focus::List,
            KeyCode::Esc => {
                if self.input.is_empty() {
                    self.focus = Focus::List;
                } else {
                    self.input.clear();
                }
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(ch);
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('g') | KeyCode::Home => self.move_selection(isize::MIN / 2),
            KeyCode::Char('G') | KeyCode::End => self.move_selection(isize::MAX / 2),
            KeyCode::PageDown => self.move_selection(self.list_jump()),
            KeyCode::PageUp => self.move_selection(-self.list_jump()),
            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Tab | KeyCode::Char('i') | KeyCode::Char('a') => {
                self.focus = Focus::Input;
            }
            _ => {}
        }
        false
    }
}

pub fn run<S: KeyValueStore>(store: TaskStore<S>, filter: Filter, sort: Sort) -> Result<()> {
    let mut app = AppState::new(store, filter, sort);
    debug!(tasks = app.store.len(), "starting task viewer");
    run_terminal(&mut app)
}

fn run_terminal<S: KeyValueStore>(app: &mut AppState<S>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| {
                app.update_viewport(frame.size().height);
                view::render(frame, app);
            })?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}
