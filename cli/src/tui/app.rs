use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use ratatui::widgets::TableState;
use todobase_core::{
    FilePreferenceStore, Outcome, RemoteError, Request, Task, TaskList, TaskRepository, TaskService,
    ThemeController,
};
use tokio::runtime::Handle;

pub enum InputMode {
    Normal,
    Adding,
}

/// A finished round trip, handed back to the draw loop.
pub struct Completion {
    pub request: Request,
    pub result: Result<Outcome, RemoteError>,
}

pub struct App<R: TaskRepository + 'static> {
    pub list: TaskList,
    pub theme: ThemeController<FilePreferenceStore>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
    last_failed: Option<Request>,
    service: Arc<TaskService<R>>,
    runtime: Handle,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: usize,
}

impl<R: TaskRepository + 'static> App<R> {
    pub fn new(
        service: TaskService<R>,
        theme: ThemeController<FilePreferenceStore>,
        runtime: Handle,
    ) -> App<R> {
        let (sender, receiver) = mpsc::channel();
        App {
            list: TaskList::new(),
            theme,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
            last_failed: None,
            service: Arc::new(service),
            runtime,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn service(&self) -> &TaskService<R> {
        &self.service
    }

    /// Initial fetch. Runs once, when the screen opens.
    pub fn mount(&mut self) {
        self.dispatch(Request::Load);
    }

    /// Fire `request` without waiting. Overlapping requests are allowed;
    /// results are merged in the order they come back.
    fn dispatch(&mut self, request: Request) {
        self.in_flight += 1;
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result = service.execute(&request).await;
            // The receiver is gone once the UI has quit.
            let _ = sender.send(Completion { request, result });
        });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Merge every completion that has arrived since the last tick.
    pub fn poll_completions(&mut self) {
        while let Ok(completion) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.handle_completion(completion);
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion.result {
            Ok(outcome) => {
                self.list.apply(outcome);
                self.status = None;
                self.last_failed = None;
            }
            Err(err) => {
                self.status = Some(format!(
                    "Could not {}: {} (r: retry)",
                    completion.request.describe(),
                    err
                ));
                self.last_failed = Some(completion.request);
            }
        }
        self.clamp_selection();
        self.clamp_cursor();
    }

    pub fn retry(&mut self) {
        if let Some(request) = self.last_failed.take() {
            tracing::info!(request = %request.describe(), "retrying");
            self.dispatch(request);
        }
    }

    pub fn reload(&mut self) {
        self.dispatch(Request::Load);
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.list.tasks().get(i))
    }

    pub fn next(&mut self) {
        if self.list.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.list.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.list.is_empty() { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.list.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn toggle_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            let request = self.list.toggle_request(task.id, task.is_completed);
            self.dispatch(request);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(task) = self.selected_task() {
            let request = self.list.delete_request(task.id);
            self.dispatch(request);
        }
    }

    pub fn toggle_theme(&mut self) {
        if let Err(err) = self.theme.toggle() {
            tracing::warn!(error = %err, "could not save theme");
            self.status = Some(format!("Could not save theme: {}", err));
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.list.len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        match self.state.selected() {
            None => self.state.select(Some(0)),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor_position = self.cursor_position.min(self.list.draft().chars().count());
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.cursor_position = self.list.draft().chars().count();
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.list.draft_mut().insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.list.draft_mut().remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.list.draft().chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.list.draft().chars().take(char_index).map(|c| c.len_utf8()).sum()
    }

    /// Sends the draft. A blank draft is left as is and nothing is sent.
    /// The draft is cleared when the insert comes back.
    pub fn submit_add(&mut self) {
        if let Some(request) = self.list.add_request() {
            self.dispatch(request);
        }
        self.exit_input_mode();
    }
}
