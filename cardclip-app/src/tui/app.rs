use crate::tui::{
    inputs::{map_event, Action},
    views::{self, RightPane},
};
use cardclip_core::{scheduler::next_review_batch, Difficulty, Flashcard, Store};
use crossterm::{
    event::{self},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::Arc;
use tokio::runtime::Runtime;

const QUEUE_LIMIT: usize = 50;

pub struct TuiApp {
    pub store: Arc<dyn Store>,
    pub rt: Arc<Runtime>,
    queue: Vec<Flashcard>,
    sel: usize,
    idx: usize,
    reveal: bool,
    in_review: bool,
}

impl TuiApp {
    pub fn new(store: Arc<dyn Store>, rt: Arc<Runtime>) -> Self {
        Self {
            store,
            rt,
            queue: vec![],
            sel: 0,
            idx: 0,
            reveal: false,
            in_review: false,
        }
    }

    fn load_queue(&mut self) {
        let now = chrono::Utc::now();
        self.queue = self
            .rt
            .block_on(next_review_batch(&*self.store, now, QUEUE_LIMIT));
        self.sel = self.sel.min(self.queue.len().saturating_sub(1));
        self.idx = 0;
        self.reveal = false;
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        self.load_queue();

        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.mainloop(&mut terminal);

        disable_raw_mode().ok();
        let mut out: Stdout = std::io::stdout();
        execute!(out, LeaveAlternateScreen).ok();
        terminal.show_cursor().ok();

        res
    }

    fn grade(&mut self, difficulty: Difficulty) {
        if let Some(card) = self.queue.get(self.idx).cloned() {
            self.rt
                .block_on(self.store.save_review(card.id, difficulty))
                .ok();
            if self.idx + 1 < self.queue.len() {
                self.idx += 1;
                self.reveal = false;
            } else {
                self.in_review = false;
                self.load_queue();
            }
        }
    }

    fn mainloop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| {
                let right = if self.in_review {
                    if let Some(card) = self.queue.get(self.idx) {
                        RightPane::Card {
                            card,
                            reveal: self.reveal,
                        }
                    } else {
                        RightPane::Empty("Nothing due. Press r to refresh.")
                    }
                } else {
                    RightPane::Idle
                };
                views::draw_ui(f, f.size(), &self.queue, self.sel, right);
            })?;

            if event::poll(std::time::Duration::from_millis(100))? {
                let ev = event::read()?;
                let action = map_event(ev);
                match action {
                    Action::Quit => break,
                    Action::Up => {
                        if !self.in_review {
                            self.sel = self.sel.saturating_sub(1);
                        }
                    }
                    Action::Down => {
                        if !self.in_review && self.sel + 1 < self.queue.len() {
                            self.sel += 1;
                        }
                    }
                    Action::Enter => {
                        if !self.in_review && !self.queue.is_empty() {
                            self.in_review = true;
                            self.idx = 0;
                            self.reveal = false;
                        }
                    }
                    Action::ToggleReveal => {
                        if self.in_review {
                            self.reveal = !self.reveal;
                        }
                    }
                    Action::Skip => {
                        if self.in_review && self.idx + 1 < self.queue.len() {
                            self.idx += 1;
                            self.reveal = false;
                        }
                    }
                    Action::Refresh => {
                        if !self.in_review {
                            self.load_queue();
                        }
                    }
                    Action::GradeHard => {
                        if self.in_review {
                            self.grade(Difficulty::Hard);
                        }
                    }
                    Action::GradeMedium => {
                        if self.in_review {
                            self.grade(Difficulty::Medium);
                        }
                    }
                    Action::GradeEasy => {
                        if self.in_review {
                            self.grade(Difficulty::Easy);
                        }
                    }
                    Action::None => {}
                }
            }
        }
        Ok(())
    }
}
