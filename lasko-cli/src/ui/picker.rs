use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lasko::catalog::{muscle_groups, Debounce, ExerciseQuery};
use lasko::Exercise;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Result of a key press in the picker
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome {
    Chosen(Exercise),
    Cancelled,
}

/// Search-as-you-type state of the exercise picker. Typed text reaches the
/// filter only after the debounce delay.
pub struct PickerState {
    title: String,
    exercises: Vec<Exercise>,
    groups: Vec<String>,
    group: Option<usize>,
    input: String,
    query: ExerciseQuery,
    debounce: Debounce<String>,
    selected: usize,
}

impl PickerState {
    pub fn new(title: impl Into<String>, exercises: Vec<Exercise>, delay: Duration) -> Self {
        let groups = muscle_groups(&exercises);
        Self {
            title: title.into(),
            exercises,
            groups,
            group: None,
            input: String::new(),
            query: ExerciseQuery::default(),
            debounce: Debounce::new(delay),
            selected: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn query(&self) -> &ExerciseQuery {
        &self.query
    }

    pub fn filtered(&self) -> Vec<&Exercise> {
        self.query.apply(&self.exercises)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Apply the search text once the user stopped typing
    pub fn tick(&mut self, now: Instant) {
        if let Some(text) = self.debounce.poll(now) {
            self.query.search = Some(text);
            self.selected = 0;
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, now: Instant) -> Option<PickerOutcome> {
        match key {
            KeyCode::Esc => return Some(PickerOutcome::Cancelled),
            KeyCode::Enter => {
                // Pending text is applied first so Enter picks from what was typed
                if let Some(text) = self.debounce.flush() {
                    self.query.search = Some(text);
                    self.selected = 0;
                }
                return self
                    .filtered()
                    .get(self.selected)
                    .map(|exercise| PickerOutcome::Chosen((*exercise).clone()));
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.debounce.push(self.input.clone(), now);
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.debounce.push(self.input.clone(), now);
            }
            KeyCode::Tab => self.cycle_group(),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                let last = self.filtered().len().saturating_sub(1);
                if self.selected < last {
                    self.selected += 1;
                }
            }
            _ => {}
        }
        None
    }

    /// All groups, then each muscle group in turn
    fn cycle_group(&mut self) {
        self.group = match self.group {
            None if !self.groups.is_empty() => Some(0),
            Some(i) if i + 1 < self.groups.len() => Some(i + 1),
            _ => None,
        };
        self.query.muscle_group = self.group.map(|i| self.groups[i].clone());
        self.selected = 0;
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(f.area());

        let group = self.query.muscle_group.as_deref().unwrap_or("all groups");
        let search = Paragraph::new(Line::from(vec![
            Span::raw(self.input.as_str()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} · {} ", self.title, group))
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(search, chunks[0]);

        let filtered = self.filtered();
        let items: Vec<ListItem> = filtered
            .iter()
            .map(|exercise| {
                let kind = exercise.exercise_type.as_deref().unwrap_or("");
                ListItem::new(Line::from(vec![
                    Span::raw(exercise.to_string()),
                    Span::styled(format!("  {}", kind), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} matches ", filtered.len())),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !filtered.is_empty() {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, chunks[1], &mut state);

        let help = Paragraph::new(
            "Type to search · Tab: muscle group · ↑/↓: move · Enter: pick · Esc: cancel",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, chunks[2]);
    }
}

/// Restores the terminal even when the picker loop bails out early
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("Failed to create terminal")?;
        Ok(Self { terminal })
    }

    fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to restore terminal")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Full-screen exercise search. `None` when the user cancels.
pub fn pick_exercise(
    title: &str,
    exercises: Vec<Exercise>,
    delay: Duration,
) -> Result<Option<Exercise>> {
    let mut state = PickerState::new(title, exercises, delay);
    let mut guard = TerminalGuard::enter()?;

    loop {
        state.tick(Instant::now());
        guard.terminal.draw(|f| state.render(f))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match state.handle_key(key.code, Instant::now()) {
                        Some(PickerOutcome::Chosen(exercise)) => return Ok(Some(exercise)),
                        Some(PickerOutcome::Cancelled) => return Ok(None),
                        None => {}
                    }
                }
            }
        }
    }
}
