//! Terminal workout screen: exercise list on the left, the running phase on
//! the right, cues and key help along the bottom.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use onerep::cues::Cue;
use onerep::exercise::ExerciseStatus;
use onerep::session::{CommitReport, SessionOrchestrator, SessionSnapshot, StageKind};

const RECENT_CUES: usize = 5;
const VALUE_STEP: f64 = 5.0;
const HELP: &str = "enter start | space pause | s skip | c complete | x stop | l log | r log+rest | \
                    R rest | n skip rest | +/- value | f failure | p partner | L log all | F finish | q quit";

struct RunApp {
    engine: SessionOrchestrator,
    snapshots: watch::Receiver<SessionSnapshot>,
    selected: usize,
    recent_cues: VecDeque<String>,
    status_message: String,
}

impl RunApp {
    fn new(engine: SessionOrchestrator) -> Self {
        let snapshots = engine.subscribe();
        RunApp {
            engine,
            snapshots,
            selected: 0,
            recent_cues: VecDeque::with_capacity(RECENT_CUES),
            status_message: "Pick an exercise with j/k and press enter".to_string(),
        }
    }

    fn push_cue(&mut self, cue: Cue) {
        if self.recent_cues.len() == RECENT_CUES {
            self.recent_cues.pop_back();
        }
        self.recent_cues.push_front(cue.to_string());
    }

    fn report(&mut self, report: Option<CommitReport>) {
        let Some(report) = report else {
            self.status_message = "Nothing to log yet".to_string();
            return;
        };
        self.status_message = format!(
            "Logged {} {}{}",
            report.entry.exercise_name,
            report.entry.value,
            if report.personal_record { " - new personal record!" } else { "" }
        );
        if let Some(err) = report.store_error {
            self.status_message.push_str(&format!(" (not saved: {err})"));
        }
    }

    /// Returns `false` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let snap = self.snapshots.borrow().clone();
        let value = snap.working_value.map(|v| v.amount()).unwrap_or(0.0);

        match key.code {
            KeyCode::Char('q') => {
                self.engine.stop_timer();
                return false;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < snap.exercises.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                if let Some(entry) = snap.exercises.get(self.selected) {
                    let id = entry.spec.id;
                    let started = match snap.stage {
                        StageKind::Idle => self.engine.start_exercise(id),
                        _ => self.engine.switch_to_exercise(id),
                    };
                    if started {
                        self.status_message = format!("Starting {}", entry.spec.name);
                    }
                }
            }
            KeyCode::Char(' ') => {
                self.engine.toggle_timer();
            }
            KeyCode::Char('s') => {
                self.engine.skip_phase();
            }
            KeyCode::Char('c') => {
                self.engine.complete_exercise();
            }
            KeyCode::Char('x') => {
                if self.engine.stop_timer() {
                    self.status_message = "Stopped".to_string();
                }
            }
            KeyCode::Char('l') => {
                let report = self.engine.log_set_and_finish(value, snap.reached_failure);
                self.report(report);
            }
            KeyCode::Char('r') => {
                let report = self.engine.log_set_to_history(value, snap.reached_failure);
                self.report(report);
            }
            KeyCode::Char('R') => {
                if self.engine.start_rest() {
                    self.status_message = "Resting without logging".to_string();
                }
            }
            KeyCode::Char('n') => {
                self.engine.skip_rest();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.engine.adjust_value(VALUE_STEP);
            }
            KeyCode::Char('-') => {
                self.engine.adjust_value(-VALUE_STEP);
            }
            KeyCode::Char('f') => {
                self.engine.set_reached_failure(!snap.reached_failure);
            }
            KeyCode::Char('p') => {
                if self.engine.switch_partner() {
                    self.selected = 0;
                }
            }
            KeyCode::Char('L') => {
                let reports = self.engine.log_all_completed();
                self.status_message = format!("Logged {} completed exercises", reports.len());
            }
            KeyCode::Char('F') => {
                self.engine.finish_workout();
                self.status_message = "Workout finished".to_string();
            }
            other => debug!("Unbound key {:?}", other),
        }
        true
    }

    fn draw(&self, frame: &mut Frame) {
        let snap = self.snapshots.borrow().clone();
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(RECENT_CUES as u16 + 2),
            Constraint::Length(4),
        ])
        .split(frame.area());

        // Header
        let partner = snap
            .partner
            .map(|p| format!(" | partner {} of 2", p.current_partner.number()))
            .unwrap_or_default();
        let elapsed = snap
            .workout_elapsed_seconds
            .map(|s| format!(" | {}", format_clock(s)))
            .unwrap_or_default();
        let header = Paragraph::new(format!("OneRep - {}{}{}", snap.profile, partner, elapsed))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, rows[0]);

        let body = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);
        self.draw_exercises(frame, body[0], &snap);
        self.draw_timer(frame, body[1], &snap);

        let cues: Vec<ListItem> = self
            .recent_cues
            .iter()
            .map(|c| ListItem::new(c.as_str()))
            .collect();
        let cue_list = List::new(cues).block(Block::default().borders(Borders::ALL).title("Cues"));
        frame.render_widget(cue_list, rows[2]);

        // Footer with status
        let footer = Paragraph::new(format!("{}\n{}", self.status_message, HELP))
            .style(Style::default().fg(Color::White))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(footer, rows[3]);
    }

    fn draw_exercises(&self, frame: &mut Frame, area: Rect, snap: &SessionSnapshot) {
        let current = snap.current_exercise.as_ref().map(|e| e.id);
        let items: Vec<ListItem> = snap
            .exercises
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let mark = match entry.status {
                    ExerciseStatus::NotStarted => "  ",
                    ExerciseStatus::Completed => "~ ",
                    ExerciseStatus::Logged => "✓ ",
                };
                let content = format!(
                    "{}{:<18}{}",
                    mark,
                    entry.spec.name,
                    entry.spec.working_value()
                );
                let style = if idx == self.selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else if Some(entry.spec.id) == current {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                ListItem::new(content).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Exercises ({} total)", snap.exercises.len())),
        );
        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_timer(&self, frame: &mut Frame, area: Rect, snap: &SessionSnapshot) {
        let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(4)]).split(area);

        let title = match (snap.stage, snap.phase) {
            (StageKind::Idle, _) if snap.workout_finished => "Workout complete".to_string(),
            (StageKind::Idle, _) => "Idle".to_string(),
            (_, Some(phase)) => format!(
                "{}{}",
                phase.display_name(),
                if snap.running || snap.phase_duration == 0 { "" } else { " (paused)" }
            ),
            (_, None) => String::new(),
        };
        let ratio = if snap.phase_duration == 0 {
            0.0
        } else {
            f64::from(snap.phase_duration - snap.time_remaining) / f64::from(snap.phase_duration)
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(format_clock(u64::from(snap.time_remaining)));
        frame.render_widget(gauge, rows[0]);

        let mut lines = Vec::new();
        if let Some(exercise) = &snap.current_exercise {
            if snap.stage == StageKind::Exercise {
                lines.push(format!("Exercise: {}", exercise.name));
            } else {
                let outcome = if snap.is_logged() { "logged" } else { "not logged" };
                lines.push(format!("Last: {} ({})", exercise.name, outcome));
            }
        }
        if let Some(value) = snap.working_value {
            lines.push(format!("Value: {}", value));
        }
        if snap.stage == StageKind::Exercise {
            lines.push(format!(
                "Reached failure: {}",
                if snap.reached_failure { "yes" } else { "no" }
            ));
        }
        if let Some(next) = &snap.next_exercise {
            lines.push(format!("Next: {} at {}", next.name, next.working_value()));
        }
        let details = Paragraph::new(lines.join("\n"))
            .block(Block::default().borders(Borders::ALL).title("Set"));
        frame.render_widget(details, rows[1]);
    }
}

fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Read keys on a plain thread so the async loop never blocks on the terminal.
fn spawn_key_reader() -> mpsc::UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(200)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    debug!("Key reader stopped: {}", e);
                    return;
                }
            }
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Press && tx.send(key).is_err() {
                    return;
                }
            }
        }
    });
    rx
}

pub async fn run(
    mut terminal: DefaultTerminal,
    engine: SessionOrchestrator,
    mut cues: mpsc::UnboundedReceiver<Cue>,
) -> Result<()> {
    let mut app = RunApp::new(engine);
    let mut keys = spawn_key_reader();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.engine.tick();
            }
            Some(key) = keys.recv() => {
                if !app.handle_key(key) {
                    return Ok(());
                }
            }
            Some(cue) = cues.recv() => {
                app.push_cue(cue);
            }
        }
    }
}
