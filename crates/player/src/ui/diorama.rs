//! Terminal diorama
//!
//! One stage per location across the screen, the active stage highlighted,
//! and a detail overlay for a selected character. The map poll keeps the
//! stages current; keys drive navigation through the controller.

use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::application::{ActionOutcome, UiController};
use crate::presentation::view_models::{CharacterDetailView, DioramaView, StageView, StatusView};
use crate::presentation::{Notice, StageDirection, ViewUpdate};

use super::Skin;

const DRAW_INTERVAL: Duration = Duration::from_millis(100);
const INPUT_POLL: Duration = Duration::from_millis(50);
/// Pixel slots are spread over this many terminal columns
const SLOT_COLUMN_SCALE: u16 = 40;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Navigate(StageDirection),
    CloseOverlay,
    ToggleAutoScroll,
    /// Zero-based figure index on the active stage
    OpenCharacter(usize),
    /// Cycle through every figure on the active stage
    NextCharacter,
}

pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Char('q') => Some(KeyAction::Quit),
        KeyCode::Left => Some(KeyAction::Navigate(StageDirection::Prev)),
        KeyCode::Right => Some(KeyAction::Navigate(StageDirection::Next)),
        KeyCode::Esc => Some(KeyAction::CloseOverlay),
        KeyCode::Char('a') => Some(KeyAction::ToggleAutoScroll),
        KeyCode::Tab => Some(KeyAction::NextCharacter),
        KeyCode::Char(digit @ '1'..='9') => digit
            .to_digit(10)
            .map(|n| KeyAction::OpenCharacter(n as usize - 1)),
        _ => None,
    }
}

/// Everything the diorama draws, rebuilt from view updates
pub struct DioramaState {
    pub view: DioramaView,
    pub overlay: Option<CharacterDetailView>,
    /// Figure index last opened from the keyboard
    pub selected: Option<usize>,
    pub status_line: Option<String>,
    pub notices: VecDeque<Notice>,
    pub max_notices: usize,
}

impl Default for DioramaState {
    fn default() -> Self {
        Self {
            view: DioramaView::default(),
            overlay: None,
            selected: None,
            status_line: None,
            notices: VecDeque::new(),
            max_notices: 4,
        }
    }
}

impl DioramaState {
    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_front(notice);
        while self.notices.len() > self.max_notices {
            self.notices.pop_back();
        }
    }

    /// Figure after the selected one on the active stage, wrapping around
    pub fn next_figure(&self) -> Option<usize> {
        let count = self
            .view
            .stages
            .iter()
            .find(|stage| stage.active)
            .map_or(0, |stage| stage.figures.len());
        if count == 0 {
            return None;
        }
        Some(self.selected.map_or(0, |current| (current + 1) % count))
    }
}

impl Skin for DioramaState {
    fn apply(&mut self, update: &ViewUpdate) -> io::Result<()> {
        match update {
            ViewUpdate::Diorama(view) => self.view = view.clone(),
            ViewUpdate::Overlay(detail) => {
                if detail.is_none() {
                    self.selected = None;
                }
                self.overlay = detail.clone()
            }
            ViewUpdate::Notice(notice) => self.push_notice(notice.clone()),
            ViewUpdate::Status(StatusView::NotInitialized(message)) => {
                self.status_line = Some(message.clone())
            }
            ViewUpdate::Status(StatusView::Snapshot {
                status,
                interactions_count,
                ..
            }) => self.status_line = Some(format!("{status} · {interactions_count} interactions")),
            _ => {}
        }
        Ok(())
    }
}

pub struct DioramaApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: DioramaState,
    controller: UiController,
    receiver: UnboundedReceiver<ViewUpdate>,
}

impl DioramaApp {
    pub fn new(controller: UiController, receiver: UnboundedReceiver<ViewUpdate>) -> io::Result<Self> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        crossterm::terminal::enable_raw_mode()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            state: DioramaState::default(),
            controller,
            receiver,
        })
    }

    /// Run until `q`, then restore the terminal
    pub async fn run(mut self) -> io::Result<()> {
        let result = self.event_loop().await;
        self.terminal.show_cursor()?;
        crossterm::terminal::disable_raw_mode()?;
        self.terminal.clear()?;
        result
    }

    async fn event_loop(&mut self) -> io::Result<()> {
        let mut last_draw: Option<Instant> = None;

        loop {
            while let Ok(update) = self.receiver.try_recv() {
                self.state.apply(&update)?;
            }

            if last_draw.map_or(true, |at| at.elapsed() >= DRAW_INTERVAL) {
                self.terminal.draw(|frame| draw_diorama(frame, &self.state))?;
                last_draw = Some(Instant::now());
            }

            let ready = tokio::task::block_in_place(|| event::poll(INPUT_POLL))?;
            if !ready {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key_action(key.code) {
                Some(KeyAction::Quit) => break,
                Some(KeyAction::Navigate(direction)) => {
                    self.controller.navigate(direction).await;
                }
                Some(KeyAction::CloseOverlay) => {
                    self.controller.close_overlay().await;
                }
                Some(KeyAction::ToggleAutoScroll) => {
                    self.controller
                        .set_auto_scroll(!self.state.view.auto_scroll)
                        .await;
                }
                Some(KeyAction::OpenCharacter(figure)) => self.open(figure).await,
                Some(KeyAction::NextCharacter) => {
                    if let Some(figure) = self.state.next_figure() {
                        self.open(figure).await;
                    }
                }
                None => {}
            }
        }

        Ok(())
    }

    async fn open(&mut self, figure: usize) {
        if self.controller.open_character(figure).await == ActionOutcome::Completed {
            self.state.selected = Some(figure);
        }
    }
}

pub fn draw_diorama(frame: &mut Frame, state: &DioramaState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], state);
    draw_stages(frame, chunks[1], &state.view);
    draw_notices(frame, chunks[2], state);
    draw_help(frame, chunks[3]);

    if let Some(detail) = &state.overlay {
        draw_overlay(frame, centered(frame.size(), 50, 9), detail);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, state: &DioramaState) {
    let follow = if state.view.auto_scroll {
        Span::styled("follow on", Style::default().fg(Color::Green))
    } else {
        Span::styled("follow off", Style::default().fg(Color::DarkGray))
    };
    let mut spans = vec![
        Span::styled(
            state.view.clock.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        follow,
    ];
    if let Some(status) = &state.status_line {
        spans.push(Span::raw("  "));
        spans.push(Span::raw(status.clone()));
    }

    let block = Block::default().borders(Borders::ALL).title("Autoworld");
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Line::from(spans)),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_stages(frame: &mut Frame, area: Rect, view: &DioramaView) {
    if view.stages.is_empty() {
        let block = Block::default().borders(Borders::ALL).title("Stages");
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("Waiting for the map..."),
            area.inner(&Margin {
                vertical: 1,
                horizontal: 1,
            }),
        );
        return;
    }

    let count = view.stages.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            view.stages
                .iter()
                .map(|_| Constraint::Ratio(1, count))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (stage, column) in view.stages.iter().zip(columns.iter()) {
        draw_stage(frame, *column, stage);
    }
}

fn draw_stage(frame: &mut Frame, area: Rect, stage: &StageView) {
    let border = if stage.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!("{} {}", stage.neon, stage.name));
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            stage.meta.clone(),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
    ];
    for (index, figure) in stage.figures.iter().enumerate() {
        let indent = " ".repeat(usize::from(figure.slot / SLOT_COLUMN_SCALE));
        let mut label = format!("{indent}{} {}", index + 1, figure.label);
        if stage.active {
            label.push_str(&format!(" ({})", figure.emotion));
        }
        lines.push(Line::from(label));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_notices(frame: &mut Frame, area: Rect, state: &DioramaState) {
    let block = Block::default().borders(Borders::ALL).title("Notices");
    frame.render_widget(block, area);

    let lines: Vec<Line> = state
        .notices
        .iter()
        .map(|notice| {
            let color = if notice.is_error() {
                Color::Red
            } else {
                Color::Gray
            };
            Line::from(Span::styled(notice.text.clone(), Style::default().fg(color)))
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 1,
        }),
    );
}

fn draw_help(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new("←/→ stage  1-9/Tab character  Esc close  a follow  q quit")
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_overlay(frame: &mut Frame, area: Rect, detail: &CharacterDetailView) {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(detail.name.clone());
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(format!("Emotional state: {}", detail.emotional_state)),
        Line::from(format!("Animal: {}", detail.animal)),
        Line::from(format!("Location: {}", detail.location)),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        area.inner(&Margin {
            vertical: 1,
            horizontal: 2,
        }),
    );
}

/// `width` x `height` rectangle centered in `area`, clamped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{location, populated_location};
    use crate::presentation::view_models::diorama_view;
    use ratatui::backend::TestBackend;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_action(KeyCode::Char('q')), Some(KeyAction::Quit));
        assert_eq!(
            key_action(KeyCode::Left),
            Some(KeyAction::Navigate(StageDirection::Prev))
        );
        assert_eq!(key_action(KeyCode::Esc), Some(KeyAction::CloseOverlay));
        assert_eq!(
            key_action(KeyCode::Char('3')),
            Some(KeyAction::OpenCharacter(2))
        );
        assert_eq!(key_action(KeyCode::Tab), Some(KeyAction::NextCharacter));
        assert_eq!(key_action(KeyCode::Char('0')), None);
        assert_eq!(key_action(KeyCode::Char('x')), None);
    }

    #[test]
    fn state_keeps_latest_view_and_bounded_notices() {
        let mut state = DioramaState::default();
        for n in 0..6 {
            state
                .apply(&ViewUpdate::Notice(Notice::info(format!("notice {n}"))))
                .unwrap();
        }
        state
            .apply(&ViewUpdate::Overlay(Some(CharacterDetailView {
                name: "Mara Okonkwo".to_string(),
                emotional_state: "wary".to_string(),
                animal: "None".to_string(),
                location: "Canyon".to_string(),
            })))
            .unwrap();
        state.apply(&ViewUpdate::Overlay(None)).unwrap();

        assert_eq!(state.notices.len(), 4);
        assert_eq!(state.notices[0].text, "notice 5");
        assert!(state.overlay.is_none());
    }

    #[test]
    fn draws_stage_names_and_overlay() {
        let locations = vec![
            location("loc_bonfire", "Bonfire"),
            populated_location("loc_canyon", "Canyon", &[("c1", "Mara Okonkwo")]),
        ];
        let mut state = DioramaState::default();
        state
            .apply(&ViewUpdate::Diorama(diorama_view(
                &locations,
                1,
                false,
                "06:05 PM".to_string(),
            )))
            .unwrap();
        state.overlay = Some(CharacterDetailView {
            name: "Mara Okonkwo".to_string(),
            emotional_state: "wary".to_string(),
            animal: "None".to_string(),
            location: "Canyon".to_string(),
        });

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw_diorama(frame, &state)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let text: String = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Bonfire"));
        assert!(text.contains("Canyon"));
        assert!(text.contains("06:05 PM"));
        assert!(text.contains("Location: Canyon"));
    }

    #[test]
    fn tab_cycles_past_the_ninth_figure() {
        let figures: Vec<(String, String)> = (1..=11)
            .map(|n| (format!("c{n}"), format!("Figure {n}")))
            .collect();
        let figures: Vec<(&str, &str)> = figures
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
            .collect();
        let locations = vec![
            location("loc_bonfire", "Bonfire"),
            populated_location("loc_canyon", "Canyon", &figures),
        ];
        let mut state = DioramaState::default();
        assert_eq!(state.next_figure(), None);

        state
            .apply(&ViewUpdate::Diorama(diorama_view(
                &locations,
                1,
                false,
                "06:05 PM".to_string(),
            )))
            .unwrap();
        assert_eq!(state.next_figure(), Some(0));

        state.selected = Some(8);
        assert_eq!(state.next_figure(), Some(9));
        state.selected = Some(10);
        assert_eq!(state.next_figure(), Some(0));

        state.apply(&ViewUpdate::Overlay(None)).unwrap();
        assert_eq!(state.selected, None);
    }
}
