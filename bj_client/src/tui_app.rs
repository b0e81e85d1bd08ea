//! TUI application for the blackjack client.
//!
//! This module provides a terminal UI using ratatui. The table is rendered
//! from the reconciler's view state, never from the raw snapshot: cards
//! appear as their sequenced delay elapses, so a fresh deal staggers in and
//! the dealer's draw-out deals visibly card by card.

use anyhow::Result;
use blackjack_view::{
    model::{GameStatus, HandScore, Player, Snapshot, Suit},
    reconcile::{CardView, HandId, Reconciler, RenderOp, RevealKind, hands},
    status::{self, Outcome},
};
use chrono::{DateTime, Utc};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::{Alignment, Constraint, Flex, Layout, Margin, Position, Rect},
    style::{Style, Stylize},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{Block, Clear, List, ListDirection, ListItem, Padding, Paragraph, Scrollbar,
        ScrollbarOrientation, block},
};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

mod widgets;

use crate::api_client::{ApiClient, GameAction};
use crate::commands::{self, Command, MAX_BET, MIN_BET};
use crate::session::Session;
use widgets::{ScrollableList, UserInput};

const HELP: &str = "\
deal <amount>
        Start a new round, betting between 1 and 10.
hit
        Take another card for the active hand.
stand
        End the active hand and let the dealer play out.
split
        Split a matching pair into two hands. Costs a second bet and is
        only offered while it can be accepted.
reset
        Reset your balance to the table default.
";
const MAX_LOG_RECORDS: usize = 1024;
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// A response from one in-flight server request.
enum ServerReply {
    Game(Result<Snapshot>),
    Player(Result<Player>),
}

#[derive(Clone)]
enum RecordKind {
    Alert,
    Error,
    Game,
    You,
}

/// A timestamped terminal message with an importance label to help
/// direct user attention.
#[derive(Clone)]
struct Record {
    datetime: DateTime<Utc>,
    kind: RecordKind,
    content: String,
}

impl Record {
    fn new(kind: RecordKind, content: String) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content,
        }
    }
}

impl From<Record> for ListItem<'_> {
    fn from(val: Record) -> Self {
        let repr = match val.kind {
            RecordKind::Alert => "ALERT".light_magenta(),
            RecordKind::Error => "ERROR".light_red(),
            RecordKind::Game => "GAME".light_yellow(),
            RecordKind::You => "YOU".light_green(),
        };

        let msg = vec![
            format!("[{} ", val.datetime.format("%H:%M:%S")).into(),
            Span::styled(format!("{repr:5}"), repr.style),
            format!("]: {}", val.content).into(),
        ];

        ListItem::new(Line::from(msg))
    }
}

/// An appended card whose stagger delay has not yet elapsed. Until `due`,
/// the slot is kept off-screen.
struct PendingAppend {
    due: Instant,
    hand: HandId,
    index: usize,
}

fn make_card_span(card: CardView) -> Span<'static> {
    match card {
        CardView::Masked => Span::styled(" ?? ".to_string(), Style::default().dark_gray()),
        CardView::Revealed(face) => {
            let repr = format!("{face} ");
            match face.suit {
                Suit::Hearts => Span::styled(repr, Style::default().light_red()),
                Suit::Diamonds => Span::styled(repr, Style::default().light_blue()),
                Suit::Clubs => Span::styled(repr, Style::default().light_green()),
                Suit::Spades => Span::raw(repr),
            }
        }
    }
}

fn outcome_style(outcome: Option<Outcome>) -> Style {
    match outcome {
        Some(Outcome::Favorable) => Style::default().light_green().bold(),
        Some(Outcome::Unfavorable) => Style::default().light_red().bold(),
        Some(Outcome::Neutral) => Style::default().light_yellow().bold(),
        None => Style::default(),
    }
}

/// TUI App state
pub struct TuiApp {
    api: ApiClient,
    session: Session,
    /// Snapshot reconciliation core; owns the rendered view state.
    reconciler: Reconciler,
    /// Most recent snapshot, kept for scores and action affordances.
    latest: Option<Snapshot>,
    /// Appends still waiting out their stagger delay.
    pending: Vec<PendingAppend>,
    /// Whether a server request is outstanding. Only one at a time.
    in_flight: bool,
    balance: Option<i64>,
    current_bet: Option<i64>,
    /// Whether to display the help menu window
    show_help_menu: bool,
    /// Helps scroll through the help menu window if the terminal is small
    help_handle: ScrollableList,
    /// History of recorded messages
    log_handle: ScrollableList,
    /// Current value of the input box
    user_input: UserInput,
}

impl TuiApp {
    pub fn new(api: ApiClient, session: Session, player: &Player) -> Self {
        // Fill help menu with help text lines
        let mut help_handle = ScrollableList::new(MAX_LOG_RECORDS);
        help_handle.push("".into());
        for line in HELP.lines() {
            help_handle.push(line.into());
        }
        help_handle.push("".into());
        help_handle.jump_to_first();

        let mut app = Self {
            api,
            session,
            reconciler: Reconciler::new(),
            latest: None,
            pending: Vec::new(),
            in_flight: false,
            balance: Some(player.balance),
            current_bet: None,
            show_help_menu: false,
            help_handle,
            log_handle: ScrollableList::new(MAX_LOG_RECORDS),
            user_input: UserInput::new(),
        };
        app.add_log(
            RecordKind::Game,
            format!(
                "Welcome to the table. Balance: ${}. Start with 'deal {}'-'deal {}'",
                player.balance, MIN_BET, MAX_BET
            ),
        );
        app
    }

    /// Add log message
    fn add_log(&mut self, kind: RecordKind, content: String) {
        let record = Record::new(kind, content);
        self.log_handle.push(record.into());
    }

    /// Whether the current round still accepts player actions.
    fn round_active(&self) -> bool {
        matches!(
            self.session.last_status,
            Some(GameStatus::PlayerTurn) | Some(GameStatus::DealerTurn)
        )
    }

    /// Handle user input, dispatching at most one server request
    fn handle_command(&mut self, user_input: &str, tx: &mpsc::UnboundedSender<ServerReply>) {
        if user_input.trim().is_empty() {
            return;
        }
        self.add_log(RecordKind::You, user_input.to_string());

        let command = match commands::parse_command(user_input) {
            Ok(command) => command,
            Err(e) => {
                // Validation failure: surfaced inline, no request sent.
                self.add_log(RecordKind::Error, e.to_string());
                return;
            }
        };

        if self.in_flight {
            self.add_log(
                RecordKind::Alert,
                "Still waiting for the previous action".to_string(),
            );
            return;
        }

        match command {
            Command::Deal(bet) => {
                if self.round_active() {
                    self.add_log(
                        RecordKind::Error,
                        "A round is already in progress".to_string(),
                    );
                    return;
                }
                let api = self.api.clone();
                let player_id = self.session.player_id.clone();
                let tx = tx.clone();
                self.in_flight = true;
                tokio::spawn(async move {
                    let _ = tx.send(ServerReply::Game(api.start_game(&player_id, bet).await));
                });
            }
            Command::Hit | Command::Stand | Command::Split => {
                let Some(game_id) = self.session.game_id.clone() else {
                    self.add_log(
                        RecordKind::Error,
                        "No round in progress. Start one with 'deal AMOUNT'".to_string(),
                    );
                    return;
                };
                if !self.round_active() {
                    self.add_log(
                        RecordKind::Error,
                        "The round is over. Start a new one with 'deal AMOUNT'".to_string(),
                    );
                    return;
                }
                let action = match command {
                    Command::Hit => GameAction::Hit,
                    Command::Stand => GameAction::Stand,
                    _ => {
                        // Coarse affordance only; the server still decides.
                        let eligible = self
                            .latest
                            .as_ref()
                            .is_some_and(hands::split_eligible);
                        if !eligible {
                            self.add_log(
                                RecordKind::Error,
                                "Split is not available right now".to_string(),
                            );
                            return;
                        }
                        GameAction::Split
                    }
                };
                let api = self.api.clone();
                let player_id = self.session.player_id.clone();
                let tx = tx.clone();
                self.in_flight = true;
                tokio::spawn(async move {
                    let _ = tx.send(ServerReply::Game(
                        api.perform_action(&player_id, &game_id, action).await,
                    ));
                });
            }
            Command::Reset => {
                let api = self.api.clone();
                let player_id = self.session.player_id.clone();
                let tx = tx.clone();
                self.in_flight = true;
                tokio::spawn(async move {
                    let _ = tx.send(ServerReply::Player(api.reset_balance(&player_id).await));
                });
            }
        }
    }

    /// Apply a snapshot the server returned for the latest action.
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let status_changed = self.session.last_status != Some(snapshot.status);
        self.session.observe(&snapshot);

        if let Some(balance) = snapshot.player_balance {
            self.balance = Some(balance);
        }
        self.current_bet = snapshot.current_bet;

        let result = self.reconciler.apply(&snapshot);
        let now = Instant::now();
        for op in &result.ops {
            match op.op {
                RenderOp::Append { hand, index, .. } if op.delay > Duration::ZERO => {
                    self.pending.push(PendingAppend {
                        due: now + op.delay,
                        hand,
                        index,
                    });
                }
                RenderOp::Reveal {
                    kind: RevealKind::HoleCard,
                    face,
                    ..
                } => {
                    self.add_log(RecordKind::Alert, format!("Dealer turns over {face}"));
                }
                RenderOp::SetActiveHand { index } => {
                    self.add_log(
                        RecordKind::Alert,
                        format!("Now playing hand {}", index + 1),
                    );
                }
                _ => {}
            }
        }
        for diagnostic in &result.diagnostics {
            self.add_log(RecordKind::Alert, diagnostic.to_string());
        }

        if status_changed {
            self.add_log(
                RecordKind::Game,
                status::label(snapshot.status).to_string(),
            );
            if snapshot.status.is_terminal() {
                if let Some(payout) = snapshot.payout {
                    self.add_log(RecordKind::Game, format!("Payout: ${payout}"));
                }
                if let Some(balance) = snapshot.player_balance {
                    self.add_log(RecordKind::Game, format!("Balance: ${balance}"));
                }
            }
        }

        self.latest = Some(snapshot);
    }

    /// How many cards of a hand are currently on screen: everything up to
    /// the first append still waiting out its stagger delay.
    fn visible_len(&self, hand: HandId, total: usize) -> usize {
        self.pending
            .iter()
            .filter(|p| p.hand == hand)
            .map(|p| p.index)
            .min()
            .map_or(total, |first| first.min(total))
    }

    fn make_hand_line(&self, hand: HandId) -> Line<'static> {
        let Some(view) = self.reconciler.view() else {
            return Line::default();
        };
        let Some(hand_view) = view.hand(hand) else {
            return Line::default();
        };
        let visible = self.visible_len(hand, hand_view.cards.len());
        let spans: Vec<Span> = hand_view.cards[..visible]
            .iter()
            .map(|card| make_card_span(*card))
            .collect();
        Line::from(spans)
    }

    /// Score string for one snapshot hand; the dealer never shows a number
    /// while a card is masked.
    fn score_repr(&self, hand: HandId) -> String {
        let Some(snapshot) = self.latest.as_ref() else {
            return String::new();
        };
        let score = match hand {
            HandId::Player => snapshot.player_hand.display_score(),
            HandId::Dealer => snapshot.dealer_hand.display_score(),
            HandId::Split => match snapshot.split_hand.as_ref() {
                Some(split) => split.display_score(),
                None => return String::new(),
            },
        };
        // While cards are still dealing in, the total would spoil the
        // stagger.
        let total = match hand {
            HandId::Player => snapshot.player_hand.cards.len(),
            HandId::Dealer => snapshot.dealer_hand.cards.len(),
            HandId::Split => snapshot
                .split_hand
                .as_ref()
                .map_or(0, |split| split.cards.len()),
        };
        if self.visible_len(hand, total) < total {
            HandScore::Unknown.to_string()
        } else {
            score.to_string()
        }
    }

    fn draw_dealer(&self, frame: &mut Frame, area: Rect) {
        let dealer = Paragraph::new(self.make_hand_line(HandId::Dealer)).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(" dealer  ")
                .title_bottom(format!(" score: {}  ", self.score_repr(HandId::Dealer))),
        );
        frame.render_widget(dealer, area);
    }

    fn draw_player(&self, frame: &mut Frame, area: Rect) {
        let has_split = self
            .reconciler
            .view()
            .is_some_and(|view| view.split.is_some());

        if !has_split {
            let player = Paragraph::new(self.make_hand_line(HandId::Player)).block(
                Block::bordered()
                    .padding(Padding::uniform(1))
                    .title(" you  ")
                    .title_bottom(format!(" score: {}  ", self.score_repr(HandId::Player))),
            );
            frame.render_widget(player, area);
            return;
        }

        let [primary_area, split_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);
        let active = self.reconciler.tracker().active_hand();
        let marker = |idx: usize| if idx == active { "→ " } else { "" };

        let primary = Paragraph::new(self.make_hand_line(HandId::Player)).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(format!(" {}hand 1  ", marker(hands::PRIMARY_HAND)))
                .title_bottom(format!(" score: {}  ", self.score_repr(HandId::Player))),
        );
        frame.render_widget(primary, primary_area);

        let split = Paragraph::new(self.make_hand_line(HandId::Split)).block(
            Block::bordered()
                .padding(Padding::uniform(1))
                .title(format!(" {}hand 2  ", marker(hands::SPLIT_HAND)))
                .title_bottom(format!(" score: {}  ", self.score_repr(HandId::Split))),
        );
        frame.render_widget(split, split_area);
    }

    /// Render the status and bankroll line above the table
    fn draw_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = Vec::new();
        match self.session.last_status {
            Some(status_value) => {
                spans.push(Span::styled(
                    status::label(status_value),
                    outcome_style(status::outcome(status_value)),
                ));
            }
            None => spans.push("Place your bet".into()),
        }
        if let Some(balance) = self.balance {
            spans.push(format!("    balance: ${balance}").into());
        }
        if let Some(bet) = self.current_bet
            && self.round_active()
        {
            spans.push(format!("  bet: ${bet}").into());
        }
        if self.in_flight {
            spans.push("  …".into());
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the log/history window with scrollbar
    fn draw_log(&mut self, frame: &mut Frame, area: Rect) {
        let log_records = self.log_handle.list_items.clone();
        let log_records = List::new(log_records)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" history  "));
        frame.render_stateful_widget(log_records, area, &mut self.log_handle.list_state);

        // Render log window scrollbar
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.log_handle.scroll_state,
        );
    }

    /// Render the user input area
    fn draw_user_input(&self, frame: &mut Frame, area: Rect) {
        let user_input = Paragraph::new(self.user_input.value.as_str())
            .style(Style::default())
            .block(
                block::Block::bordered()
                    .title(format!(" {}  ", self.session.player_id).light_green()),
            );
        frame.render_widget(user_input, area);
        frame.set_cursor_position(Position::new(
            area.x + self.user_input.char_idx as u16 + 1,
            area.y + 1,
        ));
    }

    /// Render the help/status bar at the bottom
    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let help_message = vec![
            "press ".into(),
            "Tab".bold().white(),
            " to view help, press ".into(),
            "Enter".bold().white(),
            " to record a command, or press ".into(),
            "Esc".bold().white(),
            " to exit".into(),
        ];
        let help_message = Paragraph::new(Line::from(help_message));
        frame.render_widget(help_message, area);
    }

    /// Render the help menu overlay
    fn draw_help_menu(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Max(16)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(78)]).flex(Flex::Center);
        let [help_menu_area] = vertical.areas(frame.area());
        let [help_menu_area] = horizontal.areas(help_menu_area);
        frame.render_widget(Clear, help_menu_area);

        // Render help text
        let help_items = self.help_handle.list_items.clone();
        let help_items = List::new(help_items)
            .direction(ListDirection::BottomToTop)
            .block(block::Block::bordered().title(" commands  "));
        frame.render_stateful_widget(help_items, help_menu_area, &mut self.help_handle.list_state);

        // Render help scrollbar
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .begin_symbol(None)
                .end_symbol(None),
            help_menu_area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.help_handle.scroll_state,
        );
    }

    /// Main draw function - orchestrates rendering of all UI components
    fn draw(&mut self, frame: &mut Frame) {
        // Define the main layout structure
        let window = Layout::vertical([
            Constraint::Length(1), // Status and bankroll
            Constraint::Min(6),    // Top area (table + log)
            Constraint::Length(3), // User input area
            Constraint::Length(1), // Help bar
        ]);
        let [status_area, top_area, user_input_area, help_area] = window.areas(frame.area());

        // Split top area into table and log
        let [table_area, log_area] =
            Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(top_area);

        // Dealer above, player hand(s) below
        let [dealer_area, player_area] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(table_area);

        // Render all components
        self.draw_status_bar(frame, status_area);
        self.draw_dealer(frame, dealer_area);
        self.draw_player(frame, player_area);
        self.draw_log(frame, log_area);
        self.draw_user_input(frame, user_input_area);
        self.draw_help_bar(frame, help_area);

        // Render help menu overlay if active
        if self.show_help_menu {
            self.draw_help_menu(frame);
        }
    }

    /// Run the TUI application
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // Channel for replies from in-flight server requests
        let (tx_reply, mut rx_reply) = mpsc::unbounded_channel::<ServerReply>();

        // Main UI loop
        loop {
            // Let matured appends become visible
            let now = Instant::now();
            self.pending.retain(|append| append.due > now);

            terminal.draw(|frame| self.draw(frame))?;

            // Check for keyboard input
            if event::poll(POLL_TIMEOUT)?
                && let Event::Key(KeyEvent {
                    code,
                    modifiers,
                    kind,
                    ..
                }) = event::read()?
                && kind == KeyEventKind::Press
            {
                match modifiers {
                    KeyModifiers::CONTROL => match code {
                        KeyCode::Home => self.log_handle.jump_to_first(),
                        KeyCode::End => self.log_handle.jump_to_last(),
                        _ => {}
                    },
                    KeyModifiers::NONE => match code {
                        KeyCode::Enter => {
                            let user_input = self.user_input.submit();
                            self.handle_command(&user_input, &tx_reply);
                        }
                        KeyCode::Char(to_insert) => self.user_input.input(to_insert),
                        KeyCode::Backspace => self.user_input.backspace(),
                        KeyCode::Delete => self.user_input.delete(),
                        KeyCode::Left => self.user_input.move_left(),
                        KeyCode::Right => self.user_input.move_right(),
                        KeyCode::Up => {
                            if self.show_help_menu {
                                self.help_handle.move_up();
                            } else {
                                self.log_handle.move_up();
                            }
                        }
                        KeyCode::Down => {
                            if self.show_help_menu {
                                self.help_handle.move_down();
                            } else {
                                self.log_handle.move_down();
                            }
                        }
                        KeyCode::Home => self.user_input.jump_to_first(),
                        KeyCode::End => self.user_input.jump_to_last(),
                        KeyCode::Tab => self.show_help_menu = !self.show_help_menu,
                        KeyCode::Esc => return Ok(()),
                        _ => {}
                    },
                    _ => {}
                }
            }

            // Check for server replies
            if let Ok(reply) = rx_reply.try_recv() {
                self.in_flight = false;
                match reply {
                    ServerReply::Game(Ok(snapshot)) => self.apply_snapshot(snapshot),
                    ServerReply::Game(Err(e)) => {
                        // Transport failure or domain rejection; the view
                        // stays as it was.
                        self.add_log(RecordKind::Error, e.to_string());
                    }
                    ServerReply::Player(Ok(player)) => {
                        self.balance = Some(player.balance);
                        self.add_log(
                            RecordKind::Game,
                            format!("Balance reset to ${}", player.balance),
                        );
                    }
                    ServerReply::Player(Err(e)) => {
                        self.add_log(RecordKind::Error, e.to_string());
                    }
                }
            }
        }
    }
}
