//! TUI rendering and terminal management (impure shell)

pub mod constants;
pub mod list;
pub mod renderer;
pub mod status;
pub mod styles;

pub use list::{measure_rows, simple_total_height, SimpleListView, VirtualListView};
pub use renderer::{measure_message, row_paragraph, MarkdownRowRenderer, RowRenderer};
pub use status::{status_line, StatusInfo};
pub use styles::{ColorConfig, MessageStyles};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{
    AppError, Author, ConversationId, KeyAction, MessageSnapshot, MessageStore, StoreEvent,
};
use crate::view_state::{
    AnchorMode, ListConfig, ScrollAnchorController, ScrollPosition, SyncOutcome, Viewport,
    VirtualList,
};
use constants::{
    IMAGE_DELAY_TICKS, IMAGE_LINES, MOUSE_SCROLL_LINES, STATUS_BAR_HEIGHT, TICK_INTERVAL,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    widgets::Paragraph,
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use tracing::{debug, info};

/// How the list is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Only rows in the window are laid out and drawn.
    Virtualized,
    /// Every message is laid out on every frame.
    Simple,
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    store: MessageStore,
    events: Receiver<StoreEvent>,
    snapshot: MessageSnapshot,
    list: VirtualList,
    /// Scroll state of the simple list.
    simple: ScrollAnchorController,
    list_config: ListConfig,
    renderer: MarkdownRowRenderer,
    key_bindings: KeyBindings,
    mode: ListMode,
    generated_per_conversation: usize,
    list_area: Rect,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(config: &ResolvedConfig, messages: usize) -> Result<Self, AppError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);

        let store = MessageStore::with_generated(ConversationId::new(1), messages);
        Self::with_backend(backend, config, store, messages)
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). A poll timeout advances async
    /// content by one tick and redraws only if something changed.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.draw()?;

        loop {
            if event::poll(TICK_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                    }
                    _ => continue,
                }
                self.draw()?;
            } else if self.tick() {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: Backend,
{
    /// Build the app on an existing backend and store.
    ///
    /// `generated_per_conversation` is the message count of conversations
    /// created with [`KeyAction::NewConversation`].
    pub fn with_backend(
        backend: B,
        config: &ResolvedConfig,
        mut store: MessageStore,
        generated_per_conversation: usize,
    ) -> Result<Self, AppError> {
        let terminal = Terminal::new(backend)?;
        let events = store.subscribe();
        let snapshot = store.snapshot();
        let list_config = config.list_config();
        let mut list = VirtualList::new(list_config);
        list.sync(&snapshot);

        let mode = if config.virtualize {
            ListMode::Virtualized
        } else {
            ListMode::Simple
        };
        info!(
            messages = store.len(),
            ?mode,
            overscan = list_config.overscan,
            "app initialized"
        );

        Ok(Self {
            terminal,
            store,
            events,
            snapshot,
            list,
            simple: ScrollAnchorController::new(list_config.at_end_threshold),
            list_config,
            renderer: MarkdownRowRenderer::default(),
            key_bindings: KeyBindings::default(),
            mode,
            generated_per_conversation,
            list_area: Rect::default(),
        })
    }

    /// Replace the row renderer.
    pub fn with_renderer(mut self, renderer: MarkdownRowRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Virtualized list state.
    pub fn list(&self) -> &VirtualList {
        &self.list
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &MessageSnapshot {
        &self.snapshot
    }

    /// Message store.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// Current list mode.
    pub fn mode(&self) -> ListMode {
        self.mode
    }

    /// Anchor mode of the active list.
    pub fn anchor_mode(&self) -> AnchorMode {
        match self.mode {
            ListMode::Virtualized => self.list.anchor_mode(),
            ListMode::Simple => self.simple.mode(),
        }
    }

    /// Scroll offset of the active list.
    pub fn scroll_top(&self) -> usize {
        match self.mode {
            ListMode::Virtualized => self.list.scroll_top().get(),
            ListMode::Simple => self.simple.scroll_top().get(),
        }
    }

    /// Terminal backend.
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Mutable terminal backend, used to resize test backends.
    pub fn backend_mut(&mut self) -> &mut B {
        self.terminal.backend_mut()
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        debug!(?action, "key action");

        let page = usize::from(self.list_area.height).saturating_sub(1).max(1);
        let page = isize::try_from(page).unwrap_or(isize::MAX);

        match action {
            KeyAction::Quit => return true,
            KeyAction::ScrollUp => self.scroll_by(-1),
            KeyAction::ScrollDown => self.scroll_by(1),
            KeyAction::PageUp => self.scroll_by(-page),
            KeyAction::PageDown => self.scroll_by(page),
            KeyAction::ScrollToTop => self.scroll_to(&ScrollPosition::Top),
            KeyAction::JumpToLatest => self.scroll_to(&ScrollPosition::Bottom),
            KeyAction::AppendMessage => {
                let n = self.store.len() + 1;
                self.store
                    .push(Author::User, format!("Sent message **{n}** from the keyboard."));
            }
            KeyAction::AppendImage => {
                self.store.push_image(
                    Author::Peer,
                    "Here is a picture:",
                    IMAGE_LINES,
                    IMAGE_DELAY_TICKS,
                );
            }
            KeyAction::DeleteLast => {
                self.store.remove_last();
            }
            KeyAction::DeleteMiddle => {
                self.store.remove_middle();
            }
            KeyAction::NewConversation => {
                let next = self.store.conversation().next();
                self.store
                    .switch_conversation(next, self.generated_per_conversation);
            }
            KeyAction::ToggleVirtualization => self.toggle_virtualization(),
        }
        self.apply_store_events();
        false
    }

    /// Handle a single mouse event
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-MOUSE_SCROLL_LINES),
            MouseEventKind::ScrollDown => self.scroll_by(MOUSE_SCROLL_LINES),
            _ => {}
        }
    }

    /// Advance async content by one tick.
    ///
    /// Returns whether anything changed and a redraw is due.
    pub fn tick(&mut self) -> bool {
        let loaded = self.store.tick();
        if !loaded.is_empty() {
            debug!(?loaded, "async content loaded");
        }
        self.apply_store_events()
    }

    /// Drain store notifications and sync the list with a fresh snapshot.
    fn apply_store_events(&mut self) -> bool {
        if self.events.try_iter().count() == 0 {
            return false;
        }
        self.snapshot = self.store.snapshot();
        let outcome = self.list.sync(&self.snapshot);
        if outcome == SyncOutcome::Reset {
            self.simple.reset();
        }
        true
    }

    fn viewport_height(&self) -> usize {
        usize::from(self.list_area.height)
    }

    fn simple_total(&self) -> usize {
        simple_total_height(
            &self.snapshot,
            &self.renderer,
            self.list_config.header_height.lines(),
            self.list_area.width,
        )
    }

    fn scroll_by(&mut self, delta: isize) {
        match self.mode {
            ListMode::Virtualized => self.list.scroll_by(delta),
            ListMode::Simple => {
                let total = self.simple_total();
                let vh = self.viewport_height();
                self.simple.user_scroll_by(delta, total, vh);
            }
        }
    }

    fn scroll_to(&mut self, position: &ScrollPosition) {
        match self.mode {
            ListMode::Virtualized => self.list.scroll_to(position),
            ListMode::Simple => {
                let total = self.simple_total();
                let vh = self.viewport_height();
                self.simple.scroll_to(position, total, vh, |_| None);
            }
        }
    }

    fn toggle_virtualization(&mut self) {
        let at_end = self.anchor_mode() == AnchorMode::AtEnd;
        let line = self.scroll_top();
        self.mode = match self.mode {
            ListMode::Virtualized => ListMode::Simple,
            ListMode::Simple => ListMode::Virtualized,
        };
        info!(mode = ?self.mode, "list mode toggled");

        let target = if at_end {
            ScrollPosition::Bottom
        } else {
            ScrollPosition::at_line(line)
        };
        self.scroll_to(&target);
    }

    /// Render the current frame
    ///
    /// Lays out the list for the current terminal size, then draws the list
    /// and the status bar.
    pub fn draw(&mut self) -> Result<(), AppError> {
        let size = self.terminal.size()?;
        let list_height = size.height.saturating_sub(STATUS_BAR_HEIGHT);
        let list_area = Rect::new(0, 0, size.width, list_height);
        let status_area = Rect::new(0, list_height, size.width, size.height - list_height);
        self.list_area = list_area;

        let info = match self.mode {
            ListMode::Virtualized => {
                self.list
                    .set_viewport(Viewport::new(list_area.width, list_area.height));
                measure_rows(&mut self.list, &self.snapshot, &self.renderer, list_area.width);
                StatusInfo {
                    mode: self.list.anchor_mode(),
                    virtualized: true,
                    mounted: self.list.window().len(),
                    total_rows: self.list.total_count(),
                    scroll_top: self.list.scroll_top().get(),
                    total_height: self.list.total_height(),
                }
            }
            ListMode::Simple => {
                let total = self.simple_total();
                self.simple.reconcile(total, usize::from(list_area.height));
                StatusInfo {
                    mode: self.simple.mode(),
                    virtualized: false,
                    mounted: 0,
                    total_rows: self.snapshot.len() + 1,
                    scroll_top: self.simple.scroll_top().get(),
                    total_height: total,
                }
            }
        };

        let mode = self.mode;
        let list = &self.list;
        let snapshot = &self.snapshot;
        let renderer = &self.renderer;
        let header = self.list_config.header_height.lines();
        let simple_top = self.simple.scroll_top().get();

        self.terminal.draw(|frame| {
            match mode {
                ListMode::Virtualized => frame.render_widget(
                    VirtualListView::new(list, snapshot, renderer),
                    list_area,
                ),
                ListMode::Simple => frame.render_widget(
                    SimpleListView::new(snapshot, renderer, header, simple_top),
                    list_area,
                ),
            }
            frame.render_widget(Paragraph::new(status_line(info)), status_area);
        })?;

        Ok(())
    }
}

/// Run the TUI with `messages` generated messages.
///
/// This is the main entry point for the TUI. It handles terminal setup,
/// runs the event loop, and restores the terminal even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_app(config: &ResolvedConfig, messages: usize) -> Result<(), AppError> {
    let mut app = TuiApp::new(config, messages)?;
    let result = app.run();
    restore_terminal()?;
    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
