//! Tests for the TUI shell driven through a TestBackend.

use super::*;
use crate::view_state::max_scroll;
use crossterm::event::{KeyEventKind, KeyEventState, MouseEvent};
use ratatui::backend::TestBackend;

const WIDTH: u16 = 40;
const HEIGHT: u16 = 12;

fn plain_renderer() -> MarkdownRowRenderer {
    MarkdownRowRenderer::new(MessageStyles::with_color_config(ColorConfig::new(false)))
        .with_timestamps(false)
}

fn app_with(store: MessageStore) -> TuiApp<TestBackend> {
    let config = ResolvedConfig::default();
    TuiApp::with_backend(TestBackend::new(WIDTH, HEIGHT), &config, store, 20)
        .unwrap()
        .with_renderer(plain_renderer())
}

fn generated_app(count: usize) -> TuiApp<TestBackend> {
    app_with(MessageStore::with_generated(ConversationId::new(1), count))
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn screen(app: &TuiApp<TestBackend>) -> Vec<String> {
    let buffer = app.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

fn list_lines(app: &TuiApp<TestBackend>) -> Vec<String> {
    let mut lines = screen(app);
    lines.truncate(usize::from(HEIGHT - STATUS_BAR_HEIGHT));
    lines
}

fn assert_pinned_to_end(app: &TuiApp<TestBackend>) {
    let list = app.list();
    let vh = usize::from(list.viewport().height);
    assert_eq!(list.anchor_mode(), AnchorMode::AtEnd);
    assert_eq!(list.scroll_top(), max_scroll(list.total_height(), vh));
}

// ===== Keys =====

#[test]
fn handle_key_q_returns_true() {
    let mut app = generated_app(3);
    assert!(app.handle_key(key('q')));
}

#[test]
fn handle_key_ctrl_c_returns_true() {
    let mut app = generated_app(3);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(app.handle_key(ctrl_c));
}

#[test]
fn handle_key_unbound_returns_false() {
    let mut app = generated_app(3);
    assert!(!app.handle_key(key('z')));
}

#[test]
fn release_events_are_not_bound() {
    let mut app = generated_app(3);
    let release = KeyEvent {
        code: KeyCode::Char('a'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    app.handle_key(release);
    assert_eq!(app.store().len(), 3);
}

// ===== Drawing and anchoring =====

#[test]
fn first_draw_follows_latest_message() {
    let mut app = generated_app(50);
    app.draw().unwrap();
    app.draw().unwrap();

    assert_pinned_to_end(&app);
    assert!(app.list().window().len() < app.list().total_count());
    assert!(screen(&app)[usize::from(HEIGHT) - 1].contains("LATEST"));
}

#[test]
fn empty_conversation_shows_guide() {
    let mut app = app_with(MessageStore::new(ConversationId::new(1)));
    app.draw().unwrap();

    assert!(app.snapshot().is_guide_only());
    let text = list_lines(&app).join("\n");
    assert!(text.contains("system"), "{text}");
    assert!(text.contains("No messages yet."), "{text}");
}

#[test]
fn append_while_at_end_stays_pinned() {
    let mut app = generated_app(30);
    app.draw().unwrap();

    app.handle_key(key('a'));
    app.draw().unwrap();
    app.draw().unwrap();

    assert_pinned_to_end(&app);
    let text = list_lines(&app).join("\n");
    assert!(text.contains("Sent message 31"), "{text}");
}

#[test]
fn append_while_scrolled_up_keeps_position() {
    let mut app = generated_app(30);
    app.draw().unwrap();
    app.draw().unwrap();

    app.handle_key(KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE));
    app.draw().unwrap();
    app.draw().unwrap();
    let before = app.scroll_top();
    let screen_before = list_lines(&app);

    app.handle_key(key('a'));
    app.draw().unwrap();

    assert_eq!(app.anchor_mode(), AnchorMode::UserScrolled);
    assert_eq!(app.scroll_top(), before);
    assert_eq!(list_lines(&app), screen_before);
}

#[test]
fn image_load_while_at_end_stays_pinned() {
    let mut app = generated_app(10);
    app.handle_key(key('i'));
    app.draw().unwrap();
    app.draw().unwrap();
    let height_before = app.list().total_height();
    assert!(list_lines(&app).join("\n").contains("[loading image…]"));

    for _ in 0..IMAGE_DELAY_TICKS {
        app.tick();
    }
    app.draw().unwrap();
    app.draw().unwrap();

    assert_pinned_to_end(&app);
    assert_eq!(
        app.list().total_height(),
        height_before + usize::from(IMAGE_LINES) - 1
    );
    assert!(!list_lines(&app).join("\n").contains("[loading image…]"));
}

#[test]
fn tick_without_loading_content_requests_no_redraw() {
    let mut app = generated_app(5);
    assert!(!app.tick());
}

#[test]
fn delete_last_while_at_end_stays_pinned() {
    let mut app = generated_app(30);
    app.draw().unwrap();
    app.handle_key(key('x'));
    app.draw().unwrap();
    app.draw().unwrap();

    assert_eq!(app.store().len(), 29);
    assert_pinned_to_end(&app);
}

#[test]
fn delete_middle_while_scrolled_keeps_rows_in_view() {
    let mut app = generated_app(40);
    app.draw().unwrap();
    app.draw().unwrap();
    app.handle_key(KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE));
    app.draw().unwrap();
    app.draw().unwrap();
    let screen_before = list_lines(&app);

    app.handle_key(key('m'));
    app.draw().unwrap();
    app.draw().unwrap();

    assert_eq!(app.store().len(), 39);
    assert_eq!(list_lines(&app), screen_before);
}

#[test]
fn scroll_up_leaves_follow_mode_and_end_restores_it() {
    let mut app = generated_app(30);
    app.draw().unwrap();

    app.handle_key(key('k'));
    assert_eq!(app.anchor_mode(), AnchorMode::UserScrolled);

    app.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
    app.draw().unwrap();
    assert_pinned_to_end(&app);
}

#[test]
fn home_scrolls_to_top() {
    let mut app = generated_app(30);
    app.draw().unwrap();
    app.handle_key(key('g'));
    app.draw().unwrap();

    assert_eq!(app.scroll_top(), 0);
    assert_eq!(list_lines(&app)[0], "");
}

#[test]
fn mouse_wheel_scrolls() {
    let mut app = generated_app(30);
    app.draw().unwrap();
    let before = app.scroll_top();

    app.handle_mouse(MouseEvent {
        kind: MouseEventKind::ScrollUp,
        column: 0,
        row: 0,
        modifiers: KeyModifiers::NONE,
    });

    assert_eq!(app.anchor_mode(), AnchorMode::UserScrolled);
    assert_eq!(app.scroll_top(), before - 3);
}

#[test]
fn new_conversation_resets_to_latest() {
    let mut app = generated_app(30);
    app.draw().unwrap();
    app.handle_key(key('g'));

    app.handle_key(key('n'));
    app.draw().unwrap();
    app.draw().unwrap();

    assert_eq!(app.list().conversation(), Some(ConversationId::new(2)));
    assert_eq!(app.store().len(), 20);
    assert_pinned_to_end(&app);
}

#[test]
fn resize_relayouts_at_new_width() {
    let mut app = generated_app(30);
    app.draw().unwrap();

    app.backend_mut().resize(60, HEIGHT);
    app.draw().unwrap();
    app.draw().unwrap();

    assert_eq!(app.list().viewport().width, 60);
    assert_pinned_to_end(&app);
}

// ===== Simple mode =====

#[test]
fn toggle_switches_list_mode() {
    let mut app = generated_app(5);
    app.handle_key(key('v'));
    assert_eq!(app.mode(), ListMode::Simple);
    app.handle_key(key('v'));
    assert_eq!(app.mode(), ListMode::Virtualized);
}

#[test]
fn simple_mode_draws_same_screen_at_end() {
    let mut app = generated_app(25);
    app.draw().unwrap();
    app.draw().unwrap();
    let virtualized = list_lines(&app);

    app.handle_key(key('v'));
    app.draw().unwrap();

    assert_eq!(app.anchor_mode(), AnchorMode::AtEnd);
    assert_eq!(list_lines(&app), virtualized);
    assert!(screen(&app)[usize::from(HEIGHT) - 1].contains("(simple)"));
}
