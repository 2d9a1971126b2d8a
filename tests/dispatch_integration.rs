//! Full-engine dispatch: raw lines in, styled rendered lines out.

use std::sync::{Arc, Mutex};

use termquest::config::RenderConfig;
use termquest::game::world::LocationGraph;
use termquest::game::GameEngine;
use termquest::render::{start_output_queue, MemoryBuffer, MemorySink, StyleClass};

fn engine() -> (GameEngine, Arc<Mutex<MemoryBuffer>>) {
    let (sink, buffer) = MemorySink::new();
    let queue = start_output_queue(RenderConfig::immediate(), Box::new(sink));
    let engine = GameEngine::new(LocationGraph::builtin().unwrap(), queue);
    (engine, buffer)
}

fn texts(buffer: &Arc<Mutex<MemoryBuffer>>) -> Vec<String> {
    buffer.lock().unwrap().line_texts()
}

fn style_of_line_containing(
    buffer: &Arc<Mutex<MemoryBuffer>>,
    needle: &str,
) -> Option<StyleClass> {
    let buffer = buffer.lock().unwrap();
    buffer
        .lines
        .iter()
        .find(|l| l.text().contains(needle))
        .map(|l| l.style)
}

#[tokio::test]
async fn unknown_verb_is_reported_not_thrown() {
    let (mut engine, buffer) = engine();
    engine.dispatch("dance").unwrap();
    engine.output().flush().await;

    assert_eq!(
        style_of_line_containing(&buffer, "command 'dance' not found"),
        Some(StyleClass::Error)
    );
}

#[tokio::test]
async fn start_before_login_is_rejected() {
    let (mut engine, buffer) = engine();
    engine.dispatch("start").unwrap();
    engine.output().flush().await;

    assert!(!engine.world().started);
    assert_eq!(
        style_of_line_containing(&buffer, "you must log in"),
        Some(StyleClass::Error)
    );
}

#[tokio::test]
async fn world_commands_before_start_are_rejected() {
    let (mut engine, buffer) = engine();
    engine.dispatch("register neo").unwrap();
    engine.dispatch("login neo").unwrap();

    for line in ["status", "inventory", "move north", "look"] {
        engine.dispatch(line).unwrap();
    }
    engine.output().flush().await;

    let buffer_texts = texts(&buffer);
    let gate_errors = buffer_texts
        .iter()
        .filter(|t| t.contains("Start the game first"))
        .count();
    assert_eq!(gate_errors, 4);
}

#[tokio::test]
async fn full_scenario_reaches_the_corridor() {
    let (mut engine, buffer) = engine();
    engine.dispatch("register neo").unwrap();
    engine.dispatch("login neo").unwrap();
    engine.dispatch("start").unwrap();
    engine.dispatch("move north").unwrap();
    engine.output().flush().await;

    assert_eq!(engine.world().location, "corridor");
    let all = texts(&buffer);
    assert!(all.iter().any(|t| t.contains("Logged in as: neo")));
    assert!(all.iter().any(|t| t.contains("You head north")));
    assert!(
        all.iter()
            .any(|t| t.contains("A long corridor under dim lighting")),
        "move must trigger a look at the new location"
    );
}

#[tokio::test]
async fn blocked_move_keeps_location_and_reports() {
    let (mut engine, buffer) = engine();
    engine.dispatch("register neo").unwrap();
    engine.dispatch("login neo").unwrap();
    engine.dispatch("start").unwrap();
    engine.dispatch("move west").unwrap(); // dead_end
    engine.dispatch("move west").unwrap(); // no edge
    engine.output().flush().await;

    assert_eq!(engine.world().location, "dead_end");
    assert_eq!(
        style_of_line_containing(&buffer, "You cannot go west"),
        Some(StyleClass::Error)
    );
}

#[tokio::test]
async fn invalid_direction_shows_usage() {
    let (mut engine, buffer) = engine();
    engine.dispatch("register neo").unwrap();
    engine.dispatch("login neo").unwrap();
    engine.dispatch("start").unwrap();
    engine.dispatch("move sideways").unwrap();
    engine.dispatch("move").unwrap();
    engine.output().flush().await;

    let usage_lines = texts(&buffer)
        .iter()
        .filter(|t| t.contains("Usage: move"))
        .count();
    assert_eq!(usage_lines, 2);
}

#[tokio::test]
async fn clear_wipes_screen_then_confirms() {
    let (mut engine, buffer) = engine();
    engine.dispatch("help").unwrap();
    engine.dispatch("clear").unwrap();
    engine.output().flush().await;

    let all = texts(&buffer);
    // Everything before the clear is gone; only the confirmation remains.
    assert!(all.iter().any(|t| t.contains("Screen cleared.")));
    assert!(!all.iter().any(|t| t.contains("AVAILABLE COMMANDS")));
    assert_eq!(buffer.lock().unwrap().clears, 1);
}

#[tokio::test]
async fn every_line_is_echoed_with_the_prompt() {
    let (mut engine, buffer) = engine();
    engine.dispatch("help").unwrap();
    engine.dispatch("register neo").unwrap();
    engine.dispatch("login neo").unwrap();
    engine.dispatch("whoami").unwrap();
    engine.output().flush().await;

    let all = texts(&buffer);
    assert!(all.iter().any(|t| t.contains("user@terminal:~$  help")));
    // After login the echo prompt carries the username.
    assert!(all.iter().any(|t| t.contains("neo@terminal:~$  whoami")));
}

#[tokio::test]
async fn blank_input_is_ignored() {
    let (mut engine, buffer) = engine();
    engine.dispatch("").unwrap();
    engine.dispatch("   ").unwrap();
    engine.output().flush().await;

    assert!(texts(&buffer).is_empty());
    assert!(engine.history_prev().is_none());
}

#[tokio::test]
async fn history_records_everything_and_resets_cursor() {
    let (mut engine, _buffer) = engine();
    engine.dispatch("help").unwrap();
    engine.dispatch("bogus command").unwrap(); // invalid lines count too
    engine.dispatch("look").unwrap();

    assert_eq!(engine.history_prev().as_deref(), Some("look"));
    assert_eq!(engine.history_prev().as_deref(), Some("bogus command"));

    // A new submission resets navigation to "past the end".
    engine.dispatch("about").unwrap();
    assert_eq!(engine.history_prev().as_deref(), Some("about"));
    engine.output().flush().await;
}

#[tokio::test]
async fn whoami_reports_the_active_user_or_hints() {
    let (mut engine, buffer) = engine();
    engine.dispatch("whoami").unwrap();
    engine.dispatch("register trinity").unwrap();
    engine.dispatch("login trinity").unwrap();
    engine.dispatch("whoami").unwrap();
    engine.output().flush().await;

    let all = texts(&buffer);
    assert!(all.iter().any(|t| t.contains("you are not logged in")));
    assert!(all.iter().any(|t| t.contains("Name: trinity")));
}

#[tokio::test]
async fn showusers_lists_registry_and_counts() {
    let (mut engine, buffer) = engine();
    engine.dispatch("register neo").unwrap();
    engine.dispatch("login neo").unwrap();
    engine.dispatch("showusers").unwrap();
    engine.output().flush().await;

    let all = texts(&buffer);
    let listing = all
        .iter()
        .find(|t| t.contains("REGISTERED USERS"))
        .expect("listing rendered");
    assert!(listing.contains("admin"));
    assert!(listing.contains("neo"));
    assert!(listing.contains("← you"));
    // admin (seeded online) + neo
    assert!(all.iter().any(|t| t.contains("Total users: 2 | Online: 2")));
}

#[tokio::test]
async fn admin_login_shows_badge() {
    let (mut engine, buffer) = engine();
    engine.dispatch("login admin").unwrap();
    engine.output().flush().await;
    assert!(texts(&buffer).iter().any(|t| t.contains("SYSTEM ADMINISTRATOR")));
}

#[tokio::test]
async fn granted_items_show_up_in_inventory() {
    let (mut engine, buffer) = engine();
    engine.dispatch("register neo").unwrap();
    engine.dispatch("login neo").unwrap();
    engine.dispatch("start").unwrap();
    engine.add_item("rusty key");
    engine.dispatch("inventory").unwrap();
    engine.output().flush().await;

    let all = texts(&buffer);
    assert!(all.iter().any(|t| t.contains("Item acquired")));
    assert!(all.iter().any(|t| t.contains("• rusty key")));
}
