//! # Game Module
//!
//! The command session engine: user registry, world state machine, command
//! history, and the dispatcher that turns raw input lines into queued markup.
//!
//! ## Components
//!
//! - [`session`] - User registry and the single active session
//! - [`world`] - Location graph, movement, inventory and vitals
//! - [`commands`] - Raw-line parsing into typed commands
//! - [`history`] - Append-only command history with a navigation cursor
//! - [`errors`] - The command error taxonomy
//!
//! ## Dispatch Flow
//!
//! ```text
//! raw line ──► history.push ──► Command::parse ──► handler
//!                                                    │
//!                           reads/mutates Session & World
//!                                                    │
//!                                          markup ──► OutputQueue
//! ```
//!
//! Every command outcome, success or failure, is funneled into the output
//! queue; handlers never write to a sink directly. User-input errors are
//! recovered here and rendered as error-styled lines; only internal
//! invariant violations propagate out of [`GameEngine::dispatch`].

pub mod commands;
pub mod errors;
pub mod history;
pub mod session;
pub mod world;

use anyhow::anyhow;
use log::debug;

use crate::logutil::escape_log;
use crate::render::{QueueHandle, StyleClass};

use self::commands::Command;
use self::errors::GameError;
use self::history::CommandHistory;
use self::session::SessionRegistry;
use self::world::{Direction, LocationGraph, WorldState};

/// The engine instance owning all mutable state: session registry, world,
/// history, and the handle to the output queue. No ambient globals.
pub struct GameEngine {
    registry: SessionRegistry,
    world: WorldState,
    graph: LocationGraph,
    history: CommandHistory,
    output: QueueHandle,
    hostname: String,
}

impl GameEngine {
    pub fn new(graph: LocationGraph, output: QueueHandle) -> Self {
        GameEngine {
            registry: SessionRegistry::new(),
            world: WorldState::new(),
            graph,
            history: CommandHistory::new(),
            output,
            hostname: "terminal".to_string(),
        }
    }

    /// Use `hostname` in the prompt instead of the default `terminal`.
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Current prompt string, `user@host:~$ `, falling back to `user` when
    /// nobody is logged in.
    pub fn prompt(&self) -> String {
        let user = self.registry.active_name().unwrap_or("user");
        format!("{}@{}:~$ ", user, self.hostname)
    }

    /// Enqueue the startup banner.
    pub fn greet(&self) {
        self.say(
            "Type <span class=\"command\">help</span> for the command list.",
            StyleClass::System,
        );
        self.say(
            "Register with <span class=\"command\">register username</span> to get started.",
            StyleClass::System,
        );
    }

    /// Dispatch one raw input line.
    ///
    /// Blank input is ignored. Otherwise the line is appended to history
    /// (cursor reset), echoed with the prompt, parsed, and executed. All
    /// user-facing errors become error-styled queue entries; an internal
    /// invariant violation is returned as a hard error instead.
    pub fn dispatch(&mut self, raw: &str) -> anyhow::Result<()> {
        let input = raw.trim();
        if input.is_empty() {
            return Ok(());
        }

        self.history.push(input);
        debug!("dispatch: {}", escape_log(input));

        self.say(
            format!("<span class=\"prompt\">{}</span> {}", self.prompt(), input),
            StyleClass::Plain,
        );

        let command = match Command::parse(input) {
            Some(command) => command,
            None => return Ok(()),
        };

        let outcome = match command {
            Command::Start => self.cmd_start(),
            Command::Help => self.cmd_help(),
            Command::About => self.cmd_about(),
            Command::Status => self.cmd_status(),
            Command::Inventory => self.cmd_inventory(),
            Command::Clear => self.cmd_clear(),
            Command::Move(arg) => self.cmd_move(arg.as_deref()),
            Command::Look => self.cmd_look(),
            Command::Register(arg) => self.cmd_register(arg.as_deref()),
            Command::Login(arg) => self.cmd_login(arg.as_deref()),
            Command::Logout => self.cmd_logout(),
            Command::ShowUsers => self.cmd_showusers(),
            Command::Whoami => self.cmd_whoami(),
            Command::Unknown(verb) => Err(GameError::UnknownCommand(verb)),
        };

        match outcome {
            Ok(()) => Ok(()),
            Err(GameError::Internal(msg)) => Err(anyhow!("internal state error: {}", msg)),
            Err(err) => {
                self.say(err.to_string(), StyleClass::Error);
                if let Some(hint) = error_hint(&err) {
                    self.say(hint, StyleClass::System);
                }
                Ok(())
            }
        }
    }

    /// Step backward through the command history.
    pub fn history_prev(&mut self) -> Option<String> {
        self.history.prev().map(str::to_string)
    }

    /// Step forward through the command history.
    pub fn history_next(&mut self) -> Option<String> {
        self.history.next().map(str::to_string)
    }

    pub fn output(&self) -> &QueueHandle {
        &self.output
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    /// Grant an item to the player and announce it.
    pub fn add_item(&mut self, item: &str) {
        self.world.add_item(item);
        self.say(
            format!("Item acquired: <span class=\"command\">{}</span>", item),
            StyleClass::Success,
        );
    }

    fn say(&self, markup: impl Into<String>, style: StyleClass) {
        self.output.enqueue(markup, style);
    }

    // === command handlers ===

    fn cmd_start(&mut self) -> Result<(), GameError> {
        let user = match self.registry.active_user()? {
            Some(record) => record.name.clone(),
            None => return Err(GameError::NotAuthenticated),
        };
        self.world.start();
        self.say("=== GAME MODULE ONLINE ===", StyleClass::System);
        self.say(
            format!("Welcome, <span class=\"current-user\">{}</span>!", user),
            StyleClass::Game,
        );
        self.say(
            "You find yourself in a dark room. Silence all around...",
            StyleClass::Game,
        );
        self.say("What will you do?", StyleClass::Game);
        self.cmd_status()
    }

    fn cmd_help(&self) -> Result<(), GameError> {
        let user_commands = if self.registry.is_logged_in() {
            "<span class=\"command\">whoami</span>    - show the current user<br>\
             <span class=\"command\">logout</span>    - log out<br>\
             <span class=\"command\">showusers</span> - list all users"
        } else {
            "<span class=\"command\">register [name]</span> - register a new user<br>\
             <span class=\"command\">login [name]</span>    - log in as a user"
        };
        let current = self.registry.active_name().unwrap_or("not logged in");
        let help = format!(
            "<span class=\"title\">=== AVAILABLE COMMANDS ===</span><br><br>\
             {user_commands}<br>\
             <span class=\"command\">start</span>      - start the game (login required)<br>\
             <span class=\"command\">status</span>     - show system status<br>\
             <span class=\"command\">inventory</span>  - show your inventory<br>\
             <span class=\"command\">move [direction]</span> - move north, south, east or west<br>\
             <span class=\"command\">look</span>       - look around<br>\
             <span class=\"command\">clear</span>      - clear the screen<br>\
             <span class=\"command\">about</span>      - about this system<br>\
             <span class=\"command\">help</span>       - this help<br><br>\
             <span class=\"system-message\">Current user: {current}</span>"
        );
        self.say(help, StyleClass::System);
        Ok(())
    }

    fn cmd_about(&self) -> Result<(), GameError> {
        self.say(
            "<span class=\"title\">=== CONSOLE TERMINAL v2.0 ===</span><br><br>\
             <span class=\"system-message\">User system:</span><br>\
             - registration and login without passwords<br>\
             - online user tracking<br>\
             - dynamic prompt<br><br>\
             <span class=\"system-message\">User commands:</span><br>\
             • register, login, logout, whoami, showusers<br><br>\
             <span class=\"system-message\">A text adventure with a user registry.</span>",
            StyleClass::System,
        );
        Ok(())
    }

    fn cmd_status(&self) -> Result<(), GameError> {
        self.world.ensure_started()?;
        let user_line = match self.registry.active_name() {
            Some(name) => format!("User: <span class=\"current-user\">{}</span>", name),
            None => "User: not logged in".to_string(),
        };
        let status = format!(
            "<span class=\"title\">=== SYSTEM STATUS ===</span><br>\
             {user_line}<br>\
             Location: <span class=\"location\">{}</span><br>\
             Health: {}%<br>\
             Energy: {}%<br>\
             Level: {}<br>\
             Items: {}",
            self.world.location,
            self.world.health,
            self.world.energy,
            self.world.level,
            self.world.inventory.len()
        );
        self.say(status, StyleClass::System);
        Ok(())
    }

    fn cmd_inventory(&self) -> Result<(), GameError> {
        self.world.ensure_started()?;
        if self.world.inventory.is_empty() {
            self.say("Inventory is empty.", StyleClass::System);
            return Ok(());
        }
        self.say(
            "<span class=\"title\">=== INVENTORY ===</span>",
            StyleClass::System,
        );
        for item in &self.world.inventory {
            self.say(format!("• {}", item), StyleClass::Game);
        }
        Ok(())
    }

    fn cmd_clear(&self) -> Result<(), GameError> {
        // Bypasses the normal append: discards everything queued and
        // rendered, then confirms.
        self.output.clear();
        self.say("Screen cleared.", StyleClass::System);
        Ok(())
    }

    fn cmd_move(&mut self, arg: Option<&str>) -> Result<(), GameError> {
        self.world.ensure_started()?;
        let direction: Direction = arg
            .ok_or_else(|| GameError::InvalidDirection(String::new()))?
            .parse()?;
        let location = self.world.move_in(direction, &self.graph)?.to_string();
        self.say(
            format!(
                "You head {}. You are now in: <span class=\"location\">{}</span>",
                direction, location
            ),
            StyleClass::Success,
        );
        self.cmd_look()
    }

    fn cmd_look(&self) -> Result<(), GameError> {
        let description = self.world.look(&self.graph)?.to_string();
        self.say(
            format!(
                "<span class=\"location\">{}</span>: {}",
                self.world.location, description
            ),
            StyleClass::Game,
        );
        Ok(())
    }

    fn cmd_register(&mut self, arg: Option<&str>) -> Result<(), GameError> {
        let Some(raw) = arg else {
            self.say("Usage: register [username]", StyleClass::Error);
            return Ok(());
        };
        let name = self.registry.register(raw)?.name.clone();
        self.say(
            format!("User '{}' registered successfully.", name),
            StyleClass::Success,
        );
        self.say(
            format!(
                "You can now log in with: <span class=\"command\">login {}</span>",
                name
            ),
            StyleClass::System,
        );
        Ok(())
    }

    fn cmd_login(&mut self, arg: Option<&str>) -> Result<(), GameError> {
        let Some(raw) = arg else {
            self.say("Usage: login [username]", StyleClass::Error);
            return Ok(());
        };
        let (name, is_admin) = {
            let record = self.registry.login(raw)?;
            (record.name.clone(), record.is_admin)
        };
        self.say(
            format!("Logged in as: <span class=\"current-user\">{}</span>", name),
            StyleClass::Success,
        );
        if is_admin {
            self.say(
                "<span class=\"admin-badge\">⚡ SYSTEM ADMINISTRATOR</span>",
                StyleClass::System,
            );
        }
        Ok(())
    }

    fn cmd_logout(&mut self) -> Result<(), GameError> {
        let name = self.registry.logout()?;
        self.say(
            format!("Logged out: <span class=\"current-user\">{}</span>", name),
            StyleClass::Success,
        );
        Ok(())
    }

    fn cmd_showusers(&self) -> Result<(), GameError> {
        let mut listing = String::from("<span class=\"title\">=== REGISTERED USERS ===</span><br>");
        for user in self.registry.users() {
            let status = if user.is_online {
                "<span class=\"user-online\">● online</span>"
            } else {
                "<span class=\"user-offline\">● offline</span>"
            };
            let badge = if user.is_admin {
                " <span class=\"admin-badge\">[ADMIN]</span>"
            } else {
                ""
            };
            let you = if self.registry.active_name() == Some(user.name.as_str()) {
                " <span class=\"current-user\">← you</span>"
            } else {
                ""
            };
            listing.push_str(&format!(
                "• <strong>{}</strong>{} {}{}<br>  Registered: {}<br>",
                user.name,
                badge,
                status,
                you,
                user.registered_at.format("%Y-%m-%d")
            ));
        }
        self.say(listing, StyleClass::System);
        self.say(
            format!(
                "Total users: {} | Online: {}",
                self.registry.user_count(),
                self.registry.online_set().len()
            ),
            StyleClass::System,
        );
        Ok(())
    }

    fn cmd_whoami(&self) -> Result<(), GameError> {
        let Some(user) = self.registry.active_user()? else {
            return Err(GameError::NoActiveSession);
        };
        let role = if user.is_admin {
            "<span class=\"admin-badge\">Administrator</span>"
        } else {
            "User"
        };
        let info = format!(
            "<span class=\"title\">=== USER INFO ===</span><br>\
             Name: <span class=\"current-user\">{}</span><br>\
             Status: <span class=\"user-online\">● online</span><br>\
             Role: {}<br>\
             Registered: {}",
            user.name,
            role,
            user.registered_at.format("%Y-%m-%d")
        );
        self.say(info, StyleClass::System);
        Ok(())
    }
}

/// Follow-up hint for some recoverable errors, mirroring the terminal's
/// conversational tone.
fn error_hint(err: &GameError) -> Option<String> {
    match err {
        GameError::NotAuthenticated => Some(
            "Use <span class=\"command\">register username</span> or \
             <span class=\"command\">login username</span>."
                .to_string(),
        ),
        GameError::UnknownUser(name) => Some(format!(
            "Register first with: <span class=\"command\">register {}</span>",
            name
        )),
        GameError::NoActiveSession => Some(
            "Use <span class=\"command\">login</span> or <span class=\"command\">register</span>."
                .to_string(),
        ),
        _ => None,
    }
}
