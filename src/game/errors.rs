use thiserror::Error;

use crate::game::world::Direction;
use crate::validation::UsernameError;

/// Errors produced by session, world and dispatch operations.
///
/// Every variant except [`GameError::Internal`] is recovered at the dispatch
/// boundary and rendered as an error-styled queue entry, so the Display
/// strings are the user-facing messages; none of them abort the process.
/// `Internal` marks a programming invariant violation and is propagated
/// instead of being shown as a normal command error.
#[derive(Debug, Error)]
pub enum GameError {
    /// The username failed the registry's shape rules.
    #[error("Error: {0}.")]
    InvalidUsername(#[from] UsernameError),

    /// Registration with a name that is already taken.
    #[error("Error: user '{0}' already exists.")]
    DuplicateUser(String),

    /// Login with a name that was never registered.
    #[error("Error: user '{0}' not found.")]
    UnknownUser(String),

    /// Logout (or whoami detail) without anyone logged in.
    #[error("Error: you are not logged in.")]
    NoActiveSession,

    /// A command that requires a logged-in user.
    #[error("Error: you must log in to start the game.")]
    NotAuthenticated,

    /// A world command issued before `start`.
    #[error("Start the game first with the <span class=\"command\">start</span> command.")]
    NotStarted,

    /// A direction outside the four cardinal values (or none at all).
    #[error("Usage: move [north|south|east|west]")]
    InvalidDirection(String),

    /// Movement along an edge the location graph does not define.
    #[error("You cannot go {0}.")]
    BlockedPath(Direction),

    /// A verb the dispatcher does not recognize.
    #[error("Error: command '{0}' not found. Type 'help' for the command list.")]
    UnknownCommand(String),

    /// Invariant violation (e.g. active user absent from the registry).
    /// Never shown as a regular command error.
    #[error("internal state error: {0}")]
    Internal(String),
}
