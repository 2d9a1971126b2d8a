//! World state machine: the immutable location graph, movement, inventory and
//! vitals. All mutation happens through dispatched commands; `started` gates
//! every world command until `start` is issued by a logged-in user.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game::errors::GameError;

/// The entry room every new game starts in.
pub const START_LOCATION_ID: &str = "dark_room";

/// Fallback description for a location with no registered description.
/// The graph is expected to be total, but a gap must not crash the renderer.
pub const UNKNOWN_PLACE: &str = "An unknown place...";

/// Embedded copy of the default rooms seed, used when no seed file is
/// configured or present on disk.
const BUILTIN_ROOMS: &str = include_str!("../../data/rooms.json");

/// The four cardinal directions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north" => Ok(Direction::North),
            "south" => Ok(Direction::South),
            "east" => Ok(Direction::East),
            "west" => Ok(Direction::West),
            other => Err(GameError::InvalidDirection(other.to_string())),
        }
    }
}

/// One room in the seed file: id, static description, and its exits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSeed {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub exits: HashMap<Direction, String>,
}

#[derive(Debug, Clone)]
struct RoomRecord {
    description: String,
    exits: HashMap<Direction, String>,
}

/// Immutable location graph: `LocationId -> (description, Direction -> LocationId)`.
/// Loaded once at process start, never mutated afterward.
#[derive(Debug, Clone)]
pub struct LocationGraph {
    rooms: HashMap<String, RoomRecord>,
}

impl LocationGraph {
    /// Build a graph from seed records, validating that the entry room exists
    /// and that every exit points at a known room.
    pub fn from_seeds(seeds: Vec<RoomSeed>) -> Result<Self, GameError> {
        let mut rooms = HashMap::with_capacity(seeds.len());
        for seed in &seeds {
            rooms.insert(
                seed.id.clone(),
                RoomRecord {
                    description: seed.description.clone(),
                    exits: seed.exits.clone(),
                },
            );
        }
        if !rooms.contains_key(START_LOCATION_ID) {
            return Err(GameError::Internal(format!(
                "rooms seed is missing the entry room '{}'",
                START_LOCATION_ID
            )));
        }
        for seed in &seeds {
            for (direction, target) in &seed.exits {
                if !rooms.contains_key(target) {
                    return Err(GameError::Internal(format!(
                        "room '{}' exit {} points at unknown room '{}'",
                        seed.id, direction, target
                    )));
                }
            }
        }
        Ok(LocationGraph { rooms })
    }

    /// Load a graph from a rooms seed JSON file.
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GameError::Internal(format!("cannot read '{}': {}", path.display(), e)))?;
        let seeds: Vec<RoomSeed> = serde_json::from_str(&contents)
            .map_err(|e| GameError::Internal(format!("invalid rooms seed '{}': {}", path.display(), e)))?;
        Self::from_seeds(seeds)
    }

    /// The embedded default seed, verbatim. Used by `termquest init` to
    /// write a starter `data/rooms.json`.
    pub fn builtin_seed_json() -> &'static str {
        BUILTIN_ROOMS
    }

    /// The graph built from the embedded default seed.
    pub fn builtin() -> Result<Self, GameError> {
        let seeds: Vec<RoomSeed> = serde_json::from_str(BUILTIN_ROOMS)
            .map_err(|e| GameError::Internal(format!("embedded rooms seed is invalid: {}", e)))?;
        Self::from_seeds(seeds)
    }

    pub fn contains(&self, location: &str) -> bool {
        self.rooms.contains_key(location)
    }

    /// Exit from `location` in `direction`, if the graph defines one.
    pub fn exit(&self, location: &str, direction: Direction) -> Option<&str> {
        self.rooms
            .get(location)?
            .exits
            .get(&direction)
            .map(|s| s.as_str())
    }

    /// Static description for `location`, if registered.
    pub fn description(&self, location: &str) -> Option<&str> {
        self.rooms.get(location).map(|r| r.description.as_str())
    }
}

/// Mutable world state for the single running game.
#[derive(Debug, Clone)]
pub struct WorldState {
    pub started: bool,
    pub location: String,
    pub inventory: Vec<String>,
    pub health: u8,
    pub energy: u8,
    pub level: u32,
}

impl WorldState {
    pub fn new() -> Self {
        WorldState {
            started: false,
            location: START_LOCATION_ID.to_string(),
            inventory: Vec::new(),
            health: 100,
            energy: 50,
            level: 1,
        }
    }

    /// Mark the game started and reset the location to the entry room.
    /// Authentication gating happens at the dispatch layer.
    pub fn start(&mut self) {
        self.started = true;
        self.location = START_LOCATION_ID.to_string();
    }

    /// Err with [`GameError::NotStarted`] unless `start` has been issued.
    pub fn ensure_started(&self) -> Result<(), GameError> {
        if self.started {
            Ok(())
        } else {
            Err(GameError::NotStarted)
        }
    }

    /// Move in `direction`. On a missing edge the location is left untouched
    /// and [`GameError::BlockedPath`] is returned. On success the new
    /// location id is returned.
    pub fn move_in(&mut self, direction: Direction, graph: &LocationGraph) -> Result<&str, GameError> {
        self.ensure_started()?;
        match graph.exit(&self.location, direction) {
            Some(target) => {
                self.location = target.to_string();
                Ok(&self.location)
            }
            None => Err(GameError::BlockedPath(direction)),
        }
    }

    /// Description of the current location, with a defensive fallback for a
    /// graph gap.
    pub fn look<'a>(&self, graph: &'a LocationGraph) -> Result<&'a str, GameError> {
        self.ensure_started()?;
        Ok(graph.description(&self.location).unwrap_or(UNKNOWN_PLACE))
    }

    /// Append an item to the inventory. No capacity limit.
    pub fn add_item(&mut self, item: &str) {
        self.inventory.push(item.to_string());
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_graph_is_consistent() {
        let graph = LocationGraph::builtin().unwrap();
        assert!(graph.contains(START_LOCATION_ID));
        assert_eq!(graph.exit(START_LOCATION_ID, Direction::North), Some("corridor"));
        assert_eq!(graph.exit("corridor", Direction::North), Some("exit_hall"));
        assert_eq!(graph.exit("dead_end", Direction::North), None);
    }

    #[test]
    fn seed_validation_catches_dangling_exits() {
        let seeds = vec![RoomSeed {
            id: START_LOCATION_ID.to_string(),
            description: "entry".to_string(),
            exits: [(Direction::North, "nowhere".to_string())].into_iter().collect(),
        }];
        assert!(LocationGraph::from_seeds(seeds).is_err());
    }

    #[test]
    fn direction_parsing_is_case_insensitive() {
        assert_eq!("NORTH".parse::<Direction>().unwrap(), Direction::North);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(GameError::InvalidDirection(_))
        ));
    }
}
