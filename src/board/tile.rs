//! Tile kinds and ownership.

/// What a tile currently is on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    /// Claimed area (or empty ground when unowned).
    #[default]
    Position,
    /// A wall laid by its owner. Walls bound enclosures.
    Wall,
}

impl TileKind {
    /// Returns the numeric wire code used by the match API.
    pub const fn code(self) -> u8 {
        match self {
            TileKind::Position => 0,
            TileKind::Wall => 1,
        }
    }

    /// Parses a tile kind from its wire code.
    pub fn from_code(code: u8) -> Option<TileKind> {
        match code {
            0 => Some(TileKind::Position),
            1 => Some(TileKind::Wall),
            _ => None,
        }
    }
}

/// A single grid tile: its kind and owning player, if any.
///
/// An unowned tile is empty regardless of its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    pub kind: TileKind,
    pub owner: Option<usize>,
}

impl Tile {
    /// An unowned, empty tile.
    pub const EMPTY: Tile = Tile {
        kind: TileKind::Position,
        owner: None,
    };

    pub const fn wall(owner: usize) -> Self {
        Tile {
            kind: TileKind::Wall,
            owner: Some(owner),
        }
    }

    pub const fn area(owner: usize) -> Self {
        Tile {
            kind: TileKind::Position,
            owner: Some(owner),
        }
    }

    /// Returns true if this is a wall owned by `owner`.
    pub fn is_wall_of(&self, owner: usize) -> bool {
        self.kind == TileKind::Wall && self.owner == Some(owner)
    }

    /// Returns true if this is a wall owned by anyone other than `owner`.
    pub fn is_foreign_wall(&self, owner: usize) -> bool {
        self.kind == TileKind::Wall && matches!(self.owner, Some(o) if o != owner)
    }
}
