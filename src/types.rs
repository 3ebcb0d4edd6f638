use chrono::NaiveDate;

pub type GameId = u32;

/// One row of the game list. Immutable for the duration of a sort; the
/// engine only ever reorders, it never rewrites fields.
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    /// Unique, stable identifier. Duplicates are a precondition violation.
    pub id: GameId,
    pub white: String,
    pub white_elo: Option<u16>,
    pub black: String,
    pub black_elo: Option<u16>,
    pub date: Option<NaiveDate>,
    pub site_or_event: String,
    pub round: u32,
    pub result: GameResult,
    pub eco: String,
    pub ply_count: u32,
    /// Opaque move encoding, one symbol per ply. Produced by an external
    /// codec; the sorter only needs tokens out of it via a `MoveDecoder`.
    pub move_blob: Vec<u8>,
}

/// Game results in their list display order: decisive results first,
/// draws next, unresolved games last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    #[default]
    Unresolved,
}

impl GameResult {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "1-0" => Self::WhiteWin,
            "0-1" => Self::BlackWin,
            "1/2-1/2" => Self::Draw,
            _ => Self::Unresolved,
        }
    }
}

/// Sortable columns of the game list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Id,
    White,
    WhiteElo,
    Black,
    BlackElo,
    Date,
    SiteOrEvent,
    Round,
    Result,
    Eco,
    PlyCount,
    Moves,
}

impl SortColumn {
    pub const ALL: [SortColumn; 12] = [
        SortColumn::Id,
        SortColumn::White,
        SortColumn::WhiteElo,
        SortColumn::Black,
        SortColumn::BlackElo,
        SortColumn::Date,
        SortColumn::SiteOrEvent,
        SortColumn::Round,
        SortColumn::Result,
        SortColumn::Eco,
        SortColumn::PlyCount,
        SortColumn::Moves,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Columns where the first click should put the *largest* values on
    /// top (ratings, dates). Fixed per-column constant.
    pub fn reversed_by_default(self) -> bool {
        matches!(
            self,
            SortColumn::WhiteElo | SortColumn::BlackElo | SortColumn::Date
        )
    }
}
