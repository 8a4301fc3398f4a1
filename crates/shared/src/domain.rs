use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PokemonId(pub i64);

/// How many moves an item shows before it is expanded.
pub const DEFAULT_VISIBLE_MOVES: usize = 4;

/// Display-ready projection of one catalog entry.
///
/// `moves` keeps the ordering of the detail payload and is not deduplicated.
/// `moves_expanded` is presentation state owned by the session; the fetcher
/// always produces it as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: PokemonId,
    pub name: String,
    pub image_url: Option<String>,
    pub moves: Vec<String>,
    #[serde(default)]
    pub moves_expanded: bool,
}

impl CatalogItem {
    /// Moves currently visible: the full list when expanded, otherwise the
    /// first [`DEFAULT_VISIBLE_MOVES`].
    pub fn visible_moves(&self) -> &[String] {
        if self.moves_expanded {
            &self.moves
        } else {
            let shown = self.moves.len().min(DEFAULT_VISIBLE_MOVES);
            &self.moves[..shown]
        }
    }

    /// Moves hidden behind the "show more" affordance.
    pub fn hidden_move_count(&self) -> usize {
        self.moves.len() - self.visible_moves().len()
    }
}
