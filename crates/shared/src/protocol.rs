use serde::{Deserialize, Serialize};

/// One page of the batch-list endpoint.
///
/// A payload without a `results` field deserializes as an empty page rather
/// than an error; only a body that is not a JSON object at all is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryPage {
    #[serde(default)]
    pub results: Vec<SummaryRecord>,
}

/// Lightweight listing entry linking to the full detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub name: String,
    pub url: String,
}

/// Full per-entity detail payload. `id`, `name`, `sprites` and `moves` are
/// required; their absence makes the payload malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: i64,
    pub name: String,
    pub sprites: SpriteSet,
    pub moves: Vec<MoveSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSet {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_ref: MoveRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRef {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_results_field_deserializes_as_empty_page() {
        let page: SummaryPage = serde_json::from_str(r#"{"count": 1302}"#).expect("page");
        assert!(page.results.is_empty());
    }

    #[test]
    fn detail_requires_moves_field() {
        let raw = r#"{"id": 1, "name": "bulbasaur", "sprites": {"front_default": null}}"#;
        assert!(serde_json::from_str::<PokemonDetail>(raw).is_err());
    }

    #[test]
    fn detail_tolerates_null_sprite() {
        let raw = r#"{
            "id": 25,
            "name": "pikachu",
            "sprites": {"front_default": null},
            "moves": [{"move": {"name": "thunder-shock"}}]
        }"#;
        let detail: PokemonDetail = serde_json::from_str(raw).expect("detail");
        assert_eq!(detail.sprites.front_default, None);
        assert_eq!(detail.moves[0].move_ref.name, "thunder-shock");
    }
}
