//! PokeAPI REST client

use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{FetchError, RouteError};
use crate::state::{
    BaseStat, FlavorTextEntry, ListPage, PokemonDetail, PokemonSummary, PokemonType, SpeciesInfo,
    MAX_POKEMON_ID,
};
use crate::stat_bar::STAT_MAX;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

const ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Route templates; `[name]` placeholders are filled by [`expand_route`].
pub mod routes {
    pub const POKEMON_LIST: &str = "/pokemon?limit=[limit]&offset=[offset]";
    pub const POKEMON_DETAIL: &str = "/pokemon/[id]";
    pub const POKEMON_SPECIES: &str = "/pokemon-species/[id]";
}

pub fn artwork_uri(id: u16) -> String {
    format!("{ARTWORK_BASE}/{id}.png")
}

pub fn shiny_artwork_uri(id: u16) -> String {
    format!("{ARTWORK_BASE}/shiny/{id}.png")
}

/// Substitute every `[name]` in `template` with its value from `params`.
pub fn expand_route(template: &str, params: &[(&str, String)]) -> Result<String, RouteError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('[') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find(']')
            .ok_or_else(|| RouteError::Unterminated(template.to_string()))?;
        let key = &after[..end];
        let value = params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
            .ok_or_else(|| RouteError::MissingParam(key.to_string()))?;
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Numeric id from a resource URL such as `.../pokemon/25/`.
pub fn id_from_resource_url(url: &str) -> Option<u16> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    next: Option<String>,
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    moves: Vec<PokemonMoveSlot>,
    cries: Option<PokemonCries>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonCries {
    latest: Option<String>,
    legacy: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    flavor_text_entries: Vec<FlavorTextResponse>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextResponse {
    flavor_text: String,
    language: NamedResource,
}

fn list_page(response: ListResponse, offset: u32) -> ListPage {
    let fetched = response.results.len() as u32;
    let entries: Vec<PokemonSummary> = response
        .results
        .into_iter()
        .filter_map(|entry| {
            let id = id_from_resource_url(&entry.url)?;
            Some(PokemonSummary {
                id,
                name: entry.name,
                sprite_uri: artwork_uri(id),
            })
        })
        .collect();
    // Past the national dex the listing continues with alternate forms.
    let past_dex = entries.iter().any(|entry| entry.id >= MAX_POKEMON_ID);
    let entries = entries
        .into_iter()
        .filter(|entry| entry.id <= MAX_POKEMON_ID)
        .collect();
    let next_offset = match response.next {
        Some(_) if !past_dex && fetched > 0 => Some(offset + fetched),
        _ => None,
    };
    ListPage {
        offset,
        entries,
        next_offset,
    }
}

fn pokemon_detail(response: PokemonResponse) -> PokemonDetail {
    let mut types: Vec<PokemonType> = response
        .types
        .into_iter()
        .map(|slot| PokemonType {
            slot: slot.slot,
            name: slot.type_info.name,
        })
        .collect();
    types.sort_by_key(|ty| ty.slot);
    PokemonDetail {
        id: response.id,
        name: response.name,
        types,
        stats: response
            .stats
            .into_iter()
            .map(|slot| BaseStat {
                name: slot.stat.name,
                value: slot.base_stat.min(STAT_MAX as u16) as u8,
            })
            .collect(),
        height: response.height,
        weight: response.weight,
        moves: response
            .moves
            .into_iter()
            .map(|slot| slot.move_info.name)
            .collect(),
        cry_uri: response
            .cries
            .and_then(|cries| cries.latest.or(cries.legacy)),
    }
}

fn species_info(response: SpeciesResponse) -> SpeciesInfo {
    SpeciesInfo {
        flavor_text_entries: response
            .flavor_text_entries
            .into_iter()
            .map(|entry| FlavorTextEntry {
                language: entry.language.name,
                text: entry.flavor_text,
            })
            .collect(),
    }
}

/// GET-and-parse accessor bound to one API base URL.
#[derive(Clone, Debug)]
pub struct PokeApi {
    base: String,
    client: reqwest::Client,
}

impl Default for PokeApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl PokeApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url_for(&self, template: &str, params: &[(&str, String)]) -> Result<String, FetchError> {
        Ok(format!("{}{}", self.base, expand_route(template, params)?))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        template: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.url_for(template, params)?;
        let bytes = self.get_bytes(&url).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn fetch_list_page(&self, offset: u32, limit: u32) -> Result<ListPage, FetchError> {
        let response: ListResponse = self
            .get_json(
                routes::POKEMON_LIST,
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;
        Ok(list_page(response, offset))
    }

    pub async fn fetch_pokemon(&self, id: u16) -> Result<PokemonDetail, FetchError> {
        let response: PokemonResponse = self
            .get_json(routes::POKEMON_DETAIL, &[("id", id.to_string())])
            .await?;
        Ok(pokemon_detail(response))
    }

    pub async fn fetch_species(&self, id: u16) -> Result<SpeciesInfo, FetchError> {
        let response: SpeciesResponse = self
            .get_json(routes::POKEMON_SPECIES, &[("id", id.to_string())])
            .await?;
        Ok(species_info(response))
    }
}

static CLIENT: OnceLock<PokeApi> = OnceLock::new();

/// Install the process-wide client. Only the first call wins.
pub fn install(api: PokeApi) {
    if CLIENT.set(api).is_err() {
        tracing::warn!("PokeAPI client already installed");
    }
}

pub fn client() -> &'static PokeApi {
    CLIENT.get_or_init(PokeApi::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn expands_route_placeholders() {
        let route = expand_route(routes::POKEMON_DETAIL, &[("id", "25".into())]).unwrap();
        assert_eq!(route, "/pokemon/25");

        let route = expand_route(
            routes::POKEMON_LIST,
            &[("offset", "42".into()), ("limit", "21".into())],
        )
        .unwrap();
        assert_eq!(route, "/pokemon?limit=21&offset=42");
    }

    #[test]
    fn route_errors() {
        assert_eq!(
            expand_route(routes::POKEMON_SPECIES, &[]),
            Err(RouteError::MissingParam("id".into()))
        );
        assert_eq!(
            expand_route("/pokemon/[id", &[("id", "1".into())]),
            Err(RouteError::Unterminated("/pokemon/[id".into()))
        );
    }

    #[test]
    fn parses_ids_from_resource_urls() {
        assert_eq!(
            id_from_resource_url("https://pokeapi.co/api/v2/pokemon/25/"),
            Some(25)
        );
        assert_eq!(id_from_resource_url("https://pokeapi.co/api/v2/pokemon/7"), Some(7));
        assert_eq!(id_from_resource_url("https://pokeapi.co/api/v2/pokemon/"), None);
    }

    #[test]
    fn artwork_templates_depend_only_on_id() {
        assert!(artwork_uri(1).ends_with("/official-artwork/1.png"));
        assert!(shiny_artwork_uri(1).ends_with("/official-artwork/shiny/1.png"));
    }

    #[test]
    fn list_page_tracks_next_offset() {
        let response: ListResponse = serde_json::from_value(json!({
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=2&limit=2",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }))
        .unwrap();
        let page = list_page(response, 0);
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.entries[1].id, 2);
        assert_eq!(page.entries[1].sprite_uri, artwork_uri(2));
        assert_eq!(page.next_offset, Some(2));
    }

    #[test]
    fn list_page_stops_at_end_of_national_dex() {
        let response: ListResponse = serde_json::from_value(json!({
            "next": "https://pokeapi.co/api/v2/pokemon?offset=1026&limit=2",
            "results": [
                {"name": "pecharunt", "url": "https://pokeapi.co/api/v2/pokemon/1025/"},
                {"name": "deoxys-attack", "url": "https://pokeapi.co/api/v2/pokemon/10001/"}
            ]
        }))
        .unwrap();
        let page = list_page(response, 1024);
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].name, "pecharunt");
        assert_eq!(page.next_offset, None);
    }

    #[test]
    fn pokemon_detail_maps_fields() {
        let response: PokemonResponse = serde_json::from_value(json!({
            "id": 6,
            "name": "charizard",
            "height": 17,
            "weight": 905,
            "types": [
                {"slot": 2, "type": {"name": "flying", "url": ""}},
                {"slot": 1, "type": {"name": "fire", "url": ""}}
            ],
            "stats": [
                {"base_stat": 78, "effort": 0, "stat": {"name": "hp", "url": ""}},
                {"base_stat": 300, "effort": 0, "stat": {"name": "attack", "url": ""}}
            ],
            "moves": [
                {"move": {"name": "mega-punch", "url": ""}},
                {"move": {"name": "fire-punch", "url": ""}}
            ],
            "cries": {"latest": null, "legacy": "https://example.test/6.ogg"}
        }))
        .unwrap();
        let detail = pokemon_detail(response);
        assert_eq!(detail.type_names().collect::<Vec<_>>(), vec!["fire", "flying"]);
        assert_eq!(detail.stats[1].value, 255, "values clamp to the stat scale");
        assert_eq!(detail.moves, vec!["mega-punch", "fire-punch"]);
        assert_eq!(detail.cry_uri.as_deref(), Some("https://example.test/6.ogg"));
    }

    #[test]
    fn species_keeps_language_codes() {
        let response: SpeciesResponse = serde_json::from_value(json!({
            "flavor_text_entries": [
                {"flavor_text": "Une graine", "language": {"name": "fr", "url": ""}},
                {"flavor_text": "A strange seed", "language": {"name": "en", "url": ""}}
            ]
        }))
        .unwrap();
        let species = species_info(response);
        assert_eq!(species.flavor_text_entries[0].language, "fr");
        assert_eq!(species.english_flavor_text().as_deref(), Some("A strange seed"));
    }
}
