//! Stateless proxy to the expansion service.

use axum::{extract::State, Json};
use proteomyx_common::ApiError;
use proteomyx_graph::{ExpansionMethod, Interactome, NetworkRecipe, SeedList};
use serde::Deserialize;
use serde_json::Value;

use crate::extract::ApiQuery;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct NetworkQuery {
    pub seeds: Option<String>,
    #[serde(rename = "expansionMethod")]
    pub expansion_method: Option<String>,
    pub interactome: Option<String>,
}

impl NetworkQuery {
    /// Seeds are taken as given; clients uppercase them before sending.
    fn recipe(&self) -> Result<NetworkRecipe, ApiError> {
        let seeds = SeedList::from_query(self.seeds.as_deref().unwrap_or_default())?;
        Ok(NetworkRecipe::new(
            seeds,
            ExpansionMethod::parse(self.expansion_method.as_deref().unwrap_or_default()),
            Interactome::parse(self.interactome.as_deref().unwrap_or_default()),
        ))
    }
}

/// GET /network - Expanded network for the seeds, body passed through as received
pub async fn get_network(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<NetworkQuery>,
) -> Result<Json<Value>, ApiError> {
    let recipe = query.recipe()?;
    let body = state.expansion.fetch_raw(&recipe).await?;
    Ok(Json(body))
}
