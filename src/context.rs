//! Process-wide read-only state
//!
//! The loaded model and the precomputed city ranking, built once at startup
//! and shared by every request. Neither is mutated afterwards, so the
//! context is freely shared across threads behind an `Arc`.

use std::sync::Arc;

use crate::config::Settings;
use crate::model::{load_model, AqiRegressor};
use crate::ranking::CityRanking;

#[derive(Clone)]
pub struct AdvisoryContext {
    model: Option<Arc<dyn AqiRegressor>>,
    ranking: Arc<CityRanking>,
}

impl AdvisoryContext {
    /// Build from explicit collaborators (used by tests and embedders)
    pub fn new(model: Option<Arc<dyn AqiRegressor>>, ranking: CityRanking) -> Self {
        AdvisoryContext {
            model,
            ranking: Arc::new(ranking),
        }
    }

    /// Load the model artifact and aggregate the dataset. Failures leave the
    /// corresponding capability unavailable; they never abort startup.
    pub fn load(settings: &Settings) -> Self {
        tracing::info!("Loading AQI model...");
        let model = load_model(&settings.model_path);

        tracing::info!("Building city ranking...");
        let ranking = CityRanking::load(&settings.dataset_path);

        Self::new(model, ranking)
    }

    pub fn model(&self) -> Option<&dyn AqiRegressor> {
        self.model.as_deref()
    }

    pub fn model_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn ranking(&self) -> &CityRanking {
        &self.ranking
    }
}

impl std::fmt::Debug for AdvisoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryContext")
            .field("model", &self.model.as_ref().map(|m| m.describe()))
            .field("ranked_cities", &self.ranking.len())
            .finish()
    }
}
