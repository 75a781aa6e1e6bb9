use std::sync::Arc;

use alloy_primitives::B256;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use message_bridge::outgoing::internal::mmr::Mmr;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::ProofServerError;

/// The authoritative accumulator replica. Request handlers only take read locks.
pub(crate) type SharedMmr = Arc<RwLock<Mmr>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProofResponse {
    pub leaf_index: u64,
    pub proof: Vec<B256>,
    pub total_leaf_count: u64,
}

pub(crate) fn router(mmr: SharedMmr) -> Router {
    Router::new()
        .route("/proof/:leaf_index", get(get_proof))
        .with_state(mmr)
}

async fn get_proof(
    State(mmr): State<SharedMmr>,
    Path(leaf_index): Path<String>,
) -> Result<Json<ProofResponse>, ProofServerError> {
    let leaf_index = leaf_index
        .parse::<u64>()
        .map_err(|_| ProofServerError::InvalidLeafIndex(leaf_index))?;

    let mmr = mmr.read().await;
    let proof = mmr.generate_proof(leaf_index).map_err(|e| {
        warn!(%leaf_index, leaf_count = %mmr.leaf_count(), %e, "failed to generate proof");
        ProofServerError::ProofGeneration(e.to_string())
    })?;

    debug!(%leaf_index, total_leaf_count = %proof.total_leaf_count, "served proof");

    Ok(Json(ProofResponse {
        leaf_index: proof.leaf_index,
        proof: proof.proof.into_iter().map(B256::from).collect(),
        total_leaf_count: proof.total_leaf_count,
    }))
}
