//! Route definitions for the HTTP API.

pub mod comments;
pub mod documents;
pub mod folders;
pub mod health;
pub mod shared;
pub mod shares;
pub mod tags;
pub mod versions;

use axum::Router;
use serde::{Deserialize, Deserializer};

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(documents::routes())
        .merge(versions::routes())
        .merge(folders::routes())
        .merge(tags::routes())
        .merge(shares::routes())
        .merge(shared::routes())
        .merge(comments::routes())
        .with_state(state)
}

/// Deserialize a field that distinguishes "absent" from "null".
///
/// Serde collapses both to `None` by default; wrapping the field as
/// `Option<Option<T>>` with this helper keeps the outer layer as
/// presence and the inner layer as the value, so PATCH bodies can clear
/// a nullable column explicitly.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
