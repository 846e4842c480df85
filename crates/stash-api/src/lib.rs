//! JSON API for the stash asset store.
//!
//! Exposes an axum [`Router`] backed by any [`stash_core::store::AssetStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility — every
//! mutating route assumes an upstream gate has already authenticated the
//! caller.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stash_api::api_router(store.clone()))
//! ```

pub mod assets;
pub mod error;
pub mod scope;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stash_core::store::AssetStore;

pub use error::ApiError;


/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AssetStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Assets
    .route("/assets", get(assets::list::<S>).post(assets::create::<S>))
    .route("/assets/delete", post(assets::delete_many::<S>))
    .route(
      "/assets/{id}",
      get(assets::get_one::<S>)
        .patch(assets::update_one::<S>)
        .delete(assets::delete_one::<S>),
    )
    .route("/assets/{id}/transfer", post(assets::transfer_one::<S>))
    // Scope maintenance
    .route("/scope/delete", post(scope::delete_scoped::<S>))
    .route("/scope/gc", post(scope::gc_scoped::<S>))
    .with_state(store)
}
