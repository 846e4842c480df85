//! Migration shim for call sites written against the legacy DBlob API.
//!
//! Old code talked to an in-browser blob store through a small set of
//! functions (`addDBImageAsset`, `getImageAsset`, `getImageAssetAsBlobURL`,
//! `gcDBImageAssets`, …). This crate keeps that surface, rehomed onto the
//! asset store: the same calls work against the real remote store through
//! the service boundary ([`AssetsClient`]) or against an ephemeral
//! process-local map ([`DblobAssets::ephemeral`]) where no durable backend
//! is reachable at call time. Callers cannot tell which backing store
//! answered them.

mod blob;
mod client;
mod shim;

pub use blob::BlobUrl;
pub use client::{AssetsClient, ClientError};
pub use shim::{DblobAssets, ShimError, mime};

#[cfg(test)]
mod tests;
