//! Asset loading
//!
//! Resolving and fetching asset bytes is delegated to an [`AssetLoader`]. The
//! export pipeline only decides how an already-loaded payload is written to
//! disk and referenced.

mod directory;
mod embedded;

pub use directory::DirectoryAssetLoader;
pub use embedded::EmbeddedAssetLoader;

use crate::domain::{AssetMap, Edition, Production, Result};
use async_trait::async_trait;

/// Loads the assets an edition needs
///
/// Implementations return one entry per asset, keyed by asset id, with `data`
/// holding the in-memory payload (for raster images a
/// `data:image/<subtype>;base64,` URI).
///
/// # Example
///
/// ```no_run
/// use folio::adapters::assets::{AssetLoader, EmbeddedAssetLoader};
/// use folio::domain::{Edition, Production};
///
/// # async fn example(production: &Production, edition: &Edition) -> folio::domain::Result<()> {
/// let loader = EmbeddedAssetLoader;
/// let assets = loader.load_assets(production, edition).await?;
/// println!("{} asset(s) loaded", assets.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Loads every asset of `production` used by `edition`
    ///
    /// # Errors
    ///
    /// Returns an error if an asset cannot be fetched. The export aborts.
    async fn load_assets(&self, production: &Production, edition: &Edition) -> Result<AssetMap>;
}
