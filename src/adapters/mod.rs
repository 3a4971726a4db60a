//! External system integrations for Folio.
//!
//! - [`assets`] - Asset loading: where asset payloads come from before export
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. The export pipeline only sees the
//! [`assets::AssetLoader`] trait.

pub mod assets;
