//! Share module: the single capability set the share layer exposes.
//!
//! [`ShareModule`] composes an [`Availability`](quadrant_share_api::Availability)
//! checker with a [`ShareGetter`](quadrant_share_api::ShareGetter) and adds no
//! logic of its own. [`ShareApi`] mirrors the same operations as plain
//! function fields for transport layers.
//!
//! Configuration comes from [`ShareArgs`] and [`AvailabilityArgs`], which are
//! both CLI arguments and the sections of the persisted [`ShareConfig`].

#![warn(missing_docs)]

mod api;
mod args;
mod builder;
mod config;
pub mod logging;
mod module;

pub use api::{ApiFuture, ShareApi};
pub use args::{AvailabilityArgs, ShareArgs};
pub use builder::{
    FullShareModule, LightShareModule, ModuleService, ModuleStore, build_full_module,
    build_light_module, open_store,
};
pub use config::ShareConfig;
pub use module::{Module, ShareModule};
