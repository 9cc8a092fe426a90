#![doc = "tisys-bridge-core: core logic library for tisys-bridge."]

//! This crate contains the staging pipeline and the tour-to-transportbooking
//! document mapper. Transport specifics (SFTP) and the CLI live in the
//! `tisys-bridge` crate.
//!
//! # Usage
//! Build a [`synchronise::SynchroniseConfig`], provide a
//! [`contract::RemoteConnector`] and a [`contract::LocalStager`], and call
//! [`synchronise::synchronise`]. Use [`mapper::DocumentMapper`] directly to map
//! a single document.

pub mod config;
pub mod contract;
pub mod error;
pub mod fetch;
pub mod lookup;
pub mod mapper;
pub mod source;
pub mod staging;
pub mod synchronise;
pub mod target;
pub mod transform;
