//! Access to the public bioinformatics databases behind the phipsi service.
//!
//! - **URL builders** — RCSB PDB, UniProt, QuickGO, NCBI E-utilities and EMDB
//!   in [`fetch`], with identifier validation per source
//! - **Client** — single-attempt async GETs with uniform status mapping in
//!   [`client`]

pub mod client;
pub mod fetch;

pub use client::{SourceClient, USER_AGENT};
pub use fetch::Endpoints;
