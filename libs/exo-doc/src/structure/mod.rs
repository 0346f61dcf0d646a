// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Decomposition of documents into the rows of their three storage tables.

mod id_assigner;
pub(crate) mod storage_value;
#[allow(clippy::module_inception)]
mod structure;
mod structure_builder;

pub use id_assigner::{IdAssigner, IdentityGenerator};
pub use storage_value::StorageValue;
pub use structure::{IndexEntry, Structure, StructureId, UniqueEntry};
pub use structure_builder::StructureBuilder;
