// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The Faturamento core: pure, total functions over the in-memory ledger.
//! Nothing in here touches storage; callers load state, run the pipeline
//! (synchronize, then recalculate) and persist the result.

pub mod chain;
pub mod rows;
pub mod sync;

pub use chain::recalculate;
pub use sync::synchronize;
