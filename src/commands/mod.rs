// Copyright (c) 2025 Fios e Panos LTDA.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod courses;
pub mod doctor;
pub mod exporter;
pub mod fees;
pub mod ledger;
pub mod mask;
pub mod rates;
pub mod tables;
pub mod years;
