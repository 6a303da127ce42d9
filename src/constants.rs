// ABOUTME: Application constants re-exported from zone-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use zone_core::constants::*;
