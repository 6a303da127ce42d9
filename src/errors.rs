// ABOUTME: Unified error handling re-exported from zone-core
// ABOUTME: Keeps crate::errors paths stable for the rest of the service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use zone_core::errors::*;
