// ABOUTME: Service name constants used in structured logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service name for the HTTP server
pub const ZONE_DISTRIBUTION_SERVER: &str = "zone-distribution-server";
