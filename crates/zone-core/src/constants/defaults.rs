// ABOUTME: Default values applied when environment configuration is absent
// ABOUTME: Server port, database pool sizing and session listing limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default HTTP port
pub const HTTP_PORT: u16 = 8080;

/// Default maximum database connections
pub const DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Sessions returned when no search filter is supplied
pub const RECENT_SESSIONS_LIMIT: u32 = 10;

/// Upper bound on sessions returned by a username search
pub const SESSION_SEARCH_LIMIT: u32 = 500;
