// ABOUTME: Error types of the achievement engine, shared with the foundation crate
// ABOUTME: Re-exports AppError, ErrorCode and AppResult from repforge-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use repforge_core::errors::*;
