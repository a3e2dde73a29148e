// ABOUTME: Windows, thresholds, id prefixes and unit conversions used by the engine
// ABOUTME: Re-exports the constant modules of repforge-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use repforge_core::constants::*;
