// ABOUTME: Helper modules for repforge-cli
// ABOUTME: Output formatting shared by every command
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod display;
