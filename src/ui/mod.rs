// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the labeling tool.

pub mod box_widget;
pub mod canvas;
pub mod prompt;
pub mod properties;
pub mod toolbar;
pub mod viewport;
