// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: boxes, records, classes and the labeling session.

pub mod annotation;
pub mod classes;
pub mod session;
