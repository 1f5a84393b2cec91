// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod analyze_api_test;
mod full_scan_api_test;
mod health_check;
pub mod helpers;
