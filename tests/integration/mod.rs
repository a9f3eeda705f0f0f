// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod config_api_test;
pub mod crawl_api_test;
pub mod deployment_test;
pub mod health_check;
pub mod helpers;
