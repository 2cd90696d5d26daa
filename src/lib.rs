// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod budget;
pub mod cli;
pub mod commands;
pub mod config;
pub mod data;
pub mod db;
pub mod error;
pub mod exchange;
pub mod history;
pub mod logging;
pub mod models;
pub mod portfolio;
pub mod scanner;
pub mod store;
pub mod transfer;
pub mod utils;
