// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI configuration loaded from environment variables.

use sleeve_lite_engine::parse_flag;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Scenario used when no path is given on the command line.
    pub scenario_path: Option<String>,
    /// Pretty-print the JSON report.
    pub pretty: bool,
    /// Number of worker threads for parallel intersections.
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            scenario_path: std::env::var("SLEEVE_SCENARIO").ok(),
            pretty: std::env::var("SLEEVE_PRETTY")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            worker_threads: std::env::var("WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(num_cpus::get),
        }
    }
}
