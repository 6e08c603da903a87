//! LFI search - genetic search of laser fault-injection parameters
//!
//! Copyright (C) 2025 Pierre Aubert pierre(at)spinorama(dot)org
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use lfi_search::cli::{Args, validate_args_or_exit};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    validate_args_or_exit(&args);

    let reports = lfi_search::workflow::run(&args)?;

    for (run, report) in reports.iter().enumerate() {
        let status = if report.success { "✅" } else { "⚠️" };
        println!(
            "{} run {}: {} fault points, best fitness {}",
            status,
            run,
            report.fault_archive.len(),
            report
                .best_fitness
                .map(|f| format!("{:.3}", f))
                .unwrap_or_else(|| "n/a".to_string())
        );
        if let Some(best) = &report.best {
            println!("   best parameters: {}", best);
        }
    }

    Ok(())
}
