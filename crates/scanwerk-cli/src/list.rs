// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `scanwerk list` — browse the local network for eSCL scanners and report
// what answered.

use std::time::Duration;

use scanwerk_core::error::Result;
use scanwerk_core::types::DiscoveredScanner;
use scanwerk_device::discovery::ScannerDiscovery;

use crate::args::ListArgs;

pub fn run(args: ListArgs) -> Result<()> {
    let mut discovery = ScannerDiscovery::new()?;
    let mut scanners = discovery.discover(Some(Duration::from_secs(args.browse_secs)))?;
    discovery.stop()?;
    discovery.shutdown()?;

    scanners.sort_by(|a, b| a.name.cmp(&b.name));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&scanners)?);
        return Ok(());
    }

    if scanners.is_empty() {
        println!("no scanners found");
        return Ok(());
    }

    for scanner in &scanners {
        print_scanner(scanner);
    }
    Ok(())
}

fn print_scanner(scanner: &DiscoveredScanner) {
    let sources = if scanner.sources.is_empty() {
        "unknown".to_string()
    } else {
        scanner
            .sources
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join("+")
    };

    println!(
        "{}\n  model:   {}\n  uri:     {}\n  sources: {}{}{}",
        scanner.name.trim_end_matches('.'),
        scanner.make_and_model.as_deref().unwrap_or("unknown"),
        scanner.uri,
        sources,
        if scanner.supports_duplex {
            " (duplex)"
        } else {
            ""
        },
        match scanner.location.as_deref() {
            Some(location) => format!("\n  where:   {location}"),
            None => String::new(),
        },
    );
}
