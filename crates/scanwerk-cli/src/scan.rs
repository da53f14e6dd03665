// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `scanwerk scan` — drive one session on the virtual device and place the
// output.

use tracing::info;

use scanwerk_core::error::Result;
use scanwerk_core::ScanOptions;
use scanwerk_device::session::{ScanSessionController, StdinPrompt};
use scanwerk_device::simulator::{VirtualProfile, VirtualScanner};
use scanwerk_output::OutputPipeline;

use crate::args::ScanArgs;

pub fn run(args: ScanArgs) -> Result<()> {
    let profile = VirtualProfile {
        feeder_page_count: args.pages,
        ..VirtualProfile::default()
    };
    let options = args.to_options();
    options.validate()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_async(profile, options))
}

async fn run_async(profile: VirtualProfile, options: ScanOptions) -> Result<()> {
    let (device, events) = VirtualScanner::new(profile);
    let session = ScanSessionController::new(device, events, options.clone(), StdinPrompt);

    let pages = session.run().await?;
    info!(pages = pages.len(), "session finished, placing output");

    let report = OutputPipeline::new(options).run(&pages)?;
    for path in report.primary_paths() {
        println!("{}", path.display());
    }
    Ok(())
}
