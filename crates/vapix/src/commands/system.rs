//! Server report and system log handlers.

use std::fmt::Write as _;

use vapix_core::{Camera, ServerReport};

use crate::cli::{GlobalOpts, ReportArgs};
use crate::error::CliError;
use crate::output;

pub fn report(camera: &Camera, args: &ReportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let report = camera.server_report()?;

    let rendered = match &args.section {
        Some(name) => {
            let body = report
                .get(name)
                .or_else(|| report.section(name))
                .ok_or_else(|| CliError::NoSuchSection {
                    name: name.clone(),
                    available: report.names().collect::<Vec<_>>().join(", "),
                })?;
            output::render(global.output, body, ToOwned::to_owned)?
        }
        None => output::render(global.output, &report, plain_report)?,
    };
    output::print_output(&rendered)
}

pub fn log(camera: &Camera, global: &GlobalOpts) -> Result<(), CliError> {
    let log = camera.system_log()?;
    let rendered = output::render(global.output, &log, Clone::clone)?;
    output::print_output(&rendered)
}

fn plain_report(report: &ServerReport) -> String {
    let mut out = String::new();
    for (name, body) in report.iter() {
        let _ = writeln!(out, "== {name} ==");
        out.push_str(body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}
