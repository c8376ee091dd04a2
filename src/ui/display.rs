//! Rendering of plans, install reports and installed modules

use std::fmt::Write as _;

use console::Style;

use crate::domain::{InstallOutcome, InstallReport};
use crate::installer::marker::InstallMarker;
use crate::proxy::ProxyReport;
use crate::resolver::InstallPlan;

fn heading(text: &str) -> String {
    Style::new().bold().apply_to(text).to_string()
}

fn outcome_style(outcome: &InstallOutcome) -> Style {
    match outcome {
        InstallOutcome::Installed => Style::new().green(),
        InstallOutcome::SkippedAlreadyInstalled => Style::new().dim(),
        InstallOutcome::Failed(_) => Style::new().red().bold(),
    }
}

/// Numbered install order, pinned modules marked
pub fn render_plan(plan: &InstallPlan) -> String {
    if plan.is_empty() {
        return "No modules found.\n".to_string();
    }

    let mut out = format!("{}\n", heading("Install order:"));
    let width = plan.len().to_string().len();
    for (index, module) in plan.modules().iter().enumerate() {
        let _ = write!(out, "  {:>width$}. {}", index + 1, module.name());
        if plan.is_pinned(index) {
            let _ = write!(out, " {}", Style::new().cyan().apply_to("(pinned)"));
        }
        if !module.dependencies().is_empty() {
            let deps: Vec<&str> = module.dependencies().iter().map(String::as_str).collect();
            let _ = write!(
                out,
                " {}",
                Style::new().dim().apply_to(format!("<- {}", deps.join(", ")))
            );
        }
        out.push('\n');
    }
    out
}

/// Per-module outcomes, proxy failures and a closing summary
pub fn render_report(report: &InstallReport, planned: usize) -> String {
    let mut out = format!("{}\n", heading("Install report:"));
    let width = report
        .entries()
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    for (name, outcome) in report.entries() {
        let _ = writeln!(
            out,
            "  {:<width$}  {}",
            name,
            outcome_style(outcome).apply_to(outcome)
        );
    }

    let not_attempted = planned.saturating_sub(report.entries().len());
    if report.halted() && not_attempted > 0 {
        let _ = writeln!(
            out,
            "  {}",
            Style::new()
                .yellow()
                .apply_to(format!("{not_attempted} module(s) not attempted (--fail-fast)"))
        );
    }

    if !report.proxy_failures().is_empty() {
        let _ = writeln!(out, "{}", heading("Proxy failures:"));
        for failure in report.proxy_failures() {
            let _ = writeln!(out, "  {}", Style::new().yellow().apply_to(failure));
        }
    }

    let installed = count(report, |o| matches!(o, InstallOutcome::Installed));
    let skipped = count(report, |o| matches!(o, InstallOutcome::SkippedAlreadyInstalled));
    let failed = count(report, |o| matches!(o, InstallOutcome::Failed(_)));
    let summary = format!("{installed} installed, {skipped} skipped, {failed} failed");
    let style = if report.is_success() {
        Style::new().green().bold()
    } else {
        Style::new().red().bold()
    };
    let _ = writeln!(out, "{}", style.apply_to(summary));
    out
}

fn count(report: &InstallReport, predicate: impl Fn(&InstallOutcome) -> bool) -> usize {
    report
        .entries()
        .iter()
        .filter(|(_, outcome)| predicate(outcome))
        .count()
}

/// Outcome of a standalone proxy regeneration
pub fn render_proxy_report(report: &ProxyReport) -> String {
    let mut out = format!("Wrote {} proxy script(s).\n", report.written.len());
    for failure in &report.failures {
        let _ = writeln!(out, "  {}", Style::new().yellow().apply_to(failure));
    }
    out
}

/// Installed modules from the marker store
pub fn render_markers(markers: &[InstallMarker], detailed: bool) -> String {
    if markers.is_empty() {
        return "No modules installed.\n".to_string();
    }

    let mut out = format!("{}\n", heading(&format!("Installed modules ({}):", markers.len())));
    for marker in markers {
        let _ = write!(out, "  {}", Style::new().bold().yellow().apply_to(&marker.name));
        if marker.source_changed() == Some(true) {
            let _ = write!(out, " {}", Style::new().red().apply_to("(source changed)"));
        }
        out.push('\n');

        if detailed {
            let mode = if marker.editable { "editable" } else { "copy" };
            let _ = writeln!(out, "    {} {}", heading("Path:"), marker.path.display());
            let _ = writeln!(out, "    {} {}", heading("Mode:"), mode);
            if !marker.entry_points.is_empty() {
                let _ = writeln!(
                    out,
                    "    {} {}",
                    heading("Entry points:"),
                    marker.entry_points.join(", ")
                );
            }
        }
    }
    out
}
