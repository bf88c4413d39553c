//! CLI command for `solbuild doctor`
//!
//! Checks the configured tools and the solution, reporting issues with
//! suggestions.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::commands::{find_solution, load_solution};
use crate::cli::output::{is_json, is_quiet, print_detail, print_info, print_success, print_warning, status};
use crate::core::doctor::run_doctor;
use crate::core::settings::Settings;
use crate::infra::dirs::SolbuildDirs;

/// Execute the doctor command
pub fn execute(solution: Option<PathBuf>) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    // Without a solution only the global settings and tools are checked
    let solution = match solution {
        Some(path) => Some(path),
        None => find_solution(&cwd).ok(),
    };

    let loaded = solution.as_deref().map(load_solution).transpose()?;
    let solution_dir = loaded
        .as_ref()
        .map_or(cwd, |l| l.solution.directory().to_path_buf());

    let settings = Settings::load_layered(&SolbuildDirs::new(), &solution_dir, None)
        .context("Failed to load settings")?;
    let config = settings.resolve(&solution_dir);
    let report = run_doctor(&config, loaded.as_ref().map(|l| (&l.graph, &l.sequence)));
    let code = i32::from(!report.all_required_passed());

    // JSON output mode
    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_passed() { "success" } else if code == 0 { "warning" } else { "error" },
            "checks": report.checks,
            "solution_issues": report.solution_issues,
            "passed_count": report.passed_count(),
            "total_count": report.checks.len()
        });
        println!("{}", serde_json::to_string_pretty(&json_result)?);
        return Ok(code);
    }

    // Quiet mode - only show errors
    if is_quiet() {
        for check in report.failed_required() {
            eprintln!("{} Missing required: {}", status::ERROR, check.name);
        }
        return Ok(code);
    }

    print_info("Checking tools...");
    println!();

    for check in &report.checks {
        let location = check
            .location
            .as_ref()
            .map(|p| format!(" ({})", p.display()))
            .unwrap_or_default();
        let required = if check.required { "" } else { " [optional]" };

        if check.passed {
            println!("  {} {}{location}{required}", status::SUCCESS, check.name);
        } else {
            println!("  {} {}{required}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    if !report.solution_issues.is_empty() {
        println!();
        print_warning("Solution issues:");
        for issue in &report.solution_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    let passed = report.passed_count();
    let total = report.checks.len();
    if report.all_passed() {
        print_success(&format!("All checks passed ({passed}/{total})"));
    } else if code == 0 {
        print_warning(&format!("{passed}/{total} checks passed"));
        print_detail("Builds can run; see the warnings above.");
    } else {
        println!("{} {passed}/{total} checks passed", status::ERROR);
        print_detail("Configure the missing tools before building.");
    }

    Ok(code)
}
