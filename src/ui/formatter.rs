//! Pure formatting functions for CLI output.
//!
//! All display logic is separated from user interaction. Functions here
//! only print; nothing in this module mutates pipeline state.

use crate::boundary::BoundaryWarning;
use crate::dispatch::{BuildTarget, DispatchOutcome};
use crate::policy::BranchRule;
use crate::resolver::ResolutionResult;
use crate::store::ReleaseRecord;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", warning);
}

/// Display the forecast report for a resolution.
///
/// This is the structured report a pull-request check consumes: version,
/// would-release flag, release type and channel.
pub fn display_forecast(resolution: &ResolutionResult) {
    println!("\n\x1b[1mRelease forecast\x1b[0m");
    println!(
        "  Would release: {}",
        if resolution.would_release {
            "\x1b[32myes\x1b[0m"
        } else {
            "\x1b[31mno\x1b[0m"
        }
    );

    if resolution.would_release {
        println!("  Release type:  {}", resolution.release_type);
        println!("  Channel:       {}", resolution.channel);
        println!("  Next version:  \x1b[32m{}\x1b[0m", resolution.next_version);
        println!("  Tag:           {}", resolution.git_tag);
    } else {
        println!("  Channel:       {}", resolution.channel);
    }
}

/// Display the configured branch rules in declaration order.
pub fn display_branch_rules(rules: &[BranchRule]) {
    println!("\x1b[1mBranch rules (first match wins):\x1b[0m");
    for (i, rule) in rules.iter().enumerate() {
        println!(
            "  {}. {} -> {} ({})",
            i + 1,
            rule.pattern,
            rule.channel,
            rule.tag_pattern.pattern
        );
    }
}

/// Display the configured build targets.
pub fn display_targets(targets: &[BuildTarget]) {
    if targets.is_empty() {
        println!("\x1b[1mBuild targets:\x1b[0m (none)");
        return;
    }

    println!("\x1b[1mBuild targets:\x1b[0m");
    for target in targets {
        println!("  - {}", target.identity());
    }
}

/// Display collected artifacts and per-target failures.
pub fn display_dispatch_summary(outcome: &DispatchOutcome) {
    for artifact in &outcome.artifacts {
        display_success(&format!(
            "Built {} ({} bytes, sha256 {})",
            artifact.file_name,
            artifact.size,
            &artifact.checksum[..12]
        ));
    }
    for failure in &outcome.failures {
        display_error(&format!("Target {}: {}", failure.target, failure.reason));
    }
}

/// Display a published release record.
pub fn display_release(record: &ReleaseRecord) {
    println!("\n\x1b[1mPublished release {}\x1b[0m", record.tag);
    for artifact in &record.artifacts {
        println!("  - {}", artifact.file_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error() {
        // Visual verification test - output is printed to stderr
        display_error("test error");
    }

    #[test]
    fn test_display_success() {
        display_success("test success");
    }

    #[test]
    fn test_display_status() {
        display_status("test status");
    }
}
