//! Project listing output

use iso_core::{Config, ProjectDescriptor, ProjectStatus};
use owo_colors::OwoColorize;
use std::fmt::Write;

const RULE: &str =
    "------------------------------------------------------------------------------------------------";

/// Render every project in `config`, one block each
pub fn render_projects(config: &Config) -> String {
    if config.projects.is_empty() {
        return format!("{}\n", "No projects configured".dimmed());
    }

    let mut out = String::new();
    for project in config.projects.values() {
        render_project(&mut out, project);
    }
    out
}

/// Print every project in `config`
pub fn print_projects(config: &Config) {
    print!("{}", render_projects(config));
}

fn render_project(out: &mut String, project: &ProjectDescriptor) {
    let mark = if project.is_runnable() {
        "✓".green().to_string()
    } else {
        "X".red().to_string()
    };

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        " {} {}",
        mark,
        format!("[{}]", project.name).bright_white().bold().underline()
    );

    field(out, "Host", &project.host);
    field(out, "Local Folder", &project.local_folder);
    field(out, "Remote Folder", &project.remote_folder);
    field(out, "URL", project.url.as_deref().unwrap_or(""));
    field(out, "Cooldown", &format!("{}s", project.cooldown.as_secs()));
    flag(out, "Desktop Notify", project.notify.desktop);
    flag(out, "Desktop Notify Sound", project.notify.sound);

    if !project.enabled {
        field(out, "Status", "disabled");
    }
    if let ProjectStatus::Invalid(reason) = &project.status {
        let _ = writeln!(
            out,
            "    {:>24} {}",
            "Invalid:".bright_white().bold(),
            reason.red()
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", RULE.white());
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(
        out,
        "    {:>24} {}",
        format!("{}:", label).bright_white().bold(),
        value.cyan()
    );
}

fn flag(out: &mut String, label: &str, on: bool) {
    let value = if on {
        "✓".green().to_string()
    } else {
        "X".red().to_string()
    };
    let _ = writeln!(
        out,
        "    {:>24} {}",
        format!("{}:", label).bright_white().bold(),
        value
    );
}
