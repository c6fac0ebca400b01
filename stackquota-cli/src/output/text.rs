//! Text output formatting with usage bars and colors.

use chrono::{DateTime, Duration, Local, Utc};
use stackquota_core::{AbsoluteLimits, Limit, QuotaSet, QuotaUsages, ResourceQuota};
use std::collections::BTreeSet;

use super::ServiceStatus;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Usage bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Width of the resource name column.
const NAME_WIDTH: usize = 28;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Set the usage bar width.
    #[allow(dead_code)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    // ========================================================================
    // Usages
    // ========================================================================

    /// Formats a tenant's quota usages, one resource per line.
    pub fn format_usages(&self, tenant_id: &str, usages: &QuotaUsages, exhausted_only: bool) -> String {
        let mut lines = vec![self.bold(&format!("Quota usage for tenant {tenant_id}"))];
        lines.push("─".repeat(64));

        let rows: Vec<String> = usages
            .iter()
            .filter(|(_, usage)| !exhausted_only || usage.is_exhausted())
            .map(|(name, usage)| self.format_resource(name, usage))
            .collect();

        if rows.is_empty() {
            let empty = if exhausted_only {
                "No exhausted resources."
            } else {
                "No quota information available."
            };
            lines.push(self.dim(empty));
        } else {
            lines.extend(rows);
        }

        lines.join("\n")
    }

    /// Formats one resource: name, usage bar, `used / quota`, and what is left.
    pub fn format_resource(&self, name: &str, usage: &ResourceQuota) -> String {
        let Some(used) = usage.used else {
            let blank = " ".repeat(self.bar_width);
            return format!("{name:<width$} {blank} quota {}", usage.quota, width = NAME_WIDTH);
        };

        let bar = match usage.usage_percent() {
            Some(percent) => self.progress_bar(percent),
            None => self.dim(&BAR_EMPTY.to_string().repeat(self.bar_width)),
        };
        let amount = format!("{used} / {}", usage.quota);

        let left = match usage.available {
            Some(Limit::Limited(0)) => self.red("0 left"),
            Some(Limit::Limited(n)) => format!("{n} left"),
            Some(Limit::Unlimited) | None => String::new(),
        };

        format!("{name:<width$} {bar} {amount:<22} {left}", width = NAME_WIDTH)
            .trim_end()
            .to_string()
    }

    /// Renders a bar filled to `percent_used`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn progress_bar(&self, percent_used: f64) -> String {
        let percent = percent_used.clamp(0.0, 100.0);
        let filled = ((percent / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(percent, &bar)
    }

    // ========================================================================
    // Other Commands
    // ========================================================================

    /// Formats the set of disabled quota fields.
    pub fn format_disabled(&self, disabled: &BTreeSet<String>) -> String {
        if disabled.is_empty() {
            return "All quota fields are enabled.".to_string();
        }

        let mut lines = vec![self.bold(&format!("Disabled quota fields ({})", disabled.len()))];
        lines.extend(disabled.iter().map(|field| format!("  • {field}")));
        lines.join("\n")
    }

    /// Formats raw absolute limits. Negative ceilings print as unlimited.
    pub fn format_limits(&self, limits: &AbsoluteLimits) -> String {
        if limits.is_empty() {
            return self.dim("No limits reported.");
        }

        let mut lines = vec![self.bold("Absolute limits"), "─".repeat(48)];
        for (key, value) in limits.iter() {
            let shown = if key.starts_with("max") {
                Limit::from_raw(value).to_string()
            } else {
                value.to_string()
            };
            lines.push(format!("{key:<32} {shown}"));
        }
        lines.join("\n")
    }

    /// Formats quota ceilings under `title`.
    pub fn format_quotas(&self, title: &str, quotas: &QuotaSet) -> String {
        let mut lines = vec![self.bold(title), "─".repeat(48)];
        if quotas.is_empty() {
            lines.push(self.dim("No quotas reported."));
        }
        for (name, limit) in quotas.iter() {
            lines.push(format!("{name:<width$} {limit}", width = NAME_WIDTH));
        }
        lines.join("\n")
    }

    /// Formats service availability and the token lifetime.
    pub fn format_services(
        &self,
        project: &str,
        statuses: &[ServiceStatus],
        expires_in: Option<Duration>,
    ) -> String {
        let mut lines = vec![self.bold(&format!("Services for project {project}"))];
        lines.push("─".repeat(48));

        for status in statuses {
            let desc = status.descriptor;
            let label = format!("{} ({})", desc.kind, desc.project_name);
            let state = if status.enabled {
                self.green("✓ enabled")
            } else {
                self.red("✗ not deployed")
            };

            let mut line = format!("{label:<20} {state}");
            if let Some(endpoint) = &status.endpoint {
                line.push_str(&format!("  {}", self.cyan(endpoint)));
            }
            lines.push(line);
        }

        if let Some(remaining) = expires_in {
            lines.push(String::new());
            lines.push(format!("Token {}", self.format_expiry(remaining)));
        }

        lines.join("\n")
    }

    /// Describes time left on a token.
    pub fn format_expiry(&self, remaining: Duration) -> String {
        if remaining <= Duration::zero() {
            return self.red("expired");
        }

        if remaining < Duration::hours(1) {
            let mins = remaining.num_minutes();
            return self.yellow(&format!(
                "expires in {} minute{}",
                mins,
                if mins == 1 { "" } else { "s" }
            ));
        }

        if remaining < Duration::hours(24) {
            let hours = remaining.num_hours();
            let mins = remaining.num_minutes() % 60;
            return if mins > 0 {
                format!("expires in {hours}h {mins}m")
            } else {
                format!("expires in {} hour{}", hours, if hours == 1 { "" } else { "s" })
            };
        }

        let at: DateTime<Local> = (Utc::now() + remaining).with_timezone(&Local);
        format!("expires {}", at.format("%a %b %e at %l:%M %p"))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn color_for_percent(&self, percent_used: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent_used >= 90.0 {
            self.red(text)
        } else if percent_used >= 75.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_full() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(100.0), "██████████");
    }

    #[test]
    fn test_progress_bar_empty() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(0.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_clamps_overuse() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(140.0), "██████████");
    }

    #[test]
    fn test_color_for_percent() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.color_for_percent(95.0, "x").contains(RED));
        assert!(formatter.color_for_percent(80.0, "x").contains(YELLOW));
        assert!(formatter.color_for_percent(10.0, "x").contains(GREEN));
    }

    #[test]
    fn test_format_expiry() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_expiry(Duration::minutes(-5)), "expired");
        assert_eq!(formatter.format_expiry(Duration::minutes(1)), "expires in 1 minute");
        assert_eq!(formatter.format_expiry(Duration::minutes(125)), "expires in 2h 5m");
        assert_eq!(formatter.format_expiry(Duration::hours(3)), "expires in 3 hours");
    }
}
