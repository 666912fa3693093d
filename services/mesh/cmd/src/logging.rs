//! Console log formatting.

use std::fmt;
use std::io::IsTerminal;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// ANSI color codes for console output
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_CYAN: &str = "\x1b[36m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_BRIGHT_YELLOW: &str = "\x1b[93m";
const COLOR_BRIGHT_RED: &str = "\x1b[91m";
const COLOR_BRIGHT_GRAY: &str = "\x1b[90m";

/// Column widths for alignment
const SERVICE_NAME_WIDTH: usize = 20;
const LOG_LEVEL_WIDTH: usize = 7;

/// `[timestamp] [service] [level] message` formatter
pub struct MeshMapLogFormatter {
    service_name: String,
    color_enabled: bool,
}

impl MeshMapLogFormatter {
    pub fn new(service_name: String) -> Self {
        Self {
            service_name,
            color_enabled: is_terminal(),
        }
    }

    /// Service column, `meshmap-<component>` when the event names one
    fn format_service_name(&self, component: Option<&str>) -> String {
        let name = match component {
            Some(comp) => format!("{}-{}", self.service_name, comp),
            None => self.service_name.clone(),
        };

        if name.chars().count() > SERVICE_NAME_WIDTH {
            let truncated: String = name.chars().take(SERVICE_NAME_WIDTH - 1).collect();
            format!("{}…", truncated)
        } else {
            format!("{:<width$}", name, width = SERVICE_NAME_WIDTH)
        }
    }

    fn format_log_level(&self, level: &tracing::Level) -> String {
        let level_str = match *level {
            tracing::Level::ERROR => "✗ ERROR",
            tracing::Level::WARN => "⚠ WARN",
            tracing::Level::INFO => "ℹ INFO",
            tracing::Level::DEBUG => "◦ DEBUG",
            tracing::Level::TRACE => "◦ TRACE",
        };

        format!("{:<width$}", level_str, width = LOG_LEVEL_WIDTH + 2) // +2 for icon
    }

    fn get_color_for_level(&self, level: &tracing::Level) -> &'static str {
        if !self.color_enabled {
            return "";
        }

        match *level {
            tracing::Level::ERROR => COLOR_BRIGHT_RED,
            tracing::Level::WARN => COLOR_BRIGHT_YELLOW,
            tracing::Level::INFO => COLOR_GREEN,
            tracing::Level::DEBUG | tracing::Level::TRACE => COLOR_BRIGHT_GRAY,
        }
    }
}

impl<S, N> FormatEvent<S, N> for MeshMapLogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let level = event.metadata().level();

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let formatted_service = self.format_service_name(visitor.component.as_deref());
        let formatted_level = self.format_log_level(level);

        let color = self.get_color_for_level(level);
        let reset_color = if self.color_enabled { COLOR_RESET } else { "" };
        let cyan_color = if self.color_enabled { COLOR_CYAN } else { "" };

        write!(
            writer,
            "{}[{}] [{}] [{}{}{}] ",
            cyan_color, timestamp, formatted_service, color, formatted_level, reset_color
        )?;

        writeln!(writer, "{}{}", visitor.message, reset_color)
    }
}

/// Pulls `message` and `component` out of an event
#[derive(Default)]
struct FieldVisitor {
    message: String,
    component: Option<String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = unquote(format!("{:?}", value)),
            "component" => self.component = Some(unquote(format!("{:?}", value))),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "component" => self.component = Some(value.to_string()),
            _ => {}
        }
    }
}

fn unquote(text: String) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text[1..text.len() - 1].to_string()
    } else {
        text
    }
}

/// Colour only when logs go to a terminal
fn is_terminal() -> bool {
    if std::env::var("TERM").unwrap_or_default() == "dumb" {
        return false;
    }

    std::io::stderr().is_terminal()
}
