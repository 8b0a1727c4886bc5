//! Terminal rendering and prompt parsing

use wizard_core::{ChatEntry, Sender};
use wizard_question::{WidgetInput, WidgetSpec, MAX_SYNTHESIZED_ELEMENTS};

pub(crate) const HELP: &str = "\
Commands:
  :retry     resend the request that failed
  :payload   show the payload collected so far
  :discard   delete this configuration and leave
  :quit      leave without deleting
Anything else answers the current question. Buttons accept their number or label.";

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Quit,
    Discard,
    Retry,
    Payload,
    Help,
    Answer(WidgetInput),
}

pub(crate) fn parse_line(widget: Option<&WidgetSpec>, line: &str) -> Command {
    match line.trim() {
        ":q" | ":quit" => Command::Quit,
        ":discard" => Command::Discard,
        ":r" | ":retry" => Command::Retry,
        ":payload" => Command::Payload,
        ":h" | ":help" => Command::Help,
        _ => Command::Answer(parse_input(widget, line)),
    }
}

/// Numbers pick buttons (1-based); everything else is typed text
fn parse_input(widget: Option<&WidgetSpec>, line: &str) -> WidgetInput {
    if let Some(WidgetSpec::Buttons { options }) = widget {
        if let Ok(n) = line.trim().parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return WidgetInput::Choice(n - 1);
            }
        }
    }
    WidgetInput::Text(line.to_string())
}

pub(crate) fn render_entry(entry: &ChatEntry) -> String {
    let who = match entry.sender {
        Sender::Bot => "bot",
        Sender::User => "you",
    };
    let mut out = format!("[{}] {}: {}", entry.id, who, entry.message);
    if let Some(tooltip) = &entry.tooltip {
        out.push_str(&format!("\n      ({tooltip})"));
    }
    out
}

pub(crate) fn render_widget(widget: &WidgetSpec) -> String {
    match widget {
        WidgetSpec::Buttons { options } => options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("  {}) {}", i + 1, o.label))
            .collect::<Vec<_>>()
            .join("\n"),
        WidgetSpec::NumberEntry {
            min, max, integral, ..
        } => {
            let kind = if *integral { "a whole number" } else { "a number" };
            format!("  enter {kind}{}", range_hint(*min, *max))
        }
        WidgetSpec::TextEntry {
            min_length,
            max_length,
            pattern,
        } => {
            let mut hint = format!(
                "  enter text{}",
                range_hint(min_length.map(|v| v as f64), max_length.map(|v| v as f64))
            );
            if let Some(pattern) = pattern {
                hint.push_str(&format!(" matching {pattern}"));
            }
            hint
        }
        WidgetSpec::CountEntry { min, max, element } => {
            let max = (*max).min(MAX_SYNTHESIZED_ELEMENTS);
            format!("  how many {}? ({min} to {max})", element.type_name)
        }
    }
}

fn range_hint(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(" ({min} to {max})"),
        (Some(min), None) => format!(" (at least {min})"),
        (None, Some(max)) => format!(" (at most {max})"),
        (None, None) => String::new(),
    }
}
