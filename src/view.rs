//! View-model projection over run records.
//!
//! Everything the rendering layer needs — titles, avatars, flattened
//! message lists, truncation, elapsed labels, citation metadata ordering —
//! is computed here so the HTML fragments stay dumb.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::record::{DbRecord, InitialPrompt, RunRecord};

/// Collapsed length for action prose.
pub const PROSE_LIMIT: usize = 200;
/// Collapsed length for each citation snippet.
pub const SNIPPET_LIMIT: usize = 100;

/// Title and avatar for a run, resolved across the historical prompt shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub avatar_url: Option<String>,
}

/// Resolve the list/detail headline for a record.
///
/// The classification title wins when the rich shape is present; otherwise
/// the first message's text (or the bare question) is the title.
#[must_use]
pub fn headline(record: &RunRecord) -> Headline {
    match &record.initial_state {
        InitialPrompt::Rich {
            messages,
            classification,
        } => Headline {
            title: classification.title.clone(),
            avatar_url: messages.first().and_then(|m| m.avatar_url.clone()),
        },
        InitialPrompt::Flat(messages) => Headline {
            title: messages.first().map(|m| m.message.clone()).unwrap_or_default(),
            avatar_url: messages.first().and_then(|m| m.avatar_url.clone()),
        },
        InitialPrompt::Bare(text) => Headline {
            title: text.clone(),
            avatar_url: None,
        },
    }
}

/// The flat ordered message texts of the prompt, regardless of input shape.
#[must_use]
pub fn prompt_messages(prompt: &InitialPrompt) -> Vec<String> {
    match prompt {
        InitialPrompt::Rich { messages, .. } | InitialPrompt::Flat(messages) => {
            messages.iter().map(|m| m.message.clone()).collect()
        }
        InitialPrompt::Bare(text) => vec![text.clone()],
    }
}

/// True when `text` exceeds `limit` characters and needs an expand toggle.
#[must_use]
pub fn needs_toggle(text: &str, limit: usize) -> bool {
    text.chars().count() > limit
}

/// Collapsed rendering of `text`: exactly `limit` characters plus an
/// ellipsis when over the limit, the text unchanged otherwise.
///
/// Counted in characters, never bytes, so multi-byte text cannot split.
#[must_use]
pub fn collapsed(text: &str, limit: usize) -> String {
    if needs_toggle(text, limit) {
        let mut out: String = text.chars().take(limit).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

/// Elapsed-time label for an action relative to the run's creation time.
///
/// Clamped at zero: clock skew between writers must not render a negative
/// offset.
#[must_use]
pub fn elapsed_label(action_at: DateTime<Utc>, started_at: DateTime<Utc>) -> String {
    let millis = (action_at - started_at).num_milliseconds().max(0);
    format!("+{:.2}s", millis as f64 / 1000.0)
}

/// Coarse "3 minutes ago" label for list rows.
#[must_use]
pub fn relative_age(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds().max(0);
    match seconds {
        0..60 => "just now".to_string(),
        60..3600 => plural(seconds / 60, "minute"),
        3600..86_400 => plural(seconds / 3600, "hour"),
        _ => plural(seconds / 86_400, "day"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// The latest record, the default selection when nothing is picked.
#[must_use]
pub fn latest(records: &[DbRecord]) -> Option<&DbRecord> {
    records.last()
}

// ─────────────────────────────────────────────────────────────────────────────
// Citation metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Display order for known citation metadata keys.
const KEY_PRIORITY: [&str; 5] = ["type", "channel_id", "title", "thread_name", "url"];

/// Keys that never render: `text` duplicates the chunk content, `thread_id`
/// only feeds the deep link.
const HIDDEN_KEYS: [&str; 2] = ["text", "thread_id"];

/// The two ingested Discord channels, mapped to readable names.
const KNOWN_CHANNELS: [(&str, &str); 2] = [
    ("1253172394345107466", "#questions"),
    ("1253172325205934181", "#troubleshooting"),
];

/// Discord guild the ingested channels live in.
const DISCORD_GUILD_ID: &str = "1119368998161387591";

/// One rendered metadata row of a citation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaField {
    pub label: String,
    pub value: String,
    pub href: Option<String>,
}

/// Project citation metadata into display rows.
///
/// Known keys come first in the fixed priority order, remaining keys after
/// (alphabetically, the map's order). Channel ids of the two ingested
/// channels become readable names with a Discord deep link; the link targets
/// the thread when a `thread_id` is present.
#[must_use]
pub fn citation_fields(metadata: &BTreeMap<String, serde_json::Value>) -> Vec<MetaField> {
    let mut fields = Vec::new();

    for key in KEY_PRIORITY {
        if let Some(value) = metadata.get(key) {
            fields.push(meta_field(key, value, metadata));
        }
    }
    for (key, value) in metadata {
        if !KEY_PRIORITY.contains(&key.as_str()) && !HIDDEN_KEYS.contains(&key.as_str()) {
            fields.push(meta_field(key, value, metadata));
        }
    }

    fields
}

fn meta_field(
    key: &str,
    value: &serde_json::Value,
    metadata: &BTreeMap<String, serde_json::Value>,
) -> MetaField {
    let text = value_text(value);

    if key == "channel_id" {
        if let Some((_, name)) = KNOWN_CHANNELS.iter().find(|(id, _)| *id == text) {
            let href = discord_link(&text, metadata.get("thread_id").map(value_text).as_deref());
            return MetaField {
                label: "channel".to_string(),
                value: (*name).to_string(),
                href: Some(href),
            };
        }
        return MetaField {
            label: "channel".to_string(),
            value: text,
            href: None,
        };
    }

    let href = (key == "url").then(|| text.clone());
    MetaField {
        label: key.to_string(),
        value: text,
        href,
    }
}

fn discord_link(channel_id: &str, thread_id: Option<&str>) -> String {
    // A thread is itself a channel, so a thread link replaces the channel id.
    let target = thread_id.filter(|t| !t.is_empty()).unwrap_or(channel_id);
    format!("https://discord.com/channels/{DISCORD_GUILD_ID}/{target}")
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
