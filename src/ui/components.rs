//! Small reusable markup helpers: badges, avatars, icons, alerts.

use crate::record::RunState;
use crate::ui::markdown::escape_html;

/// Lifecycle badge in the list row.
#[must_use]
pub fn state_badge(state: RunState) -> String {
    let color = match state {
        RunState::Running => "bg-gray-500",
        RunState::Completed => "bg-green-500",
        RunState::Failed => "bg-red-500",
        RunState::Cancelled => "bg-orange-500",
        RunState::Paused => "bg-yellow-500",
    };
    format!(
        r#"<span class="inline-flex items-center rounded-full px-2.5 py-0.5 text-xs font-semibold text-white {color}">{}</span>"#,
        state.as_str()
    )
}

/// Round avatar image; nothing at all when the record has no avatar.
#[must_use]
pub fn avatar(avatar_url: Option<&str>, size: &str) -> String {
    match avatar_url {
        Some(url) => format!(
            r#"<img src="{}" alt="User Avatar" class="{size} rounded-full mb-1">"#,
            escape_html(url)
        ),
        None => String::new(),
    }
}

/// Destructive alert for submission failures.
#[must_use]
pub fn error_alert(message: &str) -> String {
    format!(
        r#"<div class="rounded-lg border border-red-300 bg-red-50 text-red-800 p-3 text-sm" role="alert">{}</div>"#,
        escape_html(message)
    )
}

/// Confirmation banner for accepted submissions.
#[must_use]
pub fn success_banner(title: &str) -> String {
    format!(
        r#"<div class="rounded-lg border border-green-300 bg-green-50 text-green-800 p-3 text-sm" role="status">Question submitted: {}</div>"#,
        escape_html(title)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Icons
//
// Inline SVG (lucide outlines) for optimal performance and styling
// flexibility; a few action types instead carry a provider logo as an <img>.
// ─────────────────────────────────────────────────────────────────────────────

fn svg(class: &str, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{class}">{body}</svg>"#
    )
}

/// Chevron-down icon.
#[must_use]
pub fn chevron_down_icon(class: &str) -> String {
    svg(class, r#"<path d="m6 9 6 6 6-6"/>"#)
}

/// Chevron-up icon.
#[must_use]
pub fn chevron_up_icon(class: &str) -> String {
    svg(class, r#"<path d="m18 15-6-6-6 6"/>"#)
}

/// Speech-bubble icon.
#[must_use]
pub fn message_square_icon(class: &str) -> String {
    svg(
        class,
        r#"<path d="M21 15a2 2 0 0 1-2 2H7l-4 4V5a2 2 0 0 1 2-2h14a2 2 0 0 1 2 2z"/>"#,
    )
}

/// Check-circle icon.
#[must_use]
pub fn check_circle_icon(class: &str) -> String {
    svg(
        class,
        r#"<path d="M22 11.08V12a10 10 0 1 1-5.93-9.14"/><polyline points="22 4 12 14.01 9 11.27"/>"#,
    )
}

/// History/rewind icon.
#[must_use]
pub fn history_icon(class: &str) -> String {
    svg(
        class,
        r#"<path d="M3 3v5h5"/><path d="M3.05 13A9 9 0 1 0 6 5.3L3 8"/><path d="M12 7v5l4 2"/>"#,
    )
}

/// Provider logo rendered at bubble-icon size.
#[must_use]
pub fn logo_image(src: &str, alt: &str) -> String {
    format!(r#"<img src="{src}" alt="{alt}" class="w-8 h-8">"#)
}
