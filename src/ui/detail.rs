//! Run detail fragment: headline, initial messages, action timeline,
//! final state.

use crate::record::{DbRecord, RunState};
use crate::ui::bubble::action_bubble;
use crate::ui::components::avatar;
use crate::ui::markdown::escape_html;
use crate::view;

/// Render the detail pane for one record. Actions start collapsed; each
/// bubble re-renders individually on expand/collapse.
#[must_use]
pub fn run_detail(record: &DbRecord) -> String {
    let headline = view::headline(&record.data);

    let header = format!(
        r#"<div class="flex items-center gap-2">
  {avatar}
  <h2 class="text-2xl font-bold">{title}</h2>
</div>"#,
        avatar = avatar(headline.avatar_url.as_deref(), "w-10 h-10"),
        title = escape_html(&headline.title),
    );

    let messages: String = view::prompt_messages(&record.data.initial_state)
        .iter()
        .map(|message| {
            format!(
                r#"<div class="bg-gray-100 rounded-lg p-2"><p class="text-sm">{}</p></div>"#,
                escape_html(message)
            )
        })
        .collect();
    let initial = format!(
        r#"<div>
  <h4 class="text-sm font-semibold mb-2">Initial State:</h4>
  <div class="space-y-2 border-l-2 border-gray-200 pl-3">{messages}</div>
</div>"#
    );

    let bubbles: String = if record.data.actions.is_empty() {
        r#"<p class="text-sm">No actions</p>"#.to_string()
    } else {
        record
            .data
            .actions
            .iter()
            .enumerate()
            .map(|(index, action)| {
                action_bubble(&record.id, index, action, record.data.create_time_ms, false)
            })
            .collect()
    };
    let actions = format!(
        r#"<div>
  <h4 class="text-sm font-semibold">Actions:</h4>
  <div class="space-y-2">{bubbles}</div>
</div>"#
    );

    // The final state is only meaningful for cancelled runs.
    let final_state = if record.data.state == RunState::Cancelled {
        let reason = record.data.final_state.as_deref().unwrap_or("Unknown reason");
        format!(
            r#"<div>
  <h4 class="text-sm font-semibold">Final State:</h4>
  <p class="text-sm">{}</p>
</div>"#,
            escape_html(reason)
        )
    } else {
        String::new()
    };

    format!(r#"<div class="space-y-4">{header}{initial}{actions}{final_state}</div>"#)
}

/// Hidden input holding the client-side selection, swapped out-of-band so
/// SSE-triggered refreshes keep the picked run.
#[must_use]
pub fn selected_input_oob(selected: &str) -> String {
    format!(
        r#"<input type="hidden" id="selected-run" name="selected" value="{}" hx-swap-oob="true">"#,
        escape_html(selected)
    )
}

/// Placeholder shown before anything is selected and the feed is empty.
#[must_use]
pub fn empty_detail() -> String {
    r#"<div class="flex items-center justify-center h-full text-gray-500">Select a question from the list to view details</div>"#
        .to_string()
}
