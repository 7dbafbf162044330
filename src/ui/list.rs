//! Run list fragment.

use chrono::{DateTime, Utc};

use crate::record::DbRecord;
use crate::ui::components::{avatar, state_badge};
use crate::ui::markdown::escape_html;
use crate::view;

/// Render the list pane.
///
/// Records arrive creation-time ascending; the column is reversed so the
/// newest question sits on top.
#[must_use]
pub fn run_list(records: &[DbRecord], selected: Option<&str>, now: DateTime<Utc>) -> String {
    let items: String = records
        .iter()
        .map(|record| list_item(record, selected == Some(record.id.as_str()), now))
        .collect();

    format!(r#"<div id="run-list" class="flex flex-col-reverse">{items}</div>"#)
}

/// Same list, marked for out-of-band swap (selection changed).
#[must_use]
pub fn run_list_oob(records: &[DbRecord], selected: Option<&str>, now: DateTime<Utc>) -> String {
    run_list(records, selected, now).replacen(
        "<div id=\"run-list\"",
        "<div id=\"run-list\" hx-swap-oob=\"true\"",
        1,
    )
}

fn list_item(record: &DbRecord, is_selected: bool, now: DateTime<Utc>) -> String {
    let headline = view::headline(&record.data);
    let background = if is_selected { "bg-blue-100" } else { "bg-white" };

    format!(
        r##"<div class="cursor-pointer p-4 mb-2 rounded-lg {background} hover:bg-blue-50"
     hx-get="/fragments/runs/{id}" hx-target="#run-detail" hx-swap="innerHTML">
  <div class="flex flex-col">
    <div class="flex items-center gap-2">
      {avatar}
      <span class="text-sm font-semibold mb-1 truncate">{title}</span>
    </div>
    <div class="flex items-center justify-between text-xs text-gray-500">
      <span>{age}</span>
      <div class="flex items-center space-x-2">{badge}</div>
    </div>
  </div>
</div>"##,
        id = escape_html(&record.id),
        avatar = avatar(headline.avatar_url.as_deref(), "w-6 h-6"),
        title = escape_html(&headline.title),
        age = view::relative_age(record.data.create_time_ms, now),
        badge = state_badge(record.data.state),
    )
}
