//! Document shell and the dashboard page.

use chrono::{DateTime, Utc};

use crate::record::DbRecord;
use crate::ui::detail::{empty_detail, run_detail};
use crate::ui::list::run_list;
use crate::view;

/// Generate the HTML shell for the application.
fn html_shell(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Live dashboard for agent runs">
    <title>{title} - Notorious R.A.G.</title>

    <!-- HTMX and Extensions (local) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <script src="/static/vendor/htmx-sse.js"></script>

    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-background text-textPrimary antialiased">
    <div id="app-shell" class="flex flex-col min-h-screen">
        <header class="sticky top-0 z-50 w-full border-b border-panelBorder bg-background/95 backdrop-blur">
            <div class="container mx-auto flex h-14 items-center justify-between px-4 max-w-5xl">
                <a href="/" class="flex items-center gap-2 font-semibold">
                    <span class="text-lg">Notorious R.A.G.</span>
                </a>
                <p class="text-sm text-textMuted">A Discord bot that uses RAG to answer questions.</p>
            </div>
        </header>

        <main id="app" class="flex-1 container mx-auto px-4 py-6 max-w-5xl">
            {content}
        </main>

        <footer class="border-t border-panelBorder py-4">
            <div class="container mx-auto px-4 max-w-5xl">
                <p class="text-xs text-textMuted text-center">Powered by Axum + HTMX + SSE</p>
            </div>
        </footer>
    </div>
</body>
</html>"#
    )
}

/// Dashboard page content: submit form on top, live list/detail below.
fn dashboard_content() -> &'static str {
    r##"
    <section class="space-y-6">
        <div class="rounded-xl border border-panelBorder bg-panel p-4">
            <form class="flex flex-col gap-4"
                  hx-post="/agent"
                  hx-target="#submit-result"
                  hx-swap="innerHTML"
                  hx-disabled-elt="find button">
                <textarea
                    name="question"
                    placeholder="Enter your question"
                    class="w-full min-h-[100px] px-4 py-3 rounded-xl border border-panelBorder bg-background resize-none focus:outline-none focus:ring-2 focus:ring-primary"
                    required
                ></textarea>
                <button type="submit"
                        class="w-full h-11 rounded-xl bg-primary text-white hover:bg-primaryMuted font-medium transition-all">
                    Submit<span class="htmx-indicator">ting...</span>
                </button>
            </form>
            <div id="submit-result" class="mt-3"></div>
        </div>

        <input type="hidden" id="selected-run" name="selected" value="">

        <div hx-ext="sse" sse-connect="/watch">
            <div id="dashboard"
                 hx-get="/fragments/dashboard"
                 hx-include="#selected-run"
                 hx-trigger="load, sse:changed, run-submitted from:body"
                 hx-swap="innerHTML">
                <div class="text-gray-500">Loading questions...</div>
            </div>
        </div>
    </section>
    "##
}

/// Full dashboard page.
#[must_use]
pub fn dashboard_page() -> String {
    html_shell("Questions", dashboard_content())
}

/// The list/detail split, re-rendered wholesale on every feed change.
///
/// `selected` falls back to the newest record when empty or gone.
#[must_use]
pub fn dashboard_fragment(
    records: &[DbRecord],
    selected: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let current = selected
        .and_then(|id| records.iter().find(|r| r.id == id))
        .or_else(|| view::latest(records));

    let detail = current.map_or_else(empty_detail, run_detail);
    let selected_id = current.map(|r| r.id.as_str());

    format!(
        r#"<div class="flex h-[600px] space-x-4">
  <div class="w-1/3 overflow-y-auto border-r pr-4">
    <h2 class="text-xl font-bold mb-4">Questions</h2>
    {list}
  </div>
  <div id="run-detail" class="w-2/3 overflow-y-auto">{detail}</div>
</div>"#,
        list = run_list(records, selected_id, now),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{InitialPrompt, RunRecord, RunState};

    fn record(id: &str, title: &str, created_ms: i64) -> DbRecord {
        DbRecord {
            id: id.to_string(),
            data: RunRecord {
                create_time_ms: DateTime::from_timestamp_millis(created_ms).unwrap(),
                update_time_ms: DateTime::from_timestamp_millis(created_ms).unwrap(),
                state: RunState::Running,
                initial_state: InitialPrompt::Bare(title.to_string()),
                actions: Vec::new(),
                final_state: None,
            },
        }
    }

    #[test]
    fn test_page_wires_sse_and_form() {
        let page = dashboard_page();
        assert!(page.contains("sse-connect=\"/watch\""));
        assert!(page.contains("hx-post=\"/agent\""));
        assert!(page.contains("hx-get=\"/fragments/dashboard\""));
    }

    #[test]
    fn test_fragment_defaults_to_latest() {
        let records = vec![record("old", "old question", 1000), record("new", "new question", 2000)];
        let now = DateTime::from_timestamp_millis(3000).unwrap();

        let html = dashboard_fragment(&records, None, now);
        // The newest record is selected and rendered in the detail pane.
        assert!(html.contains("<h2 class=\"text-2xl font-bold\">new question</h2>"));
    }

    #[test]
    fn test_fragment_honors_selection() {
        let records = vec![record("old", "old question", 1000), record("new", "new question", 2000)];
        let now = DateTime::from_timestamp_millis(3000).unwrap();

        let html = dashboard_fragment(&records, Some("old"), now);
        assert!(html.contains("<h2 class=\"text-2xl font-bold\">old question</h2>"));

        // Unknown selection falls back to the latest record.
        let html = dashboard_fragment(&records, Some("gone"), now);
        assert!(html.contains("<h2 class=\"text-2xl font-bold\">new question</h2>"));
    }

    #[test]
    fn test_fragment_empty_feed_placeholder() {
        let html = dashboard_fragment(&[], None, DateTime::UNIX_EPOCH);
        assert!(html.contains("Select a question from the list"));
    }
}
