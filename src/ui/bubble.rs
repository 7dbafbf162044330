//! Per-action bubble rendering and the action-type lookup table.

use chrono::{DateTime, Utc};

use crate::record::{Action, ActionContent, CitationChunk};
use crate::ui::components::{
    check_circle_icon, chevron_down_icon, chevron_up_icon, history_icon, logo_image,
    message_square_icon,
};
use crate::ui::markdown::{escape_html, render_markdown};
use crate::view::{self, PROSE_LIMIT, SNIPPET_LIMIT};

/// Icon for a bubble: an inline SVG or a provider logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    ChevronDown,
    MessageSquare,
    CheckCircle,
    History,
    Logo { src: &'static str, alt: &'static str },
}

impl Icon {
    fn render(self) -> String {
        match self {
            Self::ChevronDown => chevron_down_icon("w-8 h-8"),
            Self::MessageSquare => message_square_icon("w-8 h-8"),
            Self::CheckCircle => check_circle_icon("w-8 h-8"),
            Self::History => history_icon("w-8 h-8"),
            Self::Logo { src, alt } => logo_image(src, alt),
        }
    }
}

/// Visual treatment of one action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStyle {
    pub classes: &'static str,
    pub icon: Icon,
    /// Fixed text shown instead of the actual content.
    pub override_content: Option<&'static str>,
}

static DEFAULT_STYLE: ActionStyle = ActionStyle {
    classes: "bg-gray-100 text-gray-800",
    icon: Icon::ChevronDown,
    override_content: None,
};

/// The closed lookup table from action type to visual treatment.
static ACTION_STYLES: [(&str, ActionStyle); 7] = [
    (
        "RAGQuery",
        ActionStyle {
            classes: "bg-blue-100 text-blue-800",
            icon: Icon::Logo {
                src: "https://avatars.githubusercontent.com/u/130722866?s=200&v=4",
                alt: "LlamaIndex Logo",
            },
            override_content: None,
        },
    ),
    (
        "RAGResult",
        ActionStyle {
            classes: "bg-blue-100 text-blue-800",
            icon: Icon::Logo {
                src: "https://yepcode.io/docs/img/integrations/icons/pinecone.svg",
                alt: "Pinecone Logo",
            },
            override_content: None,
        },
    ),
    (
        "RespondToUser",
        ActionStyle {
            classes: "bg-green-100 text-green-800",
            icon: Icon::MessageSquare,
            override_content: None,
        },
    ),
    (
        "HumanApproval",
        ActionStyle {
            classes: "bg-yellow-100 text-yellow-800",
            icon: Icon::Logo {
                src: "https://app.humanlayer.dev/humanlayer-light.png",
                alt: "humanlayer",
            },
            override_content: None,
        },
    ),
    (
        "Finalizing Answer",
        ActionStyle {
            classes: "bg-green-100 text-green-800",
            icon: Icon::CheckCircle,
            override_content: Some("Approved"),
        },
    ),
    (
        "Incorporating Feedback",
        ActionStyle {
            classes: "bg-orange-100 text-orange-800",
            icon: Icon::History,
            override_content: None,
        },
    ),
    (
        "formulate_response",
        ActionStyle {
            classes: "bg-gray-50 text-gray-800",
            icon: Icon::Logo {
                src: "https://avatars.githubusercontent.com/u/124114301?s=200&v=4",
                alt: "baml",
            },
            override_content: None,
        },
    ),
];

/// Resolve an action type; anything unrecognized gets the default entry.
#[must_use]
pub fn action_style(action_type: &str) -> &'static ActionStyle {
    ACTION_STYLES
        .iter()
        .find(|(name, _)| *name == action_type)
        .map_or(&DEFAULT_STYLE, |(_, style)| style)
}

/// Render one action bubble.
///
/// `run_id`/`index` identify the bubble for the expand/collapse round trip;
/// `started_at` anchors the elapsed-time label.
#[must_use]
pub fn action_bubble(
    run_id: &str,
    index: usize,
    action: &Action,
    started_at: DateTime<Utc>,
    expanded: bool,
) -> String {
    let style = action_style(&action.action_type);
    let elapsed = view::elapsed_label(action.create_time_ms, started_at);

    let (body, has_more) = match style.override_content {
        Some(text) => (
            format!(r#"<p class="text-sm">{}</p>"#, escape_html(text)),
            false,
        ),
        None => action_body(&action.content, expanded),
    };

    let toggle = if has_more {
        expand_button(run_id, index, expanded)
    } else {
        String::new()
    };

    format!(
        r#"<div id="action-{run_id}-{index}" class="rounded-lg flex flex-row gap-2 items-center p-3 mb-2 {classes}">
  {icon}
  <div class="flex flex-col w-full justify-between">
    <div class="flex justify-between items-center mb-1">
      <span class="font-medium flex items-center">{action_type}</span>
      <span class="text-xs text-gray-600 ml-2">{elapsed}</span>
    </div>
    {body}
    {toggle}
  </div>
</div>"#,
        classes = style.classes,
        icon = style.icon.render(),
        action_type = escape_html(&action.action_type),
    )
}

/// Body markup plus whether an expand toggle is needed.
fn action_body(content: &ActionContent, expanded: bool) -> (String, bool) {
    match content {
        ActionContent::Text(text) => {
            let shown = if expanded {
                text.clone()
            } else {
                view::collapsed(text, PROSE_LIMIT)
            };
            (
                format!(r#"<div class="text-sm">{}</div>"#, render_markdown(&shown)),
                view::needs_toggle(text, PROSE_LIMIT),
            )
        }
        ActionContent::Citations(rag) => {
            let chunks: String = rag
                .result
                .iter()
                .map(|chunk| citation_block(chunk, expanded))
                .collect();
            let has_more = rag.result.iter().any(|chunk| {
                view::needs_toggle(&chunk.content, SNIPPET_LIMIT) || !chunk.metadata.is_empty()
            });
            (
                format!(r#"<div class="flex flex-col gap-1">{chunks}</div>"#),
                has_more,
            )
        }
    }
}

fn citation_block(chunk: &CitationChunk, expanded: bool) -> String {
    let snippet = if expanded {
        chunk.content.clone()
    } else {
        view::collapsed(&chunk.content, SNIPPET_LIMIT)
    };

    let fields = if expanded {
        let rows: String = view::citation_fields(&chunk.metadata)
            .iter()
            .map(|field| {
                let value = match &field.href {
                    Some(href) => format!(
                        r#"<a href="{}" class="text-blue-600 hover:underline" target="_blank" rel="noreferrer">{}</a>"#,
                        escape_html(href),
                        escape_html(&field.value)
                    ),
                    None => escape_html(&field.value),
                };
                format!(
                    r#"<div class="flex gap-2"><dt class="text-gray-500">{}</dt><dd>{value}</dd></div>"#,
                    escape_html(&field.label)
                )
            })
            .collect();
        format!(r#"<dl class="mt-1 text-xs space-y-0.5">{rows}</dl>"#)
    } else {
        String::new()
    };

    format!(
        r#"<div class="bg-white/60 rounded p-2"><p class="text-sm">{}</p>{fields}</div>"#,
        escape_html(&snippet)
    )
}

fn expand_button(run_id: &str, index: usize, expanded: bool) -> String {
    let (label, icon, next) = if expanded {
        ("Show less", chevron_up_icon("w-3 h-3 mr-1"), false)
    } else {
        ("Show more", chevron_down_icon("w-3 h-3 mr-1"), true)
    };

    format!(
        r##"<button class="flex items-center text-blue-500 hover:text-blue-700 mt-1 text-xs"
        hx-get="/fragments/runs/{run_id}/actions/{index}?expanded={next}"
        hx-target="#action-{run_id}-{index}"
        hx-swap="outerHTML">{icon}{label}</button>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RagResult;
    use std::collections::BTreeMap;

    fn text_action(action_type: &str, content: &str, at_ms: i64) -> Action {
        Action {
            action_type: action_type.to_string(),
            content: ActionContent::Text(content.to_string()),
            create_time_ms: DateTime::from_timestamp_millis(at_ms).unwrap(),
        }
    }

    #[test]
    fn test_unrecognized_type_uses_default_style() {
        let style = action_style("SomethingNew");
        assert_eq!(*style, DEFAULT_STYLE);
        assert_eq!(action_style("RAGQuery").classes, "bg-blue-100 text-blue-800");
    }

    #[test]
    fn test_override_content_replaces_text() {
        let action = text_action("Finalizing Answer", "the real final text", 1000);
        let html = action_bubble("r1", 0, &action, DateTime::from_timestamp_millis(0).unwrap(), false);

        assert!(html.contains("Approved"));
        assert!(!html.contains("the real final text"));
        // Fixed override text is short: no toggle.
        assert!(!html.contains("Show more"));
    }

    #[test]
    fn test_bubble_labels_type_and_elapsed() {
        let action = text_action("RAGQuery", "searching docs", 500);
        let html = action_bubble("r1", 0, &action, DateTime::from_timestamp_millis(0).unwrap(), false);

        assert!(html.contains("RAGQuery"));
        assert!(html.contains("+0.50s"));
        assert!(html.contains("searching docs"));
    }

    #[test]
    fn test_long_text_gets_toggle_and_truncates() {
        let long = "word ".repeat(100);
        let action = text_action("RespondToUser", &long, 0);
        let started = DateTime::from_timestamp_millis(0).unwrap();

        let collapsed_html = action_bubble("r1", 2, &action, started, false);
        assert!(collapsed_html.contains("Show more"));
        assert!(collapsed_html.contains("expanded=true"));
        assert!(collapsed_html.contains("..."));

        let expanded_html = action_bubble("r1", 2, &action, started, true);
        assert!(expanded_html.contains("Show less"));
        assert!(expanded_html.contains("expanded=false"));
    }

    #[test]
    fn test_citation_bubble_expands_metadata() {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "url".to_string(),
            serde_json::Value::String("https://docs.example.com".to_string()),
        );
        let action = Action {
            action_type: "RAGResult".to_string(),
            content: ActionContent::Citations(RagResult {
                result: vec![CitationChunk {
                    content: "retrieved snippet".to_string(),
                    metadata,
                }],
            }),
            create_time_ms: DateTime::from_timestamp_millis(0).unwrap(),
        };
        let started = DateTime::from_timestamp_millis(0).unwrap();

        let collapsed_html = action_bubble("r1", 0, &action, started, false);
        assert!(collapsed_html.contains("retrieved snippet"));
        assert!(!collapsed_html.contains("https://docs.example.com"));

        let expanded_html = action_bubble("r1", 0, &action, started, true);
        assert!(expanded_html.contains("https://docs.example.com"));
    }
}
