use sim_tracker::app::{ChatMessage, Settings, Tracker, TranscriptHost, build_chat_page};
use sim_tracker::ui::Document;
use sim_tracker::ui::dom::NodeId;

pub const CONTAINER: &str = "silly-sim-tracker-container";
pub const DIVIDER: &str = "sst-divider";
pub const TABS_TEMPLATE: &str = "dating-card-template-tabs.html";

pub fn message(text: &str) -> ChatMessage {
    ChatMessage {
        name: "Narrator".to_owned(),
        mes: text.to_owned(),
        is_user: false,
        is_system: false,
    }
}

/// Wrap `body` in a tracker code fence after some prose.
pub fn with_block(prose: &str, body: &str) -> String {
    format!("{prose}\n```sim\n{body}\n```")
}

pub fn settings(position: &str) -> Settings {
    Settings { template_position: position.to_owned(), ..Settings::default() }
}

pub fn tabbed_settings(position: &str) -> Settings {
    Settings { template_file: TABS_TEMPLATE.to_owned(), ..settings(position) }
}

/// Tracker, host and page for a transcript of `texts`.
pub fn setup(settings: Settings, texts: &[&str]) -> (Tracker, TranscriptHost, Document) {
    let host = TranscriptHost::new(texts.iter().map(|t| message(t)).collect());
    let page = build_chat_page(texts.len());
    let tracker = Tracker::new(settings).unwrap();
    (tracker, host, page)
}

pub fn text_node(page: &Document, id: usize) -> NodeId {
    sim_tracker::app::host::message_text_node(page, id).unwrap()
}

pub fn containers_in(page: &Document, scope: NodeId) -> usize {
    page.find_all_by_id(scope, CONTAINER).len()
}

/// Text of every `class` node inside the tracker container of message `id`.
/// Empty when no container was rendered, so hidden source text never counts.
pub fn card_fields(page: &Document, id: usize, class: &str) -> Vec<String> {
    page.find_by_id(text_node(page, id), CONTAINER)
        .map(|container| {
            page.find_all_by_class(container, class)
                .into_iter()
                .map(|node| page.text_content(node))
                .collect()
        })
        .unwrap_or_default()
}

pub fn class_count(page: &Document, scope: NodeId, class: &str) -> usize {
    page.find_all_by_class(scope, class).len()
}

pub fn sidebar(page: &Document, side: &str) -> Option<NodeId> {
    page.get_element_by_id(&format!("sst-global-sidebar-{side}"))
}

pub fn sidebar_text(page: &Document, side: &str) -> String {
    sidebar(page, side).map(|node| page.text_content(node)).unwrap_or_default()
}
