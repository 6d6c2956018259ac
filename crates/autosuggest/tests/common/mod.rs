//! Shared fixtures for the dropdown integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use autosuggest::{
    Document, Dropdown, DropdownBuilder, FetchRequest, HeadlessDocument, NodeId, Rect, Suggestion,
    Update,
};

/// Fetches captured by a deferred fetch function, oldest first.
pub type Pending = Rc<RefCell<Vec<(FetchRequest, Update<Suggestion>)>>>;

/// Labels reported to `on_select`, in order.
pub type Picks = Rc<RefCell<Vec<String>>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A document with one focused input at (40, 100), 200x24.
pub fn setup() -> (Rc<HeadlessDocument>, NodeId) {
    init_tracing();
    let doc = Rc::new(HeadlessDocument::new());
    let input = doc.create_input();
    doc.set_geometry(input, Rect::new(40.0, 100.0, 200.0, 24.0));
    doc.focus(input);
    (doc, input)
}

pub fn builder(doc: &Rc<HeadlessDocument>, input: NodeId) -> DropdownBuilder<Suggestion> {
    Dropdown::builder(doc.clone(), input)
}

/// Install a fetch function that records every request without answering.
pub fn deferred(builder: DropdownBuilder<Suggestion>) -> (DropdownBuilder<Suggestion>, Pending) {
    let pending = Pending::default();
    let queue = pending.clone();
    let builder = builder.fetch(move |request, update| queue.borrow_mut().push((request, update)));
    (builder, pending)
}

/// Install a fetch function that answers synchronously with every catalog
/// entry starting with the input text.
pub fn prefix_catalog(
    builder: DropdownBuilder<Suggestion>,
    catalog: &[&str],
) -> DropdownBuilder<Suggestion> {
    let catalog: Vec<String> = catalog.iter().map(|s| s.to_string()).collect();
    builder.fetch(move |request, update| {
        let matches = catalog
            .iter()
            .filter(|entry| entry.starts_with(request.text.as_str()))
            .map(|entry| Suggestion::new(entry.as_str()))
            .collect();
        update.items(matches);
    })
}

/// Install an `on_select` that records the confirmed label.
pub fn recording(builder: DropdownBuilder<Suggestion>) -> (DropdownBuilder<Suggestion>, Picks) {
    let picks = Picks::default();
    let sink = picks.clone();
    let builder = builder.on_select(move |item: &Suggestion, _input| {
        sink.borrow_mut().push(item.label.clone().unwrap_or_default());
    });
    (builder, picks)
}

pub fn items(labels: &[&str]) -> Vec<Suggestion> {
    labels.iter().map(|label| Suggestion::new(*label)).collect()
}

pub fn grouped(entries: &[(&str, &str)]) -> Vec<Suggestion> {
    entries
        .iter()
        .map(|(group, label)| Suggestion::new(*label).with_group(*group))
        .collect()
}

/// Answer the most recent pending fetch.
pub fn answer_latest(pending: &Pending, response: Vec<Suggestion>) {
    let update = pending
        .borrow()
        .last()
        .map(|(_, update)| update.clone())
        .expect("no pending fetch");
    update.items(response);
}

/// Text of every child of `container`, in order.
pub fn row_texts(doc: &HeadlessDocument, container: NodeId) -> Vec<String> {
    doc.children(container)
        .into_iter()
        .map(|child| doc.text_content(child))
        .collect()
}
