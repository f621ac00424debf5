use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::template_ast::{NodeId, Template};

/// An event handler of the fragment, re-emitted by the extracted component.
///
/// The event is named after the first call in the handler. Handlers without
/// a call have no name and are left out of every rendering.
#[derive(Debug, Clone)]
pub struct Event {
    action: NodeId,
    call: Option<NodeId>,
    event_name: Option<String>,
}

impl Event {
    pub fn new(template: &Template, action: NodeId) -> Self {
        let call = template
            .descendants(action)
            .into_iter()
            .find(|&node| template.kind(node).is_call());
        let event_name = call
            .and_then(|call| template.callee_name(call))
            .map(str::to_string);
        debug!(action = template.text(action), event = ?event_name, "event");
        Event {
            action,
            call,
            event_name,
        }
    }

    pub fn action(&self) -> NodeId {
        self.action
    }

    pub fn call(&self) -> Option<NodeId> {
        self.call
    }

    pub fn event_name(&self) -> Option<&str> {
        self.event_name.as_deref()
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
    }
}

impl Eq for Event {}

impl Hash for Event {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.action.hash(state);
    }
}
