use crate::visibility::css;
use crate::visibility::types::Directive;

/// Realizes directives into a presentation layer. The resolver only produces
/// element ids and CSS text; what a "style element" actually is belongs to the
/// sink implementation.
pub trait StyleSink {
    fn apply(&mut self, element_id: &str, css: &str);
}

/// In-memory model of a document head: style elements in insertion order,
/// keyed by id. Re-applying an existing id replaces that element in place, so
/// repeated initialization passes stay idempotent instead of accumulating
/// duplicate styles.
#[derive(Debug, Default)]
pub struct DocumentHead {
    elements: Vec<(String, String)>,
}

impl DocumentHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, element_id: &str) -> bool {
        self.elements.iter().any(|(id, _)| id == element_id)
    }

    /// Render the accumulated style elements as HTML.
    pub fn to_html(&self) -> String {
        self.elements
            .iter()
            .map(|(id, css)| format!("<style id=\"{id}\">\n{css}\n</style>"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StyleSink for DocumentHead {
    fn apply(&mut self, element_id: &str, css: &str) {
        if let Some(slot) = self.elements.iter_mut().find(|(id, _)| id == element_id) {
            slot.1 = css.to_string();
        } else {
            self.elements.push((element_id.to_string(), css.to_string()));
        }
    }
}

/// Render and apply every directive, in emission order.
pub fn apply_directives(sink: &mut dyn StyleSink, directives: &[Directive]) {
    for directive in directives {
        sink.apply(&directive.element_id(), &css::render(directive));
    }
}
