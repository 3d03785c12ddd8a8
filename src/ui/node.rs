/// Platform-independent UI tree
///
/// Cards, the filter bar, and the empty state are built as `Node` values.
/// A separate step turns them into HTML (`ui::html`) or iced widgets
/// (`ui::view`). Click handlers are plain `Action` values bound when the
/// node is built; the innermost handler on the path to the root wins.

/// What a click on an element asks the gallery to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleTag(String),
    ResetFilters,
    /// Open a URL in a new context without leaking referrer or opener
    OpenLink(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Navigable link. Always carries `Action::OpenLink` for its href.
    Anchor { href: String },
    /// Vertical container
    Block,
    /// Horizontal container
    Row,
    /// Inline text span
    Inline,
    Image { src: String, alt: String },
    Button,
    /// Known social platform icon, by platform key
    Icon(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: Kind,
    pub classes: Vec<&'static str>,
    pub attrs: Vec<(&'static str, String)>,
    pub style: Option<String>,
    pub on_click: Option<Action>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(kind: Kind, class: &'static str) -> Self {
        let on_click = match &kind {
            Kind::Anchor { href } => Some(Action::OpenLink(href.clone())),
            _ => None,
        };
        Self {
            kind,
            classes: class.split_whitespace().collect(),
            attrs: Vec::new(),
            style: None,
            on_click,
            children: Vec::new(),
        }
    }

    pub fn block(class: &'static str) -> Self {
        Self::new(Kind::Block, class)
    }

    pub fn row(class: &'static str) -> Self {
        Self::new(Kind::Row, class)
    }

    pub fn inline(class: &'static str) -> Self {
        Self::new(Kind::Inline, class)
    }

    pub fn anchor(href: &str, class: &'static str) -> Self {
        Self::new(Kind::Anchor { href: href.to_string() }, class)
    }

    pub fn image(src: &str, alt: &str, class: &'static str) -> Self {
        Self::new(
            Kind::Image {
                src: src.to_string(),
                alt: alt.to_string(),
            },
            class,
        )
    }

    pub fn button(label: &str, class: &'static str, action: Action) -> Self {
        Self::new(Kind::Button, class)
            .on_click(action)
            .text(label)
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.on_click = Some(action);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.child(Node::Text(text.to_string()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }
}

/// Tree queries for inspecting rendered output
#[cfg(test)]
impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Depth-first search for the first element with `class`
    pub fn find(&self, class: &str) -> Option<&Element> {
        let element = self.as_element()?;
        if element.has_class(class) {
            return Some(element);
        }
        element.children.iter().find_map(|child| child.find(class))
    }

    /// All elements with `class`, in document order
    pub fn find_all<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect(class, &mut found);
        found
    }

    fn collect<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if let Node::Element(element) = self {
            if element.has_class(class) {
                found.push(element);
            }
            for child in &element.children {
                child.collect(class, found);
            }
        }
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element(element) => element.children.iter().map(Node::text_content).collect(),
        }
    }

    /// Simulate a click on the first element with `class`.
    ///
    /// The handler closest to the clicked element fires and the click stops
    /// there; outer handlers never see it.
    pub fn click(&self, class: &str) -> Option<Action> {
        let mut path = Vec::new();
        if !self.path_to(class, &mut path) {
            return None;
        }
        path.iter().rev().find_map(|element| element.on_click.clone())
    }

    fn path_to<'a>(&'a self, class: &str, path: &mut Vec<&'a Element>) -> bool {
        let Node::Element(element) = self else {
            return false;
        };
        path.push(element);
        if element.has_class(class) {
            return true;
        }
        if element.children.iter().any(|child| child.path_to(class, path)) {
            return true;
        }
        path.pop();
        false
    }
}
