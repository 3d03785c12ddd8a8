//! Static HTML rendering
//!
//! Turns the node tree into markup and wraps one gallery render pass in a
//! complete page. The page keeps the fixed element ids the site's
//! stylesheet addresses: `results-number`, `tag-filters`, `sort-select`,
//! `reset-filters` and `gallery`.
//!
//! Links never nest. An anchor holding other links or buttons is written
//! as a `div` whose link is a sibling overlay anchor, so a tag button on a
//! linked card is not inside the card's `<a>`.
//!
//! The page carries every card with the creator's sort keys as data
//! attributes. A small inline script does filtering, sorting, reset and the
//! hover carousel on the page itself.

use std::fmt::Write;

use super::controls;
use super::icons;
use super::node::{Action, Element, Kind, Node};
use crate::state::session::{GalleryContent, GalleryView, RenderedCard, SortKey};

/// Escape text for use in element content or a quoted attribute
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render a node tree to HTML
pub fn render_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(&escape(text)),
        Node::Element(element) => write_element(out, element),
    }
}

/// True if any descendant is a link or a button
fn has_interactive(element: &Element) -> bool {
    element.children.iter().any(|child| match child {
        Node::Element(el) => matches!(el.kind, Kind::Anchor { .. } | Kind::Button) || has_interactive(el),
        Node::Text(_) => false,
    })
}

fn write_element(out: &mut String, element: &Element) {
    if let Kind::Anchor { href } = &element.kind {
        if has_interactive(element) {
            write_overlay_link(out, element, href);
            return;
        }
    }

    let tag = match &element.kind {
        Kind::Anchor { .. } => "a",
        Kind::Block | Kind::Row => "div",
        Kind::Inline | Kind::Icon(_) => "span",
        Kind::Image { .. } => "img",
        Kind::Button => "button",
    };

    out.push('<');
    out.push_str(tag);
    if !element.classes.is_empty() {
        let _ = write!(out, r#" class="{}""#, element.classes.join(" "));
    }

    match &element.kind {
        Kind::Anchor { href } => {
            let _ = write!(
                out,
                r#" href="{}" target="_blank" rel="noopener noreferrer""#,
                escape(href)
            );
        }
        Kind::Image { src, alt } => {
            let _ = write!(out, r#" src="{}" alt="{}" loading="lazy""#, escape(src), escape(alt));
        }
        Kind::Button => out.push_str(r#" type="button""#),
        _ => {}
    }

    // Handlers that need a page script are exposed as data attributes
    match &element.on_click {
        Some(Action::ToggleTag(tag)) if element.attr_value("data-tag").is_none() => {
            let _ = write!(out, r#" data-tag="{}""#, escape(tag));
        }
        Some(Action::ResetFilters) => out.push_str(r#" data-action="reset-filters""#),
        _ => {}
    }

    for (name, value) in &element.attrs {
        let _ = write!(out, r#" {}="{}""#, name, escape(value));
    }
    if let Some(style) = &element.style {
        let _ = write!(out, r#" style="{}""#, escape(style));
    }

    if matches!(element.kind, Kind::Image { .. }) {
        out.push('>');
        return;
    }
    out.push('>');

    if let Kind::Icon(key) = &element.kind {
        if let Some(platform) = icons::platform(key) {
            out.push_str(&platform.svg());
        }
    }
    for child in &element.children {
        write_node(out, child);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// A linked container: `div` with the same classes and attributes, the
/// link itself as an empty overlay anchor in front of the content
fn write_overlay_link(out: &mut String, element: &Element, href: &str) {
    out.push_str("<div");
    let _ = write!(out, r#" class="{} has-overlay""#, element.classes.join(" "));
    let _ = write!(out, r#" data-href="{}""#, escape(href));
    for (name, value) in &element.attrs {
        let _ = write!(out, r#" {}="{}""#, name, escape(value));
    }
    if let Some(style) = &element.style {
        let _ = write!(out, r#" style="{}""#, escape(style));
    }
    out.push('>');
    let _ = write!(
        out,
        r#"<a class="card-overlay" href="{}" target="_blank" rel="noopener noreferrer" tabindex="-1" aria-hidden="true"></a>"#,
        escape(href)
    );
    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</div>");
}

/// Page-level settings for the static export
#[derive(Debug, Clone)]
pub struct PageOptions<'a> {
    pub sort: SortKey,
    pub generated_at: &'a str,
    pub carousel_period_ms: u64,
    pub stagger_ms: u64,
}

/// Render a full page for one gallery pass.
///
/// Cards with `visible == false` are written `hidden`; the empty state is
/// always present and hidden while anything is visible.
pub fn render_page(view: &GalleryView, options: &PageOptions<'_>) -> String {
    let sort_options: String = SortKey::ALL
        .iter()
        .map(|key| {
            let selected = if *key == options.sort { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                key.as_str(),
                selected,
                escape(key.label())
            )
        })
        .collect();

    let gallery: String = match &view.content {
        GalleryContent::Cards(cards) => {
            let mut markup: String = cards.iter().map(render_card).collect();
            let mut empty = controls::empty_state();
            if view.count > 0 {
                empty = hide(empty);
            }
            markup.push_str(&render_node(&empty));
            markup
        }
        GalleryContent::Empty(node) => render_node(node),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="volumography">
    <meta name="generated-at" content="{generated_at}">
    <title>Volumography</title>
    <link rel="stylesheet" href="style.css">
    <style>{style}</style>
</head>
<body>
    <header class="toolbar">
        <div class="results"><span id="results-number">{count}</span> Creators</div>
        <div id="tag-filters">{filters}</div>
        <select id="sort-select">{sort_options}</select>
        <button id="reset-filters" type="button">Reset</button>
    </header>
    <main id="gallery" data-carousel-period="{period}" data-stagger="{stagger}">{gallery}</main>
    <script>{script}</script>
</body>
</html>
"#,
        generated_at = escape(options.generated_at),
        style = PAGE_STYLE,
        count = view.count,
        filters = render_node(&view.filter_bar),
        sort_options = sort_options,
        period = options.carousel_period_ms,
        stagger = options.stagger_ms,
        gallery = gallery,
        script = PAGE_SCRIPT,
    )
}

fn hide(node: Node) -> Node {
    match node {
        Node::Element(element) => Node::Element(element.attr("hidden", "hidden")),
        other => other,
    }
}

/// Card markup with the sort keys and carousel list the page script reads
fn render_card(card: &RenderedCard) -> String {
    let Node::Element(mut element) = card.node.clone() else {
        return render_node(&card.node);
    };
    element = element
        .attr("data-id", card.creator_id.clone())
        .attr("data-name", card.name.clone())
        .attr("data-date", card.added_date.clone().unwrap_or_default())
        .attr("data-priority", card.priority.to_string());
    if card.images.len() > 1 {
        element = element.attr("data-carousel", card.images.join("|"));
    }
    if !card.visible {
        element = element.attr("hidden", "hidden");
    }
    render_node(&Node::Element(element))
}

/// Overlay link sits under the card's own links and buttons
const PAGE_STYLE: &str = "\
.has-overlay{position:relative}\
.card-overlay{position:absolute;inset:0;z-index:0}\
.has-overlay a:not(.card-overlay),.has-overlay button{position:relative;z-index:1}\
[hidden]{display:none!important}";

const PAGE_SCRIPT: &str = r#"
(() => {
  const gallery = document.getElementById('gallery');
  const results = document.getElementById('results-number');
  const sortSelect = document.getElementById('sort-select');
  const empty = gallery.querySelector('.gallery-empty');
  const cards = Array.from(gallery.querySelectorAll('.creator-card'));
  const period = Number(gallery.dataset.carouselPeriod) || 600;
  const stagger = Number(gallery.dataset.stagger) || 0;
  const selected = new Set(Array.from(
    document.querySelectorAll('#tag-filters .filter-btn.active'), b => b.dataset.tag));
  const timers = new Map();

  const tagsOf = card => Array.from(card.querySelectorAll('.card-tags [data-tag]'), b => b.dataset.tag);
  const cmp = (x, y) => (x < y ? -1 : x > y ? 1 : 0);

  const stop = card => {
    const timer = timers.get(card);
    if (!timer) return;
    clearInterval(timer.id);
    timer.img.src = timer.original;
    timers.delete(card);
  };

  const start = card => {
    stop(card);
    const img = card.querySelector('.cover-image');
    if (!img || !card.dataset.carousel) return;
    const images = card.dataset.carousel.split('|');
    if (images.length < 2) return;
    let index = 0;
    const original = img.getAttribute('src');
    const id = setInterval(() => {
      index = (index + 1) % images.length;
      img.src = images[index];
    }, period);
    timers.set(card, { id, img, original });
  };

  const sorted = list => {
    switch (sortSelect.value) {
      case 'name-asc': return list.sort((a, b) => a.dataset.name.localeCompare(b.dataset.name));
      case 'name-desc': return list.sort((a, b) => b.dataset.name.localeCompare(a.dataset.name));
      case 'date-desc': return list.sort((a, b) => cmp(b.dataset.date, a.dataset.date));
      case 'date-asc': return list.sort((a, b) => cmp(a.dataset.date, b.dataset.date));
      case 'random':
        for (let i = list.length - 1; i > 0; i--) {
          const j = Math.floor(Math.random() * (i + 1));
          [list[i], list[j]] = [list[j], list[i]];
        }
        return list;
      default: return list.sort((a, b) => a.dataset.priority - b.dataset.priority);
    }
  };

  const render = () => {
    cards.forEach(stop);
    const visible = sorted(cards.filter(card =>
      selected.size === 0 || tagsOf(card).some(tag => selected.has(tag))));
    cards.forEach(card => { card.hidden = true; });
    visible.forEach((card, i) => {
      card.hidden = false;
      card.style.animationDelay = (i * stagger) + 'ms';
      gallery.insertBefore(card, empty);
    });
    document.querySelectorAll('[data-tag]').forEach(b =>
      b.classList.toggle('active', selected.has(b.dataset.tag)));
    results.textContent = visible.length;
    if (empty) empty.hidden = visible.length > 0;
  };

  document.addEventListener('click', event => {
    const tag = event.target.closest('[data-tag]');
    if (tag) {
      event.preventDefault();
      event.stopPropagation();
      const name = tag.dataset.tag;
      if (!selected.delete(name)) selected.add(name);
      render();
      return;
    }
    if (event.target.closest('[data-action="reset-filters"], #reset-filters')) {
      event.preventDefault();
      selected.clear();
      render();
    }
  });
  sortSelect.addEventListener('change', render);
  cards.forEach(card => {
    card.addEventListener('mouseenter', () => start(card));
    card.addEventListener('mouseleave', () => stop(card));
  });
})();
"#;
