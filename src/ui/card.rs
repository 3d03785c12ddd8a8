/// Creator card composition
///
/// LAYOUT:
/// ┌─────────────────────────┐
/// │ [AVA]              [↗]  │  avatar only with a profile image, arrow only with a primary link
/// │     [COVER/PREVIEW]     │
/// ├─────────────────────────┤
/// │ Name  origin-name       │
/// │ Title                   │
/// │ Subtitle                │
/// │ website.com / 𝕏 ◎ ▶     │
/// │ Location / Segments     │
/// ├─────────────────────────┤
/// │ [TAG] [TAG]             │  toggles the global tag filter
/// └─────────────────────────┘
use std::collections::BTreeSet;

use super::icons;
use super::node::{Action, Element, Kind, Node};
use super::text::{display_host, location_segments, title_case};
use crate::state::assets::AssetBundle;
use crate::state::data::{Creator, PRIMARY_LINK, WEBSITE_LINK};
use crate::state::tags::TagIndex;

/// Non-breaking space keeping an empty location row at full height
const EMPTY_LOCATION: &str = "\u{a0}";

/// Shared inputs for every card in one render pass
#[derive(Debug, Clone, Copy)]
pub struct CardContext<'a> {
    pub index: &'a TagIndex,
    pub selected: &'a BTreeSet<String>,
    /// Entrance delay per list position, in milliseconds
    pub stagger_ms: u64,
}

/// Build the card for one creator.
///
/// `cover` is the image already picked for this pass (see
/// `AssetBundle::pick_cover`); `position` is the card's place in the
/// rendered list.
pub fn render_card(
    creator: &Creator,
    assets: &AssetBundle,
    cover: Option<&str>,
    position: usize,
    ctx: &CardContext<'_>,
) -> Node {
    let primary = creator.primary_link();
    let root = match primary {
        Some(href) => Element::anchor(href, "creator-card"),
        None => Element::block("creator-card"),
    };

    root.style(format!("animation-delay: {}ms", position as u64 * ctx.stagger_ms))
        .child(media(creator, assets, cover, primary.is_some()))
        .child(
            Element::block("card-info")
                .child(text_group(creator))
                .child(meta_group(creator, ctx)),
        )
        .into()
}

fn media(creator: &Creator, assets: &AssetBundle, cover: Option<&str>, has_primary: bool) -> Element {
    let alt = title_case(&creator.name);
    let mut media = Element::block("card-media");

    media = match cover {
        Some(src) => media.child(Element::image(src, &alt, "cover-image")),
        None => media.child(Element::block("card-media-placeholder").text("No Preview")),
    };

    if let Some(profile) = &assets.profile {
        media = media.child(
            Element::block("card-avatar-overlay").child(Element::image(profile, &alt, "avatar-image")),
        );
    }

    if has_primary {
        media = media.child(Element::inline("card-arrow").text("↗"));
    }

    media
}

fn text_group(creator: &Creator) -> Element {
    let mut name = Element::block("card-name").text(&title_case(&creator.name));
    if let Some(origin) = &creator.name_origin {
        name = name
            .child(Node::text(" "))
            .child(Element::inline("card-origin-name").text(origin));
    }

    let mut group = Element::block("card-text-group").child(name);
    if let Some(title) = &creator.title {
        group = group.child(Element::block("card-specialty").text(&title_case(title)));
    }
    if let Some(subtitle) = &creator.subtitle {
        group = group.child(Element::block("card-subtitle").text(subtitle));
    }
    group
}

fn meta_group(creator: &Creator, ctx: &CardContext<'_>) -> Element {
    let mut group = Element::block("card-meta-group")
        .child(links_row(creator))
        .child(location(creator));

    if !creator.tags.is_empty() {
        let tags = ctx.index.sort_tags(&creator.tags).into_iter().map(|tag| {
            let mut button =
                Element::button(&tag, "tag", Action::ToggleTag(tag.clone())).attr("data-tag", tag.as_str());
            if ctx.selected.contains(&tag) {
                button = button.class("active");
            }
            Node::from(button)
        });
        group = group.child(Element::row("card-tags").children(tags));
    }

    group
}

fn links_row(creator: &Creator) -> Element {
    let socials: Vec<Node> = creator
        .links
        .iter()
        .filter(|(key, _)| key.as_str() != PRIMARY_LINK && key.as_str() != WEBSITE_LINK)
        .filter_map(|(key, url)| {
            let url = url.as_deref().filter(|u| !u.is_empty())?;
            let platform = icons::platform(key)?;
            Some(Node::from(
                Element::anchor(url, "social-icon")
                    .attr("title", platform.key)
                    .child(Element::new(Kind::Icon(platform.key.to_string()), "icon")),
            ))
        })
        .collect();

    let mut row = Element::row("card-links-row");
    let website = creator.website();
    if let Some(url) = website {
        row = row.child(Element::anchor(url, "card-link").text(display_host(url)));
    }
    if website.is_some() && !socials.is_empty() {
        row = row.child(Element::inline("card-separator").text("/"));
    }
    if !socials.is_empty() {
        row = row.child(Element::row("card-social").children(socials));
    }
    row
}

fn location(creator: &Creator) -> Element {
    let row = Element::block("card-location");
    let Some(location) = &creator.location else {
        return row.text(EMPTY_LOCATION);
    };

    let mut children: Vec<Node> = Vec::new();
    for (i, segment) in location_segments(location).into_iter().enumerate() {
        if i > 0 {
            children.push(Element::inline("card-separator").text("/").into());
        }
        if !segment.is_empty() {
            children.push(Node::text(segment));
        }
    }
    row.children(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn creator() -> Creator {
        Creator {
            id: "jane".into(),
            name: "jane doe".into(),
            name_origin: None,
            title: None,
            subtitle: None,
            location: None,
            tags: Vec::new(),
            added_date: None,
            links: IndexMap::new(),
        }
    }

    fn links(pairs: &[(&str, &str)]) -> IndexMap<String, Option<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Some(v.to_string())))
            .collect()
    }

    fn render(creator: &Creator, assets: &AssetBundle, cover: Option<&str>) -> Node {
        let index = TagIndex::build(std::slice::from_ref(creator));
        let selected = BTreeSet::new();
        let ctx = CardContext {
            index: &index,
            selected: &selected,
            stagger_ms: 30,
        };
        render_card(creator, assets, cover, 2, &ctx)
    }

    fn root(node: &Node) -> &Element {
        node.as_element().unwrap()
    }

    #[test]
    fn test_bare_creator_degrades() {
        let node = render(&creator(), &AssetBundle::default(), None);
        let card = root(&node);

        assert_eq!(card.kind, Kind::Block);
        assert!(card.on_click.is_none());
        assert!(node.find("card-media-placeholder").is_some());
        assert!(node.find("cover-image").is_none());
        assert!(node.find("card-avatar-overlay").is_none());
        assert!(node.find("card-arrow").is_none());
        assert!(node.find("card-tags").is_none());
        assert_eq!(Node::Element(node.find("card-location").unwrap().clone()).text_content(), EMPTY_LOCATION);
        assert_eq!(card.style.as_deref(), Some("animation-delay: 60ms"));
    }

    #[test]
    fn test_primary_link_makes_anchor_with_arrow() {
        let mut c = creator();
        c.links = links(&[("ct", "https://creative.tech/jane")]);
        let node = render(&c, &AssetBundle::default(), None);

        assert_eq!(
            root(&node).kind,
            Kind::Anchor {
                href: "https://creative.tech/jane".into()
            }
        );
        assert!(node.find("card-arrow").is_some());
    }

    #[test]
    fn test_cover_and_avatar() {
        let assets = AssetBundle {
            profile: Some("assets/creators/jane/profile.jpg".into()),
            cover: Some("assets/creators/jane/cover.jpg".into()),
            gallery: Vec::new(),
        };
        let node = render(&creator(), &assets, assets.cover.as_deref());

        let cover = node.find("cover-image").unwrap();
        assert_eq!(
            cover.kind,
            Kind::Image {
                src: "assets/creators/jane/cover.jpg".into(),
                alt: "Jane Doe".into()
            }
        );
        assert!(node.find("card-media-placeholder").is_none());
        assert!(node.find("avatar-image").is_some());
    }

    #[test]
    fn test_name_and_title_are_title_cased() {
        let mut c = creator();
        c.name_origin = Some("ジェーン".into());
        c.title = Some("vfx supervisor".into());
        c.subtitle = Some("keeps case".into());
        let node = render(&c, &AssetBundle::default(), None);

        let name = Node::Element(node.find("card-name").unwrap().clone());
        assert_eq!(name.text_content(), "Jane Doe ジェーン");
        let title = Node::Element(node.find("card-specialty").unwrap().clone());
        assert_eq!(title.text_content(), "VFX Supervisor");
        let subtitle = Node::Element(node.find("card-subtitle").unwrap().clone());
        assert_eq!(subtitle.text_content(), "keeps case");
    }

    #[test]
    fn test_links_row() {
        let mut c = creator();
        c.links = links(&[
            ("ct", "https://creative.tech/jane"),
            ("youtube", "https://youtube.com/@jane"),
            ("myspace", "https://myspace.com/jane"),
            ("website", "https://www.jane.studio/about"),
            ("github", "https://github.com/jane"),
        ]);
        let node = render(&c, &AssetBundle::default(), None);

        let website = node.find("card-link").unwrap();
        assert_eq!(Node::Element(website.clone()).text_content(), "jane.studio");

        let icons: Vec<&str> = node
            .find_all("social-icon")
            .iter()
            .filter_map(|el| el.attr_value("title"))
            .collect();
        assert_eq!(icons, vec!["youtube", "github"]);

        let links_row = Node::Element(node.find("card-links-row").unwrap().clone());
        assert_eq!(links_row.find_all("card-separator").len(), 1);
    }

    #[test]
    fn test_no_separator_without_socials() {
        let mut c = creator();
        c.links = links(&[("website", "https://jane.studio")]);
        let node = render(&c, &AssetBundle::default(), None);
        assert!(node.find("card-social").is_none());
        assert!(node.find("card-separator").is_none());
    }

    #[test]
    fn test_location_separators() {
        let mut c = creator();
        c.location = Some("Tokyo / Berlin".into());
        let node = render(&c, &AssetBundle::default(), None);

        let location = Node::Element(node.find("card-location").unwrap().clone());
        assert_eq!(location.find_all("card-separator").len(), 1);
        assert_eq!(location.text_content(), "Tokyo/Berlin");
    }

    #[test]
    fn test_tags_follow_rank_and_selection() {
        let mut c = creator();
        c.tags = vec!["3D".into(), "VFX".into()];
        c.links = links(&[("ct", "https://creative.tech/jane")]);

        let other = Creator {
            id: "other".into(),
            tags: vec!["VFX".into()],
            ..creator()
        };
        let index = TagIndex::build(&[c.clone(), other]);
        let selected: BTreeSet<String> = ["VFX".to_string()].into_iter().collect();
        let ctx = CardContext {
            index: &index,
            selected: &selected,
            stagger_ms: 30,
        };
        let node = render_card(&c, &AssetBundle::default(), None, 0, &ctx);

        let tags = node.find_all("tag");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].attr_value("data-tag"), Some("VFX"));
        assert!(tags[0].has_class("active"));
        assert!(!tags[1].has_class("active"));

        // The tag handler stops the click before it reaches the card link
        assert_eq!(node.click("tag"), Some(Action::ToggleTag("VFX".into())));
        assert_eq!(
            node.click("card-name"),
            Some(Action::OpenLink("https://creative.tech/jane".into()))
        );
    }
}
