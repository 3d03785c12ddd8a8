/// Gallery session: the filter set, the sort key, and the render pass
///
/// One session per page view. Every mutation re-renders the full card list
/// from scratch; there is no diffing. The random source is injected so a
/// seeded RNG gives reproducible covers and shuffles.
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::assets::AssetResolver;
use super::data::{Creator, SiteData};
use super::tags::{locale_cmp, TagIndex};
use crate::ui::card::{render_card, CardContext};
use crate::ui::controls;
use crate::ui::node::{Action, Node};

/// How the filtered creators are ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Original load order
    #[default]
    Priority,
    NameAsc,
    NameDesc,
    /// Newest first
    DateDesc,
    /// Oldest first; missing dates come first
    DateAsc,
    /// Reshuffled on every render
    Random,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Priority,
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::Random,
    ];

    /// Value used by the sort selector
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Priority => "priority",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::Random => "random",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Priority => "Priority",
            SortKey::NameAsc => "Name A-Z",
            SortKey::NameDesc => "Name Z-A",
            SortKey::DateDesc => "Newest",
            SortKey::DateAsc => "Oldest",
            SortKey::Random => "Random",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {s}"))
    }
}

/// A card from one render pass
#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub creator_id: String,
    /// Raw (not title-cased) name, the name sort key
    pub name: String,
    pub added_date: Option<String>,
    /// Position in the creator list, the priority sort key
    pub priority: usize,
    /// Whether the creator passes the tag filter of this pass
    pub visible: bool,
    pub node: Node,
    /// Distinct images for the hover carousel, displayed cover first
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum GalleryContent {
    Cards(Vec<RenderedCard>),
    /// Single empty-state node with a reset control
    Empty(Node),
}

/// Output of one render pass
#[derive(Debug, Clone)]
pub struct GalleryView {
    /// Number of creators passing the filter
    pub count: usize,
    pub filter_bar: Node,
    pub content: GalleryContent,
}

impl GalleryView {
    pub fn cards(&self) -> &[RenderedCard] {
        match &self.content {
            GalleryContent::Cards(cards) => cards,
            GalleryContent::Empty(_) => &[],
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self.content, GalleryContent::Empty(_))
    }
}

/// Render settings fixed for the life of a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub assets_root: String,
    pub stagger_ms: u64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            assets_root: "assets/creators".to_string(),
            stagger_ms: 30,
        }
    }
}

pub struct GallerySession<R> {
    data: SiteData,
    index: TagIndex,
    options: SessionOptions,
    selected: BTreeSet<String>,
    sort: SortKey,
    rng: R,
}

impl<R: Rng> GallerySession<R> {
    pub fn new(data: SiteData, options: SessionOptions, rng: R) -> Self {
        let index = TagIndex::build(&data.creators);
        tracing::info!(
            creators = data.creators.len(),
            tags = index.tags().len(),
            "Gallery session started"
        );
        Self {
            data,
            index,
            options,
            selected: BTreeSet::new(),
            sort: SortKey::default(),
            rng,
        }
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.index
    }

    pub fn creators(&self) -> &[Creator] {
        &self.data.creators
    }

    /// Flip a tag's membership in the filter and re-render
    pub fn toggle_tag(&mut self, tag: &str) -> GalleryView {
        if !self.selected.remove(tag) {
            self.selected.insert(tag.to_string());
        }
        tracing::debug!(tag, active = self.selected.contains(tag), "Toggled tag filter");
        self.render()
    }

    /// Clear the filter and re-render
    pub fn reset_filters(&mut self) -> GalleryView {
        self.selected.clear();
        tracing::debug!("Reset tag filters");
        self.render()
    }

    pub fn set_sort(&mut self, key: SortKey) -> GalleryView {
        self.sort = key;
        tracing::debug!(sort = key.as_str(), "Changed sort");
        self.render()
    }

    /// Route a click from a rendered node. Link opening is left to the
    /// host, so `OpenLink` returns `None`.
    pub fn dispatch(&mut self, action: &Action) -> Option<GalleryView> {
        match action {
            Action::ToggleTag(tag) => Some(self.toggle_tag(tag)),
            Action::ResetFilters => Some(self.reset_filters()),
            Action::OpenLink(_) => None,
        }
    }

    /// Creators passing the filter, in sort order
    #[cfg(test)]
    pub fn visible(&mut self) -> Vec<&Creator> {
        let order = self.visible_order();
        order.into_iter().map(|i| &self.data.creators[i]).collect()
    }

    /// Positions in the creator list of everything passing the filter,
    /// in sort order
    fn visible_order(&mut self) -> Vec<usize> {
        let order: Vec<usize> = (0..self.data.creators.len())
            .filter(|&i| self.passes_filter(i))
            .collect();
        self.sorted(order)
    }

    fn passes_filter(&self, i: usize) -> bool {
        self.selected.is_empty() || self.data.creators[i].has_any_tag(self.selected.iter())
    }

    fn sorted(&mut self, mut order: Vec<usize>) -> Vec<usize> {
        let creators = &self.data.creators;

        match self.sort {
            SortKey::Priority => {}
            SortKey::NameAsc => order.sort_by(|&a, &b| locale_cmp(&creators[a].name, &creators[b].name)),
            SortKey::NameDesc => order.sort_by(|&a, &b| locale_cmp(&creators[b].name, &creators[a].name)),
            SortKey::DateDesc => order.sort_by(|&a, &b| date_of(&creators[b]).cmp(date_of(&creators[a]))),
            SortKey::DateAsc => order.sort_by(|&a, &b| date_of(&creators[a]).cmp(date_of(&creators[b]))),
            SortKey::Random => order.shuffle(&mut self.rng),
        }
        order
    }

    /// Full render pass: filter, sort, then build every card from scratch
    pub fn render(&mut self) -> GalleryView {
        let filter_bar = controls::filter_bar(&self.index, &self.selected);
        let order = self.visible_order();
        let count = order.len();

        if order.is_empty() {
            tracing::debug!("No creators match the current filter");
            return GalleryView {
                count,
                filter_bar,
                content: GalleryContent::Empty(controls::empty_state()),
            };
        }

        let cards = self.build_cards(&order);
        tracing::debug!(count, sort = self.sort.as_str(), "Rendered gallery");
        GalleryView {
            count,
            filter_bar,
            content: GalleryContent::Cards(cards),
        }
    }

    /// Render pass that keeps every creator's card, in sort order, with
    /// `RenderedCard::visible` marking the ones passing the filter.
    ///
    /// For hosts that filter after rendering, like the static page.
    /// `count` still counts only the visible cards. With no creators at
    /// all the content is the empty state.
    pub fn render_all(&mut self) -> GalleryView {
        let filter_bar = controls::filter_bar(&self.index, &self.selected);
        let order = self.sorted((0..self.data.creators.len()).collect());
        if order.is_empty() {
            return GalleryView {
                count: 0,
                filter_bar,
                content: GalleryContent::Empty(controls::empty_state()),
            };
        }

        let cards = self.build_cards(&order);
        let count = cards.iter().filter(|card| card.visible).count();
        tracing::debug!(count, total = cards.len(), "Rendered full gallery");
        GalleryView {
            count,
            filter_bar,
            content: GalleryContent::Cards(cards),
        }
    }

    /// Build cards for creators at `order`, entrance delays counted over
    /// the visible ones only
    fn build_cards(&mut self, order: &[usize]) -> Vec<RenderedCard> {
        let resolver = AssetResolver::new(&self.data.manifest, &self.options.assets_root);
        let ctx = CardContext {
            index: &self.index,
            selected: &self.selected,
            stagger_ms: self.options.stagger_ms,
        };

        let mut cards = Vec::with_capacity(order.len());
        let mut position = 0;
        for &i in order {
            let creator = &self.data.creators[i];
            let visible = self.passes_filter(i);
            let assets = resolver.resolve(&creator.id);
            let cover = assets.pick_cover(&mut self.rng);
            cards.push(RenderedCard {
                creator_id: creator.id.clone(),
                name: creator.name.clone(),
                added_date: creator.added_date.clone(),
                priority: i,
                visible,
                node: render_card(creator, &assets, cover.as_deref(), position, &ctx),
                images: assets.carousel_images(cover.as_deref()),
            });
            if visible {
                position += 1;
            }
        }
        cards
    }
}

/// Missing dates sort as the empty string, i.e. earliest
fn date_of(creator: &Creator) -> &str {
    creator.added_date.as_deref().unwrap_or("")
}
