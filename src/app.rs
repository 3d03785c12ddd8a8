use iced::widget::{button, column, container, mouse_area, pick_list, row, scrollable, text, Column, Space};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use iced_aw::Wrap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::LoadError;
use crate::state::config::SiteConfig;
use crate::state::data::SiteData;
use crate::state::loader::load_site;
use crate::state::session::{GalleryContent, GallerySession, GalleryView, SortKey};
use crate::ui::carousel::CarouselBoard;
use crate::ui::controls;
use crate::ui::node::Action;
use crate::ui::view::{to_widget, ViewContext, CARD_WIDTH};

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Both data files finished loading (or one failed)
    Loaded(Result<SiteData, Arc<LoadError>>),
    /// Tag, reset, card, website, or social link clicked
    Action(Action),
    SortSelected(SortKey),
    CardEntered(usize),
    CardExited(usize),
    CarouselTick,
}

/// A loaded gallery and everything derived from its last render
struct Gallery {
    session: GallerySession<StdRng>,
    view: GalleryView,
    /// One slot per rendered card
    carousels: CarouselBoard,
}

impl Gallery {
    fn new(data: SiteData, config: &SiteConfig) -> Self {
        let mut session = GallerySession::new(data, config.session_options(), StdRng::from_entropy());
        let view = session.render();
        let mut carousels = CarouselBoard::default();
        carousels.rebuild(view.cards().iter().map(|card| card.images.as_slice()));
        Gallery {
            session,
            view,
            carousels,
        }
    }

    /// Swap in a fresh render. Old carousel timers are cancelled before the
    /// old cards go away.
    fn show(&mut self, view: GalleryView) {
        self.carousels
            .rebuild(view.cards().iter().map(|card| card.images.as_slice()));
        self.view = view;
    }
}

enum Phase {
    Loading,
    Failed,
    Ready(Box<Gallery>),
}

/// Main application state
pub struct Volumography {
    site: PathBuf,
    config: SiteConfig,
    phase: Phase,
    /// Status message to display to the user
    status: String,
}

impl Volumography {
    /// Create the viewer and start loading both data files
    pub fn new(site: PathBuf, config: SiteConfig) -> (Self, Task<Message>) {
        let creators = site.join(&config.creators_file);
        let manifest = site.join(&config.manifest_file);
        tracing::info!(site = %site.display(), "Starting gallery viewer");

        (
            Volumography {
                site,
                config,
                phase: Phase::Loading,
                status: "Loading creators...".to_string(),
            },
            Task::perform(load_site(creators, manifest), |result| {
                Message::Loaded(result.map_err(Arc::new))
            }),
        )
    }

    pub fn title(&self) -> String {
        "Volumography".to_string()
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let message = match message {
            Message::Loaded(result) => {
                self.on_loaded(result);
                return Task::none();
            }
            other => other,
        };

        let Phase::Ready(gallery) = &mut self.phase else {
            return Task::none();
        };

        match message {
            Message::Action(action) => {
                if let Some(view) = gallery.session.dispatch(&action) {
                    gallery.show(view);
                } else if let Action::OpenLink(url) = action {
                    // No embedded browser: hand the link over via the clipboard
                    tracing::info!(url = %url, "Opening link");
                    self.status = format!("Link copied: {url}");
                    return iced::clipboard::write(url);
                }
            }
            Message::SortSelected(key) => {
                let view = gallery.session.set_sort(key);
                gallery.show(view);
            }
            Message::CardEntered(card) => gallery.carousels.enter(card),
            Message::CardExited(card) => gallery.carousels.leave(card),
            Message::CarouselTick => gallery.carousels.tick(),
            Message::Loaded(_) => {}
        }

        Task::none()
    }

    fn on_loaded(&mut self, result: Result<SiteData, Arc<LoadError>>) {
        match result {
            Ok(data) => {
                let gallery = Gallery::new(data, &self.config);
                self.status = format!("{} creators loaded", gallery.session.creators().len());
                self.phase = Phase::Ready(Box::new(gallery));
            }
            Err(err) => {
                // No partial gallery: one message replaces everything
                tracing::error!(error = %err, "Failed to load creator data");
                self.status = err.to_string();
                self.phase = Phase::Failed;
            }
        }
    }

    /// The carousel timer only exists while some card is hovered
    pub fn subscription(&self) -> Subscription<Message> {
        match &self.phase {
            Phase::Ready(gallery) if gallery.carousels.any_running() => {
                iced::time::every(self.config.carousel_period()).map(|_| Message::CarouselTick)
            }
            _ => Subscription::none(),
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<'_, Message> {
        let body: Element<Message> = match &self.phase {
            Phase::Loading => text("Loading...").size(16).into(),
            Phase::Failed => to_widget(&controls::load_failure(), &self.view_context(None)),
            Phase::Ready(gallery) => self.gallery_view(gallery),
        };

        let content: Column<Message> = column![
            text("Volumography").size(36),
            body,
            text(&self.status).size(12),
        ]
        .spacing(16)
        .padding(24);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn gallery_view<'a>(&'a self, gallery: &'a Gallery) -> Element<'a, Message> {
        let toolbar = row![
            text(format!("{} Creators", gallery.view.count)).size(14),
            pick_list(SortKey::ALL, Some(gallery.session.sort()), Message::SortSelected),
            button("Reset").on_press(Message::Action(Action::ResetFilters)),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let filters: Element<Message> = if gallery.session.tag_index().is_empty() {
            Space::with_height(Length::Fixed(0.0)).into()
        } else {
            to_widget(&gallery.view.filter_bar, &self.view_context(None))
        };

        let cards: Element<Message> = match &gallery.view.content {
            GalleryContent::Empty(node) => to_widget(node, &self.view_context(None)),
            GalleryContent::Cards(cards) => {
                let elements: Vec<Element<Message>> = cards
                    .iter()
                    .enumerate()
                    .map(|(i, card)| {
                        let cover = gallery.carousels.get(i).map(|c| c.current());
                        let widget = to_widget(&card.node, &self.view_context(cover));
                        let framed = container(widget)
                            .width(Length::Fixed(CARD_WIDTH))
                            .style(container::rounded_box);
                        mouse_area(framed)
                            .on_enter(Message::CardEntered(i))
                            .on_exit(Message::CardExited(i))
                            .into()
                    })
                    .collect();
                Wrap::with_elements(elements).spacing(16.0).line_spacing(16.0).into()
            }
        };

        column![toolbar, filters, cards].spacing(16).into()
    }

    fn view_context<'a>(&'a self, cover_override: Option<&'a str>) -> ViewContext<'a> {
        ViewContext {
            site_root: &self.site,
            cover_override,
        }
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Run the native gallery viewer until the window closes
pub fn run(site: PathBuf, config: SiteConfig) -> iced::Result {
    iced::application(Volumography::title, Volumography::update, Volumography::view)
        .subscription(Volumography::subscription)
        .theme(Volumography::theme)
        .centered()
        .run_with(move || Volumography::new(site, config))
}
