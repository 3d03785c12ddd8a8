use iced::widget::image::Handle;
use iced::widget::{button, container, image, mouse_area, text, Column, Row};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;
use std::path::Path;

use super::icons;
use super::node::{Action, Element as NodeElement, Kind, Node};
use crate::app::Message;

/// Width of one card in the grid
pub const CARD_WIDTH: f32 = 260.0;
/// Height of the cover region
const COVER_HEIGHT: f32 = 180.0;
const AVATAR_SIZE: f32 = 40.0;

impl From<&Action> for Message {
    fn from(action: &Action) -> Self {
        Message::Action(action.clone())
    }
}

/// Inputs for turning a node tree into iced widgets
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Image paths in the tree are relative to this directory
    pub site_root: &'a Path,
    /// Replaces the cover image source (hover carousel)
    pub cover_override: Option<&'a str>,
}

/// Convert a node tree into an iced element.
///
/// Clicks go to the innermost handler: nested buttons and anchors capture
/// the press before an enclosing anchor sees it.
pub fn to_widget<'a>(node: &Node, ctx: &ViewContext<'_>) -> Element<'a, Message> {
    convert(node, ctx, 12)
}

fn convert<'a>(node: &Node, ctx: &ViewContext<'_>, size: u16) -> Element<'a, Message> {
    match node {
        Node::Text(content) => text(content.clone()).size(size).into(),
        Node::Element(element) => convert_element(element, ctx, size),
    }
}

fn convert_element<'a>(element: &NodeElement, ctx: &ViewContext<'_>, size: u16) -> Element<'a, Message> {
    let size = text_size(element).unwrap_or(size);
    let children = || -> Vec<Element<'a, Message>> {
        element.children.iter().map(|child| convert(child, ctx, size)).collect()
    };

    match &element.kind {
        Kind::Image { src, .. } => image_widget(element, src, ctx),
        Kind::Icon(key) => {
            let glyph = icons::platform(key).map(|p| p.glyph).unwrap_or("•");
            text(glyph).size(size).into()
        }
        Kind::Button => {
            let label = Row::with_children(children()).align_y(Alignment::Center);
            let mut widget = button(label).padding([2, 8]);
            if element.has_class("active") {
                widget = widget.style(button::primary);
            } else {
                widget = widget.style(button::secondary);
            }
            match &element.on_click {
                Some(action) => widget.on_press(Message::from(action)).into(),
                None => widget.into(),
            }
        }
        Kind::Anchor { href } => {
            let content: Element<'a, Message> = if element.has_class("creator-card") {
                Column::with_children(children()).spacing(6).into()
            } else {
                Row::with_children(children()).spacing(4).align_y(Alignment::Center).into()
            };
            mouse_area(content)
                .on_press(Message::Action(Action::OpenLink(href.clone())))
                .interaction(iced::mouse::Interaction::Pointer)
                .into()
        }
        Kind::Row => Wrap::with_elements(children())
            .spacing(6.0)
            .line_spacing(6.0)
            .into(),
        Kind::Inline => Row::with_children(children()).align_y(Alignment::Center).into(),
        Kind::Block => block(element, children()),
    }
}

fn block<'a>(element: &NodeElement, children: Vec<Element<'a, Message>>) -> Element<'a, Message> {
    let column = Column::with_children(children).spacing(4);

    if element.has_class("card-media-placeholder") {
        return container(column)
            .center_x(Length::Fill)
            .center_y(Length::Fixed(COVER_HEIGHT))
            .style(container::rounded_box)
            .into();
    }
    if element.has_class("card-info") || element.has_class("gallery-empty") {
        return container(column).padding(8).width(Length::Fill).into();
    }
    column.into()
}

fn image_widget<'a>(element: &NodeElement, src: &str, ctx: &ViewContext<'_>) -> Element<'a, Message> {
    let is_cover = element.has_class("cover-image");
    let src = match (is_cover, ctx.cover_override) {
        (true, Some(current)) => current,
        _ => src,
    };
    let handle = Handle::from_path(ctx.site_root.join(src));

    if is_cover {
        image(handle)
            .width(Length::Fill)
            .height(Length::Fixed(COVER_HEIGHT))
            .content_fit(ContentFit::Cover)
            .into()
    } else {
        image(handle)
            .width(Length::Fixed(AVATAR_SIZE))
            .height(Length::Fixed(AVATAR_SIZE))
            .content_fit(ContentFit::Cover)
            .into()
    }
}

fn text_size(element: &NodeElement) -> Option<u16> {
    if element.has_class("card-name") {
        Some(16)
    } else if element.has_class("card-specialty") {
        Some(13)
    } else if element.has_class("gallery-message") || element.has_class("gallery-error") {
        Some(14)
    } else if element.has_class("card-subtitle") || element.has_class("card-location") {
        Some(11)
    } else {
        None
    }
}
