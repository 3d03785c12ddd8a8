/// User interface module
///
/// Cards, filters, and the empty state are built once as a node tree
/// (node.rs), then rendered either to iced widgets (view.rs) or to static
/// markup (html.rs).

pub mod card;
pub mod carousel;
pub mod controls;
pub mod html;
pub mod icons;
pub mod node;
pub mod text;
pub mod view;
