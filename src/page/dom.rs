//! Structural navigation helpers over snapshot elements.
//!
//! These cover the axis steps CSS selectors cannot express: direct children by
//! position, the next element sibling and the parent element.

use scraper::ElementRef;

/// Direct element children, skipping text and comment nodes.
pub fn children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// The `position`-th (1-based) direct child named `tag`.
pub fn nth_child<'a>(element: ElementRef<'a>, tag: &str, position: usize) -> Option<ElementRef<'a>> {
    if position == 0 {
        return None;
    }
    children(element)
        .filter(|child| child.value().name().eq_ignore_ascii_case(tag))
        .nth(position - 1)
}

/// The element immediately after `element` among its siblings.
pub fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// The parent element, if the parent is an element.
pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

/// First descendant (excluding `element` itself) named `tag`.
pub fn descendant<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|node| node.value().name().eq_ignore_ascii_case(tag))
}

/// Rendered text: whitespace runs collapsed to one space, trimmed.
pub fn text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
