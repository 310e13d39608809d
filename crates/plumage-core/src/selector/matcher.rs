//! Selector matching algorithm.

use super::{Combinator, Selector, SelectorPart, TypeSelector};

/// The facts about one element that selectors can test.
#[derive(Debug, Clone, Default)]
pub struct ElementMatchContext<'a> {
    /// Lowercase tag name.
    pub tag: &'a str,
    /// Value of the `id` attribute.
    pub id: Option<&'a str>,
    /// Whitespace-separated entries of the `class` attribute.
    pub classes: Vec<&'a str>,
    /// Names of all attributes present on the element.
    pub attributes: Vec<&'a str>,
}

/// Selector matching engine.
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Check if a selector part matches the element.
    pub fn part_matches(part: &SelectorPart, context: &ElementMatchContext<'_>) -> bool {
        if let Some(type_sel) = &part.type_selector {
            match type_sel {
                TypeSelector::Universal => {}
                TypeSelector::Type(name) => {
                    if !name.eq_ignore_ascii_case(context.tag) {
                        return false;
                    }
                }
            }
        }

        if let Some(id) = &part.id {
            match context.id {
                Some(element_id) if element_id == id => {}
                _ => return false,
            }
        }

        // All classes must be present.
        for class in &part.classes {
            if !context.classes.iter().any(|c| c == class) {
                return false;
            }
        }

        for attribute in &part.attributes {
            if !context
                .attributes
                .iter()
                .any(|a| a.eq_ignore_ascii_case(attribute))
            {
                return false;
            }
        }

        true
    }

    /// Check if a full selector matches, considering combinators.
    ///
    /// `ancestors` lists the element's ancestors from its parent up to the root.
    pub fn matches(
        selector: &Selector,
        context: &ElementMatchContext<'_>,
        ancestors: &[ElementMatchContext<'_>],
    ) -> bool {
        let Some((subject, rest)) = selector.parts.split_last() else {
            return false;
        };

        if !Self::part_matches(subject, context) {
            return false;
        }

        match_ancestors(rest, &selector.combinators, ancestors)
    }
}

/// Match the remaining parts right-to-left against the ancestor chain.
///
/// `combinators.last()` connects `parts.last()` to the element matched in the
/// previous step. Descendant combinators backtrack over every candidate ancestor.
fn match_ancestors(
    parts: &[SelectorPart],
    combinators: &[Combinator],
    ancestors: &[ElementMatchContext<'_>],
) -> bool {
    let (Some((part, rest_parts)), Some((combinator, rest_combinators))) =
        (parts.split_last(), combinators.split_last())
    else {
        return true;
    };

    match combinator {
        Combinator::Child => match ancestors.split_first() {
            Some((parent, above)) => {
                SelectorMatcher::part_matches(part, parent)
                    && match_ancestors(rest_parts, rest_combinators, above)
            }
            None => false,
        },
        Combinator::Descendant => (0..ancestors.len()).any(|i| {
            SelectorMatcher::part_matches(part, &ancestors[i])
                && match_ancestors(rest_parts, rest_combinators, &ancestors[i + 1..])
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::parse_selector;

    fn element<'a>(tag: &'a str, classes: Vec<&'a str>) -> ElementMatchContext<'a> {
        ElementMatchContext {
            tag,
            id: None,
            classes,
            attributes: vec![],
        }
    }

    #[test]
    fn type_selector_matches() {
        let context = element("li", vec![]);

        assert!(SelectorMatcher::part_matches(&SelectorPart::type_only("li"), &context));
        assert!(!SelectorMatcher::part_matches(&SelectorPart::type_only("ul"), &context));

        let universal = SelectorPart {
            type_selector: Some(TypeSelector::Universal),
            ..Default::default()
        };
        assert!(SelectorMatcher::part_matches(&universal, &context));
    }

    #[test]
    fn class_selector_matches() {
        let context = element("input", vec!["awesomplete", "wide"]);

        let part = SelectorPart::class_only("awesomplete");
        assert!(SelectorMatcher::part_matches(&part, &context));

        let part = SelectorPart::class_only("awesomplete").with_class("narrow");
        assert!(!SelectorMatcher::part_matches(&part, &context));
    }

    #[test]
    fn attribute_selector_matches() {
        let mut context = element("option", vec![]);
        context.attributes = vec!["value", "disabled"];

        let part = SelectorPart::type_only("option").with_attribute("disabled");
        assert!(SelectorMatcher::part_matches(&part, &context));

        let part = SelectorPart::type_only("option").with_attribute("selected");
        assert!(!SelectorMatcher::part_matches(&part, &context));
    }

    #[test]
    fn id_selector_matches() {
        let mut context = element("ul", vec![]);
        context.id = Some("birds");

        assert!(SelectorMatcher::part_matches(&SelectorPart::id_only("birds"), &context));
        assert!(!SelectorMatcher::part_matches(&SelectorPart::id_only("fish"), &context));
    }

    #[test]
    fn child_combinator_requires_direct_parent() {
        let selector = parse_selector("ul > li").unwrap();
        let li = element("li", vec![]);

        let direct = [element("ul", vec![]), element("body", vec![])];
        assert!(SelectorMatcher::matches(&selector, &li, &direct));

        let nested = [element("div", vec![]), element("ul", vec![])];
        assert!(!SelectorMatcher::matches(&selector, &li, &nested));
    }

    #[test]
    fn descendant_combinator_backtracks() {
        // The nearest "div" is not a child of the "form", the outer one is.
        let selector = parse_selector("form > div span").unwrap();
        let span = element("span", vec![]);
        let ancestors = [
            element("div", vec![]),
            element("section", vec![]),
            element("div", vec![]),
            element("form", vec![]),
        ];
        assert!(SelectorMatcher::matches(&selector, &span, &ancestors));

        let selector = parse_selector("form > section > span").unwrap();
        assert!(!SelectorMatcher::matches(&selector, &span, &ancestors));
    }
}
