//! CSS selector parser using the `cssparser` crate.

use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};

use super::{Combinator, Selector, SelectorError, SelectorPart, TypeSelector};

/// Parse a CSS selector such as `#species`, `ul.birds > li` or `option[disabled]`.
///
/// Tag names and attribute names are lowercased; ids and classes keep their case.
pub fn parse_selector(source: &str) -> Result<Selector, SelectorError> {
    let mut input = ParserInput::new(source);
    let mut parser = Parser::new(&mut input);

    let mut parts = vec![];
    let mut combinators = vec![];
    let mut current_part = SelectorPart::default();
    let mut pending: Option<Combinator> = None;

    parser.skip_whitespace();

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(t) => t.clone(),
            Err(_) => break,
        };

        match &token {
            Token::WhiteSpace(_) => {
                if !current_part.is_empty() && pending.is_none() {
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }
            Token::Delim('>') => {
                if current_part.is_empty() {
                    return Err(SelectorError::invalid(
                        source,
                        "Combinator without a preceding selector",
                    ));
                }
                pending = Some(Combinator::Child);
                continue;
            }
            _ => {}
        }

        // Any other token starts or extends a compound selector.
        if let Some(combinator) = pending.take() {
            parts.push(std::mem::take(&mut current_part));
            combinators.push(combinator);
        }

        match token {
            Token::Ident(name) => {
                if !current_part.is_empty() {
                    return Err(SelectorError::invalid(
                        source,
                        format!("Type selector '{}' must come first", name),
                    ));
                }
                current_part.type_selector = Some(TypeSelector::Type(name.to_ascii_lowercase()));
            }

            Token::Delim('*') => {
                if !current_part.is_empty() {
                    return Err(SelectorError::invalid(
                        source,
                        "Universal selector must come first",
                    ));
                }
                current_part.type_selector = Some(TypeSelector::Universal);
            }

            Token::Delim('.') => {
                let class = parser
                    .expect_ident()
                    .map(|name| name.to_string())
                    .map_err(|_| SelectorError::invalid(source, "Expected class name after '.'"))?;
                current_part.classes.push(class);
            }

            Token::IDHash(id) => {
                if current_part.id.is_some() {
                    return Err(SelectorError::invalid(
                        source,
                        "A compound selector may only name one id",
                    ));
                }
                current_part.id = Some(id.to_string());
            }

            Token::SquareBracketBlock => {
                let name = parser
                    .parse_nested_block(|p| parse_attribute_presence(p))
                    .map_err(|_: CssParseError<'_, ()>| {
                        SelectorError::invalid(
                            source,
                            "Only attribute presence tests such as [disabled] are supported",
                        )
                    })?;
                current_part.attributes.push(name);
            }

            other => {
                return Err(SelectorError::invalid(
                    source,
                    format!("Unexpected token {:?}", other),
                ));
            }
        }
    }

    if pending == Some(Combinator::Child) {
        return Err(SelectorError::invalid(source, "Dangling '>' combinator"));
    }

    if !current_part.is_empty() {
        parts.push(current_part);
    }

    if parts.is_empty() {
        return Err(SelectorError::Empty);
    }

    Ok(Selector { parts, combinators })
}

/// Parse the inside of `[name]`.
fn parse_attribute_presence<'i>(
    parser: &mut Parser<'i, '_>,
) -> Result<String, CssParseError<'i, ()>> {
    let name = parser.expect_ident()?.to_ascii_lowercase();
    parser.expect_exhausted()?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_selector() {
        let sel = parse_selector("#species-list").unwrap();
        assert_eq!(sel.parts.len(), 1);
        assert_eq!(sel.parts[0].id.as_deref(), Some("species-list"));
    }

    #[test]
    fn parse_compound_selector() {
        let sel = parse_selector("input.awesomplete.wide").unwrap();
        let part = &sel.parts[0];
        assert_eq!(part.type_selector, Some(TypeSelector::Type("input".to_string())));
        assert_eq!(part.classes, vec!["awesomplete".to_string(), "wide".to_string()]);
    }

    #[test]
    fn parse_descendant_selector() {
        let sel = parse_selector("form  ul li").unwrap();
        assert_eq!(sel.parts.len(), 3);
        assert_eq!(
            sel.combinators,
            vec![Combinator::Descendant, Combinator::Descendant]
        );
    }

    #[test]
    fn parse_child_selector() {
        let sel = parse_selector("ul > li").unwrap();
        assert_eq!(sel.parts.len(), 2);
        assert_eq!(sel.combinators, vec![Combinator::Child]);

        let sel = parse_selector("ul>li").unwrap();
        assert_eq!(sel.combinators, vec![Combinator::Child]);
    }

    #[test]
    fn parse_attribute_selector() {
        let sel = parse_selector("option[DISABLED]").unwrap();
        assert_eq!(sel.parts[0].attributes, vec!["disabled".to_string()]);
    }

    #[test]
    fn tag_names_are_lowercased() {
        let sel = parse_selector("UL").unwrap();
        assert_eq!(sel.to_string(), "ul");
    }

    #[test]
    fn reject_invalid_selectors() {
        assert_eq!(parse_selector(""), Err(SelectorError::Empty));
        assert_eq!(parse_selector("   "), Err(SelectorError::Empty));
        assert!(parse_selector("ul >").is_err());
        assert!(parse_selector("> li").is_err());
        assert!(parse_selector("a, b").is_err());
        assert!(parse_selector("a[href=x]").is_err());
        assert!(parse_selector(".").is_err());
    }
}
