//! Parser for the layout format.

use std::collections::{HashMap, HashSet};

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::challenge::PaletteItem;
use crate::components::ComponentKind;
use crate::error::{LabError, Result};
use crate::layout::GridPoint;

/// Parser for workbench layouts.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    names: HashSet<String>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            names: HashSet::new(),
        })
    }

    /// Parse the entire layout.
    pub fn parse(&mut self) -> Result<LayoutAst> {
        let mut ast = LayoutAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {}
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(LabError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(LabError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(LabError::parse(
                self.current.line,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ))
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn expect_integer(&mut self, what: &str) -> Result<i32> {
        let tok = self.expect(TokenKind::Number)?;
        integer(&tok.text).ok_or_else(|| {
            LabError::parse(tok.line, format!("{} must be an integer, got '{}'", what, tok.text))
        })
    }

    fn parse_directive(&mut self, ast: &mut LayoutAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".grid" => {
                let size = self.expect_integer("grid size")?;
                if size <= 0 {
                    return Err(LabError::parse(line, "grid size must be positive"));
                }
                ast.grid_size = Some(size);
            }
            ".origin" => {
                let x = self.expect_integer("origin x")?;
                let y = self.expect_integer("origin y")?;
                ast.grid_origin = Some((x, y));
            }
            ".require" => {
                while !self.at_line_end() {
                    let tok = self.expect(TokenKind::Identifier)?;
                    let item: PaletteItem = tok.text.parse().map_err(|_| {
                        LabError::parse(line, format!("unknown palette item '{}'", tok.text))
                    })?;
                    ast.required.push(item);
                }
            }
            ".strict" => {
                ast.strict_switches = true;
            }
            _ => {
                return Err(LabError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let keyword = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        let kind = ComponentKind::from_keyword(&keyword).ok_or(LabError::UnknownComponentKind {
            kind: keyword,
            line,
        })?;

        let name = self.expect(TokenKind::Identifier)?.text;
        if !self.names.insert(name.clone()) {
            return Err(LabError::DuplicateComponent { id: name });
        }

        let mut numbers: Vec<f64> = Vec::new();
        let mut switch_on = None;
        let mut params = HashMap::new();

        while !self.at_line_end() {
            let tok = self.current.clone();
            self.advance()?;
            match tok.kind {
                TokenKind::Number => {
                    let value = parse_value(&tok.text).ok_or_else(|| {
                        LabError::parse(line, format!("invalid number: {}", tok.text))
                    })?;
                    numbers.push(value);
                }
                TokenKind::Identifier if self.current.kind == TokenKind::Equals => {
                    self.advance()?;
                    let value_tok = self.expect(TokenKind::Number)?;
                    let value = parse_value(&value_tok.text).ok_or_else(|| {
                        LabError::parse(line, format!("invalid number: {}", value_tok.text))
                    })?;
                    params.insert(tok.text.to_lowercase(), value);
                }
                TokenKind::Identifier => match tok.text.to_lowercase().as_str() {
                    "on" | "closed" => switch_on = Some(true),
                    "off" | "open" => switch_on = Some(false),
                    other => {
                        return Err(LabError::invalid_component(
                            &name,
                            line,
                            format!("unexpected word '{}'", other),
                        ));
                    }
                },
                _ => {
                    return Err(LabError::parse(
                        line,
                        format!("unexpected token: {:?}", tok.text),
                    ));
                }
            }
        }

        let (placement, value) = match numbers.as_slice() {
            [x, y] => (Placement::Centered { x: *x, y: *y }, None),
            [x, y, v] => (Placement::Centered { x: *x, y: *y }, Some(*v)),
            [x1, y1, x2, y2] => (terminals(&name, line, [*x1, *y1, *x2, *y2])?, None),
            [x1, y1, x2, y2, v] => (terminals(&name, line, [*x1, *y1, *x2, *y2])?, Some(*v)),
            _ => {
                return Err(LabError::invalid_component(
                    &name,
                    line,
                    format!(
                        "expected 2 (centre) or 4 (terminal) coordinates, got {} numbers",
                        numbers.len()
                    ),
                ));
            }
        };

        Ok(ComponentDef {
            kind,
            name,
            placement,
            value,
            switch_on,
            params,
            line,
        })
    }
}

fn integer(text: &str) -> Option<i32> {
    parse_value(text).and_then(exact_i32)
}

fn exact_i32(value: f64) -> Option<i32> {
    (value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64).then(|| value as i32)
}

fn terminals(name: &str, line: usize, coords: [f64; 4]) -> Result<Placement> {
    let mut ints = [0i32; 4];
    for (slot, value) in ints.iter_mut().zip(coords) {
        *slot = exact_i32(value).ok_or_else(|| {
            LabError::invalid_component(name, line, format!("terminal coordinate {} is not an integer", value))
        })?;
    }
    Ok(Placement::Terminals {
        start: GridPoint::new(ints[0], ints[1]),
        end: GridPoint::new(ints[2], ints[3]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<LayoutAst> {
        super::super::parse(input)
    }

    #[test]
    fn test_parse_terminals() {
        let ast = parse("battery B1 0 0 40 0").unwrap();
        assert_eq!(ast.components.len(), 1);
        let def = &ast.components[0];
        assert_eq!(def.kind, ComponentKind::Battery);
        assert_eq!(def.name, "B1");
        assert_eq!(
            def.placement,
            Placement::Terminals {
                start: GridPoint::new(0, 0),
                end: GridPoint::new(40, 0)
            }
        );
        assert_eq!(def.value, None);
    }

    #[test]
    fn test_parse_centre_with_params() {
        let ast = parse("res R1 283.5 120 2.2k rot=90\nsw S1 80 0 120 0 off\n").unwrap();
        let r = &ast.components[0];
        assert_eq!(r.kind, ComponentKind::Resistor);
        assert_eq!(r.placement, Placement::Centered { x: 283.5, y: 120.0 });
        assert_eq!(r.value, Some(2200.0));
        assert_eq!(r.params.get("rot"), Some(&90.0));

        let s = &ast.components[1];
        assert_eq!(s.kind, ComponentKind::Switch);
        assert_eq!(s.switch_on, Some(false));
    }

    #[test]
    fn test_three_numbers_are_centre_and_value() {
        let ast = parse("wire W1 0 0 40").unwrap();
        let def = &ast.components[0];
        assert_eq!(def.placement, Placement::Centered { x: 0.0, y: 0.0 });
        assert_eq!(def.value, Some(40.0));
    }

    #[test]
    fn test_parse_directives() {
        let ast = parse(".grid 20\n.origin 0 -20\n.require battery bulb switch_off\n.strict\n").unwrap();
        assert_eq!(ast.grid_size, Some(20));
        assert_eq!(ast.grid_origin, Some((0, -20)));
        assert_eq!(
            ast.required,
            vec![PaletteItem::Battery, PaletteItem::Bulb, PaletteItem::SwitchOff]
        );
        assert!(ast.strict_switches);
        assert!(ast.components.is_empty());
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# Simple loop\nbattery B1 0 0 40 0 ; the source\n\nwire W1 40 0 0 0\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.components.len(), 2);
        assert_eq!(ast.components[1].line, 4);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("ammeter A1 0 0"),
            Err(LabError::UnknownComponentKind { line: 1, .. })
        ));
        assert!(matches!(
            parse("wire W1 0 0\nwire W1 40 0"),
            Err(LabError::DuplicateComponent { .. })
        ));
        assert!(matches!(
            parse("wire W1 0"),
            Err(LabError::InvalidComponent { .. })
        ));
        assert!(matches!(
            parse("wire W1 0 0 40 0 5 6"),
            Err(LabError::InvalidComponent { .. })
        ));
        assert!(matches!(
            parse("wire W1 0.5 0 40 0"),
            Err(LabError::InvalidComponent { .. })
        ));
        assert!(matches!(
            parse(".require ammeter"),
            Err(LabError::ParseError { line: 1, .. })
        ));
        assert!(matches!(parse(".grid 0"), Err(LabError::ParseError { .. })));
        assert!(matches!(parse(".bogus"), Err(LabError::ParseError { .. })));
        assert!(matches!(
            parse("bulb L1 0 0 blink"),
            Err(LabError::InvalidComponent { .. })
        ));
    }
}
