//! Text format for workbench layouts.
//!
//! A layout file describes a board the way a learner would have built it:
//! one component per line, placed either by its centre (snapped to the grid
//! like a drop) or by explicit terminal coordinates. Layouts drive the CLI,
//! tests, and challenge fixtures.
//!
//! # Grammar Overview
//!
//! ```text
//! layout      = { line }
//! line        = comment | directive | component | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = '.' directive_name { argument }
//! component   = kind name placement [value] { switch_state | param }
//!
//! directive_name = "grid" | "origin" | "require" | "strict"
//! kind        = "battery" | "bat" | "resistor" | "res" | "bulb" | "lamp"
//!             | "switch" | "sw" | "wire"
//! placement   = x y | x1 y1 x2 y2
//! switch_state = "on" | "off" | "closed" | "open"
//! param       = ("v" | "r" | "rot" | "state") '=' number
//!
//! number      = ['-' | '+'] digit+ ['.' digit+] [unit_suffix]
//! unit_suffix = 'm' | 'k' | 'K' | 'M'
//! identifier  = (letter | '_') { letter | digit | '_' | '-' }
//! ```
//!
//! Terminal coordinates must be integers. A centre placement may carry
//! `rot=0` or `rot=90`.
//!
//! # Directives
//!
//! | Directive | Description | Syntax |
//! |-----------|-------------|--------|
//! | .grid | Grid spacing | `.grid <size>` |
//! | .origin | Grid origin | `.origin <x> <y>` |
//! | .require | Challenge palette items | `.require <item>...` |
//! | .strict | Per-loop switch gating | `.strict` |
//!
//! # Example
//!
//! ```text
//! # Battery and bulb in a loop
//! .require battery bulb wire
//!
//! battery B1 280 120 v=9
//! bulb    L1 280 200
//! wire    W1 240 160 rot=90
//! wire    W2 320 160 rot=90
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a layout string into an AST.
pub fn parse(input: &str) -> Result<LayoutAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a layout file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<LayoutAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::LabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
