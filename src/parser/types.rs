//! Type annotation parsing.
//!
//! Annotations appear after `:` in declarations and parameters, after `->`
//! in signatures, and on the right of `type Name =`. They are either a bare
//! name or a name applied to generic parameters (`Map<string, List<T>>`).
//!
//! Like expression parsing, this uses NUD/LED handlers keyed by token kind,
//! with binding powers deciding when a generic application continues.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{ast::types::TypeAnnotation, errors::errors::ErrorImpl, lexer::tokens::TokenKind};

use super::{
    lookups::BindingPower,
    parser::{PResult, Parser},
};

pub type TypeNUDHandler = fn(&mut Parser) -> PResult<TypeAnnotation>;
pub type TypeLEDHandler = fn(&mut Parser, TypeAnnotation, BindingPower) -> PResult<TypeAnnotation>;

pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

#[derive(Default)]
pub struct TypeLookups {
    nud_lookup: TypeNUDLookup,
    led_lookup: TypeLEDLookup,
    binding_power_lookup: TypeBPLookup,
}

impl TypeLookups {
    fn type_nud(&mut self, kind: TokenKind, handler: TypeNUDHandler) {
        self.nud_lookup.insert(kind, handler);
    }

    fn type_led(&mut self, kind: TokenKind, binding_power: BindingPower, handler: TypeLEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, handler);
    }
}

lazy_static! {
    static ref TYPE_LOOKUPS: TypeLookups = create_token_type_lookups();
}

fn create_token_type_lookups() -> TypeLookups {
    let mut lookups = TypeLookups::default();

    lookups.type_nud(TokenKind::Identifier, parse_symbol_type);
    lookups.type_nud(TokenKind::Nil, parse_symbol_type);
    lookups.type_led(TokenKind::Less, BindingPower::Call, parse_generic_type);

    lookups
}

pub fn parse_symbol_type(parser: &mut Parser) -> PResult<TypeAnnotation> {
    let token = parser.expect_one_of(&[TokenKind::Identifier, TokenKind::Nil])?;
    Ok(TypeAnnotation::simple(&token.value))
}

/// `Name<A, B>`: applies `left` to its generic parameters.
pub fn parse_generic_type(
    parser: &mut Parser,
    left: TypeAnnotation,
    _bp: BindingPower,
) -> PResult<TypeAnnotation> {
    if left.is_generic() {
        return Err(parser.record_here(ErrorImpl::UnexpectedToken {
            expected: vec![TokenKind::Identifier],
            found: TokenKind::Less,
        }));
    }

    parser.expect(TokenKind::Less)?;

    let mut parameters = vec![parse_type(parser)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        parameters.push(parse_type(parser)?);
    }

    parser.expect(TokenKind::Greater)?;

    Ok(TypeAnnotation {
        name: left.name,
        parameters,
    })
}

pub fn parse_type(parser: &mut Parser) -> PResult<TypeAnnotation> {
    parser.descend()?;
    let result = parse_type_at(parser, BindingPower::Default);
    parser.ascend();
    result
}

fn parse_type_at(parser: &mut Parser, bp: BindingPower) -> PResult<TypeAnnotation> {
    let token_kind = parser.current_token_kind();
    let Some(nud) = TYPE_LOOKUPS.nud_lookup.get(&token_kind).copied() else {
        return Err(parser.record_here(ErrorImpl::UnexpectedToken {
            expected: vec![TokenKind::Identifier],
            found: token_kind,
        }));
    };

    let mut left = nud(parser)?;

    while let Some(led) = TYPE_LOOKUPS.led_lookup.get(&parser.current_token_kind()).copied() {
        let token_bp = TYPE_LOOKUPS
            .binding_power_lookup
            .get(&parser.current_token_kind())
            .copied()
            .unwrap_or(BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}
