use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{
    ast::ast::{Expr, Stmt},
    lexer::tokens::TokenKind,
};

use super::{
    expr::*,
    interpolation::parse_string_expr,
    parser::{PResult, Parser},
    stmt::*,
};

/// Precedence levels, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Range,
    Equality,
    Comparison,
    Additive,
    Multiplicative,
    Power,
    Prefix,
    Call,
    Index,
    Member,
}

pub type StmtHandler = fn(&mut Parser) -> PResult<Stmt>;
pub type NUDHandler = fn(&mut Parser) -> PResult<Expr>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> PResult<Expr>;

pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

/// Handler tables keyed by token kind. Built once and shared by every parser.
#[derive(Default)]
pub struct Lookups {
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
}

impl Lookups {
    /// Registers an infix handler. Only infix tokens carry a binding power,
    /// so a token that can only start an expression always ends the infix loop.
    fn led(&mut self, kind: TokenKind, binding_power: BindingPower, handler: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, handler);
    }

    fn nud(&mut self, kind: TokenKind, handler: NUDHandler) {
        self.nud_lookup.insert(kind, handler);
    }

    fn stmt(&mut self, kind: TokenKind, handler: StmtHandler) {
        self.stmt_lookup.insert(kind, handler);
    }

    pub fn get_stmt(&self, kind: TokenKind) -> Option<StmtHandler> {
        self.stmt_lookup.get(&kind).copied()
    }

    pub fn get_nud(&self, kind: TokenKind) -> Option<NUDHandler> {
        self.nud_lookup.get(&kind).copied()
    }

    pub fn get_led(&self, kind: TokenKind) -> Option<LEDHandler> {
        self.led_lookup.get(&kind).copied()
    }

    pub fn get_binding_power(&self, kind: TokenKind) -> BindingPower {
        self.binding_power_lookup
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Default)
    }
}

lazy_static! {
    pub static ref LOOKUPS: Lookups = create_token_lookups();
}

pub fn create_token_lookups() -> Lookups {
    let mut lookups = Lookups::default();

    // Assignment
    lookups.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);
    lookups.led(TokenKind::PlusEquals, BindingPower::Assignment, parse_assignment_expr);
    lookups.led(TokenKind::MinusEquals, BindingPower::Assignment, parse_assignment_expr);
    lookups.led(TokenKind::StarEquals, BindingPower::Assignment, parse_assignment_expr);
    lookups.led(TokenKind::SlashEquals, BindingPower::Assignment, parse_assignment_expr);

    // Logical
    lookups.led(TokenKind::Or, BindingPower::LogicalOr, parse_binary_expr);
    lookups.led(TokenKind::And, BindingPower::LogicalAnd, parse_binary_expr);

    // Ranges
    lookups.led(TokenKind::DotDot, BindingPower::Range, parse_range_expr);
    lookups.led(TokenKind::DotDotEquals, BindingPower::Range, parse_range_expr);

    // Equality and relational
    lookups.led(TokenKind::Equals, BindingPower::Equality, parse_binary_expr);
    lookups.led(TokenKind::NotEquals, BindingPower::Equality, parse_binary_expr);
    lookups.led(TokenKind::Less, BindingPower::Comparison, parse_binary_expr);
    lookups.led(TokenKind::LessEquals, BindingPower::Comparison, parse_binary_expr);
    lookups.led(TokenKind::Greater, BindingPower::Comparison, parse_binary_expr);
    lookups.led(TokenKind::GreaterEquals, BindingPower::Comparison, parse_binary_expr);

    // Additive and multiplicative
    lookups.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    lookups.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    lookups.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    lookups.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    lookups.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);
    lookups.led(TokenKind::Caret, BindingPower::Power, parse_binary_expr);

    // Postfix forms
    lookups.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);
    lookups.led(TokenKind::OpenBracket, BindingPower::Index, parse_index_expr);
    lookups.led(TokenKind::Dot, BindingPower::Member, parse_member_expr);

    // Literals and symbols
    lookups.nud(TokenKind::Number, parse_primary_expr);
    lookups.nud(TokenKind::Identifier, parse_primary_expr);
    lookups.nud(TokenKind::True, parse_primary_expr);
    lookups.nud(TokenKind::False, parse_primary_expr);
    lookups.nud(TokenKind::Nil, parse_primary_expr);
    lookups.nud(TokenKind::String, parse_string_expr);
    lookups.nud(TokenKind::OpenBracket, parse_array_expr);
    lookups.nud(TokenKind::OpenCurly, parse_map_expr);

    // Prefix and grouping
    lookups.nud(TokenKind::Dash, parse_prefix_expr);
    lookups.nud(TokenKind::Not, parse_prefix_expr);
    lookups.nud(TokenKind::OpenParen, parse_grouping_expr);

    // Compound expressions
    lookups.nud(TokenKind::Fn, parse_fn_expr);
    lookups.nud(TokenKind::Case, parse_case_expr);
    lookups.nud(TokenKind::At, parse_ui_element_expr);

    // Statements
    lookups.stmt(TokenKind::Var, parse_var_decl_stmt);
    lookups.stmt(TokenKind::Const, parse_var_decl_stmt);
    lookups.stmt(TokenKind::Fn, parse_fn_stmt);
    lookups.stmt(TokenKind::Struct, parse_struct_decl_stmt);
    lookups.stmt(TokenKind::Type, parse_type_alias_stmt);
    lookups.stmt(TokenKind::Module, parse_module_stmt);
    lookups.stmt(TokenKind::Using, parse_using_stmt);
    lookups.stmt(TokenKind::Component, parse_component_stmt);
    lookups.stmt(TokenKind::If, parse_if_stmt);
    lookups.stmt(TokenKind::Case, parse_case_stmt);
    lookups.stmt(TokenKind::For, parse_for_stmt);
    lookups.stmt(TokenKind::Check, parse_check_stmt);
    lookups.stmt(TokenKind::Return, parse_return_stmt);
    lookups.stmt(TokenKind::Break, parse_break_stmt);

    lookups
}
