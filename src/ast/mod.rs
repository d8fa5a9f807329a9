/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the syntax tree the parser produces
///
/// Submodules:
/// - ast: The closed `Stmt` / `Expr` sum types, their kinds, and `Program`
/// - expressions: Definitions for the expression nodes
/// - statements: Definitions for the statement nodes
/// - types: Supporting values (type annotations, parameters, branches, test blocks)
///
/// Every node renders back to canonical source text through `Display`.
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
