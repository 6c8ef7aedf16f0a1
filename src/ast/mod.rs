/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: program, commands, declarations, value-names and parameters
/// - expressions: the expression node category
/// - types: type denoters and the checked type representation
///
/// Every node category is a tagged enum so each pass can match on it
/// exhaustively; every node carries its source span. The checker fills the
/// `ty` annotation fields in place, and later passes read them.
pub mod ast;
pub mod expressions;
pub mod types;
