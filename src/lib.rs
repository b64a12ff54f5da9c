pub mod ast;
pub mod bytecode;
pub mod cfg;
pub mod codegen;
pub mod lowering;
pub mod symbols;
pub mod typechecker;

use ast::File;
use bytecode::Program;
use lowering::ClassLowerer;
use symbols::SymbolTable;
use typechecker::{Diagnostic, TypeChecker};

/// Result of running the full semantic-analysis pipeline over one file.
pub struct Analysis {
    pub program: Program,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run symbol collection, type checking and class lowering over a parsed file.
pub fn analyze(file: &File) -> Analysis {
    let mut symbols = SymbolTable::new();
    symbols.register_file(file);

    let mut checker = TypeChecker::new(&symbols);
    checker.check_file(file);
    let (mut errors, warnings) = checker.into_diagnostics();

    let mut lowerer = ClassLowerer::new(&symbols);
    let program = lowerer.lower_file(file);
    errors.extend(lowerer.into_diagnostics());

    Analysis {
        program,
        errors,
        warnings,
    }
}
