use std::{path::PathBuf, process};

use clap::Parser;
use slatec::{compile, CompileOptions, DEFAULT_OBJECT_NAME};

/// Batch compiler for the Slate teaching language, targeting the SAM
/// stack machine.
#[derive(Parser, Debug)]
#[command(name = "slatec", version, about)]
struct Cli {
    /// The source program to compile
    source: PathBuf,

    /// Where to write the object program
    #[arg(short, long, default_value = DEFAULT_OBJECT_NAME)]
    output: PathBuf,

    /// Display the AST after checking
    #[arg(long)]
    tree: bool,

    /// Enable constant folding
    #[arg(long)]
    folding: bool,

    /// Display the AST again after folding
    #[arg(long = "tree-after-folding")]
    tree_after_folding: bool,
}

fn main() {
    let cli = Cli::parse();

    println!("********** Slate Compiler **********");

    let options = CompileOptions {
        source: cli.source,
        output: cli.output,
        folding: cli.folding,
        show_ast: cli.tree,
        show_ast_after_folding: cli.tree_after_folding,
    };

    let compiled_ok = compile(&options);

    if compiled_ok {
        println!("Compilation was successful.");
    } else {
        println!("Compilation was unsuccessful.");
    }

    process::exit(if compiled_ok { 0 } else { 1 });
}
