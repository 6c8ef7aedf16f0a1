#![allow(clippy::module_inception)]

use std::{fs, path::PathBuf, rc::Rc};

use crate::errors::errors::{Diagnostic, ErrorTip, Severity};
use crate::errors::reporter::Reporter;

pub mod ast;
pub mod checker;
pub mod encoder;
pub mod errors;
pub mod folder;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// Conventional object file name, used when the driver gives no `-o`.
pub const DEFAULT_OBJECT_NAME: &str = "obj.sam";

#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Per-compilation configuration, threaded through [`compile`] so that
/// independent files can be compiled concurrently without shared state.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub source: PathBuf,
    pub output: PathBuf,
    pub folding: bool,
    pub show_ast: bool,
    pub show_ast_after_folding: bool,
}

impl CompileOptions {
    pub fn new(source: PathBuf) -> Self {
        CompileOptions {
            source,
            output: PathBuf::from(DEFAULT_OBJECT_NAME),
            folding: false,
            show_ast: false,
            show_ast_after_folding: false,
        }
    }
}

/// Runs the full pipeline over one source file.
///
/// Each stage only runs when every earlier stage finished without errors,
/// and the object file is written only when the whole run is clean. Returns
/// true iff compilation succeeded.
pub fn compile(options: &CompileOptions) -> bool {
    let source_text = match fs::read_to_string(&options.source) {
        Ok(text) => text,
        Err(err) => {
            eprintln!(
                "Can't access source file {}: {}",
                options.source.display(),
                err
            );
            return false;
        }
    };

    let file_name = options
        .source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("<source>"));

    let mut reporter = Reporter::new();

    let tokens = lexer::lexer::tokenize(source_text, Some(file_name.clone()), &mut reporter);
    let mut program = parser::parser::parse(tokens, Rc::new(file_name), &mut reporter);

    if reporter.num_errors() > 0 {
        return finish(&reporter, &options.source);
    }

    checker::checker::check(&mut program, &mut reporter);
    if options.show_ast {
        println!("{program:#?}");
    }
    if reporter.num_errors() > 0 {
        return finish(&reporter, &options.source);
    }

    if options.folding {
        folder::folder::fold_program(&mut program, &mut reporter);
        if options.show_ast_after_folding {
            println!("{program:#?}");
        }
    }

    let emitter = encoder::encoder::encode(&program, &mut reporter);
    if reporter.num_errors() > 0 {
        return finish(&reporter, &options.source);
    }

    if let Err(err) = emitter.save(&options.output) {
        eprintln!(
            "Can't write object file {}: {}",
            options.output.display(),
            err
        );
        return false;
    }

    finish(&reporter, &options.source)
}

/// Displays every accumulated diagnostic in source order and reports
/// whether the run was error free.
fn finish(reporter: &Reporter, source: &PathBuf) -> bool {
    for diagnostic in reporter.diagnostics() {
        display_diagnostic(diagnostic, source.clone());
    }
    reporter.num_errors() == 0
}

pub fn get_line_at_position(file: PathBuf, position: u32) -> (usize, String, usize) {
    let content = fs::read_to_string(&file).unwrap_or_default();
    let pos = (position as usize).min(content.len().saturating_sub(1));

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return (line_number, line.to_string(), line_pos);
        }

        start = end;
        line_number += 1;
    }

    (line_number, String::new(), 0)
}

pub fn display_diagnostic(diagnostic: &Diagnostic, file: PathBuf) {
    /*
        Error: message
        -> fib.slate
           |
        20 | x := #;
           | -----^
    */

    let position = diagnostic.get_position();
    let (line, line_text, line_pos) = get_line_at_position(file.clone(), position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let label = match diagnostic.get_severity() {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    };

    if let ErrorTip::None = diagnostic.get_tip() {
        println!("{}: {}", label, diagnostic.get_error_name());
    } else {
        println!(
            "{}: {} ({})",
            label,
            diagnostic.get_error_name(),
            diagnostic.get_tip()
        );
    }
    println!("-> {}", file.as_os_str().to_string_lossy());
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) =
            super::get_line_at_position(std::path::PathBuf::from("tests/test_file.txt"), 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) =
            super::get_line_at_position(std::path::PathBuf::from("tests/test_file.txt"), 34);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }
}
