//! Amyr CLI — the command-line driver for the Amayori front-end.
//!
//! Commands:
//!   amyr check <file>    Parse and borrow-check a source file
//!   amyr tokens <file>   Dump the low-level token stream

use std::env;
use std::fs;
use std::process;

use anyhow::{bail, Context, Result};

use amyr_borrow::BorrowChecker;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(0);
    }

    let result = match args[1].as_str() {
        "check" => cmd_check(&args[2..]),
        "ast" => cmd_ast(&args[2..]),
        "tokens" => cmd_tokens(&args[2..]),
        "--version" | "-V" => {
            println!("amyr {VERSION}");
            Ok(0)
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(0)
        }
        cmd => {
            eprintln!("error: unknown command '{cmd}'");
            eprintln!("Run 'amyr --help' for usage.");
            Ok(2)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Amyr compiler front-end v{VERSION}");
    println!();
    println!("Usage: amyr <command> [args]");
    println!();
    println!("Commands:");
    println!("  check <file>    Parse and borrow-check a source file");
    println!("  ast <file>      Parse and print the syntax tree");
    println!("  tokens <file>   Dump the low-level token stream");
    println!();
    println!("Options:");
    println!("  -h, --help      Show this help");
    println!("  -V, --version   Show the version");
}

/// Read a source file, stripping any shebang line.
fn read_source(path: &str) -> Result<String> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read '{path}'"))?;
    let skip = amyr_lexer::strip_shebang(&text).unwrap_or(0);
    Ok(text[skip..].to_string())
}

fn cmd_check(args: &[String]) -> Result<i32> {
    let [path] = args else {
        bail!("usage: amyr check <file>");
    };
    let source = read_source(path)?;

    let ast = match amyr_parser::parse(&source) {
        Ok(ast) => ast,
        Err(err) => {
            eprintln!("{err}");
            return Ok(1);
        }
    };

    let mut checker = BorrowChecker::new();
    if !checker.check(&ast) {
        // Only the first violation is user-facing.
        if let Some(violation) = checker.violations().first() {
            eprintln!("{violation}");
        }
        return Ok(1);
    }

    println!("{path}: ok");
    Ok(0)
}

fn cmd_ast(args: &[String]) -> Result<i32> {
    let [path] = args else {
        bail!("usage: amyr ast <file>");
    };
    let source = read_source(path)?;

    match amyr_parser::parse(&source) {
        Ok(ast) => {
            print!("{}", amyr_ast::pretty_print(&ast));
            Ok(0)
        }
        Err(err) => {
            eprintln!("{err}");
            Ok(1)
        }
    }
}

fn cmd_tokens(args: &[String]) -> Result<i32> {
    let [path] = args else {
        bail!("usage: amyr tokens <file>");
    };
    let source = fs::read_to_string(path).with_context(|| format!("cannot read '{path}'"))?;

    let mut pos = 0usize;
    for token in amyr_lexer::tokenize(&source) {
        let len = token.len as usize;
        println!(
            "{:>5}..{:<5} {:?} {:?}",
            pos,
            pos + len,
            token.kind,
            &source[pos..pos + len]
        );
        pos += len;
    }
    Ok(0)
}
