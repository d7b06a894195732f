use std::sync::LazyLock;

use regex::Regex;

use crate::errors::EvalError;
use crate::statement::{
    AssignmentStatement, BuiltinCallStatement, Command, CommandStatement, EmptyStatement,
    IfStatement, PrintStatement, Statement, WhileStatement,
};

static BUILTIN_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\((.*)\)$").expect("call pattern is valid")
});
static BARE_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\s*=([^=]|$)").expect("assignment pattern is valid")
});

/// Classifies one line of source text.
///
/// Keywords are matched by prefix in a fixed order and the first match wins:
/// `if`, `while`, `var `, `print(`, a call `name(args)`, the session commands,
/// then a bare `name = expr` assignment.
pub fn parse_line(line: &str) -> Result<Box<dyn Statement>, EvalError> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(Box::new(EmptyStatement));
    }
    if line.starts_with("if") {
        return if_statement(line);
    }
    if line.starts_with("while") {
        return while_statement(line);
    }
    if let Some(declaration) = line.strip_prefix("var ") {
        return assignment_statement(declaration);
    }
    if line.starts_with("print(") {
        return print_statement(line);
    }
    if let Some(captures) = BUILTIN_CALL.captures(line) {
        return Ok(Box::new(BuiltinCallStatement::new(
            captures[1].to_string(),
            call_arguments(&captures[2]),
        )));
    }
    if let Some(command) = command(line) {
        return Ok(Box::new(CommandStatement::new(command)));
    }
    if BARE_ASSIGNMENT.is_match(line) {
        return assignment_statement(line);
    }

    Err(EvalError::UnknownCommand(line.to_string()))
}

/// Splits a loop body on `;` into print and assignment steps.
pub fn parse_loop_body(body: &str) -> Result<Vec<Box<dyn Statement>>, EvalError> {
    split_outside_quotes(body, ';')
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            if piece.starts_with("print(") {
                print_statement(piece)
            } else {
                assignment_statement(piece)
            }
        })
        .collect()
}

fn command(line: &str) -> Option<Command> {
    match line {
        "list" => Some(Command::List),
        "help" => Some(Command::Help),
        "methods" => Some(Command::Methods),
        "exit" => Some(Command::Exit),
        _ => None,
    }
}

fn assignment_statement(source: &str) -> Result<Box<dyn Statement>, EvalError> {
    let parts: Vec<&str> = source.split('=').collect();
    let [identifier, expression] = parts.as_slice() else {
        return Err(EvalError::syntax(format!("Invalid assignment: {}", source.trim())));
    };

    Ok(Box::new(AssignmentStatement::new(
        identifier.trim().to_string(),
        expression.trim().to_string(),
    )))
}

fn print_statement(line: &str) -> Result<Box<dyn Statement>, EvalError> {
    let argument = line
        .strip_prefix("print(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| EvalError::syntax(format!("Invalid print statement: {}", line)))?;

    Ok(Box::new(PrintStatement::new(argument.trim().to_string())))
}

fn if_statement(line: &str) -> Result<Box<dyn Statement>, EvalError> {
    let invalid = || EvalError::syntax(format!("Invalid if statement: {}", line));

    let (condition, after_condition) = parenthesized(line).ok_or_else(invalid)?;
    let open_brace = find_from(line, '{', after_condition).ok_or_else(invalid)?;
    let close_brace = matching_brace(line, open_brace)
        .ok_or_else(|| EvalError::syntax(format!("Unbalanced braces: {}", line)))?;
    let then_body = line[open_brace + 1..close_brace].trim().to_string();

    let rest = line[close_brace + 1..].trim();
    let else_body = if rest.is_empty() {
        None
    } else {
        let clause = rest.strip_prefix("else").ok_or_else(invalid)?.trim();
        let clause = strip_braces(clause)
            .ok_or_else(|| EvalError::syntax(format!("Unbalanced braces: {}", line)))?;
        (!clause.is_empty()).then(|| clause.to_string())
    };

    Ok(Box::new(IfStatement::new(condition, then_body, else_body)))
}

fn while_statement(line: &str) -> Result<Box<dyn Statement>, EvalError> {
    let invalid = || EvalError::syntax(format!("Invalid while loop: {}", line));

    let (condition, after_condition) = parenthesized(line).ok_or_else(invalid)?;
    let open_brace = find_from(line, '{', after_condition).ok_or_else(invalid)?;
    let close_brace = line.rfind('}').filter(|&close| close > open_brace).ok_or_else(invalid)?;
    if !line[close_brace + 1..].trim().is_empty() {
        return Err(invalid());
    }

    Ok(Box::new(WhileStatement::new(
        condition,
        line[open_brace + 1..close_brace].trim().to_string(),
    )))
}

/// Text between the first `(` and the first `)` after it, and the byte offset
/// just past that `)`.
fn parenthesized(line: &str) -> Option<(String, usize)> {
    let open = line.find('(')?;
    let close = find_from(line, ')', open + 1)?;
    Some((line[open + 1..close].trim().to_string(), close + 1))
}

fn find_from(line: &str, needle: char, from: usize) -> Option<usize> {
    line[from..].find(needle).map(|offset| from + offset)
}

/// Offsets of the braces in `text` that sit outside double quotes, paired
/// with `1` for `{` and `-1` for `}`.
fn braces_outside_quotes(text: &str) -> impl Iterator<Item = (usize, i64)> + '_ {
    let mut in_string = false;
    text.char_indices().filter_map(move |(offset, ch)| match ch {
        '"' => {
            in_string = !in_string;
            None
        }
        '{' if !in_string => Some((offset, 1)),
        '}' if !in_string => Some((offset, -1)),
        _ => None,
    })
}

/// Byte offset of the `}` closing the `{` at `open`, skipping quoted text.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0;
    for (offset, step) in braces_outside_quotes(&text[open..]) {
        depth += step;
        if depth == 0 {
            return Some(open + offset);
        }
    }
    None
}

/// Whether `source` still has a `{` waiting for its `}`.
///
/// Line readers keep collecting input while this holds, so a block may span
/// several physical lines.
pub fn has_open_block(source: &str) -> bool {
    braces_outside_quotes(source).map(|(_, step)| step).sum::<i64>() > 0
}

/// `{ body }` becomes `body`; a clause without braces is returned unchanged.
fn strip_braces(clause: &str) -> Option<&str> {
    if !clause.starts_with('{') {
        return Some(clause);
    }

    let close = matching_brace(clause, 0)?;
    if close + 1 != clause.len() {
        return None;
    }
    Some(clause[1..close].trim())
}

fn call_arguments(arguments: &str) -> Vec<String> {
    if arguments.trim().is_empty() {
        return vec![];
    }
    arguments
        .split(',')
        .map(|argument| argument.trim().to_string())
        .collect()
}

fn split_outside_quotes(text: &str, separator: char) -> Vec<&str> {
    let mut pieces = vec![];
    let mut start = 0;
    let mut in_string = false;

    for (offset, ch) in text.char_indices() {
        if ch == '"' {
            in_string = !in_string;
        } else if ch == separator && !in_string {
            pieces.push(&text[start..offset]);
            start = offset + ch.len_utf8();
        }
    }
    pieces.push(&text[start..]);

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debug(line: &str) -> String {
        format!("{:?}", parse_line(line).unwrap())
    }

    #[test]
    fn classifies_by_prefix() {
        assert!(debug("var x = 1").starts_with("AssignmentStatement"));
        assert!(debug("print(x)").starts_with("PrintStatement"));
        assert!(debug("gcd(4, 6)").starts_with("BuiltinCallStatement"));
        assert!(debug("while(x<3){ x = x+1 }").starts_with("WhileStatement"));
        assert!(debug("if(x<3){ print(x) }").starts_with("IfStatement"));
        assert!(debug("x = x + 1").starts_with("AssignmentStatement"));
        assert!(debug("   ").starts_with("EmptyStatement"));
        assert_eq!(
            debug("list"),
            "CommandStatement { command: List }".to_string()
        );
    }

    #[test]
    fn unknown_lines_are_rejected() {
        assert_eq!(
            parse_line("x == 1").unwrap_err(),
            EvalError::UnknownCommand("x == 1".into())
        );
        assert_eq!(
            parse_line("hello").unwrap_err(),
            EvalError::UnknownCommand("hello".into())
        );
    }

    #[test]
    fn assignment_needs_exactly_one_equals() {
        assert!(matches!(
            parse_line("var x"),
            Err(EvalError::SyntaxError(_))
        ));
        assert!(matches!(
            parse_line("var x = 1 = 2"),
            Err(EvalError::SyntaxError(_))
        ));
    }

    #[test]
    fn print_must_close_its_parenthesis() {
        assert!(matches!(
            parse_line("print(x"),
            Err(EvalError::SyntaxError(_))
        ));
    }

    #[test]
    fn extracts_if_parts() {
        assert_eq!(
            debug(r#"if(1==2){ print("yes") } else { print("no") }"#),
            r#"IfStatement { condition: "1==2", then_body: "print(\"yes\")", else_body: Some("print(\"no\")") }"#
        );
        assert_eq!(
            debug("if (a < b) { print(a) } else print(b)"),
            r#"IfStatement { condition: "a < b", then_body: "print(a)", else_body: Some("print(b)") }"#
        );
    }

    #[test]
    fn if_body_closes_at_the_balanced_brace() {
        assert_eq!(
            debug("if(1==1){ if(2==2){ print(1) } }"),
            r#"IfStatement { condition: "1==1", then_body: "if(2==2){ print(1) }", else_body: None }"#
        );
    }

    #[test]
    fn malformed_if_is_a_syntax_error() {
        for line in [
            "if x < 3 { print(x) }",
            "if(x<3) print(x)",
            "if(x<3){ print(x)",
            "if(x<3){ print(x) } otherwise",
            "if(x<3){ print(x) } else { print(1)",
        ] {
            assert!(
                matches!(parse_line(line), Err(EvalError::SyntaxError(_))),
                "expected syntax error for {}",
                line
            );
        }
    }

    #[test]
    fn extracts_while_parts() {
        assert_eq!(
            debug("while(x<3){ print(x); x=x+1; }"),
            r#"WhileStatement { condition: "x<3", body: "print(x); x=x+1;" }"#
        );
        assert!(matches!(
            parse_line("while x<3 { x=x+1 }"),
            Err(EvalError::SyntaxError(_))
        ));
        assert!(matches!(
            parse_line("while(x<3){ x=x+1 } junk"),
            Err(EvalError::SyntaxError(_))
        ));
    }

    #[test]
    fn loop_body_splits_outside_quotes() {
        let steps = parse_loop_body(r#"print("a;b"); x = x + 1;;"#).unwrap();
        let steps: Vec<String> = steps.iter().map(|step| format!("{:?}", step)).collect();
        assert_eq!(
            steps,
            vec![
                r#"PrintStatement { argument: "\"a;b\"" }"#.to_string(),
                r#"AssignmentStatement { identifier: "x", expression: "x + 1" }"#.to_string(),
            ]
        );
    }

    #[test]
    fn open_blocks_ignore_quoted_braces() {
        assert!(has_open_block("while(x<3){"));
        assert!(has_open_block("if(x<3){ while(x<3){ x = x + 1 }"));
        assert!(!has_open_block(r#"print("{")"#));
        assert!(!has_open_block("while(x<3){\n x = x + 1\n}"));
        assert!(!has_open_block("x = 1"));
    }

    #[test]
    fn call_arguments_are_trimmed() {
        assert_eq!(
            debug("gcd( a , 6 )"),
            r#"BuiltinCallStatement { name: "gcd", arguments: ["a", "6"] }"#
        );
        assert_eq!(
            debug("fibonacciPos()"),
            r#"BuiltinCallStatement { name: "fibonacciPos", arguments: [] }"#
        );
    }
}
