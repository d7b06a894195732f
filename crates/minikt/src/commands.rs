//! Text for the session commands (`list`, `help`, `methods`, `exit`).

use crate::builtins::BuiltinRegistry;
use crate::environment::Environment;

pub const WELCOME: &str = "Welcome to MiniKotlin reader!\nType 'help' for a list of commands.";
pub const GOODBYE: &str = "Exiting MiniKotlin Interpreter.";

pub const HELP: &str = "\
Welcome to MiniKotlin Interpreter!
Supported commands:
- var <name> = <value> : Declare a variable.
- <name> = <value> : Assign to a variable.
- print(<value>) : Print a value or variable.
- if(<condition>){ <statement> } else { <statement> } : Run a statement conditionally.
- while(<condition>){ <statements>; } : Perform a loop.
- list : List all stored variables.
- help : Display this help message.
- methods : Display all methods.
- exit : Exit the interpreter.";

pub fn list(environment: &Environment) -> Vec<String> {
    let mut lines = vec![String::from("Current Variables:")];
    if environment.is_empty() {
        lines.push(String::from("No variables defined."));
    } else {
        lines.extend(
            environment
                .snapshot()
                .into_iter()
                .map(|(name, value)| format!("{} = {}", name, value)),
        );
    }
    lines
}

pub fn methods(builtins: &BuiltinRegistry) -> Vec<String> {
    let mut lines = vec![String::from("All available methods!")];
    lines.extend(
        builtins
            .entries()
            .map(|(name, description)| format!("- {}(...) : {}", name, description)),
    );
    lines
}
