//! The `check` command: load and validate a scenario without running it.

use osc_eval::{Interpreter, Node};

use super::{load, EXIT_ERROR, EXIT_SUCCESS};

/// Validate a scenario file: parse it, build the storyboard, and run every
/// load-time check.
pub fn check_file(path: &str) -> i32 {
    let Some(file) = load(path) else {
        return EXIT_ERROR;
    };
    match Interpreter::new(&file.scenario, file.world()) {
        Ok(interpreter) => {
            let storyboard = interpreter.storyboard();
            let (elements, actions) = count(storyboard.root());
            println!(
                "OK: {path} ({} entities, {elements} elements, {actions} actions, {} init actions)",
                file.scenario.entities.len(),
                storyboard.init_actions().len()
            );
            EXIT_SUCCESS
        }
        Err(error) => {
            eprintln!("error: {path}: {error}");
            EXIT_ERROR
        }
    }
}

/// Elements below the root, and actions.
fn count(node: &Node) -> (usize, usize) {
    node.children()
        .iter()
        .fold((0, node.actions().len()), |(elements, actions), child| {
            let (below, child_actions) = count(child);
            (elements + 1 + below, actions + child_actions)
        })
}
