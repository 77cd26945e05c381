//! The `dump` command: print the freshly loaded storyboard tree.

use osc_eval::{dump_storyboard, Interpreter};

use super::{load, EXIT_ERROR, EXIT_SUCCESS};

pub fn dump_file(path: &str) -> i32 {
    let Some(file) = load(path) else {
        return EXIT_ERROR;
    };
    match Interpreter::new(&file.scenario, file.world()) {
        Ok(interpreter) => {
            print!("{}", dump_storyboard(interpreter.storyboard()));
            EXIT_SUCCESS
        }
        Err(error) => {
            eprintln!("error: {path}: {error}");
            EXIT_ERROR
        }
    }
}
