//! Plain-text rendering of a storyboard's current state.

use std::fmt::Write;

use crate::storyboard::{Node, Storyboard};

const INDENT: &str = "  ";

/// Render the element tree, one element per line, children indented under
/// their parent.
///
/// ```text
/// Storyboard Storyboard: runningState
///   Story cut_in: runningState
///     ...
///             Action accelerate (SpeedProfileAction): startTransition [npc 1/3]
/// ```
pub fn dump_storyboard(storyboard: &Storyboard) -> String {
    let mut out = String::new();
    for init in storyboard.init_actions() {
        let action = init.action();
        let _ = writeln!(
            out,
            "Init {} ({}) on {}: {}",
            action.name(),
            action.kind_name(),
            init.entity(),
            action.state().name()
        );
    }
    node(&mut out, storyboard.root(), 0);
    out
}

fn node(out: &mut String, node: &Node, depth: usize) {
    let indent = INDENT.repeat(depth);
    let _ = write!(out, "{indent}{} {}: {}", node.kind().name(), node.name(), node.state());
    if node.executions() > 1 {
        let _ = write!(out, " (executed {}x)", node.executions());
    }
    out.push('\n');

    for child in node.children() {
        self::node(out, child, depth + 1);
    }

    let inner = INDENT.repeat(depth + 1);
    for action_node in node.actions() {
        let action = action_node.action();
        let _ = write!(
            out,
            "{inner}Action {} ({}): {}",
            action.name(),
            action.kind_name(),
            action_node.state()
        );
        if action.entry_count() > 1 {
            let progress: Vec<String> = action
                .actors()
                .iter()
                .map(|actor| {
                    let done = action.progress(actor).unwrap_or(0);
                    format!("{actor} {done}/{}", action.entry_count())
                })
                .collect();
            if !progress.is_empty() {
                let _ = write!(out, " [{}]", progress.join(", "));
            }
        }
        out.push('\n');
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
