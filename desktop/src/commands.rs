//! Built-in `aj` commands.

use crate::terminal::{SystemRequest, Terminal, PROMPT};

pub const COMMAND_PREFIX: &str = "aj";
pub const OS_VERSION: &str = "AJOS v1.0.0";

pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Show this help"),
    ("clear", "Clear terminal"),
    ("version", "Show version"),
    ("echo <text>", "Print text"),
    ("reboot", "Reboot system"),
    ("halt", "Halt CPU"),
];

fn write_line(term: &mut Terminal, text: &str) {
    term.print(text);
    term.putchar(b'\n');
}

/// Runs one submitted line and reprints the prompt. A returned request
/// must be carried out by the host after the output is on screen.
pub fn execute(term: &mut Terminal, line: &str) -> Option<SystemRequest> {
    let request = dispatch(term, line.trim_start_matches([' ', '\t']));
    term.print(PROMPT);
    request
}

fn dispatch(term: &mut Terminal, cmd: &str) -> Option<SystemRequest> {
    if cmd.trim_end().is_empty() {
        return None;
    }

    let subcmd = match cmd.strip_prefix(COMMAND_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim_start_matches(' '),
        _ => {
            log_debug!("terminal: unknown command '{}'", cmd.trim_end());
            term.print("Unknown command: ");
            write_line(term, cmd.trim_end());
            write_line(term, "Commands use 'aj' prefix. Type 'aj help' for help.");
            return None;
        }
    };

    if let Some(text) = subcmd.strip_prefix("echo ") {
        write_line(term, text);
        return None;
    }

    match subcmd.trim_end() {
        "" => usage(term),
        "help" => help(term),
        "clear" => term.clear(),
        "version" => write_line(term, OS_VERSION),
        "echo" => term.putchar(b'\n'),
        "reboot" => {
            write_line(term, "Rebooting...");
            log_warn!("terminal: reboot requested");
            return Some(SystemRequest::Reboot);
        }
        "halt" => {
            write_line(term, "System halted.");
            log_warn!("terminal: halt requested");
            return Some(SystemRequest::Halt);
        }
        other => {
            log_debug!("terminal: unknown subcommand '{}'", other);
            term.print("Unknown command: aj ");
            write_line(term, other);
            write_line(term, "Type 'aj help' for commands.");
        }
    }
    None
}

fn usage(term: &mut Terminal) {
    write_line(term, "Usage: aj <command>");
    write_line(term, "Type 'aj help' for a list of commands.");
}

fn help(term: &mut Terminal) {
    write_line(term, "Available commands:");
    for (name, desc) in COMMANDS {
        term.print("  aj ");
        term.print(name);
        for _ in name.len()..7 {
            term.putchar(b' ');
        }
        term.print(" - ");
        write_line(term, desc);
    }
}
