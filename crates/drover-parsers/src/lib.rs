//! Shared helpers for batch backend adapters.
//!
//! This crate provides subprocess execution and small text utilities
//! used by drover-lsf, drover-slurm and drover-local.

pub mod command;

pub use command::{
    CommandError, CommandOutput, capture_command, run_command_allow_failure, run_command_quiet,
};

/// Quote a single argument for a POSIX shell.
///
/// Arguments made only of safe characters are returned unchanged.
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Join an argument vector into one shell command line.
pub fn shell_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| shell_quote(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("basf2"), "basf2");
        assert_eq!(shell_quote("out/file.root"), "out/file.root");
        assert_eq!(shell_quote("two words"), "'two words'");
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_shell_join() {
        assert_eq!(
            shell_join(&["python3", "steer.py", "--name", "a b"]),
            "python3 steer.py --name 'a b'"
        );
    }
}
