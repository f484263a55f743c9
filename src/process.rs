use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};

use crate::events::ResultEvent;

/// Output of a finished child process.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    /// stdout and stderr, interleaved as the child wrote them.
    pub combined: String,
}

/// Run `program` to completion with stdout and stderr sharing one pipe.
///
/// Blocks until the child exits. There is no timeout: a child that never
/// exits blocks the caller forever.
pub fn capture(program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
    let (mut reader, writer) = std::io::pipe()?;

    let mut child = {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer);
        cmd.spawn()?
        // `cmd` drops here, closing our copies of the write end so the
        // read below sees EOF once the child exits.
    };

    let mut raw = Vec::new();
    let read = reader.read_to_end(&mut raw);
    let status = child.wait()?;
    read?;

    Ok(CommandOutput {
        status,
        combined: String::from_utf8_lossy(&raw).into_owned(),
    })
}

/// Run an external command and convert its outcome into a notification.
///
/// Exit code 0 yields `success_message`; anything else (including a launch
/// failure) yields `failure_message` followed by the captured output or the
/// launch error.
pub fn run(
    program: &str,
    args: &[String],
    label: &str,
    success_message: &str,
    failure_message: &str,
) -> ResultEvent {
    tracing::debug!(program, ?args, "spawning");
    match capture(program, args) {
        Ok(output) if output.status.success() => ResultEvent::success(label, success_message),
        Ok(output) => {
            tracing::warn!(program, status = %output.status, "command failed");
            ResultEvent::failure("Error", format!("{failure_message}: {}", output.combined))
        }
        Err(e) => {
            tracing::warn!(program, error = %e, "command could not be launched");
            ResultEvent::failure("Error", format!("{failure_message}: {e}"))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_owned(), script.to_owned()]
    }

    #[test]
    fn capture_merges_streams_in_order() {
        let out = capture("/bin/sh", &sh("echo one; echo two >&2; echo three")).unwrap();
        assert!(out.status.success());
        assert_eq!(out.combined, "one\ntwo\nthree\n");
    }

    #[test]
    fn zero_exit_uses_canned_message() {
        let result = run("/bin/sh", &sh("echo noisy"), "Label", "done!", "failed");
        assert_eq!(result, ResultEvent::success("Label", "done!"));
    }

    #[test]
    fn nonzero_exit_carries_output() {
        let result = run("/bin/sh", &sh("echo err123 >&2; exit 1"), "Label", "done!", "failed");
        assert!(!result.success);
        assert_eq!(result.title, "Error");
        assert!(result.message.starts_with("failed: "));
        assert!(result.message.contains("err123"));
    }

    #[test]
    fn missing_binary_is_a_failure_event() {
        let result = run("/definitely/not/here", &[], "Label", "done!", "failed");
        assert!(!result.success);
        assert!(result.message.starts_with("failed: "));
    }

    #[test]
    fn arguments_are_not_shell_interpreted() {
        let out = capture("/bin/echo", &["$HOME".to_owned(), "a;b".to_owned()]).unwrap();
        assert_eq!(out.combined, "$HOME a;b\n");
    }
}
