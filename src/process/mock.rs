use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{PublishError, Result};
use crate::process::{ProcessRunner, RunOptions};

/// One recorded external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// `program arg1 arg2 ...`
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    Failure { code: i32, stderr: String },
}

type Effect = Box<dyn Fn(&Invocation)>;

/// Runner that records every command instead of executing it.
///
/// Replies are scripted per `(program, first argument)`; unscripted commands
/// succeed with empty output. An effect can stand in for what the real
/// command leaves on disk, such as the archive written by `npm pack`.
#[derive(Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<Invocation>>,
    replies: HashMap<(String, String), Reply>,
    effects: HashMap<(String, String), Effect>,
}

impl fmt::Debug for RecordingRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingRunner")
            .field("invocations", &self.invocations)
            .field("replies", &self.replies)
            .field("effects", &self.effects.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `output` whenever `program subcommand ...` is run
    pub fn respond(
        mut self,
        program: &str,
        subcommand: &str,
        output: impl Into<String>,
    ) -> Self {
        self.replies.insert(
            (program.to_string(), subcommand.to_string()),
            Reply::Output(output.into()),
        );
        self
    }

    /// Fail whenever `program subcommand ...` is run
    pub fn fail(mut self, program: &str, subcommand: &str, stderr: impl Into<String>) -> Self {
        self.replies.insert(
            (program.to_string(), subcommand.to_string()),
            Reply::Failure {
                code: 1,
                stderr: stderr.into(),
            },
        );
        self
    }

    /// Run `effect` before replying whenever `program subcommand ...` is run
    pub fn effect(
        mut self,
        program: &str,
        subcommand: &str,
        effect: impl Fn(&Invocation) + 'static,
    ) -> Self {
        self.effects.insert(
            (program.to_string(), subcommand.to_string()),
            Box::new(effect),
        );
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Number of recorded commands run with `program`
    pub fn count(&self, program: &str) -> usize {
        self.invocations
            .borrow()
            .iter()
            .filter(|i| i.program == program)
            .count()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, program: &str, args: &[&str], options: &RunOptions) -> Result<String> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: options.cwd.clone(),
            env: options.env.clone(),
        };

        let key = (
            program.to_string(),
            args.first().map(|a| a.to_string()).unwrap_or_default(),
        );

        if let Some(effect) = self.effects.get(&key) {
            effect(&invocation);
        }
        self.invocations.borrow_mut().push(invocation);

        match self.replies.get(&key) {
            Some(Reply::Output(output)) => Ok(output.clone()),
            Some(Reply::Failure { code, stderr }) => Err(PublishError::Process {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
                code: *code,
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_invocations() {
        let runner = RecordingRunner::new();
        runner
            .run("git", &["status", "--porcelain"], &RunOptions::in_dir("ws"))
            .unwrap();

        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].cwd, PathBuf::from("ws"));
        assert_eq!(runner.command_lines(), vec!["git status --porcelain"]);
    }

    #[test]
    fn test_scripted_output_and_failure() {
        let runner = RecordingRunner::new()
            .respond("git", "tag", "a@v1.0.0\n")
            .fail("npm", "pack", "boom");

        let options = RunOptions::in_dir(".");
        assert_eq!(runner.run("git", &["tag"], &options).unwrap(), "a@v1.0.0\n");
        assert!(runner.run("npm", &["pack", "dist"], &options).is_err());
        assert_eq!(runner.run("git", &["push"], &options).unwrap(), "");
        assert_eq!(runner.count("git"), 2);
    }

    #[test]
    fn test_effect_sees_invocation() {
        let seen = std::rc::Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let runner = RecordingRunner::new().effect("npm", "pack", move |i| {
            sink.borrow_mut().push(i.cwd.clone());
        });

        runner
            .run("npm", &["pack", "dist"], &RunOptions::in_dir("mirror"))
            .unwrap();
        runner.run("npm", &["version"], &RunOptions::in_dir(".")).unwrap();

        assert_eq!(*seen.borrow(), vec![PathBuf::from("mirror")]);
    }
}
