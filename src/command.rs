use crate::event::CliEvent;
use anyhow::Result;

/// A named, invocable unit of CLI behavior.
///
/// `name` is a space-separated token path (`"git clone"`) matched verbatim
/// against the leading tokens of argv. `invoke` receives the firing event and
/// owns everything after that: pulling its arguments from
/// [`DispatchedArgv::args`](crate::event::DispatchedArgv::args), doing the
/// work, and reporting failure through `Err`.
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn summary(&self) -> &str {
        ""
    }

    fn invoke(&self, event: &CliEvent) -> Result<()>;

    fn name_tokens(&self) -> Vec<&str> {
        self.name().split_whitespace().collect()
    }
}

/// Arguments of a dispatched invocation, or an error when a command is fired
/// by some other event.
pub fn args_of<'a>(event: &'a CliEvent, command: &str) -> Result<&'a [String]> {
    match event.as_argv() {
        Some(argv) => Ok(argv.args()),
        None => anyhow::bail!("'{command}' can only run from a command-line invocation"),
    }
}
