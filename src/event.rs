/// Discriminant of a [`CliEvent`]; modules decide relevance from this alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DispatchedArgv,
    Describe,
}

/// Events flowing through the dispatch pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliEvent {
    /// A command-line invocation waiting to be routed to a command.
    Dispatched(DispatchedArgv),
    /// Request for every command a module offers (used for listings).
    Describe,
}

impl CliEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            CliEvent::Dispatched(_) => EventKind::DispatchedArgv,
            CliEvent::Describe => EventKind::Describe,
        }
    }

    pub fn as_argv(&self) -> Option<&DispatchedArgv> {
        match self {
            CliEvent::Dispatched(argv) => Some(argv),
            CliEvent::Describe => None,
        }
    }
}

impl From<DispatchedArgv> for CliEvent {
    fn from(argv: DispatchedArgv) -> Self {
        CliEvent::Dispatched(argv)
    }
}

/// Raw invocation tokens (program name excluded) plus the cursor recording
/// how many leading tokens the winning command's name consumed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchedArgv {
    argv: Vec<String>,
    consumed_prefix_len: usize,
}

impl DispatchedArgv {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: tokens.into_iter().map(Into::into).collect(),
            consumed_prefix_len: 0,
        }
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn consumed_prefix_len(&self) -> usize {
        self.consumed_prefix_len
    }

    /// Never exceeds `argv().len()`.
    pub fn set_consumed_prefix_len(&mut self, len: usize) {
        debug_assert!(len <= self.argv.len(), "consumed prefix past end of argv");
        self.consumed_prefix_len = len.min(self.argv.len());
    }

    /// Tokens left for the command once its name has been matched.
    pub fn args(&self) -> &[String] {
        &self.argv[self.consumed_prefix_len..]
    }
}
