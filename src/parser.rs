use crate::argument::{Declared, Header, Role};
use crate::command::help::HelpRequest;
use crate::command::Settings;
use crate::error::{Failure, OrderingRule, ProgrammerError, UserError};
use std::cell::Cell;
use std::rc::Rc;

/// The arguments declared for the program or for one verb, and the state of their parse
///
/// Only reachable through [`Declare`](crate::Declare); it has no public methods.
pub struct Scope {
    name: String,
    full_name: String,
    qualifier: String,
    inherited_dump: Vec<String>,
    settings: Rc<Settings>,
    arguments: Vec<Declared>,
    help: Option<Rc<Header>>,
    parsed: Rc<Cell<bool>>,
}

impl Scope {
    pub(crate) fn root(name: String, settings: Settings) -> Self {
        Scope {
            full_name: name.clone(),
            name,
            qualifier: String::new(),
            inherited_dump: Vec::new(),
            settings: Rc::new(settings),
            arguments: Vec::new(),
            help: None,
            parsed: Rc::new(Cell::new(false)),
        }
    }

    /// Creates the scope of verb `name`, declared in this scope
    pub(crate) fn child(&self, name: &str) -> Self {
        let inherited_dump = if self.settings.dump.get() && self.parsed.get() {
            self.dump_lines()
        } else {
            Vec::new()
        };

        Scope {
            name: name.to_string(),
            full_name: format!("{} {name}", self.full_name),
            qualifier: qualified(&self.qualifier, name),
            inherited_dump,
            settings: Rc::clone(&self.settings),
            arguments: Vec::new(),
            help: None,
            parsed: Rc::new(Cell::new(false)),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// The program name followed by the path of verbs leading here
    pub(crate) fn full_name(&self) -> &str {
        &self.full_name
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn header(
        &self,
        name: String,
        short_name: Option<char>,
        description: Option<String>,
        required: bool,
    ) -> Rc<Header> {
        Header::new(name, short_name, description, required, Rc::clone(&self.parsed))
    }

    pub(crate) fn add(&mut self, declared: Declared) -> Result<(), ProgrammerError> {
        self.admit(&declared)?;
        if let Declared::Verb(verb) = &declared {
            verb.rehearse(self)?;
        }

        let header = declared.header();
        tracing::debug!(
            parser = %self.full_name,
            name = %header.name,
            role = ?declared.role(),
            required = header.required,
            "declared argument"
        );
        self.arguments.push(declared);
        Ok(())
    }

    fn admit(&mut self, candidate: &Declared) -> Result<(), ProgrammerError> {
        if self.parsed.get() {
            return Err(ProgrammerError::AlreadyParsed);
        }
        candidate.validate_names()?;
        if candidate.role() != Role::Named {
            self.ensure_help()?;
        }

        let header = candidate.header();
        if self.arguments.iter().any(|a| a.header().name == header.name) {
            return Err(ProgrammerError::DuplicateName(header.name.clone()));
        }
        if let Some(short) = header.short_name {
            if self.arguments.iter().any(|a| a.header().short_name == Some(short)) {
                return Err(ProgrammerError::DuplicateShortName(short));
            }
        }

        self.check_ordering(candidate)
    }

    fn check_ordering(&self, candidate: &Declared) -> Result<(), ProgrammerError> {
        let first = |role: Role, optional_only: bool| {
            self.arguments
                .iter()
                .find(|a| a.role() == role && !(optional_only && a.header().required))
        };

        let violation = match candidate.role() {
            Role::Named => first(Role::Verb, false)
                .map(|a| (OrderingRule::ArgumentMustPrecedeVerb, a))
                .or_else(|| {
                    first(Role::Positional, false)
                        .map(|a| (OrderingRule::NamedArgumentMustPrecedePositional, a))
                }),
            Role::Positional => first(Role::Verb, false)
                .map(|a| (OrderingRule::ArgumentMustPrecedeVerb, a))
                .or_else(|| {
                    if !candidate.header().required {
                        return None;
                    }
                    first(Role::Positional, true).map(|a| {
                        (OrderingRule::RequiredPositionalMustPrecedeOptionalPositional, a)
                    })
                }),
            Role::Verb => first(Role::Positional, true)
                .map(|a| (OrderingRule::VerbMayNotBePrecededByOptionalPositional, a)),
        };

        match violation {
            Some((rule, preceding)) => Err(ProgrammerError::InvalidOrdering {
                rule,
                violating: candidate.header().name.clone(),
                preceding: preceding.header().name.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Adds the implicit help switch, unless it is already there
    fn ensure_help(&mut self) -> Result<(), ProgrammerError> {
        if self.help.is_some() {
            return Ok(());
        }
        let header = self.header(
            "help".to_string(),
            Some('h'),
            Some("Display this help".to_string()),
            false,
        );
        self.add(Declared::Switch(Rc::clone(&header)))?;
        self.help = Some(header);
        Ok(())
    }

    /// Consumes every one of `tokens`, then checks that nothing required is missing
    pub(crate) fn parse_remaining(&mut self, mut tokens: &[String]) -> Result<(), Failure> {
        if self.parsed.get() {
            return Err(ProgrammerError::AlreadyParsed.into());
        }
        self.ensure_help()?;
        self.parsed.set(true);

        while let Some(token) = tokens.first() {
            tokens = match self.try_parse_argument(tokens)? {
                Some(rest) => rest,
                None => return Err(UserError::UnexpectedToken(token.clone()).into()),
            };
        }

        if self.help.as_ref().is_some_and(|help| help.supplied.get()) {
            tracing::debug!(parser = %self.full_name, "help requested");
            return Err(Failure::Help(self.help_request()));
        }

        let missing = self
            .arguments
            .iter()
            .map(Declared::header)
            .find(|header| header.required && !header.supplied.get());
        if let Some(header) = missing {
            return Err(UserError::RequiredArgumentNotSupplied(header.name.clone()).into());
        }

        let verbs = self
            .arguments
            .iter()
            .filter(|a| a.role() == Role::Verb)
            .collect::<Vec<_>>();
        if !verbs.is_empty() && !verbs.iter().any(|verb| verb.header().supplied.get()) {
            return Err(UserError::VerbExpected(self.settings.verb_term.clone()).into());
        }

        if self.settings.dump.get() && verbs.is_empty() {
            for line in self.dump_lines() {
                self.settings.emit(&line);
            }
        }
        Ok(())
    }

    /// Offers the first of `tokens` to every argument: named ones first, then positionals, then
    /// verbs, each group in declaration order
    fn try_parse_argument<'t>(&self, tokens: &'t [String]) -> Result<Option<&'t [String]>, Failure> {
        let ordered = [Role::Named, Role::Positional, Role::Verb]
            .into_iter()
            .flat_map(|role| self.arguments.iter().filter(move |a| a.role() == role));

        for argument in ordered {
            if let Some(rest) = argument.try_parse(tokens, self)? {
                return Ok(Some(rest));
            }
        }
        Ok(None)
    }

    pub(crate) fn help_request(&self) -> HelpRequest {
        HelpRequest {
            full_name: self.full_name.clone(),
            entries: self.arguments.iter().map(Declared::help_entry).collect(),
        }
    }

    /// `qualified.name = value` for the arguments of every enclosing scope, then of this one
    fn dump_lines(&self) -> Vec<String> {
        let mut lines = self.inherited_dump.clone();
        lines.extend(self.arguments.iter().map(|argument| {
            format!(
                "{} = {}",
                qualified(&self.qualifier, &argument.header().name),
                argument.value_text()
            )
        }));
        lines
    }
}

fn qualified(qualifier: &str, name: &str) -> String {
    if qualifier.is_empty() {
        return name.to_string();
    }
    format!("{qualifier}.{name}")
}

enum Mode {
    Rehearsal,
    Execution {
        tokens: Vec<String>,
        failure: Option<Failure>,
    },
}

/// The parser a verb handler declares the verb's own arguments on
///
/// Every handler runs twice: once when the verb is added, against a parser whose
/// [`try_parse`](ChildParser::try_parse) does nothing but return `false`, and once more if the
/// verb is selected on the command line. Declare arguments, call `try_parse` exactly once, and
/// only look at values when it returns `true`.
pub struct ChildParser {
    scope: Scope,
    mode: Mode,
    invocations: usize,
}

impl ChildParser {
    pub(crate) fn rehearsal(scope: Scope) -> Self {
        ChildParser {
            scope,
            mode: Mode::Rehearsal,
            invocations: 0,
        }
    }

    pub(crate) fn execution(scope: Scope, tokens: Vec<String>) -> Self {
        ChildParser {
            scope,
            mode: Mode::Execution {
                tokens,
                failure: None,
            },
            invocations: 0,
        }
    }

    /// The name of the verb
    pub fn name(&self) -> &str {
        self.scope.name()
    }

    /// Parses the tokens that follow the verb
    ///
    /// Returns `false` when the handler must stop: during the rehearsal run, on a command line
    /// error, or when help was requested. The error or help is reported once the handler returns.
    pub fn try_parse(&mut self) -> bool {
        self.invocations += 1;
        if self.invocations > 1 {
            return false;
        }

        match &mut self.mode {
            Mode::Rehearsal => false,
            Mode::Execution { tokens, failure } => match self.scope.parse_remaining(tokens) {
                Ok(()) => true,
                Err(error) => {
                    *failure = Some(error);
                    false
                }
            },
        }
    }

    pub(crate) fn check_invocations(&self) -> Result<(), ProgrammerError> {
        match self.invocations {
            0 => Err(ProgrammerError::ParseNotInvoked(self.name().to_string())),
            1 => Ok(()),
            _ => Err(ProgrammerError::ParseInvokedMoreThanOnce(
                self.name().to_string(),
            )),
        }
    }

    /// Surfaces whatever stopped the parse once the handler has returned
    pub(crate) fn finish(self) -> Result<(), Failure> {
        self.check_invocations()?;
        match self.mode {
            Mode::Execution {
                failure: Some(failure),
                ..
            } => Err(failure),
            _ => Ok(()),
        }
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }
}
