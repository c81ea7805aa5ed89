use crate::cmdline::split_combined_short_forms;
use crate::declare::Declare;
use crate::error::{Failure, ProgrammerError, UserError};
use crate::parser::Scope;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt;
use std::path::Path;

pub mod help;

const DEFAULT_VERB_TERM: &str = "verb";
const DEFAULT_SCREEN_WIDTH: usize = 120;

type Output = Box<dyn FnMut(&str)>;

/// Settings every parser in a tree shares with the root
pub(crate) struct Settings {
    pub(crate) verb_term: String,
    pub(crate) screen_width: usize,
    pub(crate) dump: Cell<bool>,
    output: RefCell<Output>,
}

impl Settings {
    /// Sends one line to the output sink
    pub(crate) fn emit(&self, line: &str) {
        let mut output = self.output.borrow_mut();
        (&mut *output)(line);
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Settings {
            verb_term: DEFAULT_VERB_TERM.to_string(),
            screen_width: DEFAULT_SCREEN_WIDTH,
            dump: Cell::new(false),
            output: RefCell::new(Box::new(|line: &str| panic!("unexpected output: {line}"))),
        }
    }
}

/// How a root [`ArgumentParser`] identifies the program and where it writes
///
/// ```
/// use verb_args::{ArgumentParser, ParserOptions};
///
/// let parser = ArgumentParser::with_options(
///     ParserOptions::new()
///         .program_name("acme")
///         .verb_term("command")
///         .screen_width(80)
///         .output(|line| println!("{line}")),
/// );
/// assert_eq!(parser.name(), "acme");
/// ```
pub struct ParserOptions {
    program_name: Option<String>,
    verb_term: String,
    screen_width: usize,
    output: Option<Output>,
    output_argument_values: bool,
}

impl ParserOptions {
    pub fn new() -> Self {
        ParserOptions {
            program_name: None,
            verb_term: DEFAULT_VERB_TERM.to_string(),
            screen_width: DEFAULT_SCREEN_WIDTH,
            output: None,
            output_argument_values: false,
        }
    }

    /// The name shown in usage lines; defaults to the file stem of the running executable
    pub fn program_name(mut self, program_name: impl Into<String>) -> Self {
        self.program_name = Some(program_name.into());
        self
    }

    /// What verbs are called in help and errors, e.g. `command`; defaults to `verb`
    pub fn verb_term(mut self, verb_term: impl Into<String>) -> Self {
        self.verb_term = verb_term.into();
        self
    }

    /// The column budget help text is wrapped to; defaults to 120
    pub fn screen_width(mut self, screen_width: usize) -> Self {
        self.screen_width = screen_width;
        self
    }

    /// Receives help and error text one line at a time; defaults to standard error
    pub fn output(mut self, output: impl FnMut(&str) + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Writes `name = value` for every argument after a successful parse
    pub fn output_argument_values(mut self, enabled: bool) -> Self {
        self.output_argument_values = enabled;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("program_name", &self.program_name)
            .field("verb_term", &self.verb_term)
            .field("screen_width", &self.screen_width)
            .field("output_argument_values", &self.output_argument_values)
            .finish_non_exhaustive()
    }
}

fn program_name_from_env() -> String {
    std::env::args()
        .next()
        .and_then(|path| {
            Path::new(&path)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "program".to_string())
}

/// The parser for a program's command line
///
/// Declare arguments through [`Declare`], then call [`try_parse`](ArgumentParser::try_parse) or
/// [`parse`](ArgumentParser::parse) once.
pub struct ArgumentParser {
    scope: Scope,
}

impl ArgumentParser {
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    pub fn with_options(options: ParserOptions) -> Self {
        let settings = Settings {
            verb_term: options.verb_term,
            screen_width: options.screen_width,
            dump: Cell::new(options.output_argument_values),
            output: RefCell::new(
                options
                    .output
                    .unwrap_or_else(|| Box::new(|line: &str| eprintln!("{line}"))),
            ),
        };
        let name = options.program_name.unwrap_or_else(program_name_from_env);
        ArgumentParser {
            scope: Scope::root(name, settings),
        }
    }

    /// The program name
    pub fn name(&self) -> &str {
        self.scope.name()
    }

    pub fn verb_term(&self) -> &str {
        &self.scope.settings().verb_term
    }

    pub fn set_output_argument_values(&mut self, enabled: bool) {
        self.scope.settings().dump.set(enabled);
    }

    /// Parses `tokens`, storing values in the declared arguments and running the selected verb
    ///
    /// Returns `Ok(false)` after writing help or a description of the mistake to the output when
    /// help was requested or the command line does not match the declarations; the program should
    /// then exit. Mistakes in the declarations themselves are returned as errors.
    pub fn try_parse<I, T>(&mut self, tokens: I) -> Result<bool, ProgrammerError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let tokens = split_combined_short_forms(tokens);
        tracing::debug!(program = %self.scope.name(), tokens = tokens.len(), "parsing command line");

        match self.scope.parse_remaining(&tokens) {
            Ok(()) => Ok(true),
            Err(Failure::Help(request)) => {
                let settings = self.scope.settings();
                for line in help::help_lines(&request, &settings.verb_term, settings.screen_width) {
                    settings.emit(&line);
                }
                Ok(false)
            }
            Err(Failure::User(error)) => {
                self.report(&error);
                Ok(false)
            }
            Err(Failure::Programmer(error)) => Err(error),
        }
    }

    /// Like [`try_parse`](ArgumentParser::try_parse), but exits the process with status 1 when
    /// parsing does not succeed
    ///
    /// # Panics
    ///
    /// On mistakes in the declarations
    pub fn parse<I, T>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        match self.try_parse(tokens) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(error) => panic!("{error}"),
        }
    }

    /// Parses the arguments this process was started with
    pub fn try_parse_env(&mut self) -> Result<bool, ProgrammerError> {
        self.try_parse(std::env::args().skip(1))
    }

    fn report(&self, error: &UserError) {
        tracing::debug!(%error, "command line rejected");
        let settings = self.scope.settings();
        settings.emit(&error.to_string());

        let mut cause = error.source();
        while let Some(inner) = cause {
            settings.emit(&format!("Because: {inner}"));
            cause = inner.source();
        }

        settings.emit(&format!(
            "Try '{} --help' for more information.",
            self.scope.full_name()
        ));
    }
}

impl Default for ArgumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Declare for ArgumentParser {
    fn scope(&mut self) -> &mut Scope {
        &mut self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::Phase;
    use crate::codec::{EnumCodec, IntCodec};
    use crate::declare::{OptionDef, PositionalDef, SwitchDef};
    use crate::error::OrderingRule;
    use proptest::prelude::*;
    use std::rc::Rc;

    type Lines = Rc<RefCell<Vec<String>>>;

    fn options() -> (ParserOptions, Lines) {
        let lines: Lines = Rc::default();
        let sink = Rc::clone(&lines);
        let options = ParserOptions::new()
            .program_name("TestApp")
            .verb_term("subcommand")
            .output(move |line: &str| sink.borrow_mut().push(line.to_string()));
        (options, lines)
    }

    fn capturing_parser() -> (ArgumentParser, Lines) {
        let (options, lines) = options();
        (ArgumentParser::with_options(options), lines)
    }

    fn tokens(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    fn description(name: &str) -> String {
        format!("This is the description of {name}")
    }

    #[test]
    fn empty_command_line_leaves_every_argument_at_rest() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        let alpha = parser.add_switch(SwitchDef::new("alpha").short('a'))?;
        let bravo = parser.add_option(OptionDef::string("bravo"))?;
        let charlie = parser.add_option_with_default(OptionDef::new("charlie", IntCodec), 7)?;
        let delta = parser.add_positional(PositionalDef::string("delta"))?;
        let echo = parser.add_positional_with_default(PositionalDef::string("echo"), "echo-default")?;

        assert!(parser.try_parse(Vec::<String>::new())?);
        assert!(!alpha.value());
        assert_eq!(bravo.value(), None);
        assert_eq!(charlie.value(), 7);
        assert_eq!(delta.value(), None);
        assert_eq!(echo.value(), "echo-default");
        assert!(lines.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn positional_may_come_before_named_arguments() -> anyhow::Result<()> {
        let (mut parser, _) = capturing_parser();
        let alpha = parser.add_switch(SwitchDef::new("alpha").short('a'))?;
        let bravo = parser.add_positional(PositionalDef::string("bravo"))?;

        assert!(parser.try_parse(["bravo-value", "--alpha"])?);
        assert!(alpha.value());
        assert_eq!(bravo.value().as_deref(), Some("bravo-value"));
        Ok(())
    }

    #[test]
    fn long_and_short_forms_are_the_same_argument() -> anyhow::Result<()> {
        for line in ["--alpha --alpha", "-a --alpha", "--alpha -a", "-a -a", "-aa"] {
            let (mut parser, lines) = capturing_parser();
            parser.add_switch(SwitchDef::new("alpha").short('a'))?;

            assert!(!parser.try_parse(tokens(line))?, "{line}");
            assert_eq!(
                *lines.borrow(),
                [
                    "Argument 'alpha' supplied more than once.",
                    "Try 'TestApp --help' for more information.",
                ]
            );
        }
        Ok(())
    }

    #[test]
    fn preset_and_default_resolve_independently() -> anyhow::Result<()> {
        for (line, expected) in [("", "D"), ("--opt", "P"), ("--opt=V", "V")] {
            let (mut parser, _) = capturing_parser();
            let opt = parser.add_option_with_default(OptionDef::string("opt").preset("P"), "D")?;

            assert!(parser.try_parse(tokens(line))?);
            assert_eq!(opt.value(), expected);
        }
        Ok(())
    }

    #[test]
    fn required_positional_after_optional_one_is_rejected() -> anyhow::Result<()> {
        let (mut parser, _) = capturing_parser();
        parser.add_positional(PositionalDef::string("alpha"))?;

        let error = parser
            .add_required_positional(PositionalDef::string("bravo"))
            .unwrap_err();
        assert_eq!(
            error,
            ProgrammerError::InvalidOrdering {
                rule: OrderingRule::RequiredPositionalMustPrecedeOptionalPositional,
                violating: "bravo".to_string(),
                preceding: "alpha".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn other_ordering_rules() -> anyhow::Result<()> {
        let (mut parser, _) = capturing_parser();
        parser.add_required_positional(PositionalDef::string("alpha"))?;
        assert!(matches!(
            parser.add_switch(SwitchDef::new("bravo")),
            Err(ProgrammerError::InvalidOrdering {
                rule: OrderingRule::NamedArgumentMustPrecedePositional,
                ..
            })
        ));

        parser.add_verb("charlie", "", |child| {
            child.try_parse();
            Ok(())
        })?;
        parser.add_verb("delta", "", |child| {
            child.try_parse();
            Ok(())
        })?;
        assert!(matches!(
            parser.add_positional(PositionalDef::string("echo")),
            Err(ProgrammerError::InvalidOrdering {
                rule: OrderingRule::ArgumentMustPrecedeVerb,
                ..
            })
        ));

        let (mut parser, _) = capturing_parser();
        parser.add_positional_with_default(PositionalDef::string("foxtrot"), "f")?;
        let error = parser
            .add_verb("golf", "", |child| {
                child.try_parse();
                Ok(())
            })
            .unwrap_err();
        assert_eq!(
            error,
            ProgrammerError::InvalidOrdering {
                rule: OrderingRule::VerbMayNotBePrecededByOptionalPositional,
                violating: "golf".to_string(),
                preceding: "foxtrot".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn names_are_checked_on_declaration() -> anyhow::Result<()> {
        let (mut parser, _) = capturing_parser();
        parser.add_switch(SwitchDef::new("alpha").short('a'))?;

        assert_eq!(
            parser.add_switch(SwitchDef::new("alpha")).unwrap_err(),
            ProgrammerError::DuplicateName("alpha".to_string())
        );
        assert_eq!(
            parser.add_switch(SwitchDef::new("bravo").short('a')).unwrap_err(),
            ProgrammerError::DuplicateShortName('a')
        );
        assert_eq!(
            parser.add_switch(SwitchDef::new("-charlie")).unwrap_err(),
            ProgrammerError::InvalidName("-charlie".to_string())
        );
        assert_eq!(
            parser.add_switch(SwitchDef::new("delta").short('?')).unwrap_err(),
            ProgrammerError::InvalidShortName('?')
        );
        Ok(())
    }

    #[test]
    fn nothing_can_be_added_or_parsed_after_parsing() -> anyhow::Result<()> {
        let (mut parser, _) = capturing_parser();
        assert!(parser.try_parse(Vec::<String>::new())?);

        assert_eq!(
            parser.add_switch(SwitchDef::new("alpha")).unwrap_err(),
            ProgrammerError::AlreadyParsed
        );
        assert_eq!(
            parser.try_parse(Vec::<String>::new()).unwrap_err(),
            ProgrammerError::AlreadyParsed
        );
        Ok(())
    }

    #[test]
    fn handler_that_never_parses_is_caught_on_declaration() {
        let (mut parser, _) = capturing_parser();
        let error = parser
            .add_verb("juliet", "", |child| {
                child.add_switch(SwitchDef::new("lima"))?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(error, ProgrammerError::ParseNotInvoked("juliet".to_string()));
    }

    #[test]
    fn handler_that_parses_twice_is_caught_on_declaration() {
        let (mut parser, _) = capturing_parser();
        let error = parser
            .add_verb("juliet", "", |child| {
                child.try_parse();
                child.try_parse();
                Ok(())
            })
            .unwrap_err();
        assert_eq!(
            error,
            ProgrammerError::ParseInvokedMoreThanOnce("juliet".to_string())
        );
    }

    #[test]
    fn handler_declaration_errors_surface_from_add_verb() {
        let (mut parser, _) = capturing_parser();
        let error = parser
            .add_verb("juliet", "", |child| {
                child.add_switch(SwitchDef::new("lima"))?;
                child.add_switch(SwitchDef::new("lima"))?;
                child.try_parse();
                Ok(())
            })
            .unwrap_err();
        assert_eq!(error, ProgrammerError::DuplicateName("lima".to_string()));
    }

    fn juliet_with_required_india(parser: &mut ArgumentParser) -> Lines {
        let seen: Lines = Rc::default();
        let record = Rc::clone(&seen);
        parser
            .add_verb("juliet", description("juliet"), move |child| {
                let india = child.add_required_positional(PositionalDef::string("india"))?;
                if child.try_parse() {
                    record.borrow_mut().push(india.value());
                }
                Ok(())
            })
            .unwrap();
        seen
    }

    #[test]
    fn verb_receives_the_rest_of_the_command_line() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        let seen = juliet_with_required_india(&mut parser);

        assert!(parser.try_parse(["juliet", "india-value"])?);
        assert_eq!(*seen.borrow(), ["india-value"]);
        assert!(lines.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn verb_arguments_are_checked_too() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        let seen = juliet_with_required_india(&mut parser);

        assert!(!parser.try_parse(["juliet"])?);
        assert!(seen.borrow().is_empty());
        assert_eq!(
            *lines.borrow(),
            [
                "Required argument 'india' was not supplied.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn a_verb_must_be_selected() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        juliet_with_required_india(&mut parser);

        assert!(!parser.try_parse(Vec::<String>::new())?);
        assert_eq!(
            *lines.borrow(),
            [
                "Expected a subcommand.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn help_wins_over_missing_arguments() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_switch(SwitchDef::new("alpha"))?;
        parser.add_required_option(OptionDef::string("bravo"))?;
        parser.add_required_positional(PositionalDef::string("charlie"))?;

        assert!(!parser.try_parse(["--alpha", "--help"])?);
        assert_eq!(lines.borrow().first().map(String::as_str), Some("Usage:"));
        Ok(())
    }

    #[test]
    fn help_for_positional_only_parser() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_required_positional(PositionalDef::string("india").description(description("india")))?;

        assert!(!parser.try_parse(["-h"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Usage:",
                "    TestApp [-h, --help] <india>",
                "Options:",
                "    -h, --help Display this help.",
                "    <india>    This is the description of india.",
            ]
        );
        Ok(())
    }

    fn declare_verbs(parser: &mut ArgumentParser) -> anyhow::Result<()> {
        parser.add_switch(SwitchDef::new("alpha").short('a').description(description("alpha")))?;
        parser.add_required_option(
            OptionDef::string("echo")
                .parameter_name("echo-parameter")
                .description(description("echo")),
        )?;
        parser.add_verb("juliet", description("juliet"), |child| {
            child.add_switch(SwitchDef::new("lima").description(description("lima")))?;
            child.add_positional_with_default(
                PositionalDef::string("papa").description(description("papa")),
                "papa-default",
            )?;
            child.try_parse();
            Ok(())
        })?;
        parser.add_verb("kilo", description("kilo"), |child| {
            child.try_parse();
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn help_lists_verbs() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        declare_verbs(&mut parser)?;

        assert!(!parser.try_parse(["--help"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Usage:",
                "    TestApp [<options>] --echo=<echo-parameter> <subcommand> ...",
                "Options:",
                "    -a, --alpha             This is the description of alpha.",
                "    --echo=<echo-parameter> This is the description of echo.",
                "    -h, --help              Display this help.",
                "Where <subcommand> is one of:",
                "    juliet                  This is the description of juliet.",
                "    kilo                    This is the description of kilo.",
                "Try 'TestApp <subcommand> --help' for more information on a specific subcommand.",
            ]
        );
        Ok(())
    }

    #[test]
    fn help_for_a_verb() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        declare_verbs(&mut parser)?;

        assert!(!parser.try_parse(["--echo=x", "juliet", "--help"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Usage:",
                "    TestApp juliet [<options>] [<papa>]",
                "Options:",
                "    --lima     This is the description of lima.",
                "    -h, --help Display this help.",
                "    <papa>     This is the description of papa.",
            ]
        );
        Ok(())
    }

    #[test]
    fn help_wraps_to_the_screen_width() -> anyhow::Result<()> {
        let (options, lines) = options();
        let mut parser = ArgumentParser::with_options(options.screen_width(80));
        parser.add_switch(SwitchDef::new("alpha").short('a').description(description("alpha")))?;
        parser.add_required_option(
            OptionDef::string("echo")
                .parameter_name("rather-lengthy-echo-parameter")
                .description(description("echo")),
        )?;
        parser.add_required_option(
            OptionDef::new("hotel", EnumCodec::<Phase>::new())
                .parameter_name("rather-lengthy-hotel-parameter")
                .description(description("hotel")),
        )?;
        parser.add_option_with_default(
            OptionDef::string("mike")
                .preset("this is mike-preset")
                .description(
                    "This is the description of mike, which is a very long description in order \
                     to test word-breaking",
                ),
            "this is mike-default",
        )?;

        assert!(!parser.try_parse(["--help"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Usage:",
                "    TestApp [<options>] --echo=<rather-lengthy-echo-parameter>",
                "            --hotel=<rather-lengthy-hotel-parameter>",
                "Options:",
                "    -a, --alpha                              This is the description of alpha.",
                "    --echo=<rather-lengthy-echo-parameter>   This is the description of echo.",
                "    --hotel=<rather-lengthy-hotel-parameter> This is the description of hotel.",
                "    --mike[=<string>]                        This is the description of mike,",
                "                                             which is a very long description in",
                "                                             order to test word-breaking.",
                "                                             If omitted, the default is \"this is",
                "                                             mike-default\".",
                "                                             If supplied without a value, the",
                "                                             preset is \"this is mike-preset\".",
                "    -h, --help                               Display this help.",
            ]
        );
        Ok(())
    }

    #[test]
    fn argument_values_are_dumped_across_verbs() -> anyhow::Result<()> {
        let (options, lines) = options();
        let mut parser = ArgumentParser::with_options(options.output_argument_values(true));
        parser.add_switch(SwitchDef::new("alpha").short('a'))?;
        parser.add_switch(SwitchDef::new("bravo").short('b'))?;
        parser.add_option_with_default(OptionDef::string("charlie").short('c'), "charlie-default")?;
        parser.add_option(OptionDef::string("delta").short('d'))?;
        parser.add_required_option(OptionDef::string("echo"))?;
        parser.add_option_with_default(OptionDef::new("foxtrot", EnumCodec::<Phase>::new()), Phase::Value3)?;
        parser.add_option(OptionDef::new("golf", EnumCodec::<Phase>::new()))?;
        parser.add_required_option(OptionDef::new("hotel", EnumCodec::<Phase>::new()))?;
        for name in ["india", "juliet", "kilo"] {
            parser.add_option_with_default(
                OptionDef::string(name).preset(format!("{name}-preset")),
                format!("{name}-default"),
            )?;
        }
        parser.add_required_positional(PositionalDef::string("lima"))?;
        parser.add_verb("mike", "", |child| {
            child.add_switch(SwitchDef::new("november"))?;
            child.add_switch(SwitchDef::new("oscar"))?;
            child.add_positional(PositionalDef::string("papa"))?;
            child.add_positional_with_default(PositionalDef::string("quebec"), "quebec-default")?;
            child.add_positional(PositionalDef::string("romeo"))?;
            child.try_parse();
            Ok(())
        })?;

        let line = "-a --echo=echo-value --hotel=Value2 --india --kilo=kilo-value lima-value mike \
                    --november papa-value";
        assert!(parser.try_parse(tokens(line))?);
        assert_eq!(
            *lines.borrow(),
            [
                "alpha = true",
                "bravo = false",
                "charlie = \"charlie-default\"",
                "delta = None",
                "echo = \"echo-value\"",
                "foxtrot = Value3",
                "golf = None",
                "hotel = Value2",
                "india = \"india-preset\"",
                "juliet = \"juliet-default\"",
                "kilo = \"kilo-value\"",
                "help = false",
                "lima = \"lima-value\"",
                "mike = true",
                "mike.november = true",
                "mike.oscar = false",
                "mike.help = false",
                "mike.papa = \"papa-value\"",
                "mike.quebec = \"quebec-default\"",
                "mike.romeo = None",
            ]
        );
        Ok(())
    }

    #[test]
    fn duplicate_switch_transcript() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_switch(SwitchDef::new("alpha"))?;

        assert!(!parser.try_parse(["--alpha", "--alpha"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Argument 'alpha' supplied more than once.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn unparsable_value_transcript_names_the_cause() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_option(OptionDef::new("alpha", EnumCodec::<Phase>::new()))?;

        assert!(!parser.try_parse(["--alpha=Unparsable"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "'Unparsable' is not a valid value for argument 'alpha'.",
                "Because: Expected one of (Value1, Value2, Value3), found 'Unparsable'",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn empty_integer_transcript() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_option(OptionDef::new("alpha", IntCodec))?;

        assert!(!parser.try_parse(["--alpha="])?);
        assert_eq!(
            *lines.borrow(),
            [
                "'' is not a valid value for argument 'alpha'.",
                "Because: Expected an integer, found ''",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn unknown_letter_in_combined_form_transcript() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_switch(SwitchDef::new("alpha").short('a'))?;
        parser.add_switch(SwitchDef::new("bravo").short('b'))?;

        assert!(!parser.try_parse(["-abc"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Unexpected token: '-c'.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_value_transcripts() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_required_option(OptionDef::string("alpha"))?;
        assert!(!parser.try_parse(Vec::<String>::new())?);

        let (mut bare, bare_lines) = capturing_parser();
        bare.add_option(OptionDef::string("alpha"))?;
        assert!(!bare.try_parse(["--alpha"])?);

        assert_eq!(
            *lines.borrow(),
            [
                "Required argument 'alpha' was not supplied.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        assert_eq!(
            *bare_lines.borrow(),
            [
                "Option 'alpha' was supplied without a value, but it requires a value.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn unexpected_characters_after_option_transcript() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        parser.add_option(OptionDef::string("alpha"))?;

        assert!(!parser.try_parse(["--alpha:x"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Unexpected characters found after 'alpha' : ':x'.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn required_option_accepts_its_preset() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        let opt = parser.add_required_option(OptionDef::string("opt").preset("P"))?;

        assert!(parser.try_parse(["--opt"])?);
        assert_eq!(opt.value(), "P");
        assert!(lines.borrow().is_empty());

        let (mut parser, lines) = capturing_parser();
        parser.add_required_option(OptionDef::string("opt").preset("P"))?;

        assert!(!parser.try_parse(Vec::<String>::new())?);
        assert_eq!(
            *lines.borrow(),
            [
                "Required argument 'opt' was not supplied.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    #[test]
    fn named_arguments_must_precede_verbs() -> anyhow::Result<()> {
        let (mut parser, _) = capturing_parser();
        parser.add_verb("juliet", "", |child| {
            child.try_parse();
            Ok(())
        })?;

        let expected = |violating: &str| ProgrammerError::InvalidOrdering {
            rule: OrderingRule::ArgumentMustPrecedeVerb,
            violating: violating.to_string(),
            preceding: "juliet".to_string(),
        };
        assert_eq!(
            parser.add_switch(SwitchDef::new("alpha")).unwrap_err(),
            expected("alpha")
        );
        assert_eq!(
            parser.add_option(OptionDef::string("bravo")).unwrap_err(),
            expected("bravo")
        );
        Ok(())
    }

    #[test]
    fn errors_inside_a_verb_are_reported_by_the_root() -> anyhow::Result<()> {
        let (mut parser, lines) = capturing_parser();
        declare_verbs(&mut parser)?;

        assert!(!parser.try_parse(["--echo=x", "kilo", "--bogus"])?);
        assert_eq!(
            *lines.borrow(),
            [
                "Unexpected token: '--bogus'.",
                "Try 'TestApp --help' for more information.",
            ]
        );
        Ok(())
    }

    fn switches_after(line: &[String]) -> (bool, Vec<String>, Vec<Option<bool>>) {
        let (mut parser, lines) = capturing_parser();
        let switches = ["alpha", "bravo", "charlie"]
            .into_iter()
            .map(|name| {
                let short = name.chars().next().unwrap_or('a');
                parser.add_switch(SwitchDef::new(name).short(short)).unwrap()
            })
            .collect::<Vec<_>>();

        let succeeded = parser.try_parse(line.iter().cloned()).unwrap();
        let values = switches.iter().map(|s| s.try_value().ok()).collect();
        let output = lines.borrow().clone();
        (succeeded, output, values)
    }

    proptest! {
        #[test]
        fn combined_short_forms_match_separate_ones(
            letters in proptest::collection::vec(proptest::sample::select(vec!['a', 'b', 'c', 'x']), 2..6)
        ) {
            let combined = vec![format!("-{}", letters.iter().collect::<String>())];
            let separate = letters.iter().map(|c| format!("-{c}")).collect::<Vec<_>>();

            prop_assert_eq!(switches_after(&combined), switches_after(&separate));
        }
    }
}
