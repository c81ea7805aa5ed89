use crate::codec::CodecError;
use crate::command::help::HelpRequest;
use std::fmt;

/// The rule broken by an argument that was added in the wrong order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingRule {
    NamedArgumentMustPrecedePositional,
    RequiredPositionalMustPrecedeOptionalPositional,
    ArgumentMustPrecedeVerb,
    VerbMayNotBePrecededByOptionalPositional,
}

impl fmt::Display for OrderingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingRule::NamedArgumentMustPrecedePositional => {
                write!(f, "named arguments must precede positional arguments")
            }
            OrderingRule::RequiredPositionalMustPrecedeOptionalPositional => write!(
                f,
                "required positional arguments must precede optional positional arguments"
            ),
            OrderingRule::ArgumentMustPrecedeVerb => write!(f, "arguments must precede verbs"),
            OrderingRule::VerbMayNotBePrecededByOptionalPositional => {
                write!(f, "verbs may not be preceded by optional positional arguments")
            }
        }
    }
}

/// A mistake in the code that declares the arguments, as opposed to a mistake on the command line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgrammerError {
    #[error("arguments cannot be added or parsed after the command line has been parsed")]
    AlreadyParsed,
    #[error("argument values cannot be read before the command line has been parsed")]
    NotYetParsed,
    #[error("argument '{0}' has no value because parsing did not succeed")]
    ValueUnavailable(String),
    #[error("an argument named '{0}' has already been added")]
    DuplicateName(String),
    #[error("an argument with the single-letter name '{0}' has already been added")]
    DuplicateShortName(char),
    #[error("'{0}' is not a valid name")]
    InvalidName(String),
    #[error("'{0}' is not a valid single-letter name")]
    InvalidShortName(char),
    #[error("cannot add '{violating}' after '{preceding}': {rule}")]
    InvalidOrdering {
        rule: OrderingRule,
        violating: String,
        preceding: String,
    },
    #[error("the handler of verb '{0}' does not invoke try_parse()")]
    ParseNotInvoked(String),
    #[error("the handler of verb '{0}' invokes try_parse() more than once")]
    ParseInvokedMoreThanOnce(String),
}

/// A command line that does not match the declared arguments
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserError {
    #[error("Argument '{0}' supplied more than once.")]
    SuppliedMoreThanOnce(String),
    #[error("Unexpected characters found after '{name}' : '{characters}'.")]
    UnexpectedCharacters { name: String, characters: String },
    #[error("Option '{0}' was supplied without a value, but it requires a value.")]
    OptionRequiresValue(String),
    #[error("Required argument '{0}' was not supplied.")]
    RequiredArgumentNotSupplied(String),
    #[error("Unexpected token: '{0}'.")]
    UnexpectedToken(String),
    #[error("'{token}' is not a valid value for argument '{name}'.")]
    UnparsableValue {
        name: String,
        token: String,
        #[source]
        cause: CodecError,
    },
    #[error("Expected a {0}.")]
    VerbExpected(String),
}

/// Everything that stops a parse short of success
#[derive(Debug)]
pub(crate) enum Failure {
    Help(HelpRequest),
    User(UserError),
    Programmer(ProgrammerError),
}

impl From<UserError> for Failure {
    fn from(error: UserError) -> Self {
        Failure::User(error)
    }
}

impl From<ProgrammerError> for Failure {
    fn from(error: ProgrammerError) -> Self {
        Failure::Programmer(error)
    }
}
