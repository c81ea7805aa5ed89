//! Declared arguments and the handles callers read their values through

use crate::codec::{Codec, CodecError};
use crate::command::help::Entry;
use crate::error::{Failure, ProgrammerError};
use crate::names;
use crate::parser::Scope;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

mod named;
mod positional;
mod verb;

pub(crate) use verb::Verb;

pub(crate) const DEFAULT_DESCRIPTION: &str = "See user's manual";
const NOT_YET_PARSED: &str = "not yet parsed";

/// What every declared argument exposes, whatever its role
pub trait Argument {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str>;

    fn is_required(&self) -> bool;

    /// Whether the argument was matched on the command line
    fn is_supplied(&self) -> bool;

    /// The value as display text, or `not yet parsed` before parsing
    fn raw_value(&self) -> String;
}

/// The identity of an argument, shared between its handle and the parser that owns it
#[derive(Debug)]
pub(crate) struct Header {
    pub(crate) name: String,
    pub(crate) short_name: Option<char>,
    pub(crate) description: Option<String>,
    pub(crate) required: bool,
    pub(crate) supplied: Cell<bool>,
    parsed: Rc<Cell<bool>>,
}

impl Header {
    pub(crate) fn new(
        name: String,
        short_name: Option<char>,
        description: Option<String>,
        required: bool,
        parsed: Rc<Cell<bool>>,
    ) -> Rc<Self> {
        Rc::new(Header {
            name,
            short_name,
            description,
            required,
            supplied: Cell::new(false),
            parsed,
        })
    }

    pub(crate) fn is_parsed(&self) -> bool {
        self.parsed.get()
    }

    fn ensure_parsed(&self) -> Result<(), ProgrammerError> {
        if !self.is_parsed() {
            return Err(ProgrammerError::NotYetParsed);
        }
        Ok(())
    }

    fn description_line(&self) -> String {
        format!(
            "{}.",
            self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
        )
    }
}

/// How an option or positional resolves its value when it is not supplied
#[derive(Debug, Clone)]
pub(crate) enum Policy<T> {
    Nullable,
    Default(T),
    Required,
}

impl<T> Policy<T> {
    pub(crate) fn is_required(&self) -> bool {
        matches!(self, Policy::Required)
    }
}

/// The parser's untyped view of a [`ValueSlot`]
pub(crate) trait Slot {
    fn realize(&self, text: &str) -> Result<(), CodecError>;

    /// Stores the preset as the value; false when there is no preset
    fn realize_preset(&self) -> bool;

    fn type_name(&self) -> String;

    fn has_preset(&self) -> bool;

    fn default_text(&self) -> Option<String>;

    fn preset_text(&self) -> Option<String>;

    fn value_text(&self) -> String;
}

/// Typed storage behind an option or positional
pub(crate) struct ValueSlot<T> {
    codec: Box<dyn Codec<Value = T>>,
    policy: Policy<T>,
    preset: Option<T>,
    value: RefCell<Option<T>>,
}

impl<T: Clone + 'static> ValueSlot<T> {
    pub(crate) fn new<C>(codec: C, policy: Policy<T>, preset: Option<T>) -> Rc<Self>
    where
        C: Codec<Value = T>,
    {
        Rc::new(ValueSlot {
            codec: Box::new(codec),
            policy,
            preset,
            value: RefCell::new(None),
        })
    }

    fn resolved(&self) -> Option<T> {
        if let Some(value) = self.value.borrow().as_ref() {
            return Some(value.clone());
        }
        match &self.policy {
            Policy::Default(value) => Some(value.clone()),
            Policy::Nullable | Policy::Required => None,
        }
    }
}

impl<T: Clone + 'static> Slot for ValueSlot<T> {
    fn realize(&self, text: &str) -> Result<(), CodecError> {
        let value = self.codec.value_from_text(text)?;
        *self.value.borrow_mut() = Some(value);
        Ok(())
    }

    fn realize_preset(&self) -> bool {
        let Some(preset) = &self.preset else {
            return false;
        };
        *self.value.borrow_mut() = Some(preset.clone());
        true
    }

    fn type_name(&self) -> String {
        self.codec.name().to_string()
    }

    fn has_preset(&self) -> bool {
        self.preset.is_some()
    }

    fn default_text(&self) -> Option<String> {
        match &self.policy {
            Policy::Default(value) => Some(self.codec.display_value(value)),
            Policy::Nullable | Policy::Required => None,
        }
    }

    fn preset_text(&self) -> Option<String> {
        self.preset
            .as_ref()
            .map(|value| self.codec.display_value(value))
    }

    fn value_text(&self) -> String {
        match self.resolved() {
            Some(value) => self.codec.display_value(&value),
            None => "None".to_string(),
        }
    }
}

/// The role of an argument decides when the parser offers it a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Named,
    Positional,
    Verb,
}

/// An argument as its parser sees it
pub(crate) enum Declared {
    Switch(Rc<Header>),
    Option {
        header: Rc<Header>,
        parameter_name: Option<String>,
        slot: Rc<dyn Slot>,
    },
    Positional {
        header: Rc<Header>,
        slot: Rc<dyn Slot>,
    },
    Verb(Verb),
}

impl Declared {
    pub(crate) fn role(&self) -> Role {
        match self {
            Declared::Switch(_) | Declared::Option { .. } => Role::Named,
            Declared::Positional { .. } => Role::Positional,
            Declared::Verb(_) => Role::Verb,
        }
    }

    pub(crate) fn header(&self) -> &Header {
        match self {
            Declared::Switch(header)
            | Declared::Option { header, .. }
            | Declared::Positional { header, .. } => header,
            Declared::Verb(verb) => verb.header(),
        }
    }

    pub(crate) fn validate_names(&self) -> Result<(), ProgrammerError> {
        let header = self.header();
        match self {
            Declared::Verb(_) => names::validate_verb_name(&header.name)?,
            _ => names::validate_argument_name(&header.name)?,
        }
        if let Some(short) = header.short_name {
            names::validate_short_name(short)?;
        }
        if let Declared::Option {
            parameter_name: Some(parameter),
            ..
        } = self
        {
            names::validate_parameter_name(parameter)?;
        }
        Ok(())
    }

    /// Offers `tokens` to this argument; returns the tokens left over if it consumed any
    pub(crate) fn try_parse<'t>(
        &self,
        tokens: &'t [String],
        scope: &Scope,
    ) -> Result<Option<&'t [String]>, Failure> {
        let Some((token, rest)) = tokens.split_first() else {
            return Ok(None);
        };

        let consumed = match self {
            Declared::Switch(header) => named::parse_switch(header, token)?,
            Declared::Option { header, slot, .. } => named::parse_option(header, slot.as_ref(), token)?,
            Declared::Positional { header, slot } => {
                positional::parse_positional(header, slot.as_ref(), token)?
            }
            Declared::Verb(verb) => {
                if token != &verb.header().name {
                    return Ok(None);
                }
                verb.dispatch(rest, scope)?;
                return Ok(Some(&rest[rest.len()..]));
            }
        };

        Ok(consumed.then_some(rest))
    }

    /// The value as it appears in argument dumps
    pub(crate) fn value_text(&self) -> String {
        let header = self.header();
        if !header.is_parsed() {
            return NOT_YET_PARSED.to_string();
        }
        match self {
            Declared::Switch(header) => header.supplied.get().to_string(),
            Declared::Verb(verb) => verb.header().supplied.get().to_string(),
            Declared::Option { slot, .. } | Declared::Positional { slot, .. } => slot.value_text(),
        }
    }

    pub(crate) fn help_entry(&self) -> Entry {
        let header = self.header();
        let mut long_usage = vec![header.description_line()];

        let short_usage = match self {
            Declared::Switch(header) => named::switch_usage(header),
            Declared::Option {
                header,
                parameter_name,
                slot,
            } => {
                if let Some(default) = slot.default_text() {
                    long_usage.push(format!("If omitted, the default is {default}."));
                }
                if let Some(preset) = slot.preset_text() {
                    long_usage.push(format!("If supplied without a value, the preset is {preset}."));
                }
                named::option_usage(header, parameter_name.as_deref(), slot.as_ref())
            }
            Declared::Positional { header, .. } => format!("<{}>", header.name),
            Declared::Verb(verb) => verb.header().name.clone(),
        };

        Entry {
            role: self.role(),
            required: header.required,
            short_name: header.short_name,
            short_usage,
            long_usage,
        }
    }
}

/// A switch; its value is whether it was supplied
#[derive(Clone)]
pub struct SwitchArg {
    header: Rc<Header>,
}

impl SwitchArg {
    pub(crate) fn new(header: Rc<Header>) -> Self {
        SwitchArg { header }
    }

    pub fn short_name(&self) -> Option<char> {
        self.header.short_name
    }

    /// Returns whether the switch was supplied
    ///
    /// # Panics
    ///
    /// When called before the command line has been parsed
    pub fn value(&self) -> bool {
        self.try_value().unwrap_or_else(|error| panic!("{error}"))
    }

    pub fn try_value(&self) -> Result<bool, ProgrammerError> {
        self.header.ensure_parsed()?;
        Ok(self.header.supplied.get())
    }
}

/// A verb; its value is whether it was the one selected
#[derive(Clone)]
pub struct VerbArg {
    header: Rc<Header>,
}

impl VerbArg {
    pub(crate) fn new(header: Rc<Header>) -> Self {
        VerbArg { header }
    }

    /// # Panics
    ///
    /// When called before the command line has been parsed
    pub fn value(&self) -> bool {
        self.try_value().unwrap_or_else(|error| panic!("{error}"))
    }

    pub fn try_value(&self) -> Result<bool, ProgrammerError> {
        self.header.ensure_parsed()?;
        Ok(self.header.supplied.get())
    }
}

/// An option or positional that always has a value after a successful parse, either because it
/// is required or because it has a default
pub struct ValueArg<T> {
    header: Rc<Header>,
    slot: Rc<ValueSlot<T>>,
}

impl<T: Clone + 'static> ValueArg<T> {
    pub(crate) fn new(header: Rc<Header>, slot: Rc<ValueSlot<T>>) -> Self {
        ValueArg { header, slot }
    }

    /// # Panics
    ///
    /// When called before the command line has been parsed, or after a parse that failed before
    /// this argument received a value
    pub fn value(&self) -> T {
        self.try_value().unwrap_or_else(|error| panic!("{error}"))
    }

    pub fn try_value(&self) -> Result<T, ProgrammerError> {
        self.header.ensure_parsed()?;
        self.slot
            .resolved()
            .ok_or_else(|| ProgrammerError::ValueUnavailable(self.header.name.clone()))
    }
}

/// An option or positional that may be absent
pub struct OptionalArg<T> {
    header: Rc<Header>,
    slot: Rc<ValueSlot<T>>,
}

impl<T: Clone + 'static> OptionalArg<T> {
    pub(crate) fn new(header: Rc<Header>, slot: Rc<ValueSlot<T>>) -> Self {
        OptionalArg { header, slot }
    }

    /// # Panics
    ///
    /// When called before the command line has been parsed
    pub fn value(&self) -> Option<T> {
        self.try_value().unwrap_or_else(|error| panic!("{error}"))
    }

    pub fn try_value(&self) -> Result<Option<T>, ProgrammerError> {
        self.header.ensure_parsed()?;
        Ok(self.slot.resolved())
    }
}

impl<T> Clone for ValueArg<T> {
    fn clone(&self) -> Self {
        ValueArg {
            header: Rc::clone(&self.header),
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Clone for OptionalArg<T> {
    fn clone(&self) -> Self {
        OptionalArg {
            header: Rc::clone(&self.header),
            slot: Rc::clone(&self.slot),
        }
    }
}

fn flag_text(header: &Header) -> String {
    if !header.is_parsed() {
        return NOT_YET_PARSED.to_string();
    }
    header.supplied.get().to_string()
}

fn slot_text<T: Clone + 'static>(header: &Header, slot: &ValueSlot<T>) -> String {
    if !header.is_parsed() {
        return NOT_YET_PARSED.to_string();
    }
    slot.value_text()
}

impl Argument for SwitchArg {
    fn name(&self) -> &str {
        &self.header.name
    }

    fn description(&self) -> Option<&str> {
        self.header.description.as_deref()
    }

    fn is_required(&self) -> bool {
        self.header.required
    }

    fn is_supplied(&self) -> bool {
        self.header.supplied.get()
    }

    fn raw_value(&self) -> String {
        flag_text(&self.header)
    }
}

impl Argument for VerbArg {
    fn name(&self) -> &str {
        &self.header.name
    }

    fn description(&self) -> Option<&str> {
        self.header.description.as_deref()
    }

    fn is_required(&self) -> bool {
        self.header.required
    }

    fn is_supplied(&self) -> bool {
        self.header.supplied.get()
    }

    fn raw_value(&self) -> String {
        flag_text(&self.header)
    }
}

impl<T: Clone + 'static> Argument for ValueArg<T> {
    fn name(&self) -> &str {
        &self.header.name
    }

    fn description(&self) -> Option<&str> {
        self.header.description.as_deref()
    }

    fn is_required(&self) -> bool {
        self.header.required
    }

    fn is_supplied(&self) -> bool {
        self.header.supplied.get()
    }

    fn raw_value(&self) -> String {
        slot_text(&self.header, &self.slot)
    }
}

impl<T: Clone + 'static> Argument for OptionalArg<T> {
    fn name(&self) -> &str {
        &self.header.name
    }

    fn description(&self) -> Option<&str> {
        self.header.description.as_deref()
    }

    fn is_required(&self) -> bool {
        self.header.required
    }

    fn is_supplied(&self) -> bool {
        self.header.supplied.get()
    }

    fn raw_value(&self) -> String {
        slot_text(&self.header, &self.slot)
    }
}

macro_rules! display_and_debug {
    ($($handle:ident $(<$param:ident>)?),*) => {
        $(
            impl$(<$param: Clone + 'static>)? fmt::Display for $handle$(<$param>)? {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "'{}' = {}", self.name(), self.raw_value())
                }
            }

            impl$(<$param: Clone + 'static>)? fmt::Debug for $handle$(<$param>)? {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($handle))
                        .field("name", &self.name())
                        .field("value", &self.raw_value())
                        .finish()
                }
            }
        )*
    };
}

display_and_debug!(SwitchArg, VerbArg, ValueArg<T>, OptionalArg<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::Phase;
    use crate::codec::{EnumCodec, IntCodec, StringCodec};

    fn header(name: &str, required: bool, parsed: bool) -> Rc<Header> {
        Header::new(
            name.to_string(),
            None,
            None,
            required,
            Rc::new(Cell::new(parsed)),
        )
    }

    #[test]
    fn values_cannot_be_read_before_parsing() {
        let slot = ValueSlot::new(StringCodec, Policy::Required, None);
        let alpha = ValueArg::new(header("alpha", true, false), slot);

        assert_eq!(alpha.try_value(), Err(ProgrammerError::NotYetParsed));
        assert_eq!(alpha.raw_value(), "not yet parsed");
        assert_eq!(alpha.to_string(), "'alpha' = not yet parsed");
    }

    #[test]
    #[should_panic(expected = "before the command line has been parsed")]
    fn reading_a_switch_early_panics() {
        SwitchArg::new(header("alpha", false, false)).value();
    }

    #[test]
    fn required_value_missing_after_parse_is_unavailable() {
        let slot = ValueSlot::new(IntCodec, Policy::Required, None);
        let alpha = ValueArg::new(header("alpha", true, true), slot);

        assert_eq!(
            alpha.try_value(),
            Err(ProgrammerError::ValueUnavailable("alpha".to_string()))
        );
    }

    #[test]
    fn default_applies_until_a_value_is_realized() {
        let slot = ValueSlot::new(EnumCodec::<Phase>::new(), Policy::Default(Phase::Value2), None);
        let alpha = ValueArg::new(header("alpha", false, true), Rc::clone(&slot));
        assert_eq!(alpha.value(), Phase::Value2);

        slot.realize("Value3").unwrap();
        assert_eq!(alpha.value(), Phase::Value3);
        assert_eq!(alpha.to_string(), "'alpha' = Value3");
    }

    #[test]
    fn preset_is_stored_only_when_configured() {
        let without = ValueSlot::new(StringCodec, Policy::Nullable, None);
        assert!(!without.realize_preset());
        assert_eq!(without.value_text(), "None");

        let with = ValueSlot::new(StringCodec, Policy::Nullable, Some("p".to_string()));
        assert!(with.realize_preset());
        assert_eq!(with.value_text(), "\"p\"");
    }

    #[test]
    fn rejected_text_leaves_the_value_untouched() {
        let slot = ValueSlot::new(IntCodec, Policy::Default(42), None);
        assert!(slot.realize("X").is_err());
        assert_eq!(slot.resolved(), Some(42));
    }

    #[test]
    fn help_entry_describes_option_defaults_and_presets() {
        let slot: Rc<dyn Slot> = ValueSlot::new(
            StringCodec,
            Policy::Default("mike-default".to_string()),
            Some("mike-preset".to_string()),
        );
        let option = Declared::Option {
            header: header("mike", false, false),
            parameter_name: None,
            slot,
        };

        let entry = option.help_entry();
        assert_eq!(entry.short_usage, "--mike[=<string>]");
        assert_eq!(
            entry.long_usage,
            [
                "See user's manual.",
                "If omitted, the default is \"mike-default\".",
                "If supplied without a value, the preset is \"mike-preset\".",
            ]
        );
    }
}
