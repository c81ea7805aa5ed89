//! Blueprints for arguments, and the registration methods shared by every parser

use crate::argument::{
    Declared, Header, OptionalArg, Policy, SwitchArg, ValueArg, ValueSlot, Verb, VerbArg,
};
use crate::codec::{Codec, StringCodec};
use crate::error::ProgrammerError;
use crate::parser::{ChildParser, Scope};
use std::rc::Rc;

/// A blueprint for a switch (e.g. `--verbose` or `-v`)
#[derive(Debug, Clone)]
pub struct SwitchDef {
    name: String,
    short: Option<char>,
    description: Option<String>,
}

impl SwitchDef {
    pub fn new(name: impl Into<String>) -> Self {
        SwitchDef {
            name: name.into(),
            short: None,
            description: None,
        }
    }

    /// Attaches a single-letter name
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A blueprint for an option (e.g. `--output=file.txt`)
pub struct OptionDef<C: Codec> {
    name: String,
    codec: C,
    short: Option<char>,
    description: Option<String>,
    parameter_name: Option<String>,
    preset: Option<C::Value>,
}

impl<C: Codec> OptionDef<C> {
    pub fn new(name: impl Into<String>, codec: C) -> Self {
        OptionDef {
            name: name.into(),
            codec,
            short: None,
            description: None,
            parameter_name: None,
            preset: None,
        }
    }

    /// Attaches a single-letter name
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Names the value in help, e.g. `--output=<file>`; the codec's name is used otherwise
    pub fn parameter_name(mut self, parameter_name: impl Into<String>) -> Self {
        self.parameter_name = Some(parameter_name.into());
        self
    }

    /// Sets the value the option takes when it is supplied without `=value`
    pub fn preset(mut self, preset: impl Into<C::Value>) -> Self {
        self.preset = Some(preset.into());
        self
    }
}

impl OptionDef<StringCodec> {
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, StringCodec)
    }
}

/// A blueprint for a positional argument
pub struct PositionalDef<C: Codec> {
    name: String,
    codec: C,
    description: Option<String>,
}

impl<C: Codec> PositionalDef<C> {
    pub fn new(name: impl Into<String>, codec: C) -> Self {
        PositionalDef {
            name: name.into(),
            codec,
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl PositionalDef<StringCodec> {
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, StringCodec)
    }
}

type Parts<T> = (Rc<Header>, Rc<ValueSlot<T>>);

fn declare_option<C: Codec>(
    scope: &mut Scope,
    def: OptionDef<C>,
    policy: Policy<C::Value>,
) -> Result<Parts<C::Value>, ProgrammerError> {
    let header = scope.header(def.name, def.short, def.description, policy.is_required());
    let slot = ValueSlot::new(def.codec, policy, def.preset);
    scope.add(Declared::Option {
        header: Rc::clone(&header),
        parameter_name: def.parameter_name,
        slot: slot.clone(),
    })?;
    Ok((header, slot))
}

fn declare_positional<C: Codec>(
    scope: &mut Scope,
    def: PositionalDef<C>,
    policy: Policy<C::Value>,
) -> Result<Parts<C::Value>, ProgrammerError> {
    let header = scope.header(def.name, None, def.description, policy.is_required());
    let slot = ValueSlot::new(def.codec, policy, None);
    scope.add(Declared::Positional {
        header: Rc::clone(&header),
        slot: slot.clone(),
    })?;
    Ok((header, slot))
}

/// Registration of arguments, for the program's parser and for verb parsers alike
///
/// Every method fails with a [`ProgrammerError`] when the command line has already been parsed,
/// when a name is malformed or taken, or when the argument would break the required ordering:
/// named arguments, then required positionals, then optional positionals or verbs.
pub trait Declare {
    #[doc(hidden)]
    fn scope(&mut self) -> &mut Scope;

    fn add_switch(&mut self, def: SwitchDef) -> Result<SwitchArg, ProgrammerError> {
        let scope = self.scope();
        let header = scope.header(def.name, def.short, def.description, false);
        scope.add(Declared::Switch(Rc::clone(&header)))?;
        Ok(SwitchArg::new(header))
    }

    /// Adds an option whose value is `None` unless supplied
    fn add_option<C: Codec>(
        &mut self,
        def: OptionDef<C>,
    ) -> Result<OptionalArg<C::Value>, ProgrammerError> {
        let (header, slot) = declare_option(self.scope(), def, Policy::Nullable)?;
        Ok(OptionalArg::new(header, slot))
    }

    fn add_option_with_default<C: Codec>(
        &mut self,
        def: OptionDef<C>,
        default: impl Into<C::Value>,
    ) -> Result<ValueArg<C::Value>, ProgrammerError> {
        let policy = Policy::Default(default.into());
        let (header, slot) = declare_option(self.scope(), def, policy)?;
        Ok(ValueArg::new(header, slot))
    }

    /// Adds an option that must be supplied; a preset still applies when it is supplied bare
    fn add_required_option<C: Codec>(
        &mut self,
        def: OptionDef<C>,
    ) -> Result<ValueArg<C::Value>, ProgrammerError> {
        let (header, slot) = declare_option(self.scope(), def, Policy::Required)?;
        Ok(ValueArg::new(header, slot))
    }

    fn add_positional<C: Codec>(
        &mut self,
        def: PositionalDef<C>,
    ) -> Result<OptionalArg<C::Value>, ProgrammerError> {
        let (header, slot) = declare_positional(self.scope(), def, Policy::Nullable)?;
        Ok(OptionalArg::new(header, slot))
    }

    fn add_positional_with_default<C: Codec>(
        &mut self,
        def: PositionalDef<C>,
        default: impl Into<C::Value>,
    ) -> Result<ValueArg<C::Value>, ProgrammerError> {
        let policy = Policy::Default(default.into());
        let (header, slot) = declare_positional(self.scope(), def, policy)?;
        Ok(ValueArg::new(header, slot))
    }

    fn add_required_positional<C: Codec>(
        &mut self,
        def: PositionalDef<C>,
    ) -> Result<ValueArg<C::Value>, ProgrammerError> {
        let (header, slot) = declare_positional(self.scope(), def, Policy::Required)?;
        Ok(ValueArg::new(header, slot))
    }

    /// Adds a verb; when it is selected, `handler` receives a parser for the tokens after it
    ///
    /// The handler is called once right away against a parser that parses nothing, so that a
    /// handler which does not call [`ChildParser::try_parse`] exactly once is caught here.
    fn add_verb<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Result<VerbArg, ProgrammerError>
    where
        F: FnMut(&mut ChildParser) -> Result<(), ProgrammerError> + 'static,
    {
        let scope = self.scope();
        let header = scope.header(name.into(), None, Some(description.into()), false);
        scope.add(Declared::Verb(Verb::new(Rc::clone(&header), Box::new(handler))))?;
        Ok(VerbArg::new(header))
    }
}

impl Declare for ChildParser {
    fn scope(&mut self) -> &mut Scope {
        self.scope_mut()
    }
}
