use super::Header;
use crate::error::{Failure, ProgrammerError};
use crate::parser::{ChildParser, Scope};
use std::cell::RefCell;
use std::rc::Rc;

/// Declares the arguments of a verb on the child parser it is given, then calls
/// [`ChildParser::try_parse`] exactly once
pub(crate) type Handler = Box<dyn FnMut(&mut ChildParser) -> Result<(), ProgrammerError>>;

pub(crate) struct Verb {
    header: Rc<Header>,
    handler: RefCell<Handler>,
}

impl Verb {
    pub(crate) fn new(header: Rc<Header>, handler: Handler) -> Self {
        Verb {
            header,
            handler: RefCell::new(handler),
        }
    }

    pub(crate) fn header(&self) -> &Header {
        &self.header
    }

    /// Runs the handler against a child parser that only counts `try_parse` calls
    pub(crate) fn rehearse(&self, parent: &Scope) -> Result<(), ProgrammerError> {
        let mut child = ChildParser::rehearsal(parent.child(&self.header.name));
        let mut handler = self.handler.borrow_mut();
        (&mut *handler)(&mut child)?;
        child.check_invocations()
    }

    /// Hands the rest of the command line to the handler
    pub(crate) fn dispatch(&self, rest: &[String], parent: &Scope) -> Result<(), Failure> {
        self.header.supplied.set(true);
        tracing::debug!(verb = %self.header.name, tokens = rest.len(), "dispatching verb");

        let mut child = ChildParser::execution(parent.child(&self.header.name), rest.to_vec());
        let mut handler = self.handler.borrow_mut();
        (&mut *handler)(&mut child)?;
        child.finish()
    }
}
