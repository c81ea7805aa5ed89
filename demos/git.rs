use verb_args::{
    ArgumentParser, ChildParser, Declare, EnumCodec, EnumMembers, IntCodec, OptionDef,
    ParserOptions, PositionalDef, ProgrammerError, SwitchDef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mirror {
    Fetch,
    Push,
}

impl EnumMembers for Mirror {
    const TYPE_NAME: &'static str = "mirror";

    fn members() -> &'static [Self] {
        &[Mirror::Fetch, Mirror::Push]
    }

    fn member_name(&self) -> &'static str {
        match self {
            Mirror::Fetch => "Fetch",
            Mirror::Push => "Push",
        }
    }
}

fn handle_remote(args: &mut ChildParser) -> Result<(), ProgrammerError> {
    args.add_verb("add", "Add a remote named <name> for the repository at <url>", handle_remote_add)?;
    args.add_verb("remove", "Remove the remote named <name>", |args| {
        let name = args.add_required_positional(PositionalDef::string("name"))?;
        if args.try_parse() {
            println!("removing remote {}", name.value());
        }
        Ok(())
    })?;
    args.try_parse();
    Ok(())
}

fn handle_remote_add(args: &mut ChildParser) -> Result<(), ProgrammerError> {
    let fetch = args.add_switch(
        SwitchDef::new("fetch")
            .short('f')
            .description("Fetch from the new remote right away"),
    )?;
    let mirror = args.add_option(
        OptionDef::new("mirror", EnumCodec::<Mirror>::new())
            .description("Set up the remote as a mirror")
            .preset(Mirror::Fetch),
    )?;
    let name = args.add_required_positional(PositionalDef::string("name"))?;
    let url = args.add_required_positional(PositionalDef::string("url"))?;

    if args.try_parse() {
        println!(
            "adding remote {} at {} (fetch: {}, mirror: {:?})",
            name.value(),
            url.value(),
            fetch.value(),
            mirror.value()
        );
    }
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    let mut parser = ArgumentParser::with_options(
        ParserOptions::new()
            .program_name("git")
            .verb_term("command")
            .screen_width(80),
    );

    let verbose = parser.add_switch(
        SwitchDef::new("verbose")
            .short('v')
            .description("Be more talkative"),
    )?;
    let depth = parser.add_option_with_default(
        OptionDef::new("depth", IntCodec)
            .parameter_name("n")
            .description("Limit history to the last <n> commits"),
        0,
    )?;
    parser.add_verb("remote", "Manage the set of tracked repositories", handle_remote)?;

    if !parser.try_parse_env()? {
        std::process::exit(1);
    }
    if verbose.value() {
        println!("depth = {}", depth.value());
    }
    Ok(())
}
