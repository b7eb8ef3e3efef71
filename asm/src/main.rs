use arch::inst::InstTable;
use bcasm::{
    error::Error,
    msg::Msg,
    output::{self, Format},
    source::Source,
};
use color_print::cprintln;
use std::process::ExitCode;
use tracing::Level;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.asm")]
    input: String,

    /// Output file (machine code is printed when omitted)
    #[clap(short, long)]
    output: Option<String>,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Bin)]
    format: Format,

    /// Dump annotated listing
    #[clap(short, long)]
    dump: bool,

    /// Print the instruction table and exit
    #[clap(long)]
    isa: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[clap(short, long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    use clap::Parser;

    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            cprintln!("<red,bold>error</>: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<bool, Error> {
    if args.isa {
        for desc in InstTable::get().iter() {
            println!("  {}", desc.cformat());
        }
        return Ok(true);
    }

    println!("Basic Computer Assembler");

    println!("1. Read Source");
    println!("  < {}", &args.input);
    let source = Source::load(&args.input)?;
    tracing::debug!(lines = source.lines.len(), "loaded");

    println!("2. Collect Labels & Generate Code");
    let asm = match bcasm::assemble(&source.texts()) {
        Ok(asm) => asm,
        Err(err) => {
            err.msgs.print(&source);
            Msg::Error(err.cause.error).print(source.info(err.cause.line));
            return Ok(false);
        }
    };
    asm.msgs.print(&source);
    output::print_symbols(&asm.symbols);

    println!("3. Output Machine Code");
    let text = output::render(&asm, args.format)?;
    match &args.output {
        Some(path) => {
            println!("  > {}", path);
            std::fs::write(path, text).map_err(|e| Error::FileWrite(path.clone(), e))?;
        }
        None => print!("{}", text),
    }

    if args.dump {
        for row in output::listing(&asm, &source) {
            println!("{}", row);
        }
    }

    let errors = asm.msgs.errors().count();
    if errors > 0 {
        cprintln!("<red,bold>error</>: {} line(s) could not be assembled", errors);
    }
    Ok(errors == 0)
}
