use line_shell::input::{BatchSource, InteractiveSource, LineSource, PromptedSource};
use line_shell::{Args, Interpreter, Mode, SessionConfig, logging};
use log::info;
use std::io::IsTerminal;
use std::process::ExitCode;

fn open_source(mode: &Mode, config: &SessionConfig) -> anyhow::Result<Box<dyn LineSource>> {
    Ok(match mode {
        Mode::Batch(path) => Box::new(BatchSource::open(path, config.max_line_len)?),
        Mode::Interactive if std::io::stdin().is_terminal() => {
            Box::new(InteractiveSource::new(config.prompt.clone(), config.max_line_len)?)
        }
        Mode::Interactive => Box::new(PromptedSource::new(
            std::io::stdin().lock(),
            std::io::stdout(),
            config.prompt.clone(),
            config.max_line_len,
        )),
    })
}

fn main() -> ExitCode {
    logging::init();
    let args: Args = argh::from_env();
    let mode = args.mode();
    let config = SessionConfig::default();
    info!("starting in {:?} mode", mode);

    let mut source = match open_source(&mode, &config) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Opening input stream failed.");
            eprintln!("{:#}", err);
            return ExitCode::FAILURE;
        }
    };

    Interpreter::new(config).run(source.as_mut());
    ExitCode::SUCCESS
}
