// src/bin/cli.rs
use color_eyre::eyre::eyre;
use ticket_watch::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = cli::parse_args(std::env::args().skip(1)).map_err(|e| eyre!("{e}\n\n{}", cli::HELP))?;
    if args.help {
        eprintln!("{}", cli::HELP);
        return Ok(());
    }

    cli::run(&args).map_err(|e| {
        tracing::error!("{} stage failed", e.stage());
        eyre!(e.diagnostic())
    })
}
