use anyhow::Result;
use clap::Parser;

mod cli;
mod exchange;
mod link;
mod payload;
mod port;
mod run;
mod stats;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    run::info(&format!(
        "{} baud={} payload_len={} mode={:?}",
        args.port, args.baud, args.payload_len, args.mode
    ));

    let port = port::open_port(&args.port, args.baud)?;
    let mut link = link::SerialLink::new(port);

    let counters = run::run(&mut link, &args.run_config())?;
    println!("{}", counters.summary());
    Ok(())
}
