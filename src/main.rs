use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = cpmove::cli::parse();
    app::run(args)
}
