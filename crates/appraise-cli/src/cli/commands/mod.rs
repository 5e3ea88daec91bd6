mod config;
mod list;
mod run;

use super::args::{Cli, Command};

pub(crate) async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args).await,
        Command::Config(args) => config::configure(args),
        Command::List => list::list(),
    }
}
