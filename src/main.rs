use anyhow::Result;
use clap::Parser;
use console::style;
use log::error;
use std::process::ExitCode;
use video_grid_maker::cli::Cli;
use video_grid_maker::component::VideoGridGenerator;
use video_grid_maker::config::GridConfig;
use video_grid_maker::init;

fn main() -> ExitCode {
    init::init();

    // clap 預設以結束碼 2 回報參數錯誤，這裡統一為 1
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Program error: {e:#}");
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = GridConfig::try_from(cli)?;
    VideoGridGenerator::new(config).run()?;
    Ok(())
}
