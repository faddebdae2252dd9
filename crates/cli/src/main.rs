use std::process::ExitCode;

fn main() -> ExitCode {
    dokkan_cli::run()
}
