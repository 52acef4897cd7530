use std::process::ExitCode;

fn main() -> ExitCode {
    apiwalk::cli::run()
}
