use nswcaselaw::cli;

fn main() {
    // The error and its hint are already on stderr
    if cli::Cli::run().is_err() {
        std::process::exit(1);
    }
}
