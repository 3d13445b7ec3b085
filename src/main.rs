use std::process;

fn main() {
    process::exit(edict::cli::run());
}
