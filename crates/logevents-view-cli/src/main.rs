#![forbid(unsafe_code)]

fn main() {
    std::process::exit(logevents_view_cli::run());
}
